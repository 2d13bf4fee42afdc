//! Internet-shortcut feature: `.lnk`/`.url` shortcuts pointing at URLs.
//!
//! Each shortcut also contributes a `RemoveFile` row so the created file is
//! cleaned up on uninstall; that row is a pass-through for the installer
//! engine, untouched by the pipeline apart from reference resolution.

use setld_model::{
    ActionFlags, BindingPolicy, ColumnDef, CustomAction, Platform, Row, Section, SectionSource,
    TableSchema, Value, standard,
};
use setld_result::Result;

pub const INTERNET_SHORTCUT: &str = "InternetShortcut";
pub const REMOVE_FILE: &str = "RemoveFile";

const PAYLOAD: &str = "ShortcutPayload";

/// Uninstall-time removal marker for `RemoveFile` rows.
const REMOVE_ON_UNINSTALL: i64 = 2;

/// One URL shortcut created in an installed directory.
#[derive(Clone, Debug)]
pub struct InternetShortcut {
    pub id: String,
    /// Reference into the core compiler's `File` table naming the keypath
    /// the shortcut is installed alongside.
    pub file: String,
    /// Reference into the core compiler's `Directory` table.
    pub directory: String,
    pub name: String,
    pub target: String,
    pub kind: i64,
}

/// Contributes internet-shortcut rows, their uninstall cleanup rows, and the
/// sched/create/rollback action set.
#[derive(Clone, Debug, Default)]
pub struct InternetShortcutModule {
    pub shortcuts: Vec<InternetShortcut>,
}

impl InternetShortcutModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shortcut(mut self, shortcut: InternetShortcut) -> Self {
        self.shortcuts.push(shortcut);
        self
    }
}

impl SectionSource for InternetShortcutModule {
    fn name(&self) -> &str {
        "util.shortcut"
    }

    fn section(&self) -> Result<Section> {
        let mut section = Section::new(self.name())
            .with_schema(TableSchema::new(
                INTERNET_SHORTCUT,
                vec![
                    ColumnDef::reference("File", standard::FILE),
                    ColumnDef::reference("Directory", standard::DIRECTORY),
                    ColumnDef::text("Name"),
                    ColumnDef::text("Target"),
                    ColumnDef::int("Type"),
                ],
            ))
            .with_schema(TableSchema::new(
                REMOVE_FILE,
                vec![
                    ColumnDef::reference("File", standard::FILE),
                    ColumnDef::text("FileName"),
                    ColumnDef::reference("Directory", standard::DIRECTORY),
                    ColumnDef::int("InstallMode"),
                ],
            ))
            .with_row(
                Row::new(standard::BINARY, PAYLOAD, vec![Value::from("[Binary data]")])
                    .with_arch(Platform::X86),
            )
            .with_row(
                Row::new(standard::BINARY, PAYLOAD, vec![Value::from("[Binary data]")])
                    .with_arch(Platform::X64),
            );

        for shortcut in &self.shortcuts {
            section = section
                .with_row(Row::new(
                    INTERNET_SHORTCUT,
                    shortcut.id.clone(),
                    vec![
                        Value::Id(shortcut.file.clone()),
                        Value::Id(shortcut.directory.clone()),
                        Value::Text(shortcut.name.clone()),
                        Value::Text(shortcut.target.clone()),
                        Value::Int(shortcut.kind),
                    ],
                ))
                .with_row(Row::new(
                    REMOVE_FILE,
                    format!("{}.remove", shortcut.id),
                    vec![
                        Value::Id(shortcut.file.clone()),
                        Value::Text(shortcut.name.clone()),
                        Value::Id(shortcut.directory.clone()),
                        Value::Int(REMOVE_ON_UNINSTALL),
                    ],
                ));
        }

        Ok(section
            .with_action(CustomAction::new(
                "SchedInternetShortcuts",
                ActionFlags::empty(),
                PAYLOAD,
                "SchedInternetShortcuts",
                BindingPolicy::FixedX86,
            ))
            .with_action(
                CustomAction::new(
                    "CreateInternetShortcuts",
                    ActionFlags::DEFERRED | ActionFlags::NO_IMPERSONATE,
                    PAYLOAD,
                    "CreateInternetShortcuts",
                    BindingPolicy::FixedX86,
                )
                .with_rollback("RollbackInternetShortcuts"),
            )
            .with_action(CustomAction::new(
                "RollbackInternetShortcuts",
                ActionFlags::ROLLBACK | ActionFlags::NO_IMPERSONATE,
                PAYLOAD,
                "RollbackInternetShortcuts",
                BindingPolicy::FixedX86,
            )))
    }
}

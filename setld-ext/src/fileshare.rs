//! File-share feature: a shared folder with permission grants.
//!
//! The share payload carries no pointer-width-sensitive behavior, so every
//! action binds `FixedX86` and runs uniformly under emulation regardless of
//! the build's target platform.

use setld_model::{
    ActionFlags, BindingPolicy, ColumnDef, CustomAction, Platform, Row, Section, SectionSource,
    SequencingConstraint, TableSchema, Value, standard,
};
use setld_result::Result;

pub const FILE_SHARE: &str = "FileShare";
pub const FILE_SHARE_PERMISSIONS: &str = "FileSharePermissions";

const PAYLOAD: &str = "SharePayload";

/// One permission grant on a share.
#[derive(Clone, Debug)]
pub struct SharePermission {
    pub account: String,
    pub rights: i64,
}

/// Contributes a file share bound to a directory and a source file, with the
/// dispatcher and create/drop action set that manages it.
#[derive(Clone, Debug)]
pub struct FileShareModule {
    pub share_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Reference into the core compiler's `Directory` table.
    pub directory: String,
    /// Reference into the core compiler's `File` table.
    pub file: String,
    pub permissions: Vec<SharePermission>,
}

impl FileShareModule {
    pub fn new(
        share_id: impl Into<String>,
        name: impl Into<String>,
        directory: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            share_id: share_id.into(),
            name: name.into(),
            description: None,
            directory: directory.into(),
            file: file.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_permission(mut self, account: impl Into<String>, rights: i64) -> Self {
        self.permissions.push(SharePermission {
            account: account.into(),
            rights,
        });
        self
    }
}

impl SectionSource for FileShareModule {
    fn name(&self) -> &str {
        "util.fileshare"
    }

    fn section(&self) -> Result<Section> {
        let mut section = Section::new(self.name())
            .with_schema(TableSchema::new(
                FILE_SHARE,
                vec![
                    ColumnDef::text("Name"),
                    ColumnDef::text("Description").nullable(),
                    ColumnDef::reference("Directory", standard::DIRECTORY),
                    ColumnDef::reference("File", standard::FILE),
                ],
            ))
            .with_schema(TableSchema::new(
                FILE_SHARE_PERMISSIONS,
                vec![
                    ColumnDef::reference("Share", FILE_SHARE),
                    ColumnDef::text("Account"),
                    ColumnDef::int("Rights"),
                ],
            ))
            .with_row(
                Row::new(standard::BINARY, PAYLOAD, vec![Value::from("[Binary data]")])
                    .with_arch(Platform::X86),
            )
            .with_row(
                Row::new(standard::BINARY, PAYLOAD, vec![Value::from("[Binary data]")])
                    .with_arch(Platform::X64),
            )
            .with_row(Row::new(
                FILE_SHARE,
                self.share_id.clone(),
                vec![
                    Value::Text(self.name.clone()),
                    match &self.description {
                        Some(text) => Value::Text(text.clone()),
                        None => Value::Null,
                    },
                    Value::Id(self.directory.clone()),
                    Value::Id(self.file.clone()),
                ],
            ));

        for permission in &self.permissions {
            section = section.with_row(Row::new(
                FILE_SHARE_PERMISSIONS,
                format!("{}.{}", self.share_id, permission.account),
                vec![
                    Value::Id(self.share_id.clone()),
                    Value::Text(permission.account.clone()),
                    Value::Int(permission.rights),
                ],
            ));
        }

        let immediate = ActionFlags::empty();
        let deferred = ActionFlags::DEFERRED | ActionFlags::NO_IMPERSONATE;
        let rollback = ActionFlags::ROLLBACK | ActionFlags::NO_IMPERSONATE;

        Ok(section
            .with_action(CustomAction::new(
                "ConfigureShareInstall",
                immediate,
                PAYLOAD,
                "ConfigureShareInstall",
                BindingPolicy::FixedX86,
            ))
            .with_action(CustomAction::new(
                "ConfigureShareUninstall",
                immediate,
                PAYLOAD,
                "ConfigureShareUninstall",
                BindingPolicy::FixedX86,
            ))
            .with_action(
                CustomAction::new(
                    "CreateShare",
                    deferred,
                    PAYLOAD,
                    "CreateShare",
                    BindingPolicy::FixedX86,
                )
                .with_rollback("CreateShareRollback"),
            )
            .with_action(CustomAction::new(
                "CreateShareRollback",
                rollback,
                PAYLOAD,
                "DropShare",
                BindingPolicy::FixedX86,
            ))
            .with_action(
                CustomAction::new(
                    "DropShare",
                    deferred,
                    PAYLOAD,
                    "DropShare",
                    BindingPolicy::FixedX86,
                )
                .with_constraint(SequencingConstraint::after_action("CreateShare"))
                .with_rollback("DropShareRollback"),
            )
            .with_action(CustomAction::new(
                "DropShareRollback",
                rollback,
                PAYLOAD,
                "CreateShare",
                BindingPolicy::FixedX86,
            )))
    }
}

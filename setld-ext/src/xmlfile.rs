//! XML-edit feature: attribute and element edits applied to installed files.

use setld_model::{
    ActionFlags, BindingPolicy, ColumnDef, CustomAction, Platform, Row, Section, SectionSource,
    TableSchema, Value, standard,
};
use setld_result::Result;

pub const XML_FILE: &str = "XmlFile";

const PAYLOAD: &str = "XmlPayload";

/// One edit: set `name` to `value` at `element_path` inside `file`.
#[derive(Clone, Debug)]
pub struct XmlEdit {
    pub id: String,
    /// Reference into the core compiler's `File` table.
    pub file: String,
    pub element_path: String,
    pub name: String,
    pub value: String,
    pub flags: i64,
}

/// Contributes XML-edit rows and the sched/exec action set that applies them.
#[derive(Clone, Debug, Default)]
pub struct XmlFileModule {
    pub edits: Vec<XmlEdit>,
}

impl XmlFileModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edit(mut self, edit: XmlEdit) -> Self {
        self.edits.push(edit);
        self
    }
}

impl SectionSource for XmlFileModule {
    fn name(&self) -> &str {
        "util.xmlfile"
    }

    fn section(&self) -> Result<Section> {
        let mut section = Section::new(self.name())
            .with_schema(TableSchema::new(
                XML_FILE,
                vec![
                    ColumnDef::reference("File", standard::FILE),
                    ColumnDef::text("ElementPath"),
                    ColumnDef::text("Name"),
                    ColumnDef::text("Value"),
                    ColumnDef::int("Flags"),
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

        for edit in &self.edits {
            section = section.with_row(Row::new(
                XML_FILE,
                edit.id.clone(),
                vec![
                    Value::Id(edit.file.clone()),
                    Value::Text(edit.element_path.clone()),
                    Value::Text(edit.name.clone()),
                    Value::Text(edit.value.clone()),
                    Value::Int(edit.flags),
                ],
            ));
        }

        Ok(section
            .with_action(CustomAction::new(
                "SchedXmlFile",
                ActionFlags::empty(),
                PAYLOAD,
                "SchedXmlFile",
                BindingPolicy::FixedX86,
            ))
            .with_action(
                CustomAction::new(
                    "ExecXmlFile",
                    ActionFlags::DEFERRED | ActionFlags::NO_IMPERSONATE,
                    PAYLOAD,
                    "ExecXmlFile",
                    BindingPolicy::FixedX86,
                )
                .with_rollback("ExecXmlFileRollback"),
            )
            .with_action(CustomAction::new(
                "ExecXmlFileRollback",
                ActionFlags::ROLLBACK | ActionFlags::NO_IMPERSONATE,
                PAYLOAD,
                "ExecXmlFileRollback",
                BindingPolicy::FixedX86,
            )))
    }
}

//! Close-application feature: shuts down named processes before file costing
//! commits to in-use files.
//!
//! The action set has no rollback pair: closing an application is not undone,
//! and the reboot check merely records whether a close failed and a restart
//! is pending.

use setld_model::{
    ActionFlags, BindingPolicy, ColumnDef, CustomAction, Platform, Row, Section, SectionSource,
    TableSchema, Value, standard,
};
use setld_result::Result;

pub const CLOSE_APPLICATION: &str = "CloseApplication";

const PAYLOAD: &str = "CloseAppPayload";

/// One process to close, matched by executable name.
#[derive(Clone, Debug)]
pub struct CloseApp {
    pub id: String,
    /// Executable name the running process is matched against.
    pub target: String,
    pub description: Option<String>,
    pub attributes: i64,
    pub condition: Option<String>,
}

impl CloseApp {
    pub fn new(id: impl Into<String>, target: impl Into<String>, attributes: i64) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            description: None,
            attributes,
            condition: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Contributes close-application rows and the immediate/deferred close
/// action set plus the reboot-pending check.
#[derive(Clone, Debug, Default)]
pub struct CloseApplicationModule {
    pub apps: Vec<CloseApp>,
}

impl CloseApplicationModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app: CloseApp) -> Self {
        self.apps.push(app);
        self
    }
}

impl SectionSource for CloseApplicationModule {
    fn name(&self) -> &str {
        "util.closeapp"
    }

    fn section(&self) -> Result<Section> {
        let mut section = Section::new(self.name())
            .with_schema(TableSchema::new(
                CLOSE_APPLICATION,
                vec![
                    ColumnDef::text("Target"),
                    ColumnDef::text("Description").nullable(),
                    ColumnDef::int("Attributes"),
                    ColumnDef::text("Condition").nullable(),
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

        for app in &self.apps {
            section = section.with_row(Row::new(
                CLOSE_APPLICATION,
                app.id.clone(),
                vec![
                    Value::Text(app.target.clone()),
                    match &app.description {
                        Some(text) => Value::Text(text.clone()),
                        None => Value::Null,
                    },
                    Value::Int(app.attributes),
                    match &app.condition {
                        Some(text) => Value::Text(text.clone()),
                        None => Value::Null,
                    },
                ],
            ));
        }

        Ok(section
            .with_action(CustomAction::new(
                "CloseApplications",
                ActionFlags::empty(),
                PAYLOAD,
                "CloseApplications",
                BindingPolicy::FixedX86,
            ))
            .with_action(CustomAction::new(
                "CheckRebootRequired",
                ActionFlags::ASYNC,
                PAYLOAD,
                "CheckRebootRequired",
                BindingPolicy::FixedX86,
            ))
            .with_action(CustomAction::new(
                "CloseApplicationsDeferred",
                ActionFlags::DEFERRED | ActionFlags::NO_IMPERSONATE,
                PAYLOAD,
                "CloseApplicationsDeferred",
                BindingPolicy::FixedX86,
            )))
    }
}

//! Security-descriptor feature: ACL grants applied to installed objects.
//!
//! Unlike the file-share module, the exec payload manipulates security
//! descriptors whose layout is pointer-width-sensitive, so every action binds
//! `TracksTargetPlatform`: a 64-bit build emits 64-bit-qualified binary and
//! action identifiers.

use setld_model::{
    ActionFlags, BindingPolicy, ColumnDef, CustomAction, Platform, Row, Section, SectionSource,
    TableSchema, Value, standard,
};
use setld_result::Result;

pub const SECURE_OBJECT: &str = "SecureObject";

const PAYLOAD: &str = "SecurePayload";

/// Contributes one security-descriptor grant and the sched/exec action set
/// that applies it.
#[derive(Clone, Debug)]
pub struct SecureObjectModule {
    pub object_id: String,
    /// Name of the table holding the secured object (e.g. `CreateFolder`).
    pub object_table: String,
    pub account: String,
    pub permission: i64,
    /// Reference into the core compiler's `File` table.
    pub file: String,
}

impl SecureObjectModule {
    pub fn new(
        object_id: impl Into<String>,
        object_table: impl Into<String>,
        account: impl Into<String>,
        permission: i64,
        file: impl Into<String>,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            object_table: object_table.into(),
            account: account.into(),
            permission,
            file: file.into(),
        }
    }
}

impl SectionSource for SecureObjectModule {
    fn name(&self) -> &str {
        "util.secureobject"
    }

    fn section(&self) -> Result<Section> {
        let immediate = ActionFlags::empty();
        let deferred = ActionFlags::DEFERRED | ActionFlags::NO_IMPERSONATE;
        let rollback = ActionFlags::ROLLBACK | ActionFlags::NO_IMPERSONATE;

        Ok(Section::new(self.name())
            .with_schema(TableSchema::new(
                SECURE_OBJECT,
                vec![
                    ColumnDef::text("Table"),
                    ColumnDef::text("Domain").nullable(),
                    ColumnDef::text("Account"),
                    ColumnDef::int("Permission"),
                    ColumnDef::reference("File", standard::FILE),
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
                SECURE_OBJECT,
                self.object_id.clone(),
                vec![
                    Value::Text(self.object_table.clone()),
                    Value::Null,
                    Value::Text(self.account.clone()),
                    Value::Int(self.permission),
                    Value::Id(self.file.clone()),
                ],
            ))
            .with_action(CustomAction::new(
                "SchedSecureObjects",
                immediate,
                PAYLOAD,
                "SchedSecureObjects",
                BindingPolicy::TracksTargetPlatform,
            ))
            .with_action(CustomAction::new(
                "SchedSecureObjectsUninstall",
                immediate,
                PAYLOAD,
                "SchedSecureObjects",
                BindingPolicy::TracksTargetPlatform,
            ))
            .with_action(
                CustomAction::new(
                    "ExecSecureObjects",
                    deferred,
                    PAYLOAD,
                    "ExecSecureObjects",
                    BindingPolicy::TracksTargetPlatform,
                )
                .with_rollback("ExecSecureObjectsRollback"),
            )
            .with_action(CustomAction::new(
                "ExecSecureObjectsRollback",
                rollback,
                PAYLOAD,
                "ExecSecureObjectsRollback",
                BindingPolicy::TracksTargetPlatform,
            )))
    }
}

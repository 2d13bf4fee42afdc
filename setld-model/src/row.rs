//! Table rows, including architecture-variant rows.

use crate::platform::Platform;
use crate::value::Value;

/// One record of a named table.
///
/// A row's identifier is unique within its table unless the row is marked as
/// an architecture variant, in which case the pair `(id, arch)` must be
/// unique and at most one variant may be marked default for platform-unaware
/// lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub table: String,
    pub id: String,
    /// Architecture-variant marker. `None` for plain rows.
    pub arch: Option<Platform>,
    /// Selected by unqualified lookups when multiple variants exist.
    pub default_variant: bool,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(table: impl Into<String>, id: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            table: table.into(),
            id: id.into(),
            arch: None,
            default_variant: false,
            values,
        }
    }

    /// Mark this row as the variant built for `platform`.
    pub fn with_arch(mut self, platform: Platform) -> Self {
        self.arch = Some(platform);
        self
    }

    /// Mark this variant as the default for platform-unaware lookups.
    pub fn as_default_variant(mut self) -> Self {
        self.default_variant = true;
        self
    }

    /// The emitted identifier: variant rows carry their platform qualifier.
    pub fn qualified_id(&self) -> String {
        match self.arch {
            Some(platform) => format!("{}_{}", self.id, platform.suffix()),
            None => self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rows_keep_their_identifier() {
        let row = Row::new("Directory", "INSTALLFOLDER", vec![]);
        assert_eq!(row.qualified_id(), "INSTALLFOLDER");
    }

    #[test]
    fn variant_rows_are_qualified() {
        let row = Row::new("Binary", "SharePayload", vec![]).with_arch(Platform::X86);
        assert_eq!(row.qualified_id(), "SharePayload_X86");

        let row = Row::new("Binary", "SharePayload", vec![]).with_arch(Platform::X64);
        assert_eq!(row.qualified_id(), "SharePayload_X64");
    }
}

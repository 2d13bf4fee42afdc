use thiserror::Error;

/// Unified error type for all setld operations.
///
/// Each variant names the offending row, table, or identifier so a caller can
/// act on a diagnostic without re-running the link. Errors are build-fatal: a
/// link either yields a complete, internally consistent model or fails with
/// the full list of collected diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two rows of the same table share an identifier and neither is a
    /// legitimate architecture variant of the other.
    #[error(
        "duplicate identifier '{id}' in table '{table}' (contributed by '{first}' and '{second}')"
    )]
    DuplicateIdentifier {
        table: String,
        id: String,
        first: String,
        second: String,
    },

    /// A reference column names a symbol that does not exist in the merged
    /// model, or the architecture variant demanded by the referencing side's
    /// binding policy is absent.
    #[error(
        "unresolved symbol '{target_table}:{target}' referenced by {table}:{row} column '{column}'"
    )]
    UnresolvedSymbol {
        table: String,
        row: String,
        column: String,
        target_table: String,
        target: String,
    },

    /// An unqualified reference matched multiple architecture variants and
    /// none of them is marked as the default.
    #[error(
        "ambiguous symbol '{target_table}:{target}' referenced by {table}:{row} column \
         '{column}': multiple architecture variants and none marked default"
    )]
    AmbiguousSymbol {
        table: String,
        row: String,
        column: String,
        target_table: String,
        target: String,
    },

    /// The declared before/after constraints form a cycle. The cycle lists
    /// every participating node, closed back on the first.
    #[error("conflicting ordering constraints form a cycle: {}", .cycle.join(" -> "))]
    ConflictingOrderingConstraint { cycle: Vec<String> },

    /// More actions demand placement between two anchors than the reserved
    /// numeric range allows.
    #[error("anchor range {lower}..{upper} overflowed while placing action '{action}'")]
    AnchorOverflow {
        lower: String,
        upper: String,
        action: String,
    },

    /// A row's reference or architecture metadata is structurally invalid.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation. It indicates a
    /// violated internal invariant in the linking core itself.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}

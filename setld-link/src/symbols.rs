//! The per-invocation symbol table used during reference resolution.

use rustc_hash::FxHashMap;
use setld_model::Platform;

/// A resolved row handle: enough identity to rewrite a reference and to mark
/// the chosen architecture variant as used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolTarget {
    pub table: String,
    pub id: String,
    pub arch: Option<Platform>,
    pub qualified_id: String,
}

#[derive(Debug, Default)]
struct SymbolEntry {
    plain: Option<SymbolTarget>,
    variants: FxHashMap<Platform, SymbolTarget>,
    default_variant: Option<Platform>,
}

/// Outcome of a symbol lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Resolved(&'a SymbolTarget),
    /// No candidate exists (yet); the resolver may retry on a later pass.
    Missing,
    /// Multiple architecture variants exist and none is marked default.
    Ambiguous,
}

/// Symbol table keyed by `(table, identifier)` with per-platform variants.
///
/// Built fresh per link invocation and discarded after resolution; action
/// symbols are registered incrementally as actions bind, which is what makes
/// the resolver's fixed-point iteration converge.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<(String, String), SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain (non-variant) symbol. First registration wins; the
    /// merger has already reported duplicates.
    pub fn insert_plain(&mut self, table: &str, id: &str) {
        let entry = self
            .entries
            .entry((table.to_string(), id.to_string()))
            .or_default();
        if entry.plain.is_none() {
            entry.plain = Some(SymbolTarget {
                table: table.to_string(),
                id: id.to_string(),
                arch: None,
                qualified_id: id.to_string(),
            });
        }
    }

    /// Register an architecture-variant symbol.
    pub fn insert_variant(&mut self, table: &str, id: &str, platform: Platform, default: bool) {
        let entry = self
            .entries
            .entry((table.to_string(), id.to_string()))
            .or_default();
        entry.variants.entry(platform).or_insert_with(|| SymbolTarget {
            table: table.to_string(),
            id: id.to_string(),
            arch: Some(platform),
            qualified_id: format!("{}_{}", id, platform.suffix()),
        });
        if default && entry.default_variant.is_none() {
            entry.default_variant = Some(platform);
        }
    }

    /// Look up `table:id`, optionally qualified by a platform.
    ///
    /// Qualified lookups select the matching variant, falling back to a plain
    /// row when the target is not architecture-variant at all. Unqualified
    /// lookups select the plain row, the default variant, or a sole variant;
    /// anything else is ambiguous.
    pub fn lookup(&self, table: &str, id: &str, platform: Option<Platform>) -> Lookup<'_> {
        let Some(entry) = self.entries.get(&(table.to_string(), id.to_string())) else {
            return Lookup::Missing;
        };
        match platform {
            Some(p) => match entry.variants.get(&p).or(entry.plain.as_ref()) {
                Some(target) => Lookup::Resolved(target),
                None => Lookup::Missing,
            },
            None => {
                if let Some(target) = &entry.plain {
                    return Lookup::Resolved(target);
                }
                if let Some(default) = entry.default_variant {
                    // The default marker always points at a registered variant.
                    return match entry.variants.get(&default) {
                        Some(target) => Lookup::Resolved(target),
                        None => Lookup::Missing,
                    };
                }
                match entry.variants.len() {
                    0 => Lookup::Missing,
                    1 => match entry.variants.values().next() {
                        Some(target) => Lookup::Resolved(target),
                        None => Lookup::Missing,
                    },
                    _ => Lookup::Ambiguous,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_lookup_selects_the_variant() {
        let mut table = SymbolTable::new();
        table.insert_variant("Binary", "Payload", Platform::X86, false);
        table.insert_variant("Binary", "Payload", Platform::X64, false);

        match table.lookup("Binary", "Payload", Some(Platform::X64)) {
            Lookup::Resolved(target) => assert_eq!(target.qualified_id, "Payload_X64"),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn qualified_lookup_falls_back_to_plain_rows() {
        let mut table = SymbolTable::new();
        table.insert_plain("Directory", "INSTALLFOLDER");

        match table.lookup("Directory", "INSTALLFOLDER", Some(Platform::X64)) {
            Lookup::Resolved(target) => assert_eq!(target.qualified_id, "INSTALLFOLDER"),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn unqualified_lookup_requires_a_default_among_variants() {
        let mut table = SymbolTable::new();
        table.insert_variant("Binary", "Payload", Platform::X86, false);
        table.insert_variant("Binary", "Payload", Platform::X64, false);
        assert_eq!(table.lookup("Binary", "Payload", None), Lookup::Ambiguous);

        let mut table = SymbolTable::new();
        table.insert_variant("Binary", "Payload", Platform::X86, true);
        table.insert_variant("Binary", "Payload", Platform::X64, false);
        match table.lookup("Binary", "Payload", None) {
            Lookup::Resolved(target) => assert_eq!(target.qualified_id, "Payload_X86"),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn sole_variant_resolves_without_default() {
        let mut table = SymbolTable::new();
        table.insert_variant("Binary", "Payload", Platform::X86, false);
        match table.lookup("Binary", "Payload", None) {
            Lookup::Resolved(target) => assert_eq!(target.qualified_id, "Payload_X86"),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn missing_symbols_stay_missing() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup("Binary", "Nothing", None), Lookup::Missing);
    }
}

use std::fmt;

use crate::error::Error;

/// Batched diagnostics collected across the merge and resolve stages.
///
/// The merger and resolver push every error they detect into a `Report`
/// instead of aborting on the first, so one failed link surfaces the complete
/// diagnostic set. A non-empty report aborts the pipeline before scheduling;
/// no partial model is ever returned alongside one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    errors: Vec<Error>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// True if any collected error matches the predicate.
    pub fn contains<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Error) -> bool,
    {
        self.errors.iter().any(predicate)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "link failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Report {}

impl From<Error> for Report {
    fn from(error: Error) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

//! The link entry point.

use setld_model::{ResolvedPackageModel, Section, SectionSource};
use setld_result::{Report, Result};

use crate::emit::emit;
use crate::merge::merge_sections;
use crate::options::LinkOptions;
use crate::resolve::resolve;
use crate::schedule::schedule;

/// One link invocation: gathers sections, then runs the pipeline.
///
/// A `Linker` owns no process-wide state; concurrent links in the same
/// process each construct their own instance.
pub struct Linker {
    options: LinkOptions,
    sections: Vec<Section>,
}

impl Linker {
    pub fn new(options: LinkOptions) -> Self {
        Self {
            options,
            sections: Vec::new(),
        }
    }

    /// Add a fully materialized section. Supply order does not affect output.
    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// Gather the section contributed by a registered provider.
    pub fn add_source(&mut self, source: &dyn SectionSource) -> Result<()> {
        tracing::debug!(module = source.name(), "gathering section from provider");
        let section = source.section()?;
        self.sections.push(section);
        Ok(())
    }

    /// Run merge, resolve, schedule, and emit.
    ///
    /// The merge and resolve stages batch every detectable diagnostic; a
    /// non-empty report aborts before scheduling. The scheduler fails fast on
    /// the first cycle or anchor overflow. No partial model is ever returned.
    pub fn link(self) -> std::result::Result<ResolvedPackageModel, Report> {
        let mut report = Report::new();

        let merged = merge_sections(&self.sections, &mut report);
        let resolution = resolve(&merged, &self.options, &mut report);
        if !report.is_empty() {
            tracing::debug!(errors = report.len(), "link aborted after resolution");
            return Err(report);
        }

        let schedule = schedule(&resolution, &self.options).map_err(Report::from)?;
        Ok(emit(&resolution, &schedule))
    }
}

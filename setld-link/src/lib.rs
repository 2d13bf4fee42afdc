//! The setld link pipeline: merge, resolve, schedule, emit.
//!
//! A link is a single-pass, single-threaded batch computation per invocation:
//!
//! 1. **Section Merger** collects all sections (core + extensions, in
//!    arbitrary order) into one candidate row set, detecting identifier
//!    collisions.
//! 2. **Symbol Table & Resolver** dereferences symbolic references between
//!    rows, including architecture-qualified lookups, as a bounded
//!    fixed-point pass.
//! 3. **Constraint Graph & Scheduler** assigns deterministic sequence
//!    positions to custom actions under their declared ordering constraints
//!    and the forward/rollback pairing invariants.
//! 4. **Table Emitter** projects the resolved, sequenced rows into the final
//!    [`ResolvedPackageModel`](setld_model::ResolvedPackageModel).
//!
//! The merger and resolver batch their diagnostics; the scheduler fails fast.
//! No component holds process-wide state: every invocation builds and tears
//! down its own symbol table and constraint graph, so concurrent links in one
//! process are independent.

#![forbid(unsafe_code)]

pub mod emit;
pub mod graph;
pub mod linker;
pub mod merge;
pub mod options;
pub mod resolve;
pub mod schedule;
pub mod symbols;

pub use graph::{ConstraintGraph, ConstraintGraphBuilder, Node};
pub use linker::Linker;
pub use merge::{MergedModel, merge_sections};
pub use options::{AnchorLayout, LinkOptions};
pub use resolve::{BoundAction, Resolution, resolve};
pub use schedule::{Schedule, schedule};
pub use symbols::{Lookup, SymbolTable, SymbolTarget};

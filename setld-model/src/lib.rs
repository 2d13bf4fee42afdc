//! Typed row, table, and section model for the setld linking core.
//!
//! These types are the shared vocabulary between the compiler front end, the
//! extension modules that contribute sections, and the link pipeline that
//! merges, resolves, and schedules them. They carry no linking logic of their
//! own; the pipeline lives in `setld-link`.

#![forbid(unsafe_code)]

pub mod action;
pub mod platform;
pub mod resolved;
pub mod row;
pub mod schema;
pub mod section;
pub mod standard;
pub mod value;

pub use action::{ActionFlags, Anchor, CustomAction, OrderTarget, SequencingConstraint};
pub use platform::{BindingPolicy, Platform};
pub use resolved::{Placement, ResolvedPackageModel};
pub use row::Row;
pub use schema::{ColumnDef, ColumnKind, TableSchema};
pub use section::{Section, SectionSource};
pub use value::Value;

/// Numeric position in an execution ordering.
pub type Sequence = u32;

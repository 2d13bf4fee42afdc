//! Error types and result definitions for the setld linking core.
//!
//! This crate provides a unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout all setld crates, plus the batched
//! diagnostic collection ([`Report`]) produced by a failed link.
//!
//! # Error Philosophy
//!
//! setld uses a single error enum ([`Error`]) rather than crate-specific error
//! types. This approach:
//! - Simplifies error handling across crate boundaries
//! - Allows errors to propagate naturally with the `?` operator
//! - Enables structured error matching for programmatic handling
//!
//! # Batch Reporting
//!
//! The merge and resolve stages of a link collect every detectable error into
//! a [`Report`] before aborting, so a caller sees the full diagnostic set in
//! one run. The scheduler aborts on the first cycle or overflow, since later
//! scheduling decisions are meaningless once the constraint graph is known to
//! be inconsistent.

#![forbid(unsafe_code)]

pub mod error;
pub mod report;
pub mod result;

pub use error::Error;
pub use report::Report;
pub use result::Result;

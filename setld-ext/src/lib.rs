//! Built-in utility extension modules.
//!
//! Each module here implements [`SectionSource`](setld_model::SectionSource)
//! and contributes its own table schemas, rows, payload binaries, and custom
//! actions. The linking core never inspects the non-reference column
//! semantics of these tables; their runtime meaning belongs to the installer
//! engine and the prerequisite-search evaluator.

#![forbid(unsafe_code)]

pub mod closeapp;
pub mod fileshare;
pub mod search;
pub mod secure;
pub mod shortcut;
pub mod xmlfile;

pub use closeapp::{CloseApp, CloseApplicationModule};
pub use fileshare::{FileShareModule, SharePermission};
pub use search::{PrereqSearch, PrereqSearchModule};
pub use secure::SecureObjectModule;
pub use shortcut::{InternetShortcut, InternetShortcutModule};
pub use xmlfile::{XmlEdit, XmlFileModule};

//! Report data model: hosts, findings keyed by port, and the global plugin list

pub mod address;
pub mod collection;
pub mod port;

pub use collection::{Collection, Finding, Host, Plugin};

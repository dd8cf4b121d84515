//! Bundled command modules
//!
//! Each module is a static [`ModuleSpec`](crate::api::ModuleSpec) the host
//! loads by handing it to its registry.

pub mod counter;
pub mod greet;

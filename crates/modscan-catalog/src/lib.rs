//! Module catalog for the modscan scanner.
//!
//! Turns running module instances into [`ModuleRecord`]s and merges them into
//! a JSON catalog keyed by plugin slug and module slug.

mod entry;
mod instance;
mod record;
mod scan;
mod serialize;
mod store_json;

pub use entry::*;
pub use instance::*;
pub use record::*;
pub use scan::*;
pub use serialize::*;
pub use store_json::*;

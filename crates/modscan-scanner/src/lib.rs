//! Scan button and orchestration for the modscan module catalog.

mod scan;
mod trigger;

pub use scan::*;
pub use trigger::*;

//! Core domain types: identifiers, entities and the stay-window overlap rule.

pub mod booking;
pub mod macros;
pub mod stay;

pub use booking::*;
pub use stay::*;

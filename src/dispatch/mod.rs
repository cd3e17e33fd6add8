//! Navigation and event dispatch: a path router and a delegated event table.

mod events;
mod router;

pub use events::*;
pub use router::*;

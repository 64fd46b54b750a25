//! Capability protocol definitions.
//!
//! A capability is a named handler exposing one or more operations against a
//! class of device or resource (pointer, keys, controller, screen, windows).

mod context;
mod descriptor;
mod result;
mod summary;
mod traits;

pub use context::*;
pub use descriptor::*;
pub use result::*;
pub use summary::*;
pub use traits::*;

//! Registry of capability handlers.

mod capability;

pub use capability::CapabilityRegistry;

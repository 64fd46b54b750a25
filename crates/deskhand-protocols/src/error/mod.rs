//! Error types for the deskhand protocol layer.

mod action;

pub use action::*;

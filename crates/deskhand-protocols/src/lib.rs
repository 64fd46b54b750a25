//! # Deskhand Protocols
//!
//! Contracts shared by every deskhand crate. Contains only interface
//! definitions and plain data types - no capability implementations.
//!
//! ## Core Types
//!
//! - [`Capability`] - Trait implemented by every capability handler
//! - [`OperationDescriptor`] - Name, parameter schema and side-effect class of an operation
//! - [`ActionResult`] / [`ContentItem`] - What a successful operation returns
//! - [`ActionError`] - The failure taxonomy surfaced to callers
//! - [`TargetContext`] - Shared "selected window" cell consulted by targeting capabilities
//! - [`InvocationResponse`] - The never-throws envelope returned by the router

pub mod capability;
pub mod error;
pub mod params;
pub mod response;

pub use capability::{
    ActionResult, ActionSummary, Capability, CapabilityCategory, CapabilityDescriptor,
    ContentItem, InvocationContext, InvocationSource, OperationDescriptor, SideEffect,
    TargetContext, TargetId,
};
pub use error::ActionError;
pub use params::from_params;
pub use response::{ErrorPayload, InvocationResponse};

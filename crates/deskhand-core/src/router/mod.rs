//! Router: maps inbound operation identifiers onto capabilities and engines.

mod routing;
mod types;

pub use routing::Router;
pub use types::{
    AutopressStartRequest, AutopressStopRequest, META_OPERATIONS, OperationListing, RouterLimits,
};

//! HTTP interface module.

pub mod handlers;
pub mod routes;

pub(crate) mod monitoring;

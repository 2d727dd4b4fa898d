//! Re-exports the pieces shared by the order-parsing service and its callers:
//! configuration handling, the error type, the wire DTOs and the fail-soft
//! client for the parser endpoint.

pub mod config;
pub mod dto;
pub mod error;
pub mod nlu_client;

//! Shared response builders for error cases

pub mod error;

pub use error::{domain_error_response, json_error_handler, not_found, validation_error_response};

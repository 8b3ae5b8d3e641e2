//! Shared response handling

pub mod error;

pub use error::{
    handle_domain_error, handle_rejected_outcome, handle_validation_errors, json_error_handler,
};

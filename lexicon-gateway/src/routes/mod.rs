//! HTTP route handlers

pub mod api;
pub mod health;
pub mod sessions;
pub mod translate;

pub use api::{error_response, handle_api_request, json_response, ApiRoute};
pub use health::health_check;

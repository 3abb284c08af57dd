mod field_errors;
mod json_config;
mod nullable;
mod response;

pub use field_errors::{FieldErrors, REQUIRED};
pub use json_config::{custom_json_config, custom_query_config};
pub use nullable::double_option;
pub use response::{ApiError, ApiResponse};

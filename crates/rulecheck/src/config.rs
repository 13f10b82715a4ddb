//! Engine configuration types and builders

use serde::{Deserialize, Serialize};
use service_builder::builder;

/// Message returned when a record passes every rule
pub const OK_MESSAGE: &str = "Ok";

/// Message returned when evaluation itself faults
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred while attempting to validate the data.";

/// Configuration for a [`crate::Validator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[builder]
pub struct EngineConfig {
    /// Message for a successful validation
    #[builder(default = "OK_MESSAGE.to_string()", getter)]
    pub ok_message: String,

    /// Message for a fault caught at the public boundary
    #[builder(default = "UNKNOWN_ERROR_MESSAGE.to_string()", getter)]
    pub unknown_error_message: String,

    /// Treat whitespace-only strings as empty for `required`
    #[builder(default = "true", getter)]
    pub trim_blank_strings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ok_message: OK_MESSAGE.to_string(),
            unknown_error_message: UNKNOWN_ERROR_MESSAGE.to_string(),
            trim_blank_strings: true,
        }
    }
}

impl EngineConfigBuilder {
    /// Configuration where whitespace counts as a value
    pub fn literal_strings() -> Self {
        EngineConfigBuilder::new().trim_blank_strings(false)
    }
}

//! Destination identity for delivered documents.

use serde::{Deserialize, Serialize};

use crate::de::lenient_string;

fn default_client_id() -> String {
    String::from("default_client")
}

fn default_platform_id() -> String {
    String::from("amazon")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Client the documents belong to; first path segment under the remote base.
    #[serde(default = "default_client_id", deserialize_with = "lenient_string")]
    pub client_id: String,

    /// Platform the documents were exported from; second path segment.
    #[serde(default = "default_platform_id", deserialize_with = "lenient_string")]
    pub platform_id: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
            platform_id: default_platform_id(),
        }
    }
}

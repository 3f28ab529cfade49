use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub error: bool,
    /// Version of the running build.
    pub version: String,
}

//! The `{returnCode, errorMessage, data}` wrapper shared by every remote
//! operation, plus the gateway error taxonomy.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Domain return code the reward endpoints use for an already-collected
/// reward. Routine during re-runs, callers treat it as a no-op.
pub const CODE_ALREADY_CLAIMED: i64 = 4004;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure: connect, timeout, or a non-2xx HTTP status.
    #[error("transport failure during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a non-zero return code.
    #[error("{operation} failed with code {code}: {message}")]
    Domain {
        operation: &'static str,
        code: i64,
        message: String,
    },
    /// A success envelope carried a pack string that is not valid JSON.
    #[error("malformed pack in {operation} response: {detail}")]
    Pack {
        operation: &'static str,
        detail: String,
    },
    /// The response body is missing an expected field or has a wrong type.
    #[error("unexpected {operation} response shape: {detail}")]
    Shape {
        operation: &'static str,
        detail: String,
    },
}

impl GatewayError {
    pub fn is_already_claimed(&self) -> bool {
        matches!(
            self,
            GatewayError::Domain {
                code: CODE_ALREADY_CLAIMED,
                ..
            }
        )
    }
}

/// Outer response wrapper. `return_code == 0` means success; any other value
/// is a domain-level failure carrying `error_message`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "returnCode")]
    pub return_code: i64,
    #[serde(rename = "errorMessage", default)]
    pub error_message: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn ensure_success(&self, operation: &'static str) -> Result<(), GatewayError> {
        if self.return_code != 0 {
            return Err(GatewayError::Domain {
                operation,
                code: self.return_code,
                message: self.error_message.clone(),
            });
        }
        Ok(())
    }

    /// Decodes the secondary JSON string nested inside `data`.
    ///
    /// Only meaningful on a success envelope; a non-string or malformed pack
    /// is a local parse error, not a domain error.
    pub fn pack<T: DeserializeOwned>(&self, operation: &'static str) -> Result<T, GatewayError> {
        let raw = self.data.as_str().ok_or_else(|| GatewayError::Shape {
            operation,
            detail: "data does not carry a pack string".to_string(),
        })?;
        serde_json::from_str(raw).map_err(|err| GatewayError::Pack {
            operation,
            detail: err.to_string(),
        })
    }
}

pub mod config;
pub mod error;
pub mod operation;
pub mod overlay;
pub mod payload;
pub mod result;
pub mod session;

pub use error::Error;
pub use operation::Operation;

use serde::{Deserialize, Serialize};

type Result<T> = anyhow::Result<T>;

/// Body returned by the relay whenever a request could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn from_error<E: std::fmt::Display>(err: &E) -> Self {
        Self::new(err.to_string())
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.error })
    }
}

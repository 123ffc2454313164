//! JSON request and response shapes for `spotbind_invoke_json`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::status::disambiguate;
use crate::value::{Arg, RawResult};

/// A call request from the scripting host.
///
/// ```json
/// { "op": "session_player_seek", "args": [{"type":"handle","value":4096},{"type":"int","value":30000}] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeRequest {
    pub op: String,
    #[serde(default)]
    pub args: Vec<Arg>,
}

/// Versioned envelope around every call outcome.
///
/// Fields:
/// - `version`: Schema version (always 1 for now).
/// - `timestamp_ms`: UTC milliseconds when the envelope was created.
/// - `op`: The operation name from the request.
/// - `result`: The raw result, absent when the call failed.
/// - `status`: The matched status symbol, absent when the result is not a
///   known status code.
/// - `error`: Human-readable failure, absent on success.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub version: u32,
    pub timestamp_ms: i64,
    pub op: String,
    pub result: Option<RawResult>,
    pub status: Option<ErrorKind>,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn new(op: impl Into<String>, outcome: Result<RawResult, Error>) -> Self {
        let (result, status, error) = match outcome {
            Ok(raw) => {
                let (raw, kind) = disambiguate(raw).into_parts();
                (Some(raw), kind, None)
            }
            Err(e) => (None, e.status(), Some(e.to_string())),
        };
        Self {
            version: 1,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            op: op.into(),
            result,
            status,
            error,
        }
    }
}

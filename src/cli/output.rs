//! output formatting for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
    /// one name per line, for piping
    Names,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > names > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool, names: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if names {
            return Self::Names;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// gsq exit code offset into the application error range
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data: None,
            },
            id: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        if !suggestions.is_empty() {
            self.data_mut().suggestions = Some(suggestions);
        }
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        if !details.is_empty() {
            self.data_mut().details = Some(details);
        }
        self
    }

    fn data_mut(&mut self) -> &mut ErrorData {
        self.error.data.get_or_insert(ErrorData {
            suggestions: None,
            details: None,
        })
    }
}

/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures for each command
// ============================================================================

/// result of `gsq check`
#[derive(Serialize)]
pub struct CheckData {
    pub query: String,
    pub result: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// one clause in `gsq parse` output
#[derive(Serialize)]
pub struct ClauseData {
    pub negated: bool,
    pub key: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// result of `gsq parse`
#[derive(Serialize)]
pub struct ParseData {
    pub query: String,
    pub valid: bool,
    pub clauses: Vec<ClauseData>,
}

/// result of `gsq analyze`
#[derive(Serialize)]
pub struct AnalyzeData {
    pub query: String,
    pub valid: bool,
    pub immutably_true: bool,
    pub immutably_false: bool,
}

#[derive(Serialize)]
pub struct AliasData {
    pub alias: String,
    pub key: String,
}

/// result of `gsq keys`
#[derive(Serialize)]
pub struct KeysData {
    pub keys: Vec<String>,
    pub aliases: Vec<AliasData>,
}

// ============================================================================
// Output functions
// ============================================================================

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(error: &JsonRpcError) {
    if let Ok(json) = serde_json::to_string(error) {
        println!("{}", json);
    }
}

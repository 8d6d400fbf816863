//! Wire format: one JSON-RPC 2.0 object per line, positional params.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Request {
    pub fn new(id: u64, method: &str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: version(),
            id: Value::from(id),
            method: method.to_string(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: version(),
            id,
            result: None,
            error: Some(ErrorObject {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn from_error(id: Value, err: &Error) -> Self {
        Self::failure(id, err.rpc_code(), err.to_string())
    }

    /// The result value, or the remote error rebuilt as an [`Error`].
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(e) => Err(Error::from_rpc(e.code, e.message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

fn version() -> String {
    "2.0".to_string()
}

static NULL: Value = Value::Null;

/// Positional parameter accessors. Missing trailing parameters read as null.
pub struct Params<'a>(pub &'a [Value]);

impl<'a> Params<'a> {
    fn get(&self, index: usize) -> &'a Value {
        self.0.get(index).unwrap_or(&NULL)
    }

    pub fn str(&self, index: usize, name: &str) -> Result<&'a str> {
        self.get(index)
            .as_str()
            .ok_or_else(|| invalid(name, "a string"))
    }

    pub fn opt_str(&self, index: usize, name: &str) -> Result<Option<&'a str>> {
        match self.get(index) {
            Value::Null => Ok(None),
            v => v.as_str().map(Some).ok_or_else(|| invalid(name, "a string or null")),
        }
    }

    pub fn int(&self, index: usize, name: &str) -> Result<i64> {
        self.get(index)
            .as_i64()
            .ok_or_else(|| invalid(name, "an integer"))
    }

    pub fn opt_u32(&self, index: usize, name: &str) -> Result<Option<u32>> {
        match self.get(index) {
            Value::Null => Ok(None),
            v => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| invalid(name, "a non-negative integer or null")),
        }
    }

    pub fn float(&self, index: usize, name: &str) -> Result<f64> {
        self.get(index)
            .as_f64()
            .ok_or_else(|| invalid(name, "a number"))
    }
}

fn invalid(name: &str, expected: &str) -> Error {
    Error::ProtocolError(format!("parameter `{}` must be {}", name, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_missing_fields() {
        let req: Request = serde_json::from_str(r#"{"method":"methods"}"#).unwrap();
        assert_eq!(req.jsonrpc, "2.0");
        assert_eq!(req.id, Value::Null);
        assert!(req.params.is_empty());
    }

    #[test]
    fn responses_omit_the_unused_half() {
        let ok = serde_json::to_value(Response::success(json!(1), json!("x"))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": "x"}));

        let err = Response::failure(json!(2), METHOD_NOT_FOUND, "nope");
        let v = serde_json::to_value(&err).unwrap();
        assert!(v.get("result").is_none());
        assert_eq!(v["error"]["code"], json!(-32601));
    }

    #[test]
    fn null_result_reads_as_null() {
        let resp: Response = serde_json::from_str(r#"{"jsonrpc":"2.0","id":3,"result":null}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn params_check_types() {
        let values = vec![json!("code"), Value::Null, json!(2), json!(3), json!(100)];
        let p = Params(&values);
        assert_eq!(p.str(0, "code").unwrap(), "code");
        assert_eq!(p.opt_str(1, "filename").unwrap(), None);
        assert_eq!(p.int(2, "hl_line_min").unwrap(), 2);
        assert_eq!(p.opt_u32(4, "height_px").unwrap(), Some(100));
        assert_eq!(p.opt_u32(9, "missing").unwrap(), None);
        assert!(matches!(p.int(0, "code"), Err(Error::ProtocolError(_))));
    }
}

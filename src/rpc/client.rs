use super::protocol::{Request, Response};
use crate::{Error, RenderRequest, Result};
use base64::Engine as Base64Engine;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

/// A connection to a running thumbnail server. Calls are issued one at a
/// time; each waits for its response.
pub struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl Client {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(read_half).lines(),
            writer,
            next_id: 1,
        })
    }

    /// Call `method` with positional `params` and return its result.
    pub async fn call(&mut self, method: &str, params: Vec<Value>) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        let request = Request::new(id, method, params);
        let mut line = serde_json::to_string(&request)
            .map_err(|e| Error::ProtocolError(format!("request serialization failed: {}", e)))?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        let reply = self
            .lines
            .next_line()
            .await?
            .ok_or_else(|| Error::ProtocolError("server closed the connection".into()))?;
        let response: Response = serde_json::from_str(&reply)
            .map_err(|e| Error::ProtocolError(format!("malformed response: {}", e)))?;
        if response.id != Value::from(id) {
            return Err(Error::ProtocolError(format!(
                "response id {} does not match request id {}",
                response.id, id
            )));
        }
        response.into_result()
    }

    /// Render remotely and return the decoded PNG bytes.
    pub async fn render(&mut self, request: &RenderRequest) -> Result<Vec<u8>> {
        let params = vec![
            json!(request.code),
            json!(request.filename),
            json!(request.hl_line_min),
            json!(request.hl_line_max),
            json!(request.height_px),
        ];
        let value = self.call("render", params).await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| Error::ProtocolError("render result is not a string".into()))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::ProtocolError(format!("invalid base64 payload: {}", e)))
    }

    pub async fn set_font_name(&mut self, name: Option<&str>) -> Result<()> {
        self.call("set_font_name", vec![json!(name)]).await?;
        Ok(())
    }

    pub async fn styles(&mut self) -> Result<Vec<String>> {
        let value = self.call("styles", Vec::new()).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::ProtocolError(format!("malformed style list: {}", e)))
    }

    pub async fn methods(&mut self) -> Result<Vec<String>> {
        let value = self.call("methods", Vec::new()).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::ProtocolError(format!("malformed method list: {}", e)))
    }
}

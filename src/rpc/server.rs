use super::protocol::{Params, Request, Response, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::{CodeThumb, Error, RenderRequest, Result, ServerConfig};
use base64::Engine as Base64Engine;
use log::{debug, info, warn};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

const INVALID_REQUEST: i64 = -32600;

/// Method names served, in registration order.
pub const METHODS: &[&str] = &[
    "render",
    "make_thumb",
    "set_font_name",
    "set_style",
    "set_font_size",
    "styles",
    "methods",
];

/// A bound RPC listener. Binding and serving are separate so the caller can
/// report the port before the first connection is accepted.
pub struct Server {
    listener: TcpListener,
    thumb: Arc<CodeThumb>,
}

impl Server {
    pub async fn bind(config: &ServerConfig, thumb: Arc<CodeThumb>) -> Result<Self> {
        let listener = TcpListener::bind((config.address.as_str(), config.port)).await?;
        Ok(Self { listener, thumb })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the process is terminated. Each connection is
    /// served on its own task.
    pub async fn serve(self) -> Result<()> {
        info!("serving on {}", self.local_addr()?);
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            };
            let thumb = self.thumb.clone();
            tokio::spawn(async move {
                debug!("connection from {}", peer);
                if let Err(e) = handle_connection(stream, thumb).await {
                    warn!("connection {} closed with error: {}", peer, e);
                } else {
                    debug!("connection from {} closed", peer);
                }
            });
        }
    }
}

async fn handle_connection(stream: TcpStream, thumb: Arc<CodeThumb>) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&line, &thumb).await;
        let mut out = serde_json::to_string(&response).map_err(|e| {
            Error::ProtocolError(format!("response serialization failed: {}", e))
        })?;
        out.push('\n');
        write_half.write_all(out.as_bytes()).await?;
        write_half.flush().await?;
    }
    Ok(())
}

/// Decode one request line and produce its response. Never fails: every
/// problem becomes an error response.
pub async fn handle_line(line: &str, thumb: &Arc<CodeThumb>) -> Response {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Response::failure(Value::Null, PARSE_ERROR, format!("parse error: {}", e)),
    };
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: Request = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => return Response::failure(id, INVALID_REQUEST, format!("invalid request: {}", e)),
    };
    dispatch(request, thumb).await
}

/// Invoke a method by name.
pub async fn dispatch(request: Request, thumb: &Arc<CodeThumb>) -> Response {
    debug!("call {} ({} params)", request.method, request.params.len());
    let id = request.id.clone();
    let result = match request.method.as_str() {
        "render" | "make_thumb" => render(&request.params, thumb).await,
        "set_font_name" => set_font_name(&request.params, thumb),
        "set_style" => Params(&request.params)
            .str(0, "name")
            .and_then(|name| thumb.set_style(name))
            .map(|_| Value::Null),
        "set_font_size" => Params(&request.params)
            .float(0, "size")
            .and_then(|size| thumb.set_font_size(size as f32))
            .map(|_| Value::Null),
        "styles" => Ok(Value::from(thumb.styles())),
        "methods" => Ok(Value::from(METHODS.to_vec())),
        other => {
            warn!("unknown method {:?}", other);
            return Response::failure(id, METHOD_NOT_FOUND, format!("unknown method {:?}", other));
        }
    };

    match result {
        Ok(value) => Response::success(id, value),
        Err(e) => {
            warn!("{} failed: {}", request.method, e);
            Response::from_error(id, &e)
        }
    }
}

async fn render(params: &[Value], thumb: &Arc<CodeThumb>) -> Result<Value> {
    let p = Params(params);
    let request = RenderRequest {
        code: p.str(0, "code")?.to_string(),
        filename: p.opt_str(1, "filename")?.map(str::to_string),
        hl_line_min: p.int(2, "hl_line_min")?,
        hl_line_max: p.int(3, "hl_line_max")?,
        height_px: p.opt_u32(4, "height_px")?,
    };

    let thumb = thumb.clone();
    let thumbnail = tokio::task::spawn_blocking(move || thumb.render(&request))
        .await
        .map_err(|e| Error::RenderError(format!("render task failed: {}", e)))??;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&thumbnail.png_data);
    Ok(Value::String(encoded))
}

fn set_font_name(params: &[Value], thumb: &CodeThumb) -> Result<Value> {
    let name = Params(params).opt_str(0, "name")?;
    thumb.set_font_name(name.map(str::to_string));
    Ok(Value::Null)
}

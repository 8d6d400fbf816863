use anyhow::Context;
use clap::Parser;
use codethumb::rpc::Server;
use codethumb::{CodeThumb, ServerConfig, ThumbConfig};
use log::info;
use std::io::Write;
use std::sync::Arc;

/// Code thumbnail RPC server. Prints the bound port on stdout, then serves
/// until terminated.
#[derive(Parser, Debug)]
#[command(name = "codethumb", version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "localhost")]
    address: String,

    /// Port to bind; 0 picks any free port
    #[arg(long, default_value_t = 0)]
    port: u16,

    /// System font family (defaults to the built-in bitmap font)
    #[arg(long)]
    font_name: Option<String>,

    /// Font size in pixels
    #[arg(long, default_value_t = 3.0)]
    font_size: f32,

    /// Highlight style
    #[arg(long, default_value = "monokai")]
    style: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let thumb = CodeThumb::new(ThumbConfig {
        font_name: cli.font_name,
        font_size: cli.font_size,
        style: cli.style,
        ..Default::default()
    })
    .context("invalid rendering configuration")?;

    let server_config = ServerConfig {
        address: cli.address,
        port: cli.port,
    };
    let server = Server::bind(&server_config, Arc::new(thumb))
        .await
        .with_context(|| format!("cannot bind {}:{}", server_config.address, server_config.port))?;
    let addr = server.local_addr()?;

    // The launching process reads exactly this line to find us.
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", addr.port())?;
    stdout.flush()?;
    drop(stdout);
    info!("listening on {}", addr);

    server.serve().await?;
    Ok(())
}

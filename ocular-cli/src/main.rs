use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ocular::model::IceServerConfig;
use ocular::server::{AppState, CommandCapture, ServerConfig, app_router, local_ip};

#[derive(Parser)]
#[command(name = "ocular")]
#[command(version, about = "Phone camera streaming server with WebRTC signaling")]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// STUN server url for transport bootstrap; repeat for more than one.
    #[arg(long = "stun", value_name = "URL")]
    stun: Vec<String>,

    /// Capture command that writes a JPEG to `{output}`.
    #[arg(long, default_value = "termux-camera-photo")]
    capture_cmd: String,

    /// Argument for the capture command; repeat per argument, `{output}`
    /// expands to the frame file.
    #[arg(long, value_name = "ARG")]
    capture_arg: Vec<String>,

    /// Seconds a session may stay negotiating before it is failed.
    #[arg(long, default_value_t = 30)]
    negotiation_timeout: u64,

    /// Resolution label advertised on the status endpoint.
    #[arg(long, default_value = "640x480")]
    resolution: String,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.port = self.port;
        config.negotiation.timeout = Duration::from_secs(self.negotiation_timeout);
        if !self.stun.is_empty() {
            config.negotiation.ice_servers = vec![IceServerConfig {
                urls: self.stun,
                username: None,
                credential: None,
            }];
        }
        config.capture.command = self.capture_cmd;
        if !self.capture_arg.is_empty() {
            config.capture.args = self.capture_arg;
        }
        config.resolution = self.resolution;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();
    let port = config.port;

    let frames = Arc::new(CommandCapture::new(config.capture.clone()));
    let state = AppState::new(config, frames);
    let app = app_router(state);

    println!("{}", "📷 Ocular camera server".green().bold());
    println!("   {} http://localhost:{}", "Local:  ".cyan(), port);
    println!("   {} http://{}:{}", "Network:".cyan(), local_ip(), port);
    println!("   {}", "Press Ctrl+C to stop".dimmed());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}

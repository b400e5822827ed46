//! HookGuard Server - verifies signed webhooks before accepting them.
//!
//! Every `POST` is checked against the shared secret: the signature header is
//! parsed, the timestamp must be within the freshness window, and the
//! HMAC-SHA256 digest over `<ts>:<body>` must match. Rejected requests get
//! `401 Unauthorized`; accepted ones are acknowledged.
//!
//! # Usage
//!
//! ```text
//! WEBHOOK_SECRET=pdl_ntfset_... GATEWAY_LISTEN=0.0.0.0:8080 hookguard-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `WEBHOOK_SECRET` | *(required)* | Shared secret used to verify signatures |
//! | `SIGNATURE_HEADER` | `Paddle-Signature` | Header carrying the signature |
//! | `SIGNATURE_TOLERANCE_SECS` | `300` | Freshness window in seconds |
//! | `SKIP_SIGNATURE_VALIDATION` | `false` | Accept every webhook (development only) |
//! | `MAX_BODY_SIZE` | `1048576` | Largest accepted body in bytes |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `full` | `full` or `json` log lines |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod gateway;
mod handler;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hookguard_auth::{SignatureVerifier, WebhookSecret};
use hookguard_core::{HookGuardConfig, LogFormat};
use hookguard_http::{WebhookHandler, WebhookHttpConfig, WebhookHttpService};

use crate::gateway::GatewayService;
use crate::handler::AckHandler;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long `--health-check` waits for the server before giving up.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Pick the log filter: `RUST_LOG` when set, otherwise `LOG_LEVEL`.
fn log_filter(log_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}")),
    }
}

/// Install the global tracing subscriber in the configured format.
fn init_tracing(config: &HookGuardConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.log_level)?)
        .with_target(true);

    match config.log_format {
        LogFormat::Full => builder.init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }

    Ok(())
}

/// Build the [`WebhookHttpConfig`] from the application [`HookGuardConfig`].
fn build_webhook_http_config(config: &HookGuardConfig) -> Result<WebhookHttpConfig> {
    let header_name = http::HeaderName::from_bytes(config.signature_header.as_bytes())
        .with_context(|| format!("invalid signature header name: {}", config.signature_header))?;

    let tolerance_secs = i64::try_from(config.signature_tolerance_secs)
        .context("signature tolerance is out of range")?;
    let tolerance = TimeDelta::try_seconds(tolerance_secs)
        .context("signature tolerance is out of range")?;

    let secret = config
        .webhook_secret
        .as_deref()
        .map(|s| Arc::new(WebhookSecret::from(s)));

    Ok(WebhookHttpConfig {
        header_name,
        secret,
        verifier: SignatureVerifier::new().with_tolerance(tolerance),
        skip_signature_validation: config.skip_signature_validation,
        max_body_size: config.max_body_size,
    })
}

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it (container stop).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Accept connections on `listener` until `shutdown` resolves, then wait for
/// in-flight webhooks to finish.
async fn serve<H, F>(listener: TcpListener, service: GatewayService<H>, shutdown: F) -> Result<()>
where
    H: WebhookHandler,
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());
    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let conn = http
            .serve_connection(TokioIo::new(stream), service.clone())
            .into_owned();
        let conn = graceful.watch(conn);
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!(%peer_addr, error = %e, "connection error");
            }
        });
    }

    info!("shutdown requested, draining in-flight webhooks");
    graceful.shutdown().await;
    info!("all connections drained, exiting");
    Ok(())
}

/// Probe the health endpoint of a server listening on `addr`.
///
/// Succeeds when the status line reports `200` and the JSON body says
/// `{"status":"running"}`.
async fn run_health_check(addr: &str) -> Result<()> {
    let raw = tokio::time::timeout(HEALTH_CHECK_TIMEOUT, fetch_health(addr))
        .await
        .with_context(|| format!("health check against {addr} timed out"))??;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .with_context(|| format!("truncated response from {addr}"))?;
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default();
    if status != "200" {
        anyhow::bail!("health endpoint on {addr} answered {status:?}");
    }

    let body: serde_json::Value =
        serde_json::from_str(body).context("health endpoint returned invalid JSON")?;
    if body["status"] != "running" {
        anyhow::bail!("server on {addr} is not running: {body}");
    }
    Ok(())
}

/// Send `GET /health` over a fresh connection and read the whole reply.
async fn fetch_health(addr: &str) -> Result<String> {
    let mut stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<()> {
    // `--health-check` only needs the listen address, so the rest of the
    // configuration is not validated on this path.
    if std::env::args().any(|a| a == "--health-check") {
        let listen_addr =
            std::env::var("GATEWAY_LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
        let addr = listen_addr.replace("0.0.0.0", "127.0.0.1");
        if let Err(e) = run_health_check(&addr).await {
            eprintln!("unhealthy: {e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let config = HookGuardConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config)?;

    let http_config = build_webhook_http_config(&config)?;

    if config.skip_signature_validation {
        warn!("signature validation is disabled, every webhook will be accepted");
    }

    info!(
        signature_header = %http_config.header_name,
        tolerance_secs = config.signature_tolerance_secs,
        max_body_size = config.max_body_size,
        skip_signature_validation = config.skip_signature_validation,
        "initializing webhook service",
    );

    let webhook = WebhookHttpService::new(Arc::new(AckHandler), http_config);
    let gateway = GatewayService::new(webhook);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting HookGuard Server");

    serve(listener, gateway, shutdown_signal()).await
}

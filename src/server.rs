//! Process lifecycle: bind every listener, serve, shut down together.
//!
//! The REST and gRPC façades share one [`AppState`], so a sighting created
//! over gRPC is visible at `/api/v1/sightings` and the other way round.
//! The gateway, when enabled, reaches the sightings only through gRPC.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway;
use crate::grpc;
use crate::http::{self, AppState};

/// Listeners bound and ready to serve.
#[derive(Debug)]
pub struct Server {
    state: AppState,
    http: TcpListener,
    grpc: TcpListener,
    gateway: Option<(TcpListener, String)>,
    shutdown_timeout: Duration,
    request_timeout: Duration,
}

async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })
}

impl Server {
    /// Bind the REST, gRPC and (if enabled) gateway listeners.
    ///
    /// A gateway upstream naming the configured gRPC address is pointed at
    /// the bound gRPC listener, so port `0` works for both.
    pub async fn bind(config: &Config, state: AppState) -> Result<Self> {
        config.validate()?;
        let http = bind(config.http_addr()?).await?;
        let grpc = bind(config.grpc_addr()?).await?;

        let gateway = if config.gateway.enabled {
            let listener = bind(config.gateway_addr()?).await?;
            let mut upstream = config.gateway.upstream.clone();
            if upstream.trim_end_matches('/') == format!("http://{}", config.grpc.addr) {
                upstream = format!("http://{}", grpc.local_addr()?);
            }
            Some((listener, upstream))
        } else {
            None
        };

        Ok(Self {
            state,
            http,
            grpc,
            gateway,
            shutdown_timeout: config.shutdown_timeout(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        Ok(self.http.local_addr()?)
    }

    pub fn grpc_addr(&self) -> Result<SocketAddr> {
        Ok(self.grpc.local_addr()?)
    }

    /// `None` when the gateway is disabled.
    pub fn gateway_addr(&self) -> Result<Option<SocketAddr>> {
        match &self.gateway {
            Some((listener, _)) => Ok(Some(listener.local_addr()?)),
            None => Ok(None),
        }
    }

    /// Serve until `shutdown` resolves or a listener fails, then stop every
    /// listener and wait up to the shutdown timeout for them to drain.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let stopped = move || {
            let mut rx = stop_rx.clone();
            async move {
                let _ = rx.wait_for(|stop| *stop).await;
            }
        };

        let mut tasks = JoinSet::new();

        info!(addr = %self.http.local_addr()?, "REST listener started");
        let router = http::router_with_timeout(self.state.clone(), self.request_timeout);
        let signal = stopped();
        let listener = self.http;
        tasks.spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
                .map_err(Error::from)
        });

        info!(addr = %self.grpc.local_addr()?, "gRPC listener started");
        let incoming = TcpListenerStream::new(self.grpc);
        let service = grpc::grpc_server(self.state.sightings.clone());
        let request_timeout = self.request_timeout;
        let signal = stopped();
        tasks.spawn(async move {
            grpc::server_builder_with_timeout(request_timeout)
                .add_service(service)
                .serve_with_incoming_shutdown(incoming, signal)
                .await
                .map_err(Error::transport)
        });

        if let Some((listener, upstream)) = self.gateway {
            info!(addr = %listener.local_addr()?, %upstream, "gateway listener started");
            let client = gateway::connect(&upstream)?;
            let router = gateway::router_with_timeout(client, self.request_timeout);
            let signal = stopped();
            tasks.spawn(async move {
                axum::serve(listener, router)
                    .with_graceful_shutdown(signal)
                    .await
                    .map_err(Error::from)
            });
        }

        let mut outcome = Ok(());
        tokio::select! {
            _ = shutdown => info!("shutdown requested"),
            Some(joined) = tasks.join_next() => {
                warn!("a listener stopped unexpectedly, shutting down");
                outcome = flatten(joined);
            }
        }

        let _ = stop_tx.send(true);
        let drain = async {
            let mut result = Ok(());
            while let Some(joined) = tasks.join_next().await {
                if let Err(err) = flatten(joined) {
                    warn!(error = %err, "listener failed during shutdown");
                    result = result.and(Err(err));
                }
            }
            result
        };
        match tokio::time::timeout(self.shutdown_timeout, drain).await {
            Ok(drained) => outcome = outcome.and(drained),
            Err(_) => {
                warn!(
                    timeout_secs = self.shutdown_timeout.as_secs(),
                    "listeners did not drain in time, aborting"
                );
                tasks.abort_all();
            }
        }

        info!("server stopped");
        outcome
    }
}

fn flatten(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    joined.map_err(|err| Error::Task(err.to_string()))?
}

/// Bind everything described by `config` over a fresh [`AppState`] and
/// serve until `shutdown` resolves.
pub async fn run<F>(config: &Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    Server::bind(config, AppState::new()).await?.run(shutdown).await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

//! Command API server.
//!
//! # Responsibilities
//! - Create the Axum router under the API prefix
//! - Wire up middleware (tracing, request ID)
//! - Bind and serve from a detached task
//! - Classify how serving ended: closed by us, or a fault
//!
//! # Design Decisions
//! - Binding happens inside the serving task, so launch never blocks
//! - A stop we asked for is swallowed; any other end of serving is escalated
//!   through the fatal channel, because nothing on the main path awaits this task

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::commands::{CommandEnv, CommandRequest, CommandRuntime};
use crate::config::validation::api_listen_target;
use crate::error::DaemonError;
use crate::http::request::MakeRequestUuidV4;
use crate::lifecycle::{FatalSink, Shutdown};
use crate::observability::metrics;

/// Every command lives under this path prefix.
pub const API_PREFIX: &str = "/api";

const COMMAND_ROUTE: &str = "/api/{*command}";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<dyn CommandRuntime>,
    pub env: Arc<CommandEnv>,
}

/// HTTP server exposing the command runtime.
pub struct CommandServer {
    router: Router,
    bind_address: String,
}

impl CommandServer {
    /// Create a server for `runtime` that will bind to `bind_address`.
    pub fn new(
        runtime: Arc<dyn CommandRuntime>,
        env: CommandEnv,
        bind_address: impl Into<String>,
    ) -> Self {
        let state = AppState {
            runtime,
            env: Arc::new(env),
        };
        Self {
            router: Self::build_router(state),
            bind_address: bind_address.into(),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(COMMAND_ROUTE, any(command_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Start serving in the background and return immediately.
    pub fn launch(self, fatal: FatalSink) -> ServerHandle {
        let shutdown = Shutdown::new();
        let stop = shutdown.subscribe();
        let requested = Arc::new(AtomicBool::new(false));
        let (closed_tx, closed_rx) = oneshot::channel();

        let was_requested = requested.clone();
        tokio::spawn(async move {
            let result = self.serve(stop).await;
            if was_requested.load(Ordering::SeqCst) {
                // Whoever asked for the stop owns the result, faults included.
                let _ = closed_tx.send(result);
                return;
            }
            match result {
                Ok(()) => fatal.escalate(DaemonError::ServerFault(io::Error::other(
                    "api server stopped without a shutdown request",
                ))),
                Err(e) => fatal.escalate(DaemonError::ServerFault(e)),
            }
        });

        ServerHandle {
            shutdown,
            requested,
            closed: closed_rx,
        }
    }

    /// Bind and serve until `stop` fires, then drain in-flight requests.
    pub async fn serve(self, mut stop: broadcast::Receiver<()>) -> io::Result<()> {
        let target = api_listen_target(&self.bind_address)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let listener = TcpListener::bind(target).await?;
        tracing::info!(
            address = %listener.local_addr()?,
            prefix = API_PREFIX,
            "API server listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
                tracing::info!("API server draining");
            })
            .await?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

/// Handle to a launched [`CommandServer`].
pub struct ServerHandle {
    shutdown: Shutdown,
    requested: Arc<AtomicBool>,
    closed: oneshot::Receiver<io::Result<()>>,
}

impl ServerHandle {
    /// Stop accepting connections and wait for in-flight requests to finish.
    ///
    /// Unbounded: the caller decides how long to wait. Dropping the returned future
    /// abandons the wait but not the drain. Failures after the request are reported
    /// as [`DaemonError::ServerDrain`], never escalated.
    pub async fn shutdown(self) -> Result<(), DaemonError> {
        self.requested.store(true, Ordering::SeqCst);
        self.shutdown.trigger();

        match self.closed.await {
            Ok(result) => result.map_err(DaemonError::ServerDrain),
            Err(_) => Err(DaemonError::ServerDrain(io::Error::other(
                "api server task ended before draining",
            ))),
        }
    }
}

/// Turn a request into a command invocation.
async fn command_handler(
    State(state): State<AppState>,
    Path(command): Path<String>,
    Query(args): Query<HashMap<String, String>>,
) -> Response {
    let start_time = Instant::now();

    tracing::debug!(command = %command, "Executing command");

    let request = CommandRequest {
        path: command.clone(),
        args,
    };
    let response = match state.runtime.execute(&state.env, request).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            tracing::warn!(command = %command, error = %e, "Command failed");
            e.into_response()
        }
    };

    let status = response.status().as_u16();
    metrics::record_command(metrics::command_label(&command, status), status, start_time);
    response
}

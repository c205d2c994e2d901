//! # HTTP Gateway
//!
//! Binds a local port (falling back across successive ports when the
//! preferred one is taken), routes the four endpoints plus the inline
//! liveness probes, and serves until the shutdown signal. Request paths are
//! lowercased and trailing-slash-trimmed before routing, so the wrapper
//! service, not the bare router, is what gets served.

use std::any::Any;
use std::io::ErrorKind;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, StatusCode, Uri};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tokio::net::TcpListener;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as CorsAny, CorsLayer};

use crate::config::GatewayConfig;
use crate::engine::AccessEngine;
use crate::observability::Logger;

use super::{load_table, run_query, update_record, write_record};

use thiserror::Error;

/// Name reported by the readiness probe.
const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Errors raised while bringing the gateway up
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The last bind attempt failed; earlier in-use/denied ports were
    /// already retried past.
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        source: std::io::Error,
    },

    /// Port fallback walked off the end of the numeric range
    #[error("no free port between {start} and 65535")]
    PortRangeExhausted { start: u16 },

    /// Serve-loop I/O failure
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every endpoint.
pub struct GatewayState {
    pub engine: Arc<dyn AccessEngine>,
}

/// The routed service with path normalization applied outside the router.
pub type GatewayService = MapRequest<Router, fn(Request) -> Request>;

/// The query gateway, configured but not yet bound.
pub struct Gateway {
    config: GatewayConfig,
    state: Arc<GatewayState>,
}

impl Gateway {
    pub fn new(config: GatewayConfig, engine: Arc<dyn AccessEngine>) -> Self {
        Self {
            config,
            state: Arc::new(GatewayState { engine }),
        }
    }

    /// Build the router: liveness probes inline, the four endpoints, JSON
    /// 404 fallback, CORS for everyone, panic guard outermost.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(CorsAny)
            .allow_methods(CorsAny)
            .allow_headers(CorsAny);

        Router::new()
            .route("/health", get(health))
            .route("/leerregistro", get(stub_leer_registro))
            .route("/leerconfiguracion", get(stub_leer_configuracion))
            .route("/borrarregistros", get(stub_borrar_registros))
            .route("/cargatabla", post(load_table::handle))
            .route("/lanzarconsulta", post(run_query::handle))
            .route("/escribirregistro", post(write_record::handle))
            .route("/actualizarregistro", post(update_record::handle))
            .fallback(not_found)
            .with_state(self.state.clone())
            .layer(cors)
            .layer(CatchPanicLayer::custom(panic_response as PanicHandler))
    }

    /// The servable/testable service: router plus path normalization.
    pub fn service(&self) -> GatewayService {
        MapRequestLayer::new(normalize_path as fn(Request) -> Request).layer(self.router())
    }

    /// Bind the configured port, walking forward across `port_attempts`
    /// successive ports while binds fail with in-use or access-denied.
    pub async fn bind(self) -> Result<BoundGateway, GatewayError> {
        let mut port = self.config.port;
        let mut attempts = 0u16;

        let listener = loop {
            match TcpListener::bind((self.config.host.as_str(), port)).await {
                Ok(listener) => break listener,
                Err(e) => {
                    let retryable =
                        matches!(e.kind(), ErrorKind::AddrInUse | ErrorKind::PermissionDenied);
                    if !retryable || attempts >= self.config.port_attempts {
                        return Err(GatewayError::Bind { port, source: e });
                    }
                    attempts += 1;
                    let next = port.checked_add(1).ok_or(GatewayError::PortRangeExhausted {
                        start: self.config.port,
                    })?;
                    Logger::warn(
                        "port_fallback",
                        &[("taken", &port.to_string()), ("trying", &next.to_string())],
                    );
                    port = next;
                }
            }
        };

        // Port 0 delegates the choice to the OS; report what was claimed.
        let port = listener.local_addr().map(|a| a.port()).unwrap_or(port);

        let service = self.service();
        Ok(BoundGateway {
            listener,
            service,
            port,
        })
    }
}

/// A gateway with its port claimed. `port()` is what the tunnel manager
/// forwards external traffic to.
pub struct BoundGateway {
    listener: TcpListener,
    service: GatewayService,
    port: u16,
}

impl BoundGateway {
    /// The locally bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> Result<(), GatewayError> {
        Logger::info(
            "gateway_listening",
            &[("port", &self.port.to_string()), ("service", SERVICE_NAME)],
        );
        axum::serve(
            self.listener,
            axum::ServiceExt::<Request>::into_make_service(self.service),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Lowercase the path and trim trailing slashes before routing, so
/// `/CargaTabla/` resolves like `/cargatabla`.
fn normalize_path(mut req: Request) -> Request {
    let new_uri = {
        let uri = req.uri();
        let path = uri.path();
        let mut normalized = path.to_ascii_lowercase();
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        if normalized == path {
            None
        } else {
            let path_and_query = match uri.query() {
                Some(q) => format!("{normalized}?{q}"),
                None => normalized,
            };
            let mut parts = uri.clone().into_parts();
            parts.path_and_query = path_and_query.parse().ok();
            Uri::from_parts(parts).ok()
        }
    };
    if let Some(uri) = new_uri {
        *req.uri_mut() = uri;
    }
    req
}

/// Readiness probe: up and able to answer.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "service": SERVICE_NAME,
        "ts": Utc::now().to_rfc3339(),
    }))
}

async fn stub_leer_registro() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "endpoint": "LeerRegistro" }))
}

async fn stub_leer_configuracion() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "endpoint": "LeerConfiguracion" }))
}

async fn stub_borrar_registros() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "endpoint": "BorrarRegistros" }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "error": "Not Found" })),
    )
}

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response<Body>;

/// A panicking handler becomes a JSON 500; the process stays up.
fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let body = json!({ "ok": false, "error": "internal server error" }).to_string();
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| {
            let mut fallback = Response::new(Body::empty());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

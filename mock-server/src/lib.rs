//! Stand-in for a search cluster node, used by integration tests.
//!
//! `GET /` answers with node info, `/_echo` reflects the request back as
//! JSON so tests can see exactly which headers and credentials arrived.

use std::collections::BTreeMap;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub use axum::Router;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub cluster_name: String,
    pub tagline: String,
}

/// The request as the server saw it. Header names are lowercase.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Basic-auth credentials the server insists on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(user: &str, pass: &str) -> Self {
        Self {
            user: user.to_string(),
            pass: pass.to_string(),
        }
    }

    /// Whether an `Authorization` header value carries these credentials.
    pub fn matches(&self, authorization: &str) -> bool {
        let Some(token) = authorization.strip_prefix("Basic ") else {
            return false;
        };
        let Ok(decoded) = STANDARD.decode(token.trim()) else {
            return false;
        };
        decoded == format!("{}:{}", self.user, self.pass).as_bytes()
    }
}

/// Router without authentication.
pub fn app() -> Router {
    routes()
}

/// Router that answers 401 unless the request carries `credentials`.
pub fn app_with_credentials(credentials: Credentials) -> Router {
    routes().layer(middleware::from_fn_with_state(credentials, require_basic_auth))
}

/// Serve the open router on `listener`.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn routes() -> Router {
    Router::new()
        .route("/", get(node_info))
        .route("/_echo", any(echo))
        .route("/_echo/{*rest}", any(echo))
}

async fn node_info() -> Json<NodeInfo> {
    Json(NodeInfo {
        name: "mock-node-0".to_string(),
        cluster_name: "mock-cluster".to_string(),
        tagline: "You Know, for Search".to_string(),
    })
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body,
    })
}

async fn require_basic_auth(
    State(credentials): State<Credentials>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| credentials.matches(value));
    if !authorized {
        debug!(path = %request.uri().path(), "rejected request without valid credentials");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

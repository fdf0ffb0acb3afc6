// Shared fixtures - a stub tool server speaking the register/JSON-RPC protocol
//
// Each integration test binary compiles this module separately, so not every
// helper is used everywhere.
#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// How the stub answers `callTool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Healthy,
    RpcError,
    WrongId,
    ServerError,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub step: String,
    pub session_id: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    behaviour: Behaviour,
    log: Arc<Mutex<Vec<Recorded>>>,
}

pub struct StubToolServer {
    pub endpoint: String,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl StubToolServer {
    pub async fn spawn(behaviour: Behaviour) -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            behaviour,
            log: Arc::clone(&log),
        };
        let app = Router::new()
            .route("/status", get(|| async { "ok" }))
            .route("/register", post(register))
            .route("/api/message", post(message))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            endpoint: format!("http://{addr}"),
            log,
        }
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.step).collect()
    }
}

/// An address nothing listens on.
pub fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
    let addr = listener.local_addr().expect("reserved addr");
    drop(listener);
    format!("http://{addr}")
}

async fn register(State(state): State<StubState>, Json(body): Json<Value>) -> Json<Value> {
    state.log.lock().unwrap().push(Recorded {
        step: "register".into(),
        session_id: body["sessionId"].as_str().map(str::to_string),
        body: body.clone(),
    });
    Json(json!({"success": true}))
}

async fn message(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let method = body["method"].as_str().unwrap_or_default().to_string();
    let id = body["id"].clone();
    state.log.lock().unwrap().push(Recorded {
        step: method.clone(),
        session_id: query.get("sessionId").cloned(),
        body: body.clone(),
    });

    let result = match method.as_str() {
        "initialize" => json!({"serverInfo": {"name": "stub", "version": "0.0.1"}}),
        "listTools" => json!({
            "tools": [
                {
                    "name": "fetchWebsite",
                    "description": "Fetch a web page",
                    "parameters": {
                        "type": "object",
                        "properties": {"url": {"type": "string"}},
                        "required": ["url"]
                    }
                },
                {"description": "entry a broken server sent without a name"},
                {"name": "getMenu"}
            ]
        }),
        "callTool" => match state.behaviour {
            Behaviour::Healthy => {
                let name = body["params"]["name"].as_str().unwrap_or_default();
                if name == "getMenu" {
                    json!({})
                } else {
                    json!({"content": [{
                        "type": "text",
                        "text": format!("fetched {}", body["params"]["arguments"]["url"].as_str().unwrap_or("?"))
                    }]})
                }
            }
            Behaviour::RpcError => {
                return Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": -32000, "message": "tool exploded"}
                }))
                .into_response();
            }
            Behaviour::WrongId => {
                let wrong = id.as_u64().unwrap_or_default() + 100;
                return Json(json!({"jsonrpc": "2.0", "id": wrong, "result": {"content": []}}))
                    .into_response();
            }
            Behaviour::ServerError => {
                return (StatusCode::INTERNAL_SERVER_ERROR, "internal failure").into_response();
            }
        },
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": format!("unknown method {other}")}
            }))
            .into_response();
        }
    };

    Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
}

//! In-process stand-in for the backend: records every request it receives and
//! answers with queued canned responses.

use axum::Router;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub json: Option<Value>,
    pub parts: Vec<RecordedPart>,
}

#[derive(Default)]
struct Shared {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<(u16, Value)>>,
}

pub struct TestServer {
    pub base_url: String,
    shared: Arc<Shared>,
}

impl TestServer {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(record).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            shared,
        }
    }

    /// Queue the response for the next unanswered request.
    pub fn respond(&self, status: u16, body: Value) {
        self.shared.responses.lock().unwrap().push_back((status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }
}

async fn record(State(shared): State<Arc<Shared>>, req: Request) -> (StatusCode, Json<Value>) {
    let (authorization, content_type) = {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        (header("authorization"), header("content-type"))
    };
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let mut json = None;
    let mut parts = Vec::new();
    if content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    {
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.unwrap().to_vec();
            parts.push(RecordedPart {
                name,
                file_name,
                data,
            });
        }
    } else {
        let body = axum::body::to_bytes(req.into_body(), usize::MAX).await.unwrap();
        if !body.is_empty() {
            json = serde_json::from_slice(&body).ok();
        }
    }

    shared.requests.lock().unwrap().push(RecordedRequest {
        method,
        path,
        query,
        authorization,
        content_type,
        json,
        parts,
    });

    let (status, body) = shared
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, Value::String("no response queued".into())));
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

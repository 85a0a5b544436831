use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use onehealth_core::{
    ChatExchange, ChatMessage, CompletionBackend, DISEASES, Disease, ExchangeError, FALLBACK_REPLY,
    Intervention, InterventionSet, ModelKind, PredictionExchange, PredictionRequest,
    PredictionResult, SourceDocument, find_disease, prompt,
};
use onehealth_ingest::{RawFile, extract_batch, tabular_to_csv};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use url::Url;

use crate::models::{
    AddLinkRequest, PredictionApiRequest, SendMessageRequest, SendMessageResponse,
    SessionResponse, UploadRequest, UploadResult, UploadStatus,
};
use crate::state::{ChatSession, InMemorySessionStore, SessionStore};

type ApiResult<T> = Result<Json<T>, ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "id": id
        })),
    )
}

fn unprocessable_error(message: &str) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message })),
    )
}

fn bad_gateway_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub backend: Arc<dyn CompletionBackend>,
}

pub fn create_app(backend: Arc<dyn CompletionBackend>) -> Router {
    let app_state = AppState {
        sessions: Arc::new(InMemorySessionStore::new()),
        backend,
    };
    build_router(app_state)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/diseases", get(list_diseases))
        .route("/chat/sessions", post(create_session))
        .route(
            "/chat/sessions/{session_id}",
            get(get_session).delete(delete_session),
        )
        .route("/chat/sessions/{session_id}/messages", post(send_message))
        .route(
            "/chat/sessions/{session_id}/documents",
            post(upload_documents),
        )
        .route(
            "/chat/sessions/{session_id}/documents/{index}",
            delete(remove_document),
        )
        .route("/chat/sessions/{session_id}/links", post(add_link))
        .route(
            "/chat/sessions/{session_id}/links/{index}",
            delete(remove_link),
        )
        .route("/predictions", post(run_prediction))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "One Health Platform Service",
        "version": "1.0.0",
        "description": "Document-grounded chat assistant and AI outbreak prediction",
        "endpoints": {
            "GET /diseases": "Disease catalog",
            "POST /chat/sessions": "Create a chat session",
            "GET /chat/sessions/{id}": "Session transcript and knowledge base",
            "POST /chat/sessions/{id}/messages": "Send a chat message",
            "POST /chat/sessions/{id}/documents": "Upload knowledge-base documents",
            "POST /chat/sessions/{id}/links": "Add a reference link",
            "POST /predictions": "Run an outbreak prediction",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_diseases() -> Json<Vec<Disease>> {
    Json(DISEASES.to_vec())
}

async fn load_session(state: &AppState, session_id: &str) -> Result<ChatSession, ApiError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| not_found_error("Session not found", session_id))
}

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = ChatSession::new();
    info!(session_id = %session.id, "created chat session");

    let response = SessionResponse::from_session(&session);
    state.sessions.save(session).await;
    Json(response)
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    let session = load_session(&state, &session_id).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Value> {
    if state.sessions.delete(&session_id).await {
        Ok(Json(json!({ "session_id": session_id, "deleted": true })))
    } else {
        Err(not_found_error("Session not found", &session_id))
    }
}

async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<SendMessageResponse> {
    if request.message.trim().is_empty() {
        return Err(bad_request_error("Message cannot be empty"));
    }

    let mut session = load_session(&state, &session_id).await?;

    let context = prompt::assemble_context(&session.documents, &session.links);
    let reply = match ChatExchange::reply(
        state.backend.as_ref(),
        &session.messages,
        &request.message,
        &context,
    )
    .await
    {
        Ok(text) => text,
        // Call failures degrade to the fixed apology, not an error status.
        Err(err) => {
            error!(session_id = %session_id, error = %err, "chat completion failed");
            FALLBACK_REPLY.to_string()
        }
    };

    session.messages.push(ChatMessage::user(request.message));
    session.messages.push(ChatMessage::model(reply.clone()));
    state.sessions.save(session).await;

    Ok(Json(SendMessageResponse {
        session_id,
        reply: ChatMessage::model(reply),
    }))
}

async fn upload_documents(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<Vec<UploadResult>> {
    if request.files.is_empty() {
        return Err(bad_request_error("No files provided"));
    }

    let mut session = load_session(&state, &session_id).await?;

    let mut results = Vec::with_capacity(request.files.len());
    let mut raw_files = Vec::new();
    for file in request.files {
        match STANDARD.decode(&file.content_base64) {
            Ok(bytes) => raw_files.push(RawFile {
                name: file.file_name,
                bytes,
            }),
            Err(err) => results.push(UploadResult {
                file_name: file.file_name,
                status: UploadStatus::Failed,
                error: Some(format!("invalid base64 payload: {err}")),
            }),
        }
    }

    for item in extract_batch(raw_files).await {
        match item.result {
            Ok(doc) => {
                session.documents.push(SourceDocument {
                    name: doc.name,
                    content: doc.content,
                });
                results.push(UploadResult {
                    file_name: item.name,
                    status: UploadStatus::Added,
                    error: None,
                });
            }
            Err(err) => results.push(UploadResult {
                file_name: item.name,
                status: UploadStatus::Failed,
                error: Some(err.to_string()),
            }),
        }
    }

    info!(
        session_id = %session_id,
        documents = session.documents.len(),
        "knowledge base updated"
    );
    state.sessions.save(session).await;
    Ok(Json(results))
}

async fn remove_document(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
) -> ApiResult<SessionResponse> {
    let mut session = load_session(&state, &session_id).await?;
    if index >= session.documents.len() {
        return Err(not_found_error("Document not found", &index.to_string()));
    }
    session.documents.remove(index);

    let response = SessionResponse::from_session(&session);
    state.sessions.save(session).await;
    Ok(Json(response))
}

async fn add_link(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddLinkRequest>,
) -> ApiResult<SessionResponse> {
    let link = request.url.trim().to_string();
    if Url::parse(&link).is_err() {
        return Err(bad_request_error("Invalid URL"));
    }

    let mut session = load_session(&state, &session_id).await?;
    session.links.push(link);

    let response = SessionResponse::from_session(&session);
    state.sessions.save(session).await;
    Ok(Json(response))
}

async fn remove_link(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
) -> ApiResult<SessionResponse> {
    let mut session = load_session(&state, &session_id).await?;
    if index >= session.links.len() {
        return Err(not_found_error("Link not found", &index.to_string()));
    }
    session.links.remove(index);

    let response = SessionResponse::from_session(&session);
    state.sessions.save(session).await;
    Ok(Json(response))
}

fn resolve_case_data(request: &PredictionApiRequest) -> Result<String, ApiError> {
    if let Some(csv) = &request.csv_data {
        if !csv.trim().is_empty() {
            return Ok(csv.clone());
        }
    }

    let Some(file) = &request.file else {
        return Err(bad_request_error(
            "Case data is required: provide csv_data or file",
        ));
    };
    let bytes = STANDARD
        .decode(&file.content_base64)
        .map_err(|_| bad_request_error("Invalid base64 payload"))?;
    tabular_to_csv(&file.file_name, &bytes).map_err(|e| bad_request_error(&e.to_string()))
}

async fn run_prediction(
    State(state): State<AppState>,
    Json(request): Json<PredictionApiRequest>,
) -> ApiResult<PredictionResult> {
    let disease = find_disease(&request.disease_id)
        .ok_or_else(|| not_found_error("Unknown disease", &request.disease_id))?;

    let csv_data = resolve_case_data(&request)?;

    let mut interventions = InterventionSet::new();
    for (label, effectiveness) in &request.interventions {
        let intervention = Intervention::try_from_label(label)
            .map_err(|e| unprocessable_error(&e.to_string()))?;
        interventions.enable(intervention, *effectiveness);
    }

    let model =
        ModelKind::try_from_label(&request.model).map_err(|e| unprocessable_error(&e.to_string()))?;

    let prediction_request = PredictionRequest::new(
        disease,
        csv_data,
        interventions,
        model,
        request.prediction_months,
    )
    .map_err(|e| bad_request_error(&e.to_string()))?;

    match PredictionExchange::run(state.backend.as_ref(), &prediction_request).await {
        Ok(result) => Ok(Json(result)),
        Err(err @ ExchangeError::InvalidResponse(_)) => {
            error!(disease = %request.disease_id, error = %err, "model returned invalid prediction");
            Err(bad_gateway_error(
                "The AI returned an invalid response. Please try again.",
                &err.to_string(),
            ))
        }
        Err(err) => {
            error!(disease = %request.disease_id, error = %err, "prediction request failed");
            Err(bad_gateway_error(
                "Prediction request failed",
                &err.to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use onehealth_core::Result as ExchangeResult;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Backend double: canned replies, recorded prompts.
    struct MockBackend {
        completion_reply: ExchangeResult<String>,
        chat_reply: ExchangeResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockBackend {
        fn completing(reply: &str) -> Self {
            Self {
                completion_reply: Ok(reply.to_string()),
                chat_reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                completion_reply: Err(ExchangeError::Completion("boom".to_string())),
                chat_reply: Err(ExchangeError::Completion("boom".to_string())),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    fn clone_result(result: &ExchangeResult<String>) -> ExchangeResult<String> {
        match result {
            Ok(text) => Ok(text.clone()),
            Err(_) => Err(ExchangeError::Completion("boom".to_string())),
        }
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn complete(&self, prompt: &str) -> ExchangeResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            clone_result(&self.completion_reply)
        }

        async fn chat(&self, _history: &[ChatMessage], message: &str) -> ExchangeResult<String> {
            self.prompts.lock().unwrap().push(message.to_string());
            clone_result(&self.chat_reply)
        }
    }

    fn test_app(backend: Arc<MockBackend>) -> Router {
        create_app(backend)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create_test_session(app: &Router) -> String {
        let (status, body) = send(app, post_json("/chat/sessions", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        body["session_id"].as_str().unwrap().to_string()
    }

    const PREDICTION_REPLY: &str = r#"{
        "insights": "Kasus diprediksi menurun.",
        "riskLevel": "Low",
        "recommendations": ["Pertahankan vaksinasi"],
        "chartData": [
            {"name": "Jun", "cases": 40},
            {"name": "Jul", "predicted": 30}
        ]
    }"#;

    #[tokio::test]
    async fn session_lifecycle() {
        let app = test_app(Arc::new(MockBackend::completing("ok")));

        let (status, body) = send(&app, post_json("/chat/sessions", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let session_id = body["session_id"].as_str().unwrap().to_string();
        assert_eq!(body["messages"][0]["role"], "model");
        assert!(
            body["messages"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("Halo!")
        );

        let (status, _) = send(&app, get_uri(&format!("/chat/sessions/{session_id}"))).await;
        assert_eq!(status, StatusCode::OK);

        let delete_request = Request::builder()
            .method("DELETE")
            .uri(format!("/chat/sessions/{session_id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete_request).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, get_uri(&format!("/chat/sessions/{session_id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn chat_reply_is_appended_to_the_transcript() {
        let backend = Arc::new(MockBackend::completing("Rabies menular lewat gigitan."));
        let app = test_app(backend.clone());
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/chat/sessions/{session_id}/messages"),
                json!({ "message": "Bagaimana rabies menular?" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"]["text"], "Rabies menular lewat gigitan.");

        let (_, body) = send(&app, get_uri(&format!("/chat/sessions/{session_id}"))).await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["text"], "Rabies menular lewat gigitan.");
    }

    #[tokio::test]
    async fn chat_failure_degrades_to_the_apology() {
        let app = test_app(Arc::new(MockBackend::failing()));
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/chat/sessions/{session_id}/messages"),
                json!({ "message": "Halo?" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"]["text"], FALLBACK_REPLY);

        let (_, body) = send(&app, get_uri(&format!("/chat/sessions/{session_id}"))).await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.last().unwrap()["text"], FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn uploaded_documents_feed_the_chat_context() {
        let backend = Arc::new(MockBackend::completing("ok"));
        let app = test_app(backend.clone());
        let session_id = create_test_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/chat/sessions/{session_id}/documents"),
                json!({ "files": [
                    {
                        "file_name": "rabies.txt",
                        "content_base64": STANDARD.encode("Rabies adalah zoonosis.")
                    },
                    {
                        "file_name": "broken.pdf",
                        "content_base64": STANDARD.encode("not a pdf")
                    }
                ]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["status"], "added");
        assert_eq!(results[1]["status"], "failed");

        let (_, body) = send(&app, get_uri(&format!("/chat/sessions/{session_id}"))).await;
        assert_eq!(body["documents"].as_array().unwrap().len(), 1);

        send(
            &app,
            post_json(
                &format!("/chat/sessions/{session_id}/messages"),
                json!({ "message": "Apa itu rabies?" }),
            ),
        )
        .await;

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Rabies adalah zoonosis."));
        assert!(prompts[0].contains("Nama File: rabies.txt"));
    }

    #[tokio::test]
    async fn invalid_link_is_rejected() {
        let app = test_app(Arc::new(MockBackend::completing("ok")));
        let session_id = create_test_session(&app).await;

        let (status, _) = send(
            &app,
            post_json(
                &format!("/chat/sessions/{session_id}/links"),
                json!({ "url": "bukan url" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            post_json(
                &format!("/chat/sessions/{session_id}/links"),
                json!({ "url": "https://www.who.int/rabies" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["links"][0], "https://www.who.int/rabies");
    }

    #[tokio::test]
    async fn prediction_happy_path_normalizes_chart_nulls() {
        let backend = Arc::new(MockBackend::completing(PREDICTION_REPLY));
        let app = test_app(backend.clone());

        let (status, body) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "rabies",
                    "csv_data": "Bulan,Kasus\nMei,50\nJun,40",
                    "interventions": { "Vaksinasi Massal": 50 },
                    "model": "Random Forest",
                    "prediction_months": 12
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["riskLevel"], "Low");
        assert_eq!(body["chartData"][0]["predicted"], Value::Null);
        assert_eq!(body["chartData"][1]["cases"], Value::Null);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Vaksinasi Massal (estimated effectiveness 50%)"));
        assert!(prompts[0].contains("next 12 months"));
    }

    #[tokio::test]
    async fn prediction_inputs_are_clamped_at_the_boundary() {
        let backend = Arc::new(MockBackend::completing(PREDICTION_REPLY));
        let app = test_app(backend.clone());

        let (status, _) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "malaria",
                    "csv_data": "Bulan,Kasus\nJan,10",
                    "interventions": { "Pengendalian Vektor": 400 },
                    "model": "Regresi Linier",
                    "prediction_months": 600
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Pengendalian Vektor (estimated effectiveness 100%)"));
        assert!(prompts[0].contains("next 60 months"));
    }

    #[tokio::test]
    async fn prediction_rejects_unknown_labels() {
        let app = test_app(Arc::new(MockBackend::completing(PREDICTION_REPLY)));

        let (status, _) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "ebola",
                    "csv_data": "a,b",
                    "model": "Random Forest",
                    "prediction_months": 12
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "rabies",
                    "csv_data": "a,b",
                    "interventions": { "Lockdown Total": 50 },
                    "model": "Random Forest",
                    "prediction_months": 12
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "rabies",
                    "csv_data": "a,b",
                    "model": "ARIMA",
                    "prediction_months": 12
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn invalid_model_output_is_bad_gateway() {
        let app = test_app(Arc::new(MockBackend::completing("no json here")));

        let (status, body) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "rabies",
                    "csv_data": "Bulan,Kasus\nJan,10",
                    "model": "Random Forest",
                    "prediction_months": 12
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"],
            "The AI returned an invalid response. Please try again."
        );
    }

    #[tokio::test]
    async fn prediction_requires_case_data() {
        let app = test_app(Arc::new(MockBackend::completing(PREDICTION_REPLY)));

        let (status, _) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "rabies",
                    "model": "Random Forest",
                    "prediction_months": 12
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn prediction_accepts_an_uploaded_csv_file() {
        let backend = Arc::new(MockBackend::completing(PREDICTION_REPLY));
        let app = test_app(backend.clone());

        let (status, _) = send(
            &app,
            post_json(
                "/predictions",
                json!({
                    "disease_id": "covid-19",
                    "file": {
                        "file_name": "cases.csv",
                        "content_base64": STANDARD.encode("Bulan,Kasus\nJan,100")
                    },
                    "model": "LSTM (Long Short-Term Memory)",
                    "prediction_months": 6
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Bulan,Kasus\nJan,100"));
    }
}

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use todo_api::{app, AppState, TodoService};
use tower::ServiceExt;

fn test_app() -> TodoService {
    app(AppState::memory())
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &TodoService, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn list(app: &TodoService, query: &str) -> Vec<Value> {
    let response = send(app, get(&format!("/todos{}", query))).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().cloned().unwrap()
}

fn todo_body(text: &str, category: &str, priority: &str, status: &str, due: &str) -> Value {
    json!({
        "todo": text,
        "category": category,
        "priority": priority,
        "status": status,
        "dueDate": due
    })
}

/// Create a todo and return its stored representation
async fn seed(app: &TodoService, body: Value) -> Value {
    let text = body["todo"].as_str().unwrap().to_string();
    let response = send(app, json_request(Method::POST, "/todos", &body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    list(app, "")
        .await
        .into_iter()
        .find(|t| t["todo"] == text.as_str())
        .unwrap()
}

// --- create ---

#[tokio::test]
async fn create_returns_201_and_stores_day_granularity() {
    let app = test_app();
    let response = send(
        &app,
        json_request(
            Method::POST,
            "/todos",
            &todo_body("Write report", "WORK", "HIGH", "TO DO", "2024-03-01T10:00:00Z"),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_text(response).await, "Todo Successfully Added");

    let todos = list(&app, "").await;
    assert_eq!(todos.len(), 1);
    let id = todos[0]["id"].as_str().unwrap();

    let response = send(&app, get(&format!("/todos/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let todo = body_json(response).await;
    assert_eq!(todo["dueDate"], "2024-03-01");
    assert_eq!(todo["todo"], "Write report");
    assert_eq!(todo["category"], "WORK");
}

#[tokio::test]
async fn create_keeps_calendar_date_regardless_of_offset() {
    let app = test_app();
    let todo = seed(&app, todo_body("Late call", "WORK", "LOW", "TO DO", "2024-03-01T23:30:00-05:00")).await;
    assert_eq!(todo["dueDate"], "2024-03-01");
}

#[tokio::test]
async fn create_accepts_minute_precision_utc_date() {
    let app = test_app();
    let todo = seed(&app, todo_body("Short stamp", "HOME", "LOW", "TO DO", "2024-03-01T10:00Z")).await;
    assert_eq!(todo["dueDate"], "2024-03-01");
}

#[tokio::test]
async fn create_rejects_invalid_fields_and_persists_nothing() {
    let app = test_app();
    let cases = [
        (todo_body("a", "GARDEN", "HIGH", "TO DO", "2024-03-01"), "Invalid Todo Category"),
        (todo_body("a", "WORK", "URGENT", "TO DO", "2024-03-01"), "Invalid Todo Priority"),
        (todo_body("a", "WORK", "HIGH", "BLOCKED", "2024-03-01"), "Invalid Todo Status"),
        (todo_body("a", "WORK", "HIGH", "TO DO", "2024-13-45"), "Invalid Due Date"),
        (todo_body("", "WORK", "HIGH", "TO DO", "2024-03-01"), "Invalid Todo Text"),
        (json!({}), "Invalid Todo Category"),
    ];

    for (body, message) in cases {
        let response = send(&app, json_request(Method::POST, "/todos", &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(body_text(response).await, message);
    }

    assert!(list(&app, "").await.is_empty());
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = test_app();
    let mut body = todo_body("Pick id", "HOME", "LOW", "DONE", "2024-01-05");
    body["id"] = json!("00000000-0000-0000-0000-000000000001");

    let todo = seed(&app, body).await;
    assert_ne!(todo["id"], "00000000-0000-0000-0000-000000000001");
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/todos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid JSON Body");
}

// --- get ---

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = test_app();
    let response = send(&app, get("/todos/6f9619ff-8b86-d011-b42d-00cf4fc964ff")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Todo not found");
}

#[tokio::test]
async fn get_malformed_id_is_400() {
    let app = test_app();
    let response = send(&app, get("/todos/507f1f77bcf86cd799439011")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid Todo Id");
}

// --- list ---

#[tokio::test]
async fn list_combines_filters_with_and() {
    let app = test_app();
    seed(&app, todo_body("Ship release", "WORK", "HIGH", "TO DO", "2024-03-01")).await;
    seed(&app, todo_body("Plan sprint", "WORK", "LOW", "TO DO", "2024-03-01")).await;
    seed(&app, todo_body("Fix sink", "HOME", "HIGH", "DONE", "2024-03-02")).await;

    let todos = list(&app, "?category=WORK&priority=HIGH").await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["todo"], "Ship release");

    let todos = list(&app, "?status=TO%20DO").await;
    assert_eq!(todos.len(), 2);

    let todos = list(&app, "?dueDate=2024-03-02T08:00:00Z").await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["todo"], "Fix sink");

    // Empty parameters are not filters
    assert_eq!(list(&app, "?status=&category=").await.len(), 3);

    // Values outside an enumeration match nothing
    assert!(list(&app, "?priority=URGENT").await.is_empty());
}

#[tokio::test]
async fn list_search_is_case_insensitive() {
    let app = test_app();
    seed(&app, todo_body("Buy Food", "HOME", "MEDIUM", "TO DO", "2024-03-01")).await;
    seed(&app, todo_body("Read book", "LEARNING", "LOW", "TO DO", "2024-03-01")).await;

    let todos = list(&app, "?search_q=food").await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["todo"], "Buy Food");
}

#[tokio::test]
async fn list_rejects_unparseable_due_date() {
    let app = test_app();
    let response = send(&app, get("/todos?dueDate=someday")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid Due Date");
}

#[tokio::test]
async fn list_rejects_undecodable_query_string() {
    let app = test_app();
    let response = send(&app, get("/todos?status=DONE&status=TO%20DO")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid Query String");
}

#[tokio::test]
async fn list_with_broken_pattern_is_server_error() {
    let app = test_app();
    let response = send(&app, get("/todos?search_q=%28unclosed")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Server Error");
}

// --- agenda ---

#[tokio::test]
async fn agenda_is_reachable_and_filters_by_day() {
    let app = test_app();
    seed(&app, todo_body("Standup", "WORK", "MEDIUM", "TO DO", "2024-03-01")).await;
    seed(&app, todo_body("Dentist", "HOME", "HIGH", "TO DO", "2024-03-04")).await;

    let response = send(&app, get("/todos/agenda?date=2024-03-01T09:00:00Z")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let todos = body_json(response).await;
    let todos = todos.as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["todo"], "Standup");
}

#[tokio::test]
async fn agenda_requires_a_date() {
    let app = test_app();
    for uri in ["/todos/agenda", "/todos/agenda?date=nope"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body_text(response).await, "Invalid Due Date");
    }

    let response = send(&app, get("/todos/agenda?date=2024-03-01&date=2024-03-02")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid Query String");
}

// --- update ---

#[tokio::test]
async fn update_changes_only_named_fields() {
    let app = test_app();
    let before = seed(&app, todo_body("Learn axum", "LEARNING", "MEDIUM", "TO DO", "2024-04-10")).await;
    let uri = format!("/todos/{}", before["id"].as_str().unwrap());

    let response = send(&app, json_request(Method::PUT, &uri, &json!({"status": "DONE"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "status Updated");

    let after = body_json(send(&app, get(&uri)).await).await;
    assert_eq!(after["status"], "DONE");
    for field in ["id", "todo", "category", "priority", "dueDate"] {
        assert_eq!(after[field], before[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn update_echoes_first_key_and_normalizes_due_date() {
    let app = test_app();
    let todo = seed(&app, todo_body("Renew passport", "HOME", "LOW", "TO DO", "2024-04-10")).await;
    let uri = format!("/todos/{}", todo["id"].as_str().unwrap());

    let body = json!({"dueDate": "2024-05-20T17:45:00+02:00", "priority": "HIGH"});
    let response = send(&app, json_request(Method::PUT, &uri, &body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "dueDate Updated");

    let after = body_json(send(&app, get(&uri)).await).await;
    assert_eq!(after["dueDate"], "2024-05-20");
    assert_eq!(after["priority"], "HIGH");
}

#[tokio::test]
async fn update_rejects_invalid_merged_record_without_changes() {
    let app = test_app();
    let before = seed(&app, todo_body("Water plants", "HOME", "LOW", "TO DO", "2024-04-10")).await;
    let uri = format!("/todos/{}", before["id"].as_str().unwrap());

    let body = json!({"priority": "HIGH", "category": "GARDEN"});
    let response = send(&app, json_request(Method::PUT, &uri, &body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid Todo Category");

    let after = body_json(send(&app, get(&uri)).await).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn update_missing_or_empty() {
    let app = test_app();
    let response = send(
        &app,
        json_request(Method::PUT, "/todos/6f9619ff-8b86-d011-b42d-00cf4fc964ff", &json!({"status": "DONE"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let todo = seed(&app, todo_body("Sort mail", "HOME", "LOW", "TO DO", "2024-04-10")).await;
    let uri = format!("/todos/{}", todo["id"].as_str().unwrap());
    for body in [json!({}), json!(["status"])] {
        let response = send(&app, json_request(Method::PUT, &uri, &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid Update Payload");
    }
}

// --- delete ---

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = test_app();
    let todo = seed(&app, todo_body("Cancel gym", "HOME", "LOW", "TO DO", "2024-04-10")).await;
    let uri = format!("/todos/{}", todo["id"].as_str().unwrap());

    let delete = || {
        Request::builder()
            .method(Method::DELETE)
            .uri(&uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = send(&app, delete()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Todo Deleted");

    let response = send(&app, get(&uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, delete()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Todo not found");
}

// --- routing ---

#[tokio::test]
async fn unmatched_paths_and_methods_are_route_not_found() {
    let app = test_app();

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Route not found");

    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/todos/6f9619ff-8b86-d011-b42d-00cf4fc964ff")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Route not found");
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_routes() {
    let app = test_app();
    let todo = seed(&app, todo_body("Slash", "HOME", "LOW", "TO DO", "2024-03-01")).await;
    let id = todo["id"].as_str().unwrap();

    let todos = list(&app, "/").await;
    assert_eq!(todos.len(), 1);

    let response = send(&app, get(&format!("/todos/{}/", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, todo);

    let response = send(&app, get("/todos/agenda/?date=2024-03-01")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use stockroom::{config::Config, create_router, utils::hash_password, AppState};

// ---------------------------------------------------------------------------
// Stub PostgREST upstream: an in-memory table store speaking just enough of
// the PostgREST dialect (eq/is/in filters, return=representation, 409 on
// unique-constraint violations) for the service to run against.
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Stub {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    next_id: Arc<Mutex<i64>>,
}

impl Stub {
    // Seeded fixtures use small explicit ids; allocated ids start well away
    // from them.
    fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1000)),
        }
    }

    fn insert(&self, table: &str, row: Value) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn alloc_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }
}

fn key_column(table: &str) -> Option<&'static str> {
    match table {
        "users" => Some("user_id"),
        "roles" => Some("role_id"),
        "permissions" => Some("permission_id"),
        "menus" => Some("menu_id"),
        "warehouses" => Some("warehouse_id"),
        "zones" => Some("zone_id"),
        "locations" => Some("location_id"),
        "products" => Some("product_id"),
        "product_images" => Some("image_id"),
        "product_metadata" => Some("meta_id"),
        "inventory" => Some("inventory_id"),
        "inventory_transactions" => Some("transaction_id"),
        "transaction_types" => Some("transactiontype_id"),
        _ => None,
    }
}

fn unique_columns(table: &str) -> &'static [&'static [&'static str]] {
    match table {
        "users" => &[&["email"], &["username"]],
        "products" => &[&["sku"]],
        "locations" => &[&["zone_id", "location_code"]],
        "inventory" => &[&["product_id", "location_id", "lot_number"]],
        "role_permissions" => &[&["role_id", "permission_id"]],
        "transaction_types" => &[&["name"]],
        _ => &[],
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(field, spec)| {
        let cell = row.get(field).cloned().unwrap_or(Value::Null);
        if let Some(expected) = spec.strip_prefix("eq.") {
            as_text(&cell) == expected
        } else if let Some(expected) = spec.strip_prefix("is.") {
            as_text(&cell) == expected
        } else if let Some(set) = spec
            .strip_prefix("in.(")
            .and_then(|s| s.strip_suffix(')'))
        {
            set.split(',').any(|candidate| as_text(&cell) == candidate)
        } else {
            // Unknown operator: not used by the service under test.
            false
        }
    })
}

fn violates_unique(table: &str, row: &Value, existing: &[Value]) -> bool {
    unique_columns(table).iter().any(|cols| {
        existing.iter().any(|other| {
            cols.iter()
                .all(|col| as_text(&row[*col]) == as_text(&other[*col]))
        })
    })
}

async fn stub_list(
    State(stub): State<Stub>,
    Path(table): Path<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let rows = stub
        .rows(&table)
        .into_iter()
        .filter(|row| matches(row, &filters))
        .collect();
    Json(Value::Array(rows))
}

async fn stub_create(
    State(stub): State<Stub>,
    Path(table): Path<String>,
    Json(mut row): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    {
        let tables = stub.tables.lock().unwrap();
        let existing = tables.get(&table).map(Vec::as_slice).unwrap_or_default();
        if violates_unique(&table, &row, existing) {
            return Err(StatusCode::CONFLICT);
        }
    }
    if let Some(key) = key_column(&table) {
        if row.get(key).is_none() {
            row[key] = json!(stub.alloc_id());
        }
    }
    stub.insert(&table, row.clone());
    Ok((StatusCode::CREATED, Json(json!([row]))))
}

async fn stub_update(
    State(stub): State<Stub>,
    Path(table): Path<String>,
    Query(filters): Query<Vec<(String, String)>>,
    Json(patch): Json<Value>,
) -> Json<Value> {
    let mut tables = stub.tables.lock().unwrap();
    let mut updated = Vec::new();
    if let Some(rows) = tables.get_mut(&table) {
        for row in rows.iter_mut() {
            if matches(row, &filters) {
                if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in fields {
                        target.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
    }
    Json(Value::Array(updated))
}

async fn stub_delete(
    State(stub): State<Stub>,
    Path(table): Path<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> StatusCode {
    let mut tables = stub.tables.lock().unwrap();
    if let Some(rows) = tables.get_mut(&table) {
        rows.retain(|row| !matches(row, &filters));
    }
    StatusCode::NO_CONTENT
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::new();
    let router = Router::new()
        .route(
            "/:table",
            get(stub_list)
                .post(stub_create)
                .patch(stub_update)
                .delete(stub_delete),
        )
        .with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), stub)
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "rootpass-123";

struct TestApp {
    router: Router,
    stub: Stub,
    images_dir: std::path::PathBuf,
}

async fn test_app() -> TestApp {
    let (base_url, stub) = spawn_stub().await;

    // Admin with every permission plus a role-less viewer.
    let areas = ["users", "rbac", "menus", "warehouses", "products", "inventory"];
    let mut permission_id = 0;
    for area in areas {
        for action in ["read", "write"] {
            permission_id += 1;
            stub.insert(
                "permissions",
                json!({
                    "permission_id": permission_id,
                    "permission_name": format!("{area}:{action}"),
                    "description": null
                }),
            );
            stub.insert(
                "role_permissions",
                json!({"role_id": 1, "permission_id": permission_id}),
            );
        }
    }
    stub.insert(
        "roles",
        json!({"role_id": 1, "role_name": "admin", "description": null}),
    );
    stub.insert(
        "users",
        json!({
            "user_id": 1,
            "username": "root",
            "email": ADMIN_EMAIL,
            "password_hash": hash_password(ADMIN_PASSWORD).unwrap(),
            "role_id": 1,
            "active": true
        }),
    );
    stub.insert(
        "users",
        json!({
            "user_id": 2,
            "username": "viewer",
            "email": "viewer@example.com",
            "password_hash": hash_password("viewerpass-1").unwrap(),
            "role_id": null,
            "active": true
        }),
    );

    let images_dir =
        std::env::temp_dir().join(format!("stockroom-test-{}", Uuid::new_v4()));
    let config = Config {
        postgrest_url: base_url,
        port: 0,
        images_dir: images_dir.to_string_lossy().into_owned(),
        idle_timeout: std::time::Duration::from_secs(900),
        idle_warning: std::time::Duration::from_secs(60),
    };
    TestApp {
        router: create_router(AppState::new(config)),
        stub,
        images_dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value, HeaderMap) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body, headers)
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, _, headers) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {email}");
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_me_and_logout() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body, _) =
        send(&app, json_request("GET", "/api/auth/me", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "root");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "inventory:write"));

    let (status, _, _) =
        send(&app, json_request("POST", "/api/auth/logout", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) =
        send(&app, json_request("GET", "/api/auth/me", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_both_401() {
    let app = test_app().await;
    for (email, password) in [(ADMIN_EMAIL, "wrong-password"), ("nobody@example.com", "x")] {
        let (status, body, _) = send(
            &app,
            json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"email": email, "password": password})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn requests_without_a_session_are_rejected() {
    let app = test_app().await;
    let (status, _, _) = send(&app, json_request("GET", "/api/products", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_less_user_is_forbidden() {
    let app = test_app().await;
    let cookie = login(&app, "viewer@example.com", "viewerpass-1").await;
    let (status, body, _) =
        send(&app, json_request("GET", "/api/products", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn warehouse_zone_location_scenario() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, warehouse, _) = send(
        &app,
        json_request(
            "POST",
            "/api/warehouses",
            Some(&cookie),
            Some(json!({"name": "Main", "address": "1 Rd", "phone": "555"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let warehouse_id = warehouse["warehouse_id"].as_i64().unwrap();

    let (status, zone, _) = send(
        &app,
        json_request(
            "POST",
            "/api/zones",
            Some(&cookie),
            Some(json!({"warehouse_id": warehouse_id, "zone_name": "Receiving"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let zone_id = zone["zone_id"].as_i64().unwrap();

    let location = json!({"zone_id": zone_id, "location_code": "A1", "capacity": 10});
    let (status, _, _) = send(
        &app,
        json_request("POST", "/api/locations", Some(&cookie), Some(location.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same (zone_id, location_code) must surface as a duplicate, not a
    // generic failure.
    let (status, body, _) = send(
        &app,
        json_request("POST", "/api/locations", Some(&cookie), Some(location)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate");
    assert_eq!(body["message"], "location code already exists");

    let (status, body, _) = send(
        &app,
        json_request(
            "GET",
            &format!("/api/locations?zone_id=eq.{zone_id}"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, created, _) = send(
        &app,
        json_request(
            "POST",
            "/api/products",
            Some(&cookie),
            Some(json!({"sku": "TEE-001", "name": "Tee", "category": "tops"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["product_id"].as_i64().unwrap();

    let (_, listed, _) =
        send(&app, json_request("GET", "/api/products", Some(&cookie), None)).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["sku"] == "TEE-001"));

    // Partial update touches only the patched field.
    let (status, updated, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/products/{id}"),
            Some(&cookie),
            Some(json!({"name": "Basic Tee"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Basic Tee");
    assert_eq!(updated["sku"], "TEE-001");
    assert_eq!(updated["category"], "tops");

    // Duplicate SKU is its own error path.
    let (status, body, _) = send(
        &app,
        json_request(
            "POST",
            "/api/products",
            Some(&cookie),
            Some(json!({"sku": "TEE-001", "name": "Other"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate");

    let (status, _, _) = send(
        &app,
        json_request("DELETE", &format!("/api/products/{id}"), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, listed, _) =
        send(&app, json_request("GET", "/api/products", Some(&cookie), None)).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_payload_never_reaches_upstream() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body, _) = send(
        &app,
        json_request(
            "POST",
            "/api/warehouses",
            Some(&cookie),
            Some(json!({"name": ""})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(app.stub.rows("warehouses").is_empty());
}

#[tokio::test]
async fn empty_update_is_a_validation_error() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, warehouse, _) = send(
        &app,
        json_request(
            "POST",
            "/api/warehouses",
            Some(&cookie),
            Some(json!({"name": "Annex"})),
        ),
    )
    .await;
    let id = warehouse["warehouse_id"].as_i64().unwrap();

    // A patch with no fields (or only unrecognized ones) must fail fast as
    // a validation error instead of being forwarded as `{}`.
    for patch in [json!({}), json!({"bogus": 1})] {
        let (status, body, _) = send(
            &app,
            json_request(
                "PATCH",
                &format!("/api/warehouses/{id}"),
                Some(&cookie),
                Some(patch),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
    assert_eq!(app.stub.rows("warehouses")[0]["name"], "Annex");
}

#[tokio::test]
async fn created_users_are_hashed_and_sanitized() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, created, _) = send(
        &app,
        json_request(
            "POST",
            "/api/users",
            Some(&cookie),
            Some(json!({
                "username": "amara",
                "email": "amara@example.com",
                "password": "amara-secret-1",
                "role_id": 1
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password_hash").is_none());
    assert!(created.get("password").is_none());

    // Upstream stored a bcrypt hash, not the plaintext.
    let stored = &app.stub.rows("users")[2];
    let hash = stored["password_hash"].as_str().unwrap();
    assert!(hash.starts_with("$2"));
    assert_ne!(hash, "amara-secret-1");

    // And the new user can actually log in through the same stack.
    let (_, listed, _) =
        send(&app, json_request("GET", "/api/users", Some(&cookie), None)).await;
    for row in listed.as_array().unwrap() {
        assert!(row.get("password_hash").is_none());
    }
    login(&app, "amara@example.com", "amara-secret-1").await;
}

#[tokio::test]
async fn menu_cycles_are_rejected() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let mut ids = Vec::new();
    let mut parent: Option<i64> = None;
    for name in ["Catalog", "Products", "Images"] {
        let (status, menu, _) = send(
            &app,
            json_request(
                "POST",
                "/api/menus",
                Some(&cookie),
                Some(json!({"menu_name": name, "parent_menu_id": parent, "order_index": 0})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = menu["menu_id"].as_i64().unwrap();
        ids.push(id);
        parent = Some(id);
    }

    // Reparenting the root under its grandchild closes a loop.
    let (status, body, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/menus/{}", ids[0]),
            Some(&cookie),
            Some(json!({"parent_menu_id": ids[2]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("cycle"));

    // A legal reparent still works.
    let (status, _, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/menus/{}", ids[2]),
            Some(&cookie),
            Some(json!({"parent_menu_id": ids[0]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn transactions_audit_without_touching_on_hand() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, inventory, _) = send(
        &app,
        json_request(
            "POST",
            "/api/inventory",
            Some(&cookie),
            Some(json!({
                "product_id": 1,
                "location_id": 1,
                "lot_number": "LOT-7",
                "quantity_on_hand": 40
            })),
        ),
    )
    .await;
    let inventory_id = inventory["inventory_id"].as_i64().unwrap();

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/transaction-types",
            Some(&cookie),
            Some(json!({"name": "RECEIPT"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Unknown type name is a validation error, not an upstream error.
    let (status, body, _) = send(
        &app,
        json_request(
            "POST",
            "/api/inventory-transactions",
            Some(&cookie),
            Some(json!({
                "inventory_id": inventory_id,
                "transaction_type": "TELEPORT",
                "quantity_change": 5
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, tx, _) = send(
        &app,
        json_request(
            "POST",
            "/api/inventory-transactions",
            Some(&cookie),
            Some(json!({
                "inventory_id": inventory_id,
                "transaction_type": "RECEIPT",
                "quantity_change": 5,
                "reference_id": "PO-1001"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["quantity_change"], 5);

    // The audit row does not reconcile the inventory record.
    let (_, rows, _) = send(
        &app,
        json_request(
            "GET",
            &format!("/api/inventory?inventory_id=eq.{inventory_id}"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(rows[0]["quantity_on_hand"], 40);
}

#[tokio::test]
async fn primary_image_reassignment_is_one_request() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, product, _) = send(
        &app,
        json_request(
            "POST",
            "/api/products",
            Some(&cookie),
            Some(json!({"sku": "TEE-002", "name": "Tee"})),
        ),
    )
    .await;
    let product_id = product["product_id"].as_i64().unwrap();

    let mut image_ids = Vec::new();
    for (url, primary) in [("/images/a.png", true), ("/images/b.png", false)] {
        let (status, image, _) = send(
            &app,
            json_request(
                "POST",
                "/api/product-images",
                Some(&cookie),
                Some(json!({
                    "product_id": product_id,
                    "image_url": url,
                    "is_primary": primary
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        image_ids.push(image["image_id"].as_i64().unwrap());
    }

    let (status, updated, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/products/{product_id}/images/{}/primary", image_ids[1]),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_primary"], true);

    let primaries: Vec<i64> = app
        .stub
        .rows("product_images")
        .iter()
        .filter(|row| row["is_primary"] == true)
        .map(|row| row["image_id"].as_i64().unwrap())
        .collect();
    assert_eq!(primaries, vec![image_ids[1]]);

    // Unrelated image id under this product is a 404, nothing cleared.
    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/products/{product_id}/images/9999/primary"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_then_serve_round_trip() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let boundary = "stockroom-test-boundary";
    let png = [0x89u8, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"shelf photo.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads")
        .header(header::COOKIE, &cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, uploaded, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let path = uploaded["path"].as_str().unwrap().to_string();
    assert!(path.starts_with("/images/"));
    assert!(path.ends_with(".png"));
    assert!(!path.contains(' '));

    let response = app
        .router
        .clone()
        .oneshot(json_request("GET", &path, None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "image/png"
    );
    assert_eq!(
        response.headers()[header::CACHE_CONTROL].to_str().unwrap(),
        "public, max-age=31536000, immutable"
    );
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(served.as_ref(), &png);

    // Traversal attempts never reach the filesystem.
    let (status, _, _) = send(
        &app,
        json_request("GET", "/images/..%2F..%2Fetc%2Fpasswd", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(&app.images_dir);
}

#[tokio::test]
async fn role_permission_assignment_lifecycle() {
    let app = test_app().await;
    let cookie = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, role, _) = send(
        &app,
        json_request(
            "POST",
            "/api/roles",
            Some(&cookie),
            Some(json!({"role_name": "clerk"})),
        ),
    )
    .await;
    let role_id = role["role_id"].as_i64().unwrap();

    let assignment = json!({"role_id": role_id, "permission_id": 1});
    let (status, _, _) = send(
        &app,
        json_request("POST", "/api/role-permissions", Some(&cookie), Some(assignment.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Composite key: the same pair is a duplicate.
    let (status, body, _) = send(
        &app,
        json_request("POST", "/api/role-permissions", Some(&cookie), Some(assignment)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate");

    let (status, _, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/role-permissions/{role_id}/1"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, listed, _) = send(
        &app,
        json_request(
            "GET",
            &format!("/api/role-permissions?role_id=eq.{role_id}"),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
}

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::build_router;
use crate::app_system::StorefrontSystem;
use crate::config::{AdminSeed, Secret, StorefrontConfig};

struct TestServer {
    addr: std::net::SocketAddr,
    system: StorefrontSystem,
}

async fn spawn_server() -> TestServer {
    let config = StorefrontConfig {
        jwt_secret: Some(Secret::new("http-test-secret")),
        admin: Some(AdminSeed {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: Secret::new("admin-password"),
        }),
        ..StorefrontConfig::default()
    };
    let system = StorefrontSystem::new(&config);
    system.seed(&config).await.expect("seed");
    let app = build_router(system.app_state());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    TestServer { addr, system }
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (u16, Value) {
    let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect server");
    let body = body.map(|b| b.to_string()).unwrap_or_default();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    if !body.is_empty() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    stream.write_all(req.as_bytes()).await.expect("write request");

    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read response");
    let (head, body) = response.split_once("\r\n\r\n").expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    let json = serde_json::from_str(body).unwrap_or(Value::Null);
    (status, json)
}

impl TestServer {
    async fn call(&self, method: &str, path: &str, token: Option<&str>, body: Option<Value>) -> (u16, Value) {
        let bearer = token.map(|t| format!("Bearer {t}"));
        let headers: Vec<(&str, &str)> = bearer
            .as_deref()
            .map(|value| vec![("Authorization", value)])
            .unwrap_or_default();
        send_raw(self.addr, method, path, &headers, body).await
    }

    async fn login(&self, login: &str, password: &str) -> String {
        let (status, body) = self
            .call("POST", "/auth/login", None, Some(json!({ "login": login, "password": password })))
            .await;
        assert_eq!(status, 200, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    async fn customer(&self, username: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "customer-pass"
                })),
            )
            .await;
        assert_eq!(status, 201, "register failed: {body}");
        assert!(body.get("password_hash").is_none());
        self.login(username, "customer-pass").await
    }

    async fn product(&self, admin: &str, body: Value) -> String {
        let (status, body) = self.call("POST", "/products", Some(admin), Some(body)).await;
        assert_eq!(status, 201, "create product failed: {body}");
        body["id"].as_str().expect("id").to_string()
    }
}

#[tokio::test]
async fn test_health() {
    let server = spawn_server().await;
    let (status, body) = server.call("GET", "/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_is_localized_and_counts_views() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin-password").await;
    let id = server
        .product(
            &admin,
            json!({
                "name": { "en": "Scarf", "ar": "وشاح" },
                "price": "49.90",
                "stock": 4,
                "category_id": "accessories"
            }),
        )
        .await;
    server
        .product(&admin, json!({ "name": { "en": "Abaya" }, "price": 250, "stock": 1 }))
        .await;

    let (status, body) = server.call("GET", "/products?lang=ar&category=accessories", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "وشاح");

    let (_, body) = send_raw(server.addr, "GET", "/products", &[("Accept-Language", "ar-EG,ar;q=0.9")], None).await;
    assert_eq!(body[1]["name"], "Abaya");

    server.call("GET", &format!("/products/{id}"), None, None).await;
    let (status, body) = server.call("GET", &format!("/products/{id}?lang=en"), None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Scarf");
    assert_eq!(body["views"], 2);

    let (status, body) = server.call("GET", "/products/product_404", None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_place_order_over_http() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin-password").await;
    let scarf = server
        .product(&admin, json!({ "name": { "en": "Scarf" }, "price": 100, "stock": 5 }))
        .await;
    let layla = server.customer("layla").await;
    let omar = server.customer("omar").await;

    let order = json!({
        "items": [{ "product_id": scarf, "quantity": 3 }],
        "shipping": {
            "full_name": "Layla Hassan",
            "phone": "+966 500 000 000",
            "address_line1": "King Fahd Rd",
            "city": "Riyadh",
            "country": "SA"
        }
    });
    let (status, body) = server.call("POST", "/orders", Some(&layla), Some(order)).await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["total_price"], "300");
    let order_id = body["id"].as_str().expect("order id").to_string();

    let (_, product) = server.call("GET", &format!("/products/{scarf}"), None, None).await;
    assert_eq!(product["stock"], 2);

    let too_many = json!({ "items": [{ "product_id": scarf, "quantity": 5 }] });
    let (status, body) = server.call("POST", "/orders", Some(&layla), Some(too_many)).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");

    let unknown = json!({ "items": [{ "product_id": "product_404", "quantity": 1 }] });
    let (status, _) = server.call("POST", "/orders", Some(&layla), Some(unknown)).await;
    assert_eq!(status, 404);

    let (status, _) = server
        .call("POST", "/orders", Some(&layla), Some(json!({ "items": [] })))
        .await;
    assert_eq!(status, 400);

    let (status, body) = server.call("GET", "/orders", Some(&layla), None).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = server.call("GET", &format!("/orders/{order_id}"), Some(&omar), None).await;
    assert_eq!(status, 404);
    let (status, body) = server.call("GET", "/orders", Some(&omar), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_admin_routes_need_the_admin_role() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin-password").await;
    let customer = server.customer("sara").await;
    let new_product = json!({ "name": { "en": "Ring" }, "price": 10, "stock": 1 });

    let (status, body) = server.call("POST", "/products", None, Some(new_product.clone())).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, body) = server.call("POST", "/products", Some(&customer), Some(new_product)).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = server.call("GET", "/orders/admin", Some(&customer), None).await;
    assert_eq!(status, 403);
    let (status, _) = server.call("GET", "/orders/admin", Some(&admin), None).await;
    assert_eq!(status, 200);

    let mut chars: Vec<char> = customer.chars().collect();
    let i = chars.len() - 5;
    chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();
    let (status, _) = server.call("GET", "/cart", Some(&tampered), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_status_update_by_admin() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin-password").await;
    let scarf = server
        .product(&admin, json!({ "name": { "en": "Scarf" }, "price": 100, "stock": 5 }))
        .await;
    let customer = server.customer("nour").await;
    let (_, order) = server
        .call(
            "POST",
            "/orders",
            Some(&customer),
            Some(json!({ "items": [{ "product_id": scarf, "quantity": 1 }] })),
        )
        .await;
    let path = format!("/orders/{}/status", order["id"].as_str().expect("order id"));

    let (status, body) = server
        .call("PATCH", &path, Some(&admin), Some(json!({ "status": "shipped" })))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "shipped");

    let (status, _) = server
        .call("PATCH", &path, Some(&customer), Some(json!({ "status": "delivered" })))
        .await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn test_cart_over_http() {
    let server = spawn_server().await;
    let admin = server.login("admin", "admin-password").await;
    let scarf = server
        .product(&admin, json!({ "name": { "en": "Scarf" }, "price": 100, "stock": 5 }))
        .await;
    let customer = server.customer("huda").await;

    let add = json!({ "product_id": scarf, "size": "M" });
    let (status, body) = server.call("POST", "/cart", Some(&customer), Some(add.clone())).await;
    assert_eq!(status, 201);
    assert_eq!(body["quantity"], 1);
    let (_, body) = server.call("POST", "/cart", Some(&customer), Some(add)).await;
    assert_eq!(body["quantity"], 2);

    let item = format!("/cart/{scarf}");
    let (status, body) = server
        .call("PATCH", &item, Some(&customer), Some(json!({ "quantity": 4 })))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["quantity"], 4);
    let (status, _) = server
        .call("PATCH", &item, Some(&customer), Some(json!({ "quantity": 0 })))
        .await;
    assert_eq!(status, 400);

    let (_, body) = server.call("GET", "/cart", Some(&customer), None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = server.call("DELETE", &item, Some(&customer), None).await;
    assert_eq!(status, 204);
    let (status, body) = server.call("DELETE", "/cart", Some(&customer), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn test_password_reset_over_http() {
    let server = spawn_server().await;
    server.customer("rania").await;

    let (status, _) = server
        .call("POST", "/auth/forgot-password", None, Some(json!({ "email": "nobody@example.com" })))
        .await;
    assert_eq!(status, 200);

    let reset = server
        .system
        .accounts
        .forgot_password(crate::domain::ForgotPasswordRequest {
            email: "rania@example.com".into(),
        })
        .await
        .expect("forgot password")
        .expect("reset token");
    let body = json!({ "token": reset.token, "new_password": "fresh-password" });
    let (status, _) = server.call("POST", "/auth/reset-password", None, Some(body.clone())).await;
    assert_eq!(status, 200);
    let (status, _) = server.call("POST", "/auth/reset-password", None, Some(body)).await;
    assert_eq!(status, 400);

    server.login("rania", "fresh-password").await;
    let (status, body) = server
        .call(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "login": "rania", "password": "customer-pass" })),
        )
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

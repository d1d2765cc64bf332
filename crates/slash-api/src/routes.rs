use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::shortcuts;

/// All API routes. Everything except register/login requires a bearer token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/v2/auth/register", post(auth::register))
        .route("/api/v2/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/v2/shortcuts",
            get(shortcuts::list_shortcuts).post(shortcuts::create_shortcut),
        )
        .route(
            "/api/v2/shortcuts/{name}",
            get(shortcuts::get_shortcut)
                .patch(shortcuts::update_shortcut)
                .delete(shortcuts::delete_shortcut),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use slash_db::Database;

    use super::*;
    use crate::auth::AppStateInner;

    fn app() -> Router {
        let state = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "test-secret".to_string(),
        });
        router(state)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/v2/auth/register",
            None,
            Some(json!({ "email": email, "nickname": email, "password": "correct horse" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    fn names(body: &Value) -> Vec<&str> {
        body["shortcuts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn shortcuts_require_token() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/v2/shortcuts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthenticated");

        let (status, _) = send(&app, "GET", "/api/v2/shortcuts", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_after_register() {
        let app = app();
        register(&app, "admin@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v2/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "correct horse" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "ADMIN");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v2/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "wrong password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn private_shortcut_lifecycle() {
        let app = app();
        let admin = register(&app, "admin@example.com").await;
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v2/shortcuts",
            Some(alice.as_str()),
            Some(json!({ "name": "go", "link": "https://go.dev", "visibility": "PRIVATE" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["shortcut"]["og_metadata"]["title"], "");

        let (_, body) = send(&app, "GET", "/api/v2/shortcuts", Some(alice.as_str()), None).await;
        assert_eq!(names(&body), vec!["go"]);
        let (_, body) = send(&app, "GET", "/api/v2/shortcuts", Some(bob.as_str()), None).await;
        assert!(names(&body).is_empty());

        let (status, _) = send(&app, "GET", "/api/v2/shortcuts/go", Some(bob.as_str()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            "PATCH",
            "/api/v2/shortcuts/go",
            Some(bob.as_str()),
            Some(json!({ "link": "https://evil.example", "update_mask": ["link"] })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            "PATCH",
            "/api/v2/shortcuts/go",
            Some(alice.as_str()),
            Some(json!({ "title": "Go" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "PATCH",
            "/api/v2/shortcuts/go",
            Some(admin.as_str()),
            Some(json!({ "visibility": "PUBLIC", "update_mask": ["visibility"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shortcut"]["visibility"], "PUBLIC");
        assert_eq!(body["shortcut"]["link"], "https://go.dev");

        let (_, body) = send(&app, "GET", "/api/v2/shortcuts", Some(bob.as_str()), None).await;
        assert_eq!(names(&body), vec!["go"]);

        let uri = "/api/v2/shortcuts/go";
        let (status, _) = send(&app, "DELETE", uri, Some(bob.as_str()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "DELETE", uri, Some(alice.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", uri, Some(alice.as_str()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let app = app();
        let alice = register(&app, "alice@example.com").await;
        let shortcut = json!({ "name": "docs", "link": "https://docs.rs" });
        let token = Some(alice.as_str());
        let uri = "/api/v2/shortcuts";

        let (status, _) = send(&app, "POST", uri, token, Some(shortcut.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&app, "POST", uri, token, Some(shortcut)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_bodies_get_json_errors() {
        let app = app();
        let alice = register(&app, "alice@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v2/shortcuts",
            Some(alice.as_str()),
            Some(json!({ "name": "go", "link": "https://go.dev", "creator_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("creator_id"));

        let (status, body) = send(
            &app,
            "PATCH",
            "/api/v2/shortcuts/go",
            Some(alice.as_str()),
            Some(json!({ "update_mask": "title" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(
            &app,
            "POST",
            "/api/v2/auth/login",
            None,
            Some(json!({ "email": "alice@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

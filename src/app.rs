use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{auth, profiles};

pub fn build_app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(60)));

    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(profiles::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn guarded_route_rejects_without_session() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/get-username")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // Errors ride in the body, not the status code.
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json, serde_json::json!({"error": "not-logged-in"}));
    }

    #[tokio::test]
    async fn verify_otp_without_pending_otp_is_invalid() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json("/api/verify-otp", r#"{"otp":"12345"}"#))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["error"], "invalid");
        assert_eq!(json["errMsg"], "Invalid OTP.");
    }

    #[tokio::test]
    async fn register_with_mismatched_otp_is_rejected() {
        let app = build_app(AppState::fake());
        let body = r#"{
            "otp": "00000",
            "data": {
                "username": "ada",
                "email": "ada@example.com",
                "password": "hunter22",
                "phone": null,
                "interests": []
            }
        }"#;
        let res = app.oneshot(post_json("/api/register", body)).await.unwrap();
        let json = body_json(res).await;
        assert_eq!(json["error"], "invalid");
        assert_eq!(json["errMsg"], "Invalid OTP.");
    }

    #[tokio::test]
    async fn change_password_without_verified_otp_is_refused() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json("/api/change-password", r#"{"password":"new-pass"}"#))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["error"], "generic");
        assert_eq!(json["errMsg"], "Invalid request. OTP not validated");
    }

    #[tokio::test]
    async fn reset_otp_flow_verifies_and_grant_is_single_use() {
        let app = build_app(AppState::fake());

        // Request a reset OTP; the fake state issues "12345".
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/otp-request?email=ada@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let cookie = res
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let json = body_json(res).await;
        assert_eq!(json, serde_json::json!({"result": "sent"}));

        // Matching OTP flips otpVerified.
        let mut req = post_json("/api/verify-otp", r#"{"otp":"12345"}"#);
        req.headers_mut()
            .insert(axum::http::header::COOKIE, cookie.parse().unwrap());
        let res = app.clone().oneshot(req).await.unwrap();
        let json = body_json(res).await;
        assert_eq!(json, serde_json::json!({"result": "valid"}));

        // First change attempt consumes the grant even though the write
        // fails (no database behind the fake state).
        let mut req = post_json("/api/change-password", r#"{"password":"next-pass"}"#);
        req.headers_mut()
            .insert(axum::http::header::COOKIE, cookie.parse().unwrap());
        let res = app.clone().oneshot(req).await.unwrap();
        let json = body_json(res).await;
        assert_eq!(json["error"], "generic");

        // Replay without re-verifying is refused.
        let mut req = post_json("/api/change-password", r#"{"password":"next-pass"}"#);
        req.headers_mut()
            .insert(axum::http::header::COOKIE, cookie.parse().unwrap());
        let res = app.clone().oneshot(req).await.unwrap();
        let json = body_json(res).await;
        assert_eq!(json["errMsg"], "Invalid request. OTP not validated");
    }

    #[tokio::test]
    async fn logout_always_succeeds() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json, serde_json::json!({"result": "logged-out"}));
    }
}

//! HTTP-level tests for the Identity Toolkit client.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::toolkit::classify_error;
use super::*;
use crate::AccountError;

fn client_for(server: &MockServer) -> IdentityToolkitClient {
    IdentityToolkitClient::new(IdentityToolkitConfig::new("web-key").with_base_url(server.uri()))
        .unwrap()
}

fn session() -> AuthSession {
    AuthSession {
        uid: "u1".into(),
        id_token: "old-token".into(),
        email: "ada@example.com".into(),
        display_name: Some("Ada".into()),
    }
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": { "code": 400, "message": message, "errors": [] } })
}

#[tokio::test]
async fn sign_up_posts_credentials_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:signUp"))
        .and(query_param("key", "web-key"))
        .and(body_partial_json(json!({
            "email": "ada@example.com",
            "password": "secret1",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "idToken": "tok",
            "email": "ada@example.com",
            "refreshToken": "r",
            "expiresIn": "3600"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_up("ada@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(session.uid, "u1");
    assert_eq!(session.id_token, "tok");
    assert!(session.display_name.is_none());
}

#[tokio::test]
async fn sign_in_returns_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "idToken": "tok",
            "email": "ada@example.com",
            "displayName": "Ada",
            "registered": true
        })))
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_in("ada@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(session.display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("INVALID_LOGIN_CREDENTIALS")))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .sign_in("ada@example.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(err, AccountError::InvalidCredentials);
}

#[tokio::test]
async fn display_name_update_keeps_token_when_none_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:update"))
        .and(body_partial_json(json!({ "idToken": "old-token", "displayName": "Ada L." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "email": "ada@example.com",
            "displayName": "Ada L."
        })))
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .update_display_name(&session(), "Ada L.")
        .await
        .unwrap();
    assert_eq!(updated.id_token, "old-token");
    assert_eq!(updated.display_name.as_deref(), Some("Ada L."));
}

#[tokio::test]
async fn password_update_rotates_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts:update"))
        .and(body_partial_json(json!({ "idToken": "old-token", "password": "newpass1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "email": "ada@example.com",
            "idToken": "new-token"
        })))
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .update_password(&session(), "newpass1")
        .await
        .unwrap();
    assert_eq!(updated.id_token, "new-token");
    assert_eq!(updated.display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let client = IdentityToolkitClient::new(
        IdentityToolkitConfig::new("k").with_base_url("http://127.0.0.1:1"),
    )
    .unwrap();
    let err = client.sign_in("a@b.c", "x").await.unwrap_err();
    assert!(matches!(err, AccountError::Network(_)));
}

#[test]
fn error_codes_map_to_variants() {
    assert_eq!(classify_error(400, &error_body("EMAIL_EXISTS").to_string()), AccountError::EmailInUse);
    assert!(matches!(
        classify_error(400, &error_body("WEAK_PASSWORD : Password should be at least 6 characters").to_string()),
        AccountError::WeakPassword(_)
    ));
    assert_eq!(
        classify_error(400, &error_body("TOO_MANY_ATTEMPTS_TRY_LATER : Try again later.").to_string()),
        AccountError::RateLimited
    );
    assert_eq!(
        classify_error(400, &error_body("CREDENTIAL_TOO_OLD_LOGIN_AGAIN").to_string()),
        AccountError::SessionExpired
    );
    assert_eq!(
        classify_error(500, "not json"),
        AccountError::Provider { status: 500, message: "HTTP 500".into() }
    );
    assert_eq!(
        classify_error(400, &error_body("OPERATION_NOT_ALLOWED").to_string()),
        AccountError::Provider { status: 400, message: "OPERATION_NOT_ALLOWED".into() }
    );
}

#[test]
fn debug_redacts_secrets() {
    let text = format!("{:?}", session());
    assert!(!text.contains("old-token"));
    let text = format!("{:?}", IdentityToolkitConfig::new("web-key"));
    assert!(!text.contains("web-key"));
}

#[tokio::test]
async fn memory_provider_round_trip() {
    let provider = MemoryIdentityProvider::new();
    let created = provider.sign_up("Ada@Example.com", "secret1").await.unwrap();
    assert_eq!(
        provider.sign_up("ada@example.com", "secret2").await.unwrap_err(),
        AccountError::EmailInUse
    );

    let signed_in = provider.sign_in("ada@example.com", "secret1").await.unwrap();
    assert_eq!(signed_in.uid, created.uid);
    assert_eq!(
        provider.sign_in("ada@example.com", "wrong").await.unwrap_err(),
        AccountError::InvalidCredentials
    );

    let renamed = provider.update_display_name(&signed_in, "Ada").await.unwrap();
    provider.update_password(&renamed, "secret9").await.unwrap();
    assert!(provider.sign_in("ada@example.com", "secret9").await.is_ok());
}

use chrono::Utc;
use dewey::config::{self, Credentials};
use dewey::management::TokenManager;
use dewey::spotify::auth::{authorization_url, callback_endpoint};
use dewey::types::Token;
use dewey::utils::*;
use reqwest::Url;

fn test_credentials() -> Credentials {
    Credentials {
        client_id: "client-123".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost:8888/callback".to_string(),
    }
}

// Helper function to create a test token
fn create_test_token(scope: &str, obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: scope.to_string(),
        expires_in,
        obtained_at,
    }
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_cache_key() {
    let key = cache_key("client-123");

    // 8 bytes as lowercase hex
    assert_eq!(key.len(), 16);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(key, cache_key("client-123"));
    assert_ne!(key, cache_key("client-456"));
}

#[test]
fn test_covers_scopes() {
    assert!(covers_scopes(
        "user-library-modify user-library-read user-follow-modify",
        config::SPOTIFY_SCOPE
    ));
    assert!(!covers_scopes("user-library-read", config::SPOTIFY_SCOPE));
    assert!(!covers_scopes("", config::SPOTIFY_SCOPE));
    assert!(covers_scopes("anything", ""));
}

#[test]
fn test_callback_endpoint() {
    let url = Url::parse("http://localhost:8888/callback").unwrap();
    let (addr, path) = callback_endpoint(&url).unwrap();
    assert_eq!(addr, "127.0.0.1:8888");
    assert_eq!(path, "/callback");

    let url = Url::parse("http://127.0.0.1/").unwrap();
    let (addr, path) = callback_endpoint(&url).unwrap();
    assert_eq!(addr, "127.0.0.1:80");
    assert_eq!(path, "/");
}

#[test]
fn test_authorization_url() {
    let credentials = test_credentials();
    let url = authorization_url(&credentials, "state-xyz").unwrap();

    let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    assert_eq!(get("client_id").as_deref(), Some("client-123"));
    assert_eq!(get("response_type").as_deref(), Some("code"));
    assert_eq!(
        get("redirect_uri").as_deref(),
        Some("http://localhost:8888/callback")
    );
    assert_eq!(get("state").as_deref(), Some("state-xyz"));
    assert_eq!(get("scope").as_deref(), Some(config::SPOTIFY_SCOPE));
}

#[test]
fn test_token_expiry() {
    let now = Utc::now().timestamp() as u64;

    let fresh = TokenManager::new(create_test_token("", now, 3600), test_credentials());
    assert!(!fresh.is_expired());

    // Within the four minute buffer
    let nearly = TokenManager::new(create_test_token("", now - 3400, 3600), test_credentials());
    assert!(nearly.is_expired());

    let short_lived = TokenManager::new(create_test_token("", now, 60), test_credentials());
    assert!(short_lived.is_expired());
}

#[test]
fn test_token_scope_check() {
    let now = Utc::now().timestamp() as u64;

    let full = TokenManager::new(
        create_test_token(config::SPOTIFY_SCOPE, now, 3600),
        test_credentials(),
    );
    assert!(full.has_scope());

    let partial = TokenManager::new(
        create_test_token("user-library-read", now, 3600),
        test_credentials(),
    );
    assert!(!partial.has_scope());
}

#[test]
fn test_token_path_depends_on_client() {
    let a = TokenManager::token_path("client-a");
    let b = TokenManager::token_path("client-b");

    assert_ne!(a, b);
    assert!(a.starts_with(config::data_dir()));
}

#[tokio::test]
async fn test_token_cache_roundtrip() {
    let path = std::env::temp_dir().join(format!(
        "dewey-token-test-{}/token.json",
        std::process::id()
    ));
    let token = create_test_token(config::SPOTIFY_SCOPE, 1_700_000_000, 3600);

    TokenManager::new(token, test_credentials())
        .with_path(&path)
        .persist()
        .await
        .unwrap();

    let loaded = TokenManager::load_from(test_credentials(), &path)
        .await
        .unwrap();
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();

    assert_eq!(loaded.current_token().access_token, "access");
    assert_eq!(loaded.current_token().obtained_at, 1_700_000_000);
    assert!(loaded.has_scope());
}

#[tokio::test]
async fn test_token_cache_missing_file() {
    let result = TokenManager::load_from(test_credentials(), "/definitely/not/here/token.json").await;
    assert!(result.is_err());
}

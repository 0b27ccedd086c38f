//! Startup verification against a mock identity provider.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use feed_shell::auth::discovery::{fetch_configuration, verify, DiscoveryError};
use feed_shell::auth::{spawn_verification, AuthBootstrap, AuthStatus, BootstrapError};

mod common;

fn bootstrap_against(base: &str) -> Arc<AuthBootstrap> {
    let mut config = common::auth_config();
    config.endpoint = Some(base.to_string());
    config.verify_on_startup = true;
    config.discovery_timeout_secs = 2;

    let bootstrap = Arc::new(AuthBootstrap::new());
    bootstrap.initialize(&config).unwrap();
    bootstrap
}

#[tokio::test]
async fn test_verification_settles_ready() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move |addr| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, common::discovery_document(&format!("http://{addr}")))
        }
    })
    .await;

    let bootstrap = bootstrap_against(&format!("http://{addr}"));
    assert_eq!(bootstrap.status(), AuthStatus::Pending);
    assert_eq!(bootstrap.ready_context(), Err(BootstrapError::NotSettled));

    let handle = spawn_verification(bootstrap.clone(), reqwest::Client::new());
    let status = tokio::time::timeout(Duration::from_secs(5), bootstrap.settled())
        .await
        .expect("bootstrap never settled");
    handle.await.unwrap();

    assert_eq!(status, AuthStatus::Ready);
    assert!(bootstrap.ready_context().is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_document_fields_are_returned() {
    let addr = common::start_programmable_backend(|addr| async move {
        (200, common::discovery_document(&format!("http://{addr}")))
    })
    .await;
    let base = format!("http://{addr}");
    let bootstrap = bootstrap_against(&base);
    let context = bootstrap.context().unwrap();

    let document = fetch_configuration(&reqwest::Client::new(), &context, Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(document.issuer, format!("{base}/{}", common::POOL_ID));
    assert_eq!(document.jwks_uri, context.jwks_uri().as_str());
    assert_eq!(
        document.token_endpoint.as_deref(),
        Some(format!("{base}/oauth2/token").as_str())
    );
}

#[tokio::test]
async fn test_issuer_mismatch_fails_bootstrap() {
    let addr = common::start_programmable_backend(|_| async {
        (200, common::discovery_document("https://elsewhere.example.com"))
    })
    .await;
    let bootstrap = bootstrap_against(&format!("http://{addr}"));

    let document = verify(&bootstrap, &reqwest::Client::new()).await;
    assert!(document.is_none());

    match bootstrap.status() {
        AuthStatus::Failed(reason) => assert!(reason.contains("issuer mismatch"), "{reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(matches!(bootstrap.ready_context(), Err(BootstrapError::Failed(_))));
}

#[tokio::test]
async fn test_error_status_fails_bootstrap() {
    let addr = common::start_programmable_backend(|_| async {
        (503, r#"{"message":"unavailable"}"#.to_string())
    })
    .await;
    let bootstrap = bootstrap_against(&format!("http://{addr}"));
    let context = bootstrap.context().unwrap();

    let result =
        fetch_configuration(&reqwest::Client::new(), &context, Duration::from_secs(2)).await;
    assert!(matches!(result, Err(DiscoveryError::Status(503))));

    verify(&bootstrap, &reqwest::Client::new()).await;
    assert_eq!(
        bootstrap.status(),
        AuthStatus::Failed("discovery returned status 503".into())
    );
}

#[tokio::test]
async fn test_unreachable_provider_fails_without_retry() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bootstrap = bootstrap_against(&format!("http://{addr}"));
    verify(&bootstrap, &reqwest::Client::new()).await;

    let status = bootstrap.status();
    assert_eq!(status.label(), "failed");
    assert!(status.to_string().contains("discovery request failed"));

    // Settled for good: a later success does not flip it.
    bootstrap.settle(Ok(()));
    assert_eq!(bootstrap.status().label(), "failed");
}

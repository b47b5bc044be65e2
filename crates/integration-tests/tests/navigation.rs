//! Staging gate and route guard through the public `AppState` API.
//!
//! These tests need no backend: they exercise decisions that are made before
//! any request, or against a backend address that refuses connections.

#![allow(clippy::unwrap_used)]

use newtab_client::Navigation;
use newtab_client::storage::{ClientStorage, FileStorage, keys};
use newtab_core::Route;
use newtab_integration_tests::TestContext;
use url::Url;

const STAGING_PASSWORD: &str = "tB7!kq2#Lw9zR";

#[tokio::test]
async fn test_signed_out_navigation() {
    let ctx = TestContext::new("signed-out");
    let mut state = ctx.open().unwrap();

    assert_eq!(state.navigate(Route::Home).await, Navigation::Allow);
    assert_eq!(state.navigate(Route::Plans).await, Navigation::Allow);
    assert_eq!(state.navigate(Route::Login).await, Navigation::Allow);
    assert_eq!(
        state.navigate(Route::Settings).await,
        Navigation::Redirect(Route::Login)
    );
    assert_eq!(
        state.navigate(Route::Confirm).await,
        Navigation::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_staging_flag_survives_restart() {
    let ctx = TestContext::new("staging").with_staging(STAGING_PASSWORD);

    let mut state = ctx.open().unwrap();
    assert_eq!(
        state.navigate(Route::Home).await,
        Navigation::Redirect(Route::StagingLogin)
    );
    assert_eq!(state.navigate(Route::StagingLogin).await, Navigation::Allow);
    assert!(state.staging().login("wrong-password").is_err());
    state.staging().login(STAGING_PASSWORD).unwrap();
    drop(state);

    let mut state = ctx.open().unwrap();
    assert!(state.staging().is_unlocked());
    assert_eq!(state.navigate(Route::Home).await, Navigation::Allow);
}

#[tokio::test]
async fn test_unreachable_backend_logs_out() {
    let mut ctx = TestContext::new("unreachable");
    ctx.config.api_base_url = Url::parse("http://127.0.0.1:9").unwrap();
    FileStorage::new(&ctx.config.storage_path)
        .set(keys::TOKEN, "tok_stale")
        .unwrap();

    let mut state = ctx.open().unwrap();
    assert!(state.session().is_authenticated());
    assert_eq!(
        state.navigate(Route::Settings).await,
        Navigation::Redirect(Route::Login)
    );

    assert!(!state.session().is_authenticated());
    assert!(!state.user().is_loaded());
    assert_eq!(
        FileStorage::new(&ctx.config.storage_path)
            .get(keys::TOKEN)
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_truncated_storage_opens_signed_out() {
    let ctx = TestContext::new("truncated");
    std::fs::create_dir_all(ctx.config.storage_path.parent().unwrap()).unwrap();
    std::fs::write(&ctx.config.storage_path, r#"{"token": "tok_"#).unwrap();

    let mut state = ctx.open().unwrap();
    assert!(!state.session().is_authenticated());
    assert_eq!(
        state.navigate(Route::Settings).await,
        Navigation::Redirect(Route::Login)
    );

    state.logout();
    assert_eq!(
        FileStorage::new(&ctx.config.storage_path)
            .get(keys::TOKEN)
            .unwrap(),
        None
    );
}

mod common;

use std::sync::Arc;

use common::{create_photo, create_project, sqlite_backend};
use sitelens::annotations::AnnotationTask;
use sitelens::config::Config;
use sitelens::context::AppContext;
use sitelens::logger::Logger;

async fn context() -> AppContext {
    AppContext::with_backend(Config::default(), sqlite_backend().await, Logger::new())
}

#[tokio::test]
async fn test_session_lifecycle() {
    let context = context().await;
    assert!(context.user_id().await.is_none());
    assert!(context.active_project().await.is_none());

    let project = create_project(context.backend().as_ref(), "Active").await;

    context.sign_in("user-1").await;
    context.set_active_project(&project.id).await.unwrap();
    assert_eq!(context.user_id().await.as_deref(), Some("user-1"));
    assert_eq!(context.active_project().await.as_deref(), Some(project.id.as_str()));

    context.clear().await;
    assert!(context.user_id().await.is_none());
    assert!(context.active_project().await.is_none());
}

#[tokio::test]
async fn test_unknown_project_cannot_be_activated() {
    let context = context().await;
    assert!(context.set_active_project("missing").await.is_err());
    assert!(context.active_project().await.is_none());
}

#[tokio::test]
async fn test_signing_in_again_resets_active_project() {
    let context = context().await;
    let project = create_project(context.backend().as_ref(), "Reset").await;

    context.sign_in("user-1").await;
    context.set_active_project(&project.id).await.unwrap();
    context.sign_in("user-2").await;

    assert_eq!(context.user_id().await.as_deref(), Some("user-2"));
    assert!(context.active_project().await.is_none());
}

#[tokio::test]
async fn test_clones_share_session_and_backend() {
    let context = context().await;
    let clone = context.clone();
    context.sign_in("shared").await;
    assert_eq!(clone.user_id().await.as_deref(), Some("shared"));
    assert!(Arc::ptr_eq(&context.backend(), &clone.backend()));
}

#[tokio::test]
async fn test_context_sync_service_uses_context_backend() {
    let context = context().await;
    let backend = context.backend();
    let project = create_project(backend.as_ref(), "Wired").await;
    let photo = create_photo(
        backend.as_ref(),
        &project.id,
        "wired",
        &[AnnotationTask::new("a1", "Check outlet", None)],
    )
    .await;

    let synced = context
        .sync_service
        .sync_all_photo_tasks(&photo.id, &project.id)
        .await
        .unwrap();
    assert_eq!(synced.len(), 1);
    assert_eq!(backend.fetch_tasks_for_project(&project.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_initialize_from_config() {
    let mut config = Config::default();
    config.storage.database_url = "sqlite::memory:".to_string();

    let context = AppContext::initialize(config).await.unwrap();
    assert_eq!(context.backend().backend_type(), "sqlite");
    assert!(context.backend().fetch_projects().await.unwrap().is_empty());
}

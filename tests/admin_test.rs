mod common;

use ai_consultant_client::models::ApprovalDecision;
use ai_consultant_client::workflow::admin::FETCH_PENDING_FAILED;
use ai_consultant_client::{
    AdminApprovalCoordinator, OperationState, Outcome, RegistrationCoordinator,
};
use common::{connection_error, http_error, message, user, Call, MockBackend};

#[tokio::test]
async fn test_scenario_fetch_then_deny() {
    let backend = MockBackend::new();
    backend.push_pending(Ok(vec![user(1, "x@y.com")]));
    backend.push_approve(message("denied"));
    let coordinator = AdminApprovalCoordinator::new(backend.clone());

    coordinator.fetch_pending().await.unwrap();
    assert_eq!(coordinator.snapshot().pending, vec![user(1, "x@y.com")]);

    let text = coordinator.decide(1, false).await.unwrap();

    assert_eq!(text, "denied");
    let state = coordinator.snapshot();
    assert!(state.pending.is_empty());
    assert_eq!(state.message.as_deref(), Some("✅ denied"));
    assert_eq!(
        backend.calls(),
        vec![
            Call::ListPendingUsers,
            Call::ApproveUser(ApprovalDecision {
                user_id: 1,
                approve: false
            }),
        ]
    );
}

#[tokio::test]
async fn test_approve_removes_only_that_id_preserving_order() {
    let backend = MockBackend::new();
    backend.push_pending(Ok(vec![
        user(1, "a@x.com"),
        user(2, "b@x.com"),
        user(3, "c@x.com"),
    ]));
    backend.push_approve(message("approved"));
    let coordinator = AdminApprovalCoordinator::new(backend.clone());
    coordinator.fetch_pending().await.unwrap();

    coordinator.decide(2, true).await.unwrap();

    let state = coordinator.snapshot();
    assert_eq!(state.pending, vec![user(1, "a@x.com"), user(3, "c@x.com")]);
    assert_eq!(state.operation, OperationState::Settled(Outcome::Success));
    // 不重新拉取
    assert_eq!(
        backend.count(|c| matches!(c, Call::ListPendingUsers)),
        1
    );
}

#[tokio::test]
async fn test_decide_failure_keeps_list_and_shows_server_detail() {
    let backend = MockBackend::new();
    backend.push_pending(Ok(vec![user(1, "a@x.com"), user(2, "b@x.com")]));
    backend.push_approve(http_error("/approve_user", 404, Some("User not found")));
    let coordinator = AdminApprovalCoordinator::new(backend.clone());
    coordinator.fetch_pending().await.unwrap();

    assert!(coordinator.decide(2, true).await.is_err());

    let state = coordinator.snapshot();
    assert_eq!(state.pending.len(), 2);
    assert_eq!(state.message.as_deref(), Some("❌ User not found"));
    assert_eq!(state.operation, OperationState::Settled(Outcome::Failure));
}

#[tokio::test]
async fn test_decide_without_server_reason_uses_fallback() {
    let backend = MockBackend::new();
    backend.push_approve(http_error("/approve_user", 500, None));
    let coordinator = AdminApprovalCoordinator::new(backend.clone());

    assert!(coordinator.decide(9, true).await.is_err());

    assert_eq!(
        coordinator.snapshot().message.as_deref(),
        Some("❌ Failed to update user")
    );
}

#[tokio::test]
async fn test_fetch_failure_keeps_prior_list() {
    let backend = MockBackend::new();
    backend.push_pending(Ok(vec![user(4, "d@x.com")]));
    backend.push_pending(http_error("/list_pending_users", 500, None));
    let coordinator = AdminApprovalCoordinator::new(backend.clone());

    coordinator.fetch_pending().await.unwrap();
    assert!(coordinator.fetch_pending().await.is_err());

    let state = coordinator.snapshot();
    assert_eq!(state.pending, vec![user(4, "d@x.com")]);
    assert_eq!(state.message, Some(format!("❌ {}", FETCH_PENDING_FAILED)));
}

#[tokio::test]
async fn test_successful_fetch_clears_message() {
    let backend = MockBackend::new();
    backend.push_pending(Err(connection_error("/list_pending_users")));
    backend.push_pending(Ok(vec![user(5, "e@x.com")]));
    let coordinator = AdminApprovalCoordinator::new(backend.clone());

    assert!(coordinator.fetch_pending().await.is_err());
    assert_eq!(
        coordinator.snapshot().message.as_deref(),
        Some("❌ Error connecting to server")
    );

    coordinator.fetch_pending().await.unwrap();
    let state = coordinator.snapshot();
    assert_eq!(state.message, None);
    assert_eq!(state.pending, vec![user(5, "e@x.com")]);
}

#[tokio::test]
async fn test_register_success_and_failure_messages() {
    let backend = MockBackend::new();
    backend.push_register(message("Registration received, awaiting approval"));
    backend.push_register(http_error("/register", 400, Some("Email already registered")));
    let coordinator = RegistrationCoordinator::new(backend.clone());

    let text = coordinator.register("new@x.com", "pw").await.unwrap();
    assert_eq!(text, "Registration received, awaiting approval");
    assert_eq!(
        coordinator.snapshot().message.as_deref(),
        Some("✅ Registration received, awaiting approval")
    );

    assert!(coordinator.register("new@x.com", "pw").await.is_err());
    let state = coordinator.snapshot();
    assert_eq!(state.message.as_deref(), Some("❌ Email already registered"));
    assert_eq!(state.operation, OperationState::Settled(Outcome::Failure));
    assert_eq!(backend.network_calls(), 2);
}

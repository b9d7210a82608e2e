//! Core Flow Tests
//!
//! End-to-end tests of registration, sessions, sweeping, and post
//! submission against real stores.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::TestForum;
use forum::post::SubmissionLimits;
use forum::{
    AttachmentStore, AuthError, PostStore, PostValidationError, Session, SessionStore,
    SessionSweeper, Submission, SubmitError,
};

#[tokio::test]
async fn test_example_scenario() {
    let forum = TestForum::new().await;

    let alice = forum.auth.register("alice", "pw1").await.unwrap();
    let s1 = forum.auth.login("alice", "pw1").await.unwrap();
    assert!(s1.expires_at > s1.created_at);

    let identity = forum.auth.authenticate(&s1.token).await.unwrap();
    assert_eq!(identity, alice);

    let post = forum
        .pipeline
        .submit(
            &identity,
            Submission::new("Hello", "World", vec!["general".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(post.title, "Hello");
    assert_eq!(post.author_handle, "alice");
    assert_eq!(post.image_url(), "");

    forum.auth.logout(&s1.token).await.unwrap();
    assert_eq!(
        forum.auth.authenticate(&s1.token).await,
        Err(AuthError::Unauthenticated)
    );
}

#[tokio::test]
async fn test_register_login_roundtrip_for_many_handles() {
    let forum = TestForum::new().await;

    for (handle, password) in [("a", "x"), ("bob.smith", "hunter2"), ("Zoë_9", "p ä s s")] {
        forum.auth.register(handle, password).await.unwrap();
        let session = forum.auth.login(handle, password).await.unwrap();
        assert!(session.expires_at > session.created_at);
    }
}

#[tokio::test]
async fn test_concurrent_registration_yields_single_identity() {
    let forum = TestForum::new().await;

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let auth = Arc::clone(&forum.auth);
        tasks.push(tokio::spawn(async move {
            auth.register("racer", "pw").await
        }));
    }

    let mut successes = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AuthError::DuplicateHandle) => duplicates += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 9);
    assert_eq!(forum.credentials.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_logins_issue_distinct_sessions() {
    let forum = TestForum::new().await;
    forum.auth.register("alice", "pw1").await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let auth = Arc::clone(&forum.auth);
        tasks.push(tokio::spawn(async move { auth.login("alice", "pw1").await }));
    }

    let mut tokens = Vec::new();
    for task in tasks {
        tokens.push(task.await.unwrap().unwrap().token);
    }
    tokens.sort();
    tokens.dedup();

    assert_eq!(tokens.len(), 5);
    assert_eq!(forum.sessions.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_expired_session_rejected_before_and_after_sweep() {
    let forum = TestForum::new().await;
    let alice = forum.auth.register("alice", "pw1").await.unwrap();

    let past = forum::datetime::now() - chrono::Duration::minutes(10);
    let stale = Session::issue_at(alice.id, Duration::from_secs(60), past);
    forum.sessions.insert(&stale).await.unwrap();

    // Not yet swept
    assert_eq!(
        forum.auth.authenticate(&stale.token).await,
        Err(AuthError::Unauthenticated)
    );

    let sweeper = SessionSweeper::new(forum.sessions.clone(), Duration::from_secs(60));
    assert_eq!(sweeper.sweep_once().await.unwrap(), 1);

    // Swept; indistinguishable
    assert_eq!(
        forum.auth.authenticate(&stale.token).await,
        Err(AuthError::Unauthenticated)
    );
}

#[tokio::test]
async fn test_sweep_removes_expired_and_keeps_live() {
    let forum = TestForum::new().await;
    let alice = forum.auth.register("alice", "pw1").await.unwrap();

    let live = forum.auth.login("alice", "pw1").await.unwrap();
    let past = forum::datetime::now() - chrono::Duration::hours(1);
    for _ in 0..3 {
        let expired = Session::issue_at(alice.id, Duration::from_secs(30), past);
        forum.sessions.insert(&expired).await.unwrap();
    }
    assert_eq!(forum.sessions.count().await.unwrap(), 4);

    let handle = SessionSweeper::new(forum.sessions.clone(), Duration::from_millis(20)).spawn();
    let mut remaining = forum.sessions.count().await.unwrap();
    for _ in 0..100 {
        if remaining == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        remaining = forum.sessions.count().await.unwrap();
    }
    handle.shutdown().await;

    assert_eq!(remaining, 1);
    assert!(forum.auth.authenticate(&live.token).await.is_ok());
}

#[tokio::test]
async fn test_invalid_submission_changes_nothing() {
    let forum = TestForum::new().await;
    let alice = forum.auth.register("alice", "pw1").await.unwrap();

    let result = forum
        .pipeline
        .submit(
            &alice,
            Submission::new("", "World", vec!["general".to_string()])
                .with_attachment(Some("cat.png".to_string()), vec![1, 2, 3]),
        )
        .await;

    assert_eq!(
        result,
        Err(SubmitError::ValidationFailed(PostValidationError::TitleEmpty))
    );
    assert_eq!(forum.posts.count().await.unwrap(), 0);
    assert_eq!(forum.stored_files(), 0);
}

#[tokio::test]
async fn test_attachment_reference_resolves_to_submitted_bytes() {
    let forum = TestForum::new().await;
    let alice = forum.auth.register("alice", "pw1").await.unwrap();
    let bytes: Vec<u8> = (0..=255).cycle().take(4096).collect();

    let post = forum
        .pipeline
        .submit(
            &alice,
            Submission::new("Pic", "A picture", vec!["photos".to_string()])
                .with_attachment(Some("sunset.jpg".to_string()), bytes.clone()),
        )
        .await
        .unwrap();

    let attachment = post.attachment.clone().unwrap();
    assert_eq!(attachment.size, bytes.len() as u64);
    assert!(attachment.reference.ends_with(".jpg"));
    assert_eq!(
        forum.attachments.get(&attachment.reference).await.unwrap(),
        Some(bytes)
    );

    let stored = forum.posts.get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.image_url(), post.image_url());
}

#[tokio::test]
async fn test_oversized_attachment_is_rejected_without_writes() {
    let limits = SubmissionLimits {
        max_attachment_bytes: 1024,
        allow_empty_attachments: true,
    };
    let forum = TestForum::with_options(common::TEST_SESSION_TTL, limits).await;
    let alice = forum.auth.register("alice", "pw1").await.unwrap();

    let result = forum
        .pipeline
        .submit(
            &alice,
            Submission::new("Big", "Too big", vec!["general".to_string()])
                .with_attachment(None, vec![0; 1025]),
        )
        .await;

    assert!(matches!(
        result,
        Err(SubmitError::ValidationFailed(
            PostValidationError::AttachmentTooLarge { .. }
        ))
    ));
    assert_eq!(forum.stored_files(), 0);
}

#[tokio::test]
async fn test_feed_filters_by_tag() {
    let forum = TestForum::new().await;
    let alice = forum.auth.register("alice", "pw1").await.unwrap();

    for (title, tag) in [("one", "general"), ("two", "rust"), ("three", "general")] {
        forum
            .pipeline
            .submit(&alice, Submission::new(title, "body", vec![tag.to_string()]))
            .await
            .unwrap();
    }

    let general = forum.posts.list_by_tag("general", 10, 0).await.unwrap();
    assert_eq!(general.len(), 2);
    assert!(general.iter().all(|p| p.tags.contains(&"general".to_string())));
    assert_eq!(forum.posts.list_recent(10, 0).await.unwrap().len(), 3);
}

use crate::errors::AutomationError;
use crate::locator::{poll_until, ElementState};
use crate::session::Session;
use crate::tests::fake::{FakeEngine, FakeNode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn poll_until_returns_once_the_operation_succeeds() {
    let attempts = AtomicUsize::new(0);
    let value = poll_until(Duration::from_secs(5), Duration::from_millis(10), || async {
        if attempts.fetch_add(1, Ordering::SeqCst) < 3 {
            Err(AutomationError::ElementNotFound("not yet".to_string()))
        } else {
            Ok(42)
        }
    })
    .await
    .unwrap();

    assert_eq!(value, 42);
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn poll_until_times_out_with_the_last_error() {
    let result: Result<(), _> = poll_until(
        Duration::from_millis(50),
        Duration::from_millis(10),
        || async { Err(AutomationError::ElementNotFound("#missing".to_string())) },
    )
    .await;

    match result {
        Err(AutomationError::Timeout(msg)) => {
            assert!(msg.contains("#missing"), "timeout should carry the last error: {msg}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn poll_until_aborts_immediately_on_invalid_selector() {
    let attempts = AtomicUsize::new(0);
    let result: Result<(), _> = poll_until(
        Duration::from_secs(60),
        Duration::from_millis(10),
        || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(AutomationError::InvalidSelector("empty selector string".to_string()))
        },
    )
    .await;

    assert!(matches!(result, Err(AutomationError::InvalidSelector(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn wait_for_present_element_resolves() {
    let mut dom = HashMap::new();
    dom.insert("#ready".to_string(), vec![FakeNode::with_text("here")]);
    let session = Session::new(
        Arc::new(FakeEngine::with_dom(dom)),
        Duration::from_secs(5),
    );

    let element = session
        .locator("#ready")
        .wait(ElementState::Present, None)
        .await
        .unwrap();
    assert_eq!(element.text().await.unwrap(), "here");
}

#[tokio::test(start_paused = true)]
async fn wait_for_clickable_fails_while_element_stays_disabled() {
    let mut dom = HashMap::new();
    dom.insert(
        "#disabled".to_string(),
        vec![Arc::new(FakeNode {
            clickable: false,
            ..FakeNode::default()
        })],
    );
    let session = Session::new(
        Arc::new(FakeEngine::with_dom(dom)),
        Duration::from_millis(600),
    );

    let result = session
        .locator("#disabled")
        .wait(ElementState::Clickable, None)
        .await;
    match result {
        Err(AutomationError::Timeout(msg)) => {
            assert!(msg.contains("Clickable"), "unexpected message: {msg}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn wait_times_out_when_the_anchor_never_appears() {
    let session = Session::new(
        Arc::new(FakeEngine::with_dom(HashMap::new())),
        Duration::from_millis(600),
    );

    let result = session
        .locator("#phantom")
        .wait(ElementState::Present, None)
        .await;
    match result {
        Err(AutomationError::Timeout(msg)) => {
            assert!(msg.contains("#phantom"), "unexpected message: {msg}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

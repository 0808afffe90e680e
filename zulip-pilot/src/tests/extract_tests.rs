use crate::extract::extract_messages;
use crate::tests::fake::{broken_row, message_row, FakeElement};

#[tokio::test]
async fn zero_rows_yield_empty_list() {
    let messages = extract_messages(&[], 5).await;
    assert!(messages.is_empty());
}

#[tokio::test]
async fn takes_last_n_rows_in_display_order() {
    let rows: Vec<_> = (0..8)
        .map(|i| {
            FakeElement::wrap(
                message_row(&format!("msg-{i}"), &format!("10:0{i}")),
                ".message_row",
            )
        })
        .collect();

    let messages = extract_messages(&rows, 5).await;
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0].content, "msg-3");
    assert_eq!(messages[4].content, "msg-7");
    assert_eq!(messages[4].timestamp, "10:07");
}

#[tokio::test]
async fn fewer_rows_than_requested_returns_all() {
    let rows = vec![
        FakeElement::wrap(message_row("hi", "10:00"), ".message_row"),
        FakeElement::wrap(message_row("bye", "10:01"), ".message_row"),
    ];
    let messages = extract_messages(&rows, 5).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[1].content, "bye");
}

#[tokio::test]
async fn malformed_row_is_skipped_not_fatal() {
    crate::tests::init_tracing();
    let rows = vec![
        FakeElement::wrap(message_row("one", "10:00"), ".message_row"),
        FakeElement::wrap(message_row("two", "10:01"), ".message_row"),
        FakeElement::wrap(broken_row("10:02"), ".message_row"),
        FakeElement::wrap(message_row("four", "10:03"), ".message_row"),
        FakeElement::wrap(message_row("five", "10:04"), ".message_row"),
    ];

    let messages = extract_messages(&rows, 5).await;
    assert_eq!(messages.len(), 4);
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "four", "five"]);
}

#[tokio::test]
async fn content_and_timestamp_are_trimmed() {
    let rows = vec![FakeElement::wrap(
        message_row("  padded  ", " 10:00 "),
        ".message_row",
    )];
    let messages = extract_messages(&rows, 5).await;
    assert_eq!(messages[0].content, "padded");
    assert_eq!(messages[0].timestamp, "10:00");
}

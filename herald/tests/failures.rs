//! Listener failures are logged and never reach the emitter.

use herald::{
    BoxError, from_fn,
    testing::{FailingHandler, RecordingHandler},
};

mod common;
use common::{ChatMessage, sync_bus};

#[tokio::test]
async fn test_error_does_not_stop_later_listeners() {
    let bus = sync_bus();
    let failing = FailingHandler::new("rejected");
    let recorder = RecordingHandler::<ChatMessage>::new();
    bus.on::<ChatMessage, _>("chat", failing.clone());
    bus.on("chat", recorder.clone());

    bus.emit("chat", ChatMessage::new("ann", "hi")).await;
    bus.emit("chat", ChatMessage::new("bob", "yo")).await;

    assert_eq!(failing.calls(), 2);
    assert_eq!(
        recorder.payloads(),
        vec![ChatMessage::new("ann", "hi"), ChatMessage::new("bob", "yo")]
    );
}

#[tokio::test]
async fn test_panic_is_contained() {
    let bus = sync_bus();
    let recorder = RecordingHandler::<i32>::new();
    bus.on(
        "k",
        from_fn(|n: i32| {
            if n > 0 {
                panic!("listener exploded");
            }
        }),
    );
    bus.on("k", recorder.clone());

    bus.emit("k", 1_i32).await;
    assert_eq!(recorder.payloads(), vec![1]);
}

#[tokio::test]
async fn test_result_returning_closure() {
    let bus = sync_bus();
    let recorder = RecordingHandler::<String>::new();
    bus.on("parse", |raw: String| async move {
        raw.parse::<u32>().map(drop).map_err(BoxError::from)
    });
    bus.on("parse", recorder.clone());

    bus.emit("parse", "12".to_string()).await;
    bus.emit("parse", "twelve".to_string()).await;
    assert_eq!(recorder.count(), 2);
}

#[tokio::test]
async fn test_payload_type_mismatch_is_skipped() {
    let bus = sync_bus();
    let numbers = RecordingHandler::<i32>::new();
    let words = RecordingHandler::<String>::new();
    bus.on("k", numbers.clone());
    bus.on("k", words.clone());

    bus.emit("k", 7_i32).await;
    bus.emit("k", "seven".to_string()).await;

    assert_eq!(numbers.payloads(), vec![7]);
    assert_eq!(words.payloads(), vec!["seven".to_string()]);
}

#[tokio::test]
async fn test_unique_failure_still_ends_the_emit() {
    let bus = sync_bus();
    let failing = FailingHandler::new("unique");
    let recorder = RecordingHandler::<u8>::new();
    bus.on_unique::<u8, _>("k", failing.clone());
    bus.on("k", recorder.clone());

    bus.emit("k", 1_u8).await;
    assert_eq!(failing.calls(), 1);
    assert_eq!(recorder.count(), 0);
}

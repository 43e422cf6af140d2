//! # Counter Example
//!
//! A minimal round trip between a surface and the agent that drives it:
//! - Building protocol messages in process and sending them through a channel
//!   source
//! - Observing actions from the surface with `subscribe_actions`
//! - Answering each action with a `dataModelUpdate`, which re-renders the
//!   whole surface
//!
//! Run with: `cargo run --example counter`

use a2ui::tokio::sync::broadcast::error::RecvError;
use a2ui::tokio::sync::mpsc::UnboundedSender;
use a2ui::{Message, Viewer, ViewerError, ViewerOptions};
use serde_json::json;

fn surface() -> Vec<Message> {
    let components = json!({"surfaceUpdate": {"components": [
        {"id": "root", "component": {"Column": {"children": {"explicitList": ["title", "card", "hint"]}, "spacing": "small"}}},
        {"id": "title", "component": {"Text": {"text": {"literalString": "Counter"}, "usageHint": "h1"}}},
        {"id": "card", "component": {"Card": {"child": "body", "elevation": "high"}}},
        {"id": "body", "component": {"Column": {"children": {"explicitList": ["count", "buttons"]}, "alignment": "center"}}},
        {"id": "count", "component": {"Text": {"text": {"path": "counter.label"}, "usageHint": "h2"}}},
        {"id": "buttons", "component": {"Row": {"children": {"explicitList": ["dec", "reset", "inc"]}, "alignment": "center", "spacing": "medium"}}},
        {"id": "dec", "component": {"Button": {"label": {"literalString": "-"}, "action": {"name": "decrement"}, "style": "secondary"}}},
        {"id": "reset", "component": {"Button": {"label": {"literalString": "reset"}, "action": {"name": "reset"}, "disabled": {"path": "counter.atZero"}}}},
        {"id": "inc", "component": {"Button": {"label": {"literalString": "+"}, "action": {"name": "increment"}, "style": "secondary"}}},
        {"id": "hint", "component": {"Text": {"text": {"literalString": "tab to move, enter to press, q to quit"}, "usageHint": "caption"}}}
    ]}});
    vec![
        Message::from_value(&components),
        counter_update(0),
        Message::from_value(&json!({"beginRendering": {"root": "root"}})),
    ]
}

fn counter_update(count: i64) -> Message {
    Message::from_value(&json!({"dataModelUpdate": {"contents": {"counter": {
        "label": format!("Count: {count}"),
        "atZero": (count == 0).to_string(),
    }}}}))
}

fn send_all(tx: &UnboundedSender<Message>, messages: Vec<Message>) -> bool {
    messages.into_iter().all(|message| tx.send(message).is_ok())
}

#[a2ui::tokio::main]
async fn main() -> Result<(), ViewerError> {
    let mut viewer = Viewer::new(ViewerOptions {
        title: Some(" Counter ".into()),
        ..ViewerOptions::default()
    });

    let (tx, source) = a2ui::sources::channel();
    viewer.connect(source);
    send_all(&tx, surface());

    // The "agent": owns the count and answers actions with data updates.
    let mut actions = viewer.subscribe_actions();
    a2ui::tokio::spawn(async move {
        let mut count = 0i64;
        loop {
            let event = match actions.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            };
            match event.name.as_str() {
                "increment" => count += 1,
                "decrement" => count -= 1,
                "reset" => count = 0,
                _ => continue,
            }
            if !send_all(&tx, vec![counter_update(count)]) {
                break;
            }
        }
    });

    let viewer = viewer.run().await?;
    if let Some(action) = viewer.last_action() {
        println!("last action: {action}");
    }
    Ok(())
}

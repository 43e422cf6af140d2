use crate::error::Error;
use crate::message::Message;
use crate::source::{Delivery, MessageSource};
use futures::stream::BoxStream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Configuration for [`ServerSentEvents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseOptions {
    /// Named event type carrying messages (default: `"a2ui"`). Untyped
    /// events (type `message`) are always accepted as well.
    pub event: String,
}

impl SseOptions {
    fn accepts(&self, event: &SseEvent) -> bool {
        event.event == self.event || event.event == "message"
    }
}

impl Default for SseOptions {
    fn default() -> Self {
        Self {
            event: "a2ui".to_string(),
        }
    }
}

/// A dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type; `message` when the server sent none.
    pub event: String,
    /// All `data` lines of the event joined with `\n`.
    pub data: String,
}

/// Incremental line-oriented decoder for the `text/event-stream` format.
///
/// Feed it one line at a time (without the line terminator). A blank line
/// dispatches the event collected so far. Comments, `id`, `retry`, and
/// unknown fields are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: String,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line, returning an event when the line completes one.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = value.to_string(),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    /// Whether a partially collected event is pending.
    pub fn has_pending(&self) -> bool {
        !self.data.is_empty() || !self.event.is_empty()
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = std::mem::take(&mut self.event);
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: if event.is_empty() {
                "message".to_string()
            } else {
                event
            },
            data,
        })
    }
}

/// Messages carried in server-sent events.
///
/// Events of the configured type and untyped `message` events are parsed as
/// protocol messages; other event types are skipped. An event left
/// unterminated when the stream ends is discarded.
///
/// Input is decoded as UTF-8 with invalid bytes replaced by U+FFFD, as
/// `EventSource` does, so a bad byte never ends the stream.
pub struct ServerSentEvents<R> {
    reader: R,
    options: SseOptions,
}

impl<R> ServerSentEvents<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, SseOptions::default())
    }

    pub fn with_options(reader: R, options: SseOptions) -> Self {
        Self { reader, options }
    }
}

impl<R> MessageSource for ServerSentEvents<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn stream(self) -> BoxStream<'static, Delivery> {
        let state = (self.reader.split(b'\n'), SseDecoder::new(), self.options);
        let stream = futures::stream::unfold(Some(state), |state| async move {
            let (mut lines, mut decoder, options) = state?;
            loop {
                match lines.next_segment().await {
                    Ok(Some(line)) => {
                        let line = String::from_utf8_lossy(&line);
                        let Some(event) = decoder.push_line(&line) else {
                            continue;
                        };
                        if !options.accepts(&event) {
                            tracing::debug!(event = %event.event, "skipping event");
                            continue;
                        }
                        let delivery = Message::parse(&event.data);
                        return Some((delivery, Some((lines, decoder, options))));
                    }
                    Ok(None) => {
                        if decoder.has_pending() {
                            tracing::debug!("discarding unterminated event");
                        }
                        return None;
                    }
                    Err(err) => return Some((Err(Error::Io(err)), None)),
                }
            }
        });
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Cursor;

    fn decode_all(text: &str) -> Vec<SseEvent> {
        let mut decoder = SseDecoder::new();
        text.split('\n')
            .filter_map(|line| decoder.push_line(line))
            .collect()
    }

    #[test]
    fn frames_events() {
        let events = decode_all("event: a2ui\ndata: {\"x\":1}\n\ndata: plain\n\n");
        assert_eq!(
            events,
            vec![
                SseEvent {
                    event: "a2ui".into(),
                    data: "{\"x\":1}".into()
                },
                SseEvent {
                    event: "message".into(),
                    data: "plain".into()
                },
            ]
        );
    }

    #[test]
    fn joins_data_lines_and_strips_one_space() {
        let events = decode_all("data:  two\ndata:one\n\n");
        assert_eq!(events[0].data, " two\none");
    }

    #[test]
    fn ignores_comments_and_other_fields() {
        let events = decode_all(": keep-alive\nid: 7\nretry: 1000\nfoo: bar\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn blank_line_without_data_dispatches_nothing() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push_line("event: a2ui"), None);
        assert_eq!(decoder.push_line(""), None);
        // event type does not leak into the next event
        decoder.push_line("data: y");
        assert_eq!(decoder.push_line("").unwrap().event, "message");
    }

    #[test]
    fn handles_crlf() {
        let events = decode_all("event: a2ui\r\ndata: z\r\n\r\n");
        assert_eq!(events[0].event, "a2ui");
        assert_eq!(events[0].data, "z");
    }

    async fn deliveries(text: &str, options: SseOptions) -> Vec<Delivery> {
        ServerSentEvents::with_options(Cursor::new(text.as_bytes().to_vec()), options)
            .stream()
            .collect()
            .await
    }

    #[tokio::test]
    async fn filters_by_event_type() {
        let text = concat!(
            "event: a2ui\ndata: {\"deleteSurface\":{}}\n\n",
            "event: ping\ndata: {\"deleteSurface\":{}}\n\n",
            "data: {\"beginRendering\":{\"root\":\"r\"}}\n\n",
        );
        let got = deliveries(text, SseOptions::default()).await;
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].as_ref().unwrap(), &Message::DeleteSurface);
        assert_eq!(
            got[1].as_ref().unwrap(),
            &Message::BeginRendering { root: "r".into() }
        );
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced_and_reading_continues() {
        let mut bytes = b"data: {\"dataModelUpdate\":{\"contents\":{\"v\":\"".to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"\"}}}\n\ndata: {\"deleteSurface\":{}}\n\n");
        let got: Vec<_> = ServerSentEvents::new(Cursor::new(bytes)).stream().collect().await;
        assert_eq!(got.len(), 2);
        match got[0].as_ref().unwrap() {
            Message::DataModelUpdate { contents } => {
                assert_eq!(contents.get("v"), Some(&serde_json::json!("\u{fffd}")));
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(got[1].as_ref().unwrap(), &Message::DeleteSurface);
    }

    #[tokio::test]
    async fn custom_event_name() {
        let text = "event: ui\ndata: {\"deleteSurface\":{}}\n\nevent: a2ui\ndata: {\"deleteSurface\":{}}\n\n";
        let options = SseOptions {
            event: "ui".into(),
        };
        assert_eq!(deliveries(text, options).await.len(), 1);
    }

    #[tokio::test]
    async fn malformed_data_continues_and_trailing_event_is_dropped() {
        let text = "data: {broken\n\ndata: {\"deleteSurface\":{}}\n\ndata: {\"deleteSurface\":{}}\n";
        let got = deliveries(text, SseOptions::default()).await;
        assert_eq!(got.len(), 2);
        assert!(matches!(got[0], Err(Error::MalformedMessage(_))));
        assert!(got[1].is_ok());
    }
}

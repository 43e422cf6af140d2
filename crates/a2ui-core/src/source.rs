use crate::error::Error;
use crate::message::Message;
use crate::presenter::Presenter;
use crate::renderer::Renderer;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// One item from a message stream: a decoded message, or the reason one
/// could not be produced.
pub type Delivery = Result<Message, Error>;

/// Trait for types that produce a stream of protocol messages.
///
/// Implement this to feed a [`Renderer`] from a new transport. The stream is
/// created once, when the source is [`connect`]ed, and dropped when the
/// connection closes. Sources report decoding problems as error deliveries
/// and keep going; a stream ends only when its transport does.
pub trait MessageSource: Send + 'static {
    /// Create the stream of deliveries.
    fn stream(self) -> BoxStream<'static, Delivery>;
}

/// Handle to a running source task.
///
/// Closing the connection stops delivery. It does not touch renderer state;
/// messages already delivered stay applied. Dropping the handle leaves the
/// task running until its stream ends or the inbox closes.
#[derive(Debug)]
pub struct Connection {
    abort: AbortHandle,
}

impl Connection {
    /// Stop the source task.
    pub fn close(&self) {
        self.abort.abort();
    }

    /// Whether the source task has ended, by closing or on its own.
    pub fn is_closed(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Spawn `source` onto the current tokio runtime, forwarding every delivery
/// into `inbox`.
///
/// The task ends when the stream ends, when the receiving side of `inbox` is
/// dropped, or when the returned [`Connection`] is closed.
pub fn connect<S: MessageSource>(source: S, inbox: mpsc::UnboundedSender<Delivery>) -> Connection {
    let handle = tokio::spawn(async move {
        let mut stream = source.stream();
        while let Some(delivery) = stream.next().await {
            if inbox.send(delivery).is_err() {
                break;
            }
        }
        tracing::debug!("message source finished");
    });
    Connection {
        abort: handle.abort_handle(),
    }
}

/// Apply deliveries from `inbox` to `renderer` until every sender is gone.
///
/// Error deliveries are logged and passed to `on_error`; they never stop the
/// loop. Returns the number of messages applied.
pub async fn drive<P: Presenter>(
    renderer: &mut Renderer<P>,
    inbox: &mut mpsc::UnboundedReceiver<Delivery>,
    mut on_error: impl FnMut(&Error),
) -> usize {
    let mut applied = 0;
    while let Some(delivery) = inbox.recv().await {
        match delivery {
            Ok(message) => {
                renderer.process(message);
                applied += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, "stream delivery failed");
                on_error(&err);
            }
        }
    }
    applied
}

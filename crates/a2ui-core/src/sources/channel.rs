use crate::message::Message;
use crate::source::{Delivery, MessageSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Messages produced in the same process, such as by an embedded agent or a
/// test.
///
/// The stream ends once every sender is dropped.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Message>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::UnboundedReceiver<Message>) -> Self {
        Self { rx }
    }
}

impl MessageSource for ChannelSource {
    fn stream(self) -> BoxStream<'static, Delivery> {
        Box::pin(UnboundedReceiverStream::new(self.rx).map(Ok))
    }
}

/// A sender paired with the [`ChannelSource`] it feeds.
pub fn channel() -> (mpsc::UnboundedSender<Message>, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, ChannelSource::new(rx))
}

use crate::error::Error;
use crate::message::Message;
use crate::source::{Delivery, MessageSource};
use futures::stream::BoxStream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Newline-delimited JSON: one message per non-blank line.
///
/// Lines are split on `\n` as raw bytes, with a trailing `\r` dropped. A
/// malformed line, including one that is not valid UTF-8, yields an error
/// delivery and reading continues. A read failure yields an [`Error::Io`]
/// delivery and ends the stream.
///
/// # Example
///
/// ```rust,ignore
/// use a2ui_core::{connect, sources::JsonLines};
/// use tokio::io::BufReader;
///
/// let stdin = BufReader::new(tokio::io::stdin());
/// let connection = connect(JsonLines::new(stdin), inbox);
/// ```
pub struct JsonLines<R> {
    reader: R,
}

impl<R> JsonLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> MessageSource for JsonLines<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn stream(self) -> BoxStream<'static, Delivery> {
        let lines = self.reader.split(b'\n');
        let stream = futures::stream::unfold(Some(lines), |state| async move {
            let mut lines = state?;
            loop {
                match lines.next_segment().await {
                    Ok(Some(line)) => {
                        let line = line.strip_suffix(b"\r").unwrap_or(&line);
                        if line.iter().all(u8::is_ascii_whitespace) {
                            continue;
                        }
                        return Some((Message::parse_slice(line), Some(lines)));
                    }
                    Ok(None) => return None,
                    Err(err) => return Some((Err(Error::Io(err)), None)),
                }
            }
        });
        Box::pin(stream)
    }
}

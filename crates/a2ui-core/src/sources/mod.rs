//! Built-in message sources.
//!
//! - **JSON Lines** ([`JsonLines`]): one message per line from any async
//!   reader (a file, stdin, a socket, an HTTP body).
//! - **Server-sent events** ([`ServerSentEvents`], [`SseDecoder`]): messages
//!   carried in the `data` of named events.
//! - **Channels** ([`ChannelSource`], [`channel`]): messages produced in the
//!   same process.

mod channel;
mod jsonl;
mod sse;

pub use channel::*;
pub use jsonl::*;
pub use sse::*;

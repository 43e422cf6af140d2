//! # Stream Viewer
//!
//! Renders an a2ui message stream in the terminal:
//! - Reading newline-delimited JSON or server-sent events from a file or stdin
//! - Attaching the reader to a [`Viewer`] as a message source
//! - Printing the actions you trigger as outbound `userAction` JSON on exit
//!
//! Run with:
//!
//! ```text
//! cargo run --example stream_view -- demos/streams/restaurant.jsonl
//! cargo run --example stream_view -- --sse demos/streams/profile.sse
//! agent | cargo run --example stream_view
//! ```
//!
//! Options: `--sse` reads server-sent events, `--event NAME` picks the event
//! type (default `a2ui`), `--log FILE` writes logs to FILE.

use a2ui::sources::{JsonLines, ServerSentEvents, SseOptions};
use a2ui::tokio::io::{AsyncBufRead, BufReader};
use a2ui::{Viewer, ViewerOptions};
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Parser, Debug)]
#[command(name = "stream_view")]
#[command(about = "Render an a2ui message stream in the terminal", long_about = None)]
struct Args {
    /// Stream file to read (defaults to stdin)
    path: Option<PathBuf>,

    /// Read server-sent events instead of newline-delimited JSON
    #[arg(long)]
    sse: bool,

    /// Event type carrying messages; implies --sse
    #[arg(long, value_name = "NAME")]
    event: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

type Reader = Box<dyn AsyncBufRead + Unpin + Send>;

#[a2ui::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let reader: Reader = match &args.path {
        Some(path) => Box::new(BufReader::new(a2ui::tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(a2ui::tokio::io::stdin())),
    };

    let title = args
        .path
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".into());

    let mut viewer = Viewer::new(ViewerOptions {
        title: Some(title),
        log_file: args.log,
        ..ViewerOptions::default()
    });

    if args.sse || args.event.is_some() {
        let options = SseOptions {
            event: args.event.unwrap_or_else(|| SseOptions::default().event),
        };
        viewer.connect(ServerSentEvents::with_options(reader, options));
    } else {
        viewer.connect(JsonLines::new(reader));
    }

    let actions = Arc::new(Mutex::new(Vec::new()));
    let sink = actions.clone();
    viewer.on_action(move |event| {
        if let Ok(mut actions) = sink.lock() {
            actions.push(event.to_value());
        }
    });

    let viewer = viewer.run().await?;

    if let Some(err) = viewer.last_error() {
        eprintln!("last stream error: {err}");
    }
    if let Ok(actions) = actions.lock() {
        for action in actions.iter() {
            println!("{action}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_stdin_jsonl() {
        let args = Args::try_parse_from(["stream_view"]).unwrap();
        assert!(args.path.is_none());
        assert!(!args.sse);
        assert!(args.event.is_none());
    }

    #[test]
    fn reads_options_and_path() {
        let args =
            Args::try_parse_from(["stream_view", "--event", "ui", "--log", "out.log", "s.sse"])
                .unwrap();
        assert_eq!(args.event.as_deref(), Some("ui"));
        assert_eq!(args.log, Some(PathBuf::from("out.log")));
        assert_eq!(args.path, Some(PathBuf::from("s.sse")));
    }

    #[test]
    fn option_missing_its_value_is_rejected() {
        assert!(Args::try_parse_from(["stream_view", "--log", "--sse"]).is_err());
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = Args::try_parse_from(["stream_view", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}

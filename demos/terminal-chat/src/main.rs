//! Line-oriented terminal chat client.
//!
//! Run with: cargo run -p terminal-chat-demo -- <name> [endpoint]
//!
//! Joins the relay, replays history, then reads lines from stdin and sends
//! them until EOF.

use std::sync::Arc;

use anyhow::{Result, bail};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_chat_client::{SessionController, WsTransport};
use relay_chat_core::{Message, MessageOrigin, Transcript};

const DEFAULT_ENDPOINT: &str = "ws://localhost:8765";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(name) = args.next() else {
        bail!("usage: terminal-chat-demo <name> [endpoint]");
    };
    let endpoint = args.next().unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());

    let transcript = Arc::new(Transcript::new());
    let controller = SessionController::new(endpoint, WsTransport, Arc::clone(&transcript));

    let mut feed = transcript.replay_plus_live();
    if !controller.join(&name) {
        bail!("name must not be blank");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            message = feed.next() => {
                let Some(message) = message else { break };
                print_line(&message);
                if controller.state().is_terminal() {
                    break;
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        controller.send(&line);
                    }
                    None => {
                        // stdin closed
                        controller.leave();
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_line(message: &Message) {
    let marker = match message.origin {
        MessageOrigin::Own => ">",
        MessageOrigin::Other => " ",
        MessageOrigin::System => "*",
    };
    if message.historical {
        println!("{marker} [history] {}", message.text);
    } else {
        println!("{marker} {}", message.text);
    }
}

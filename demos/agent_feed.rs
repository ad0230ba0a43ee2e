//! End-to-end demo of the stream engine
//!
//! Run with: cargo run --example agent_feed
//!
//! Simulates one producer broadcasting under the name "demo_agent" and
//! two viewers following along. The producer claims the name with its
//! first send, streams a few lines of each kind, one viewer posts a
//! chat message, then an admin ends the stream and every viewer sees
//! the offline event.

use std::sync::Arc;
use std::time::Duration;

use linecast_rs::{ConnId, SendOutcome, StreamEvent, StreamRegistry};

const STREAM: &str = "demo_agent";
const ORIGIN: &str = "127.0.0.1";

async fn watch(registry: Arc<StreamRegistry>, conn: ConnId, label: &'static str) {
    let mut sub = match registry.subscribe(STREAM, conn).await {
        Ok(sub) => sub,
        Err(e) => {
            eprintln!("[{}] subscribe failed: {}", label, e);
            return;
        }
    };

    println!(
        "[{}] joined: {} lines of history, {} viewers",
        label,
        sub.snapshot.lines.len(),
        sub.snapshot.viewer_count
    );

    loop {
        match sub.events.recv().await {
            Ok(StreamEvent::Line(line)) => {
                println!("[{}] {} {}", label, line.kind, line.text);
            }
            Ok(StreamEvent::Chat(message)) => {
                println!("[{}] <{}> {}", label, message.pseudonym, message.text);
            }
            Ok(StreamEvent::ViewerCount(count)) => {
                println!("[{}] viewers: {}", label, count);
            }
            Ok(StreamEvent::Offline) => {
                println!("[{}] stream went offline", label);
                return;
            }
            Err(e) => {
                eprintln!("[{}] lost the feed: {}", label, e);
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("linecast_rs=debug".parse()?),
        )
        .init();

    let registry = Arc::new(StreamRegistry::new());
    let _sweeper = registry.spawn_sweep_task();

    // Producer claims the name; the returned token authorizes all
    // later sends
    let token = match registry.send(STREAM, None, "claiming", "log", ORIGIN).await? {
        SendOutcome::Created { token } => token,
        SendOutcome::Accepted => unreachable!("demo stream name was unclaimed"),
    };
    println!("claimed {} with token {}", STREAM, token.as_str());

    let viewer_a = tokio::spawn(watch(Arc::clone(&registry), ConnId::new(1), "viewer-a"));
    let viewer_b = tokio::spawn(watch(Arc::clone(&registry), ConnId::new(2), "viewer-b"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    for (kind, text) in [
        ("log", "starting up"),
        ("thought", "the plan: greet, then work"),
        ("tool", "shell: echo hello"),
        ("log", "done with step one"),
    ] {
        registry
            .send(STREAM, Some(token.as_str()), text, kind, ORIGIN)
            .await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    // A viewer chimes in under their derived pseudonym
    if let Err(e) = registry.send_chat(STREAM, ConnId::new(1), "nice work!").await {
        eprintln!("chat rejected: {}", e);
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Admin pulls the plug; both viewers observe Offline
    registry.end_stream(STREAM).await?;
    viewer_a.await?;
    viewer_b.await?;

    let stats = registry.stats();
    println!(
        "today: {} streams, {} messages, peak {} viewers",
        stats.streams_today, stats.messages_today, stats.peak_concurrent_today
    );

    Ok(())
}

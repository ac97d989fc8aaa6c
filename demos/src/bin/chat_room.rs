use std::time::Duration;

use smuggler::{init_logging, smuggled, LoggingConfig, Message, SenderRef, Smuggled, Smuggler};
use tokio::{sync::mpsc, time::sleep};

#[derive(Debug, Clone)]
struct ChatLine {
    author: &'static str,
    text: String,
}

smuggled!(ChatLine);

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _logging = init_logging(LoggingConfig {
        level: "smuggler=debug,info".to_string(),
        ..Default::default()
    })?;
    let smuggler = Smuggler::default();

    let alice = SenderRef::new("alice");
    let bob = SenderRef::new("bob");

    let lines = smuggler.observable::<ChatLine>();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Общая лента видит всех
    let feed_tx = tx.clone();
    let _feed = lines.sink(move |line| {
        let _ = feed_tx.send(format!("[feed]  {}: {}", line.author, line.text));
    });

    // Личная лента Алисы видит только её сообщения
    let alice_lines = smuggler.observable_from::<ChatLine>(&alice);
    let _mine = alice_lines.sink(move |line| {
        let _ = tx.send(format!("[alice] {}", line.text));
    });

    smuggler.publish_from(
        ChatLine {
            author: "alice",
            text: "hi bob".to_string(),
        },
        &alice,
    );
    smuggler.publish_from(
        ChatLine {
            author: "bob",
            text: "hi alice".to_string(),
        },
        &bob,
    );

    // Чужое сообщение под ключом ChatLine: будет залогировано и пропущено
    smuggler.broker().post(
        Message::new(ChatLine::channel_name())
            .with_entry(ChatLine::payload_key(), "not a chat line"),
    );

    sleep(Duration::from_millis(100)).await;
    rx.close();
    while let Some(line) = rx.recv().await {
        println!("{line}");
    }
    println!("dropped: {}", smuggler.dropped_count());
    Ok(())
}

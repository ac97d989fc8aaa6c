use std::time::Duration;

use smuggler::{init_from_settings, smuggled, Settings, Smuggled, Smuggler};
use tokio::time::timeout;

#[derive(Debug, Clone, PartialEq)]
struct Question {
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Answer {
    value: i64,
}

smuggled!(Question, Answer);

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let _logging = init_from_settings(&settings)?;
    let smuggler = Smuggler::from_settings(&settings);

    println!("=== Question / Answer ===");
    println!("questions on: {}", Question::channel_name());
    println!("answers on:   {}", Answer::channel_name());

    // Отвечающая сторона живёт в отдельной задаче
    let mut questions = smuggler.observe::<Question>();
    let responder = smuggler.clone();
    let oracle = tokio::spawn(async move {
        while let Some(question) = questions.next().await {
            tracing::info!(text = %question.text, "Question received");
            responder.publish(Answer { value: 42 });
        }
    });

    let mut answers = smuggler.observe::<Answer>();
    smuggler.publish(Question {
        text: "life, the universe and everything".to_string(),
    });

    match timeout(Duration::from_secs(1), answers.next()).await {
        Ok(Some(answer)) => println!("answer: {}", answer.value),
        Ok(None) => println!("answer channel closed"),
        Err(_) => println!("no answer within a second"),
    }

    smuggler
        .broker()
        .unsubscribe_all(&Question::channel_name());
    oracle.await?;

    println!(
        "published: {}, dropped: {}",
        smuggler.published_count(),
        smuggler.dropped_count()
    );
    Ok(())
}

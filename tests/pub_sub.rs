use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::StreamExt;
use smuggler::{
    smuggled, Broker, Message, SenderRef, Smuggled, Smuggler, TryRecvError, LEGACY_NAMESPACE,
};
use tokio::{sync::mpsc, time::timeout};

#[derive(Debug, Clone, PartialEq)]
struct Answer {
    value: i64,
}

impl Smuggled for Answer {
    const TYPE_NAME: &'static str = "Answer";
    const NAMESPACE: &'static str = "NS";
}

#[derive(Debug, Clone, PartialEq)]
struct Chat {
    text: String,
}

smuggled!(Chat);

#[derive(Debug, Clone, PartialEq)]
struct LegacyChat {
    text: String,
}

smuggled!(LegacyChat, namespace = LEGACY_NAMESPACE);

/// Тест проверяет основной сценарий: значение `Answer { value: 42 }`
/// публикуется в канал "NS:Answer" и ровно один раз доходит до активной
/// подписки, а сырое сообщение с чужим типом под тем же ключом до неё не
/// доходит.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_answer_scenario() {
    let smuggler = Smuggler::default();
    assert_eq!(&*Answer::channel_name(), "NS:Answer");

    let mut answers = smuggler.observe::<Answer>();
    let consumer = tokio::spawn(async move {
        let first = answers.next().await;
        (first, answers)
    });

    let producer = smuggler.clone();
    tokio::spawn(async move {
        producer.publish(Answer { value: 42 });
    })
    .await
    .unwrap();

    let (first, mut answers) = timeout(Duration::from_secs(1), consumer)
        .await
        .expect("timed out")
        .expect("consumer panicked");
    assert_eq!(first, Some(Answer { value: 42 }));

    smuggler
        .broker()
        .post(Message::new("NS:Answer").with_entry("NS:Answer", "not an answer"));
    assert_eq!(answers.try_next(), Err(TryRecvError::Empty));
    assert_eq!(smuggler.dropped_count(), 1);
}

/// Тест проверяет, что пустое сообщение на канале типа пропускается.
#[tokio::test]
async fn test_missing_payload_is_skipped() {
    let smuggler = Smuggler::default();
    let mut chats = smuggler.observe::<Chat>();

    smuggler.broker().post(Message::new(Chat::channel_name()));
    assert_eq!(chats.try_next(), Err(TryRecvError::Empty));
    assert_eq!(smuggler.decode::<Chat>(&Message::new(Chat::channel_name())), None);
}

/// Тест проверяет устойчивость потока: одно испорченное сообщение между
/// публикациями даёт ровно одно извлечённое значение и не обрывает поток.
#[tokio::test]
async fn test_stream_resilience() {
    let smuggler = Smuggler::default();
    let stream = smuggler.observe::<Chat>().into_stream();

    smuggler
        .broker()
        .post(Message::new(Chat::channel_name()).with_entry(Chat::payload_key(), 17_u64));
    smuggler.publish(Chat {
        text: "hello".into(),
    });
    smuggler.broker().unsubscribe_all(&Chat::channel_name());

    let got: Vec<Chat> = timeout(Duration::from_secs(1), stream.collect())
        .await
        .expect("timed out");
    assert_eq!(
        got,
        vec![Chat {
            text: "hello".into()
        }]
    );
}

/// Тест проверяет веерную доставку: две независимые подписки получают
/// одно и то же значение ровно по одному разу.
#[tokio::test]
async fn test_fan_out_pull() {
    let smuggler = Smuggler::default();
    let mut a = smuggler.observe::<Chat>();
    let mut b = smuggler.observable::<Chat>().subscribe();

    let chat = Chat {
        text: "fan-out".into(),
    };
    assert_eq!(smuggler.publish(chat.clone()), 2);

    assert_eq!(a.next().await, Some(chat.clone()));
    assert_eq!(b.next().await, Some(chat));
    assert_eq!(a.try_next(), Err(TryRecvError::Empty));
    assert_eq!(b.try_next(), Err(TryRecvError::Empty));
}

/// Тест проверяет фильтр отправителя: подписка на S1 видит только S1,
/// подписка без фильтра видит всех.
#[tokio::test]
async fn test_sender_filtering() {
    let smuggler = Smuggler::default();
    let s1 = SenderRef::new("first");
    let s2 = SenderRef::new("first");
    assert_ne!(s1, s2);

    let mut only_s1 = smuggler.observe_from::<Chat>(&s1);
    let mut anyone = smuggler.observe::<Chat>();

    let chat = |text: &str| Chat { text: text.into() };
    smuggler.publish_from(chat("from s2"), &s2);
    smuggler.publish_from(chat("from s1"), &s1);
    smuggler.publish(chat("unscoped"));

    assert_eq!(only_s1.next().await, Some(chat("from s1")));
    assert_eq!(only_s1.try_next(), Err(TryRecvError::Empty));

    assert_eq!(anyone.next().await, Some(chat("from s2")));
    assert_eq!(anyone.next().await, Some(chat("from s1")));
    assert_eq!(anyone.next().await, Some(chat("unscoped")));
}

/// Тест проверяет, что клон `SenderRef` сохраняет идентичность для
/// фильтра.
#[tokio::test]
async fn test_sender_identity_survives_clone() {
    let smuggler = Smuggler::default();
    let owner = Arc::new(String::from("owner"));
    let sender = SenderRef::from_arc(owner.clone());
    let mut scoped = smuggler.observe_from::<Chat>(&SenderRef::from_arc(owner));

    smuggler.publish_from(
        Chat {
            text: "mine".into(),
        },
        &sender.clone(),
    );

    assert_eq!(scoped.next().await.map(|c| c.text), Some("mine".to_string()));
}

/// Тест проверяет push-поток: два sink'а получают значение, отмена одного
/// не мешает второму.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_push_stream_fan_out_and_detach() {
    let smuggler = Smuggler::new(Broker::new(16));
    let chats = smuggler.observable::<Chat>();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let detached_hits = Arc::new(AtomicUsize::new(0));

    let keep = chats.sink(move |chat| {
        let _ = tx.send(chat.text);
    });
    let hits = detached_hits.clone();
    let detached = chats.sink(move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    smuggler.publish(Chat {
        text: "one".into(),
    });
    assert_eq!(
        timeout(Duration::from_secs(1), rx.recv()).await.unwrap(),
        Some("one".to_string())
    );

    detached.cancel();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let before = detached_hits.load(Ordering::SeqCst);

    smuggler.publish(Chat {
        text: "two".into(),
    });
    assert_eq!(
        timeout(Duration::from_secs(1), rx.recv()).await.unwrap(),
        Some("two".to_string())
    );
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(detached_hits.load(Ordering::SeqCst), before);
    assert!(!keep.is_finished());
}

/// Тест проверяет, что поколения протокола живут в разных каналах.
#[tokio::test]
async fn test_generations_do_not_mix() {
    let smuggler = Smuggler::default();
    let mut legacy = smuggler.observe::<LegacyChat>();
    let mut current = smuggler.observe::<Chat>();

    smuggler.publish(LegacyChat { text: "old".into() });

    assert_eq!(legacy.next().await.map(|c| c.text), Some("old".to_string()));
    assert_eq!(current.try_next(), Err(TryRecvError::Empty));
    assert!(LegacyChat::channel_name().starts_with("BetterNotification:"));
    assert!(Chat::channel_name().starts_with("NotificationSmuggler:"));
}

/// Тест проверяет, что отмена задачи-наблюдателя сразу освобождает
/// подписку в диспетчере.
#[tokio::test]
async fn test_cancelled_observer_detaches() {
    let smuggler = Smuggler::default();
    let channel = Chat::channel_name();
    let mut chats = smuggler.observe::<Chat>();
    assert_eq!(smuggler.broker().receiver_count(&channel), 1);

    let task = tokio::spawn(async move { chats.next().await });
    tokio::task::yield_now().await;
    task.abort();
    let _ = task.await;

    assert_eq!(smuggler.broker().receiver_count(&channel), 0);
}

fn publish_helper_event(smuggler: &Smuggler) -> String {
    #[derive(Debug, Clone, PartialEq)]
    #[allow(dead_code)]
    struct Event(u8);

    smuggled!(Event);

    smuggler.publish(Event(1));
    Event::channel_name().to_string()
}

/// Тест проверяет, что одноимённые типы из разных функций одного модуля
/// не получают сообщений друг друга.
#[tokio::test]
async fn test_same_named_types_do_not_share_channel() {
    #[derive(Debug, Clone, PartialEq)]
    struct Event(String);

    smuggled!(Event);

    let smuggler = Smuggler::default();
    let mut events = smuggler.observe::<Event>();

    let helper_channel = publish_helper_event(&smuggler);
    assert_ne!(helper_channel, Event::channel_name().to_string());
    assert_eq!(events.try_next(), Err(TryRecvError::Empty));
    assert_eq!(smuggler.dropped_count(), 0);

    smuggler.publish(Event("mine".into()));
    assert_eq!(events.next().await.map(|e| e.0), Some("mine".to_string()));
}

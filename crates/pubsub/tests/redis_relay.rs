//! Live relay test against a Redis instance.
//!
//! Run with `TEST_REDIS_PORT=6380 cargo test -p tutorium-pubsub -- --ignored`.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tutorium_core::services::{EventPublisher, MESSAGES_TOPIC, MessageProjection};
use tutorium_db::test_utils::TestRedisConfig;
use tutorium_pubsub::RedisPubSub;

#[tokio::test]
#[ignore = "requires running Redis instance"]
async fn test_published_message_reaches_other_instance() {
    let url = TestRedisConfig::default().redis_url();
    let channel = format!("tutorium:test:{}", Utc::now().timestamp_micros());

    let (tx_a, _) = broadcast::channel(16);
    let (tx_b, _) = broadcast::channel(16);
    let instance_a = RedisPubSub::new(&url, channel.clone(), tx_a).await.unwrap();
    let instance_b = RedisPubSub::new(&url, channel, tx_b).await.unwrap();
    instance_b.start().await.unwrap();
    let mut rx = instance_b.subscribe_local();

    let message = MessageProjection {
        id: 1,
        sender_id: 1,
        receiver_id: 2,
        chat_id: None,
        body: "hello".to_string(),
        created_at: Utc::now(),
    };
    instance_a
        .publish_message(MESSAGES_TOPIC, &message)
        .await
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.topic, MESSAGES_TOPIC);
    assert_eq!(event.body, message);

    instance_a.shutdown().await.unwrap();
    instance_b.shutdown().await.unwrap();
}

#![cfg(feature = "channel-subscriber")]

use spb_client::{
    channel::{ChannelSubscriber, SubscriptionRequest},
    DynSubscriber, InboundMessage, SubscribeError, Subscriber,
};

#[tokio::test]
async fn messages_arrive_in_order() {
    let (mut subscriber, publisher) = ChannelSubscriber::new();
    publisher.publish("a.b.NBIRTH.c", vec![1]).unwrap();
    publisher.publish("a.b.NDATA.c", vec![2]).unwrap();

    assert_eq!(
        subscriber.next_message().await,
        Some(InboundMessage::new("a.b.NBIRTH.c", vec![1]))
    );
    assert_eq!(subscriber.next_message().await.unwrap().payload, vec![2]);
}

#[tokio::test]
async fn dropping_sender_closes_subscription() {
    let (mut subscriber, publisher) = ChannelSubscriber::new();
    publisher.publish("a.b.NDATA.c", vec![]).unwrap();
    drop(publisher.tx_message);

    assert!(subscriber.next_message().await.is_some());
    assert!(subscriber.next_message().await.is_none());
}

#[tokio::test]
async fn requests_are_observable() {
    let (subscriber, mut publisher) = ChannelSubscriber::new();
    let mut subscriber: Box<DynSubscriber> = Box::new(subscriber);

    subscriber.subscribe("spBv1//0.>").await.unwrap();
    assert_eq!(
        subscriber.subscribe("").await,
        Err(SubscribeError::InvalidFilter(String::new()))
    );
    subscriber.unsubscribe().await.unwrap();

    assert_eq!(
        publisher.rx_requests.recv().await,
        Some(SubscriptionRequest::Subscribe("spBv1//0.>".into()))
    );
    assert_eq!(
        publisher.rx_requests.recv().await,
        Some(SubscriptionRequest::Unsubscribe)
    );
    assert!(publisher.publish("a.b.NDATA.c", vec![]).is_err());
}

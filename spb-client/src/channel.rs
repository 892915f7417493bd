use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{InboundMessage, SubscribeError};

/// A request made by a [ChannelSubscriber], observable through its [ChannelPublisher]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubscriptionRequest {
    Subscribe(String),
    Unsubscribe,
}

/// A [Subscriber](crate::Subscriber) implementation that receives messages over a channel.
///
/// # Examples
///
/// ```no_run
/// use spb_client::{InboundMessage, Subscriber, channel::ChannelSubscriber};
/// use tokio::runtime::Runtime;
///
/// let rt = Runtime::new().unwrap();
/// rt.block_on(async {
///     let (mut subscriber, mut publisher) = ChannelSubscriber::new();
///
///     publisher.publish("spBv1//0.g.NDATA.n", vec![]).unwrap();
///     let message = subscriber.next_message().await.unwrap();
///     assert_eq!(message.subject, "spBv1//0.g.NDATA.n");
/// });
/// ```
pub struct ChannelSubscriber {
    rx: mpsc::UnboundedReceiver<InboundMessage>,
    tx_requests: mpsc::UnboundedSender<SubscriptionRequest>,
}

/// The sending half of a [ChannelSubscriber].
///
/// Used to feed messages to the subscriber and inspect the requests it makes. Dropping
/// `tx_message` closes the subscription once the queued messages have been consumed.
pub struct ChannelPublisher {
    pub tx_message: mpsc::UnboundedSender<InboundMessage>,
    pub rx_requests: mpsc::UnboundedReceiver<SubscriptionRequest>,
}

impl ChannelPublisher {
    pub fn publish<S: Into<String>, P: Into<Vec<u8>>>(
        &self,
        subject: S,
        payload: P,
    ) -> Result<(), SubscribeError> {
        self.tx_message
            .send(InboundMessage::new(subject, payload))
            .map_err(|_| SubscribeError::Closed)
    }
}

impl ChannelSubscriber {
    /// Creates a new subscriber along with its publisher
    pub fn new() -> (Self, ChannelPublisher) {
        let (tx_message, rx) = mpsc::unbounded_channel();
        let (tx_requests, rx_requests) = mpsc::unbounded_channel();
        (
            Self { rx, tx_requests },
            ChannelPublisher {
                tx_message,
                rx_requests,
            },
        )
    }
}

#[async_trait]
impl crate::Subscriber for ChannelSubscriber {
    async fn subscribe(&mut self, filter: &str) -> Result<(), SubscribeError> {
        if filter.is_empty() {
            return Err(SubscribeError::InvalidFilter(filter.to_string()));
        }
        self.tx_requests
            .send(SubscriptionRequest::Subscribe(filter.to_string()))
            .map_err(|_| SubscribeError::Closed)
    }

    async fn next_message(&mut self) -> Option<InboundMessage> {
        self.rx.recv().await
    }

    async fn unsubscribe(&mut self) -> Result<(), SubscribeError> {
        self.rx.close();
        self.tx_requests
            .send(SubscriptionRequest::Unsubscribe)
            .map_err(|_| SubscribeError::Closed)
    }
}

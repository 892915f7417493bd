use async_trait::async_trait;

use crate::{InboundMessage, SubscribeError};

/// A source of raw messages from a publish/subscribe transport.
#[async_trait]
pub trait Subscriber {
    /// Subscribes to the subjects matching `filter`.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the subscription was accepted
    /// - `Err(SubscribeError)` if the transport rejected it
    async fn subscribe(&mut self, filter: &str) -> Result<(), SubscribeError>;

    /// Waits for the next message.
    ///
    /// Returns `None` once the subscription is closed and no further messages will arrive.
    async fn next_message(&mut self) -> Option<InboundMessage>;

    /// Ends the subscription.
    async fn unsubscribe(&mut self) -> Result<(), SubscribeError>;
}

pub type DynSubscriber = dyn Subscriber + Send;

#[async_trait]
impl<S: Subscriber + Send + ?Sized> Subscriber for Box<S> {
    async fn subscribe(&mut self, filter: &str) -> Result<(), SubscribeError> {
        (**self).subscribe(filter).await
    }

    async fn next_message(&mut self) -> Option<InboundMessage> {
        (**self).next_message().await
    }

    async fn unsubscribe(&mut self) -> Result<(), SubscribeError> {
        (**self).unsubscribe().await
    }
}

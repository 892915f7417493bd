use log::{debug, error, info, warn};
use serde::Serialize;
use spb_client::{InboundMessage, SubscribeError, Subscriber};
use spb_types::message::{decode_message_with, PayloadDecoder, ProstDecoder};
use thiserror::Error;
use tokio::{
    select,
    sync::mpsc::{self, Receiver},
};

use crate::{config::HostConfig, store::MessageStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("unable to subscribe: {0}")]
    Subscribe(#[from] SubscribeError),
}

/// Counters describing what an [Ingestor] did over its lifetime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub received: u64,
    pub stored: u64,
    /// Messages dropped because their subject or payload could not be decoded
    pub rejected: u64,
    pub store_failures: u64,
}

struct Shutdown;

/// Handle used to stop a running [Ingestor]
#[derive(Clone)]
pub struct IngestHandle(mpsc::Sender<Shutdown>);

impl IngestHandle {
    /// Stop the ingestor.
    ///
    /// This will cancel [Ingestor::run()] once the message being handled has been stored.
    pub async fn cancel(&self) {
        info!("Ingestor stopping");
        _ = self.0.send(Shutdown).await;
    }
}

/// The write path of the host.
///
/// Receives raw messages from a [Subscriber], decodes them and hands them to a [MessageStore].
/// Messages that fail to decode or store are logged and skipped.
pub struct Ingestor<S, M> {
    subscriber: S,
    store: M,
    subject_filter: String,
    decoder: Box<dyn PayloadDecoder + Send + Sync>,
    shutdown_rx: Receiver<Shutdown>,
}

impl<S, M> Ingestor<S, M>
where
    S: Subscriber + Send,
    M: MessageStore + Send + Sync,
{
    /// Creates a new ingestor along with the handle used to stop it.
    pub fn new(subscriber: S, store: M) -> (Self, IngestHandle) {
        let (tx, rx) = mpsc::channel(1);
        let ingestor = Self {
            subscriber,
            store,
            subject_filter: HostConfig::default().subject_filter,
            decoder: Box::new(ProstDecoder),
            shutdown_rx: rx,
        };
        (ingestor, IngestHandle(tx))
    }

    /// Creates an ingestor subscribing with the filter from `config`
    pub fn from_config(config: &HostConfig, subscriber: S, store: M) -> (Self, IngestHandle) {
        let (ingestor, handle) = Self::new(subscriber, store);
        (ingestor.with_subject_filter(config.subject_filter.clone()), handle)
    }

    pub fn with_subject_filter<F: Into<String>>(mut self, filter: F) -> Self {
        self.subject_filter = filter.into();
        self
    }

    /// Replace the payload decoder
    pub fn with_decoder<D: PayloadDecoder + Send + Sync + 'static>(mut self, decoder: D) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    async fn handle_message(
        store: &M,
        decoder: &(dyn PayloadDecoder + Send + Sync),
        inbound: InboundMessage,
        stats: &mut IngestStats,
    ) {
        stats.received += 1;
        let message = match decode_message_with(decoder, &inbound.subject, &inbound.payload) {
            Ok(message) => message,
            Err(e) => {
                warn!("Error decoding message on {} - discarding: {e}", inbound.subject);
                stats.rejected += 1;
                return;
            }
        };

        debug!("Received: {}", inbound.subject);
        match store.store_message(&message).await {
            Ok(()) => stats.stored += 1,
            Err(e) => {
                warn!("Error saving message on {} to the store: {e}", inbound.subject);
                stats.store_failures += 1;
            }
        }
    }

    async fn close_store(store: &M) {
        if let Err(e) = store.close().await {
            warn!("Unable to close the store: {e}");
        }
    }

    /// Run the ingestor until the subscription closes or it is cancelled through its
    /// [IngestHandle].
    ///
    /// The subscriber is unsubscribed and the store closed before returning.
    pub async fn run(mut self) -> Result<IngestStats, IngestError> {
        if let Err(e) = self.subscriber.subscribe(&self.subject_filter).await {
            error!("Unable to subscribe to {}: {e}", self.subject_filter);
            Self::close_store(&self.store).await;
            return Err(e.into());
        }
        info!("Subscribed to {}", self.subject_filter);

        let mut stats = IngestStats::default();
        loop {
            select! {
                message = self.subscriber.next_message() => {
                    match message {
                        Some(message) => {
                            let decoder = self.decoder.as_ref();
                            Self::handle_message(&self.store, decoder, message, &mut stats).await
                        }
                        None => {
                            info!("Subscription closed");
                            break;
                        }
                    }
                }
                Some(Shutdown) = self.shutdown_rx.recv() => break,
            }
        }

        if let Err(e) = self.subscriber.unsubscribe().await {
            debug!("Unable to unsubscribe on exit: {e}");
        }
        Self::close_store(&self.store).await;
        info!(
            "Ingestor stopped. received = {}, stored = {}, rejected = {}, store failures = {}",
            stats.received, stats.stored, stats.rejected, stats.store_failures
        );
        Ok(stats)
    }
}

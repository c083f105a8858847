use std::path::PathBuf;
use std::sync::Arc;

use clipper_core::{assemble_document, document_filename, DocumentNameError, MessageMetadata};
use clipper_logging::{clip_info, clip_warn};
use serde::{Deserialize, Deserializer};

use crate::fetch::Fetcher;
use crate::persist::{ensure_document_dir, DocumentStore, PersistError};
use crate::resolver::{ResolveError, Resolver};
use crate::types::FetchError;

/// One entry of the message endpoint's JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMessage {
    pub message_id: String,
    pub text: String,
    /// Epoch milliseconds (number or decimal string) or RFC 3339.
    #[serde(deserialize_with = "timestamp_as_string")]
    pub timestamp: String,
}

impl LineMessage {
    pub fn metadata(&self) -> MessageMetadata {
        MessageMetadata::new(self.timestamp.clone(), self.message_id.clone())
    }
}

fn timestamp_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Millis(millis) => millis.to_string(),
    })
}

pub fn parse_messages(body: &[u8]) -> Result<Vec<LineMessage>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Failures that stop a sync pass before any message is handled.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to fetch messages: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to parse messages: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    DocumentDir(#[from] PersistError),
}

/// Failure of a single message; recorded, never fatal for the batch.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error(transparent)]
    Name(#[from] DocumentNameError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("failed to write document: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug)]
pub enum MessageOutcome {
    Saved(PathBuf),
    /// A document for this message already exists.
    Skipped(PathBuf),
    Failed(MessageError),
}

#[derive(Debug)]
pub struct MessageReport {
    pub message_id: String,
    pub outcome: MessageOutcome,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub messages: Vec<MessageReport>,
}

impl SyncReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Saved(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MessageOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&MessageOutcome) -> bool) -> usize {
        self.messages.iter().filter(|m| pred(&m.outcome)).count()
    }
}

/// Pulls the message list and stores one document per new message.
///
/// Messages are handled one at a time, in endpoint order.
pub struct Syncer {
    fetcher: Arc<dyn Fetcher>,
    resolver: Resolver,
    endpoint: String,
    store: DocumentStore,
}

impl Syncer {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        endpoint: impl Into<String>,
        document_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver: Resolver::new(fetcher.clone()),
            fetcher,
            endpoint: endpoint.into(),
            store: DocumentStore::new(document_dir),
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub async fn fetch_messages(&self) -> Result<Vec<LineMessage>, SyncError> {
        let output = self.fetcher.fetch(&self.endpoint).await?;
        Ok(parse_messages(&output.bytes)?)
    }

    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        ensure_document_dir(self.store.dir())?;
        let messages = self.fetch_messages().await?;
        clip_info!("Fetched {} messages", messages.len());

        let mut report = SyncReport::default();
        for message in &messages {
            let outcome = self.sync_message(message).await;
            match &outcome {
                MessageOutcome::Saved(path) => {
                    clip_info!("Saved message {} to {:?}", message.message_id, path)
                }
                MessageOutcome::Skipped(path) => {
                    clip_info!("Message {} already stored at {:?}", message.message_id, path)
                }
                MessageOutcome::Failed(err) => {
                    clip_warn!("Message {} failed: {}", message.message_id, err)
                }
            }
            report.messages.push(MessageReport {
                message_id: message.message_id.clone(),
                outcome,
            });
        }

        clip_info!(
            "Sync finished: {} saved, {} skipped, {} failed",
            report.saved(),
            report.skipped(),
            report.failed()
        );
        Ok(report)
    }

    pub async fn sync_message(&self, message: &LineMessage) -> MessageOutcome {
        match self.store_message(message).await {
            Ok(outcome) => outcome,
            Err(err) => MessageOutcome::Failed(err),
        }
    }

    async fn store_message(&self, message: &LineMessage) -> Result<MessageOutcome, MessageError> {
        let metadata = message.metadata();
        let filename = document_filename(&metadata)?;
        if self.store.contains(&filename) {
            return Ok(MessageOutcome::Skipped(self.store.path_of(&filename)));
        }

        let content = self.resolver.resolve(&message.text).await?;
        let document = assemble_document(&content, &metadata);
        match self.store.create(&filename, &document) {
            Ok(path) => Ok(MessageOutcome::Saved(path)),
            Err(PersistError::AlreadyExists(path)) => Ok(MessageOutcome::Skipped(path)),
            Err(err) => Err(err.into()),
        }
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use clipper_engine::{FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher};

/// In-memory fetcher: serves canned responses and records every requested URL.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Result<(Vec<u8>, Option<String>), u16>>,
    redirects: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok((body.as_bytes().to_vec(), Some(content_type.to_string()))),
        );
        self
    }

    pub fn with_html(self, url: &str, body: &str) -> Self {
        self.with_page(url, "text/html; charset=utf-8", body)
    }

    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.with_page(url, "text/plain; charset=utf-8", body)
    }

    pub fn with_bytes(mut self, url: &str, body: &[u8], content_type: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok((body.to_vec(), Some(content_type.to_string()))),
        );
        self
    }

    /// Report `to` as the final URL of the response served for `from`.
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Ok((bytes, content_type))) => Ok(FetchOutput {
                bytes: bytes.clone(),
                metadata: FetchMetadata {
                    final_url: self
                        .redirects
                        .get(url)
                        .cloned()
                        .unwrap_or_else(|| url.to_string()),
                    content_type: content_type.clone(),
                },
            }),
            Some(Err(status)) => Err(FetchError::new(
                FailureKind::HttpStatus(*status),
                format!("status {status}"),
            )),
            None => Err(FetchError::new(FailureKind::Network, "connection refused")),
        }
    }
}

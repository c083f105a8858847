use std::sync::Arc;

use clipper_core::{parse_repo_path, rewrite_host, Content, Strategy};
use scraper::Html;

use crate::convert::{Converter, MarkdownConverter};
use crate::decode::{decode_body, DecodeError};
use crate::extract::{Extractor, ReadabilityLikeExtractor};
use crate::fetch::Fetcher;
use crate::types::{FetchError, FetchOutput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("page has no usable title")]
    MissingTitle,
    #[error("page has no readable content")]
    EmptyContent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not parse response body: {0}")]
    Parse(#[from] DecodeError),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Turns one raw input message into a [`Content`] record.
///
/// The fetcher, extractor and converter are injected so each capability can
/// be replaced independently. Every call builds its own markup tree; the
/// resolver holds no per-call state and never logs.
#[derive(Clone)]
pub struct Resolver {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    converter: Arc<dyn Converter>,
}

impl Resolver {
    /// Resolver with the built-in extractor and an ATX-heading converter.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(ReadabilityLikeExtractor),
            converter: Arc::new(MarkdownConverter::new()),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = converter;
        self
    }

    pub async fn resolve(&self, input: &str) -> Result<Content, ResolveError> {
        match Strategy::classify(input) {
            Strategy::Identity => Ok(Content::plain_text(input)),
            Strategy::Web => self.fetch_web(input).await,
            Strategy::Repository => self.fetch_repo(input).await,
        }
    }

    /// Fetch a page, extract its readable part and convert it to Markdown.
    pub async fn fetch_web(&self, url: &str) -> Result<Content, ResolveError> {
        let output = self.fetcher.fetch(url).await?;
        let html = decode(&output)?;
        let document = Html::parse_document(&html);

        let extracted = self.extractor.extract(&document);
        let title = extracted
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExtractionError::MissingTitle)?;

        let base_url = &output.metadata.final_url;
        let markdown = self
            .converter
            .to_markdown(&extracted.content_html, Some(base_url));
        if markdown.trim().is_empty() {
            return Err(ExtractionError::EmptyContent.into());
        }

        Ok(Content::web(title, markdown, url))
    }

    /// Fetch the flattened text view of a repository. A URL without an
    /// `/{owner}/{repository}` path still resolves, with an empty title.
    pub async fn fetch_repo(&self, url: &str) -> Result<Content, ResolveError> {
        let repo = parse_repo_path(url).ok();
        let output = self.fetcher.fetch(&rewrite_host(url)).await?;
        let listing = decode(&output)?;
        Ok(Content::repository(repo.as_ref(), listing, url))
    }
}

fn decode(output: &FetchOutput) -> Result<String, DecodeError> {
    decode_body(&output.bytes, output.metadata.content_type.as_deref())
}

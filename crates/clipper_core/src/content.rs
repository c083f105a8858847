use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::strategy::RepoPath;

/// Tag attached to repository content.
pub const GITHUB_TAG: &str = "github";

/// Provenance of a resolved [`Content`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Source {
    /// Plain chat text, stored as-is.
    #[serde(rename = "LINE")]
    Line,
    /// A web page run through extraction and conversion.
    Web,
    /// A source repository flattened by the tree viewer.
    GitHub,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Line => "LINE",
            Source::Web => "Web",
            Source::GitHub => "GitHub",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source tag {0:?}")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LINE" => Ok(Source::Line),
            "Web" => Ok(Source::Web),
            "GitHub" => Ok(Source::GitHub),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// Normalized record produced by resolving one input message.
///
/// Records are only built through the per-strategy constructors, so the
/// `source` tag always matches the strategy that produced the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    title: String,
    content: String,
    source: Source,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl Content {
    /// Identity record: the message is both title and body.
    pub fn plain_text(message: &str) -> Self {
        Self {
            title: message.to_string(),
            content: message.to_string(),
            source: Source::Line,
            tags: Vec::new(),
            url: None,
        }
    }

    /// Web record. `markdown` must already be the converted page body.
    pub fn web(title: impl Into<String>, markdown: impl Into<String>, url: &str) -> Self {
        Self {
            title: title.into(),
            content: markdown.into(),
            source: Source::Web,
            tags: Vec::new(),
            url: Some(url.to_string()),
        }
    }

    /// Repository record. A missing `repo` (malformed URL) leaves the title empty.
    pub fn repository(repo: Option<&RepoPath>, listing: impl Into<String>, url: &str) -> Self {
        Self {
            title: repo.map(RepoPath::to_string).unwrap_or_default(),
            content: listing.into(),
            source: Source::GitHub,
            tags: vec![GITHUB_TAG.to_string()],
            url: Some(url.to_string()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

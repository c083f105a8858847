use std::fmt;

/// Prefix that routes an input to the repository strategy.
pub const REPOSITORY_PREFIX: &str = "https://github.com/";
/// Prefix that routes an input to the web strategy.
pub const WEB_PREFIX: &str = "https://";
/// Source-hosting domain that gets swapped out for the tree viewer.
pub const REPOSITORY_HOST: &str = "github.com";
/// Companion domain that serves a flattened text view of a repository.
pub const TREE_VIEWER_HOST: &str = "uithub.com";

/// How an input message is turned into content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Plain text, no network access.
    Identity,
    /// Generic web page: fetch, extract, convert.
    Web,
    /// Source repository: fetch the flattened tree as text.
    Repository,
}

impl Strategy {
    /// Pure prefix classification. Order matters: every repository URL is
    /// also an `https://` URL, so the repository prefix is checked first.
    pub fn classify(input: &str) -> Self {
        if input.starts_with(REPOSITORY_PREFIX) {
            Strategy::Repository
        } else if input.starts_with(WEB_PREFIX) {
            Strategy::Web
        } else {
            Strategy::Identity
        }
    }
}

/// Swap the repository host for the tree viewer host.
///
/// This is a plain substring replacement of the first occurrence, not a URL
/// re-parse: path and query are kept byte for byte, and any later occurrence
/// of the host string (e.g. inside a query parameter) is left untouched.
pub fn rewrite_host(url: &str) -> String {
    url.replacen(REPOSITORY_HOST, TREE_VIEWER_HOST, 1)
}

/// `owner/repository` pair taken from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPath {
    pub owner: String,
    pub repository: String,
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository)
    }
}

/// The URL had no `/{owner}/{repository}` segments after the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed repository url {url:?}: expected /owner/repository after github.com")]
pub struct MalformedInput {
    pub url: String,
}

/// Extract `owner` and `repository` from the two path segments right after
/// the repository host. Segments end at `/`, `?` or `#`.
pub fn parse_repo_path(url: &str) -> Result<RepoPath, MalformedInput> {
    let malformed = || MalformedInput {
        url: url.to_string(),
    };
    let marker = format!("{REPOSITORY_HOST}/");
    let start = url.find(&marker).ok_or_else(malformed)? + marker.len();
    let path = &url[start..];

    let mut segments = path.split(['/', '?', '#']);
    let owner = segments.next().unwrap_or_default();
    let repository = segments.next().unwrap_or_default();
    if owner.is_empty() || repository.is_empty() {
        return Err(malformed());
    }
    // A query or fragment right after the owner means there is no repository segment.
    let owner_end = start + owner.len();
    if url[owner_end..].starts_with(['?', '#']) {
        return Err(malformed());
    }

    Ok(RepoPath {
        owner: owner.to_string(),
        repository: repository.to_string(),
    })
}

//! Clipper core: pure content types, input classification and document assembly.
mod content;
mod document;
mod filename;
mod strategy;

pub use content::{Content, Source, UnknownSource, GITHUB_TAG};
pub use document::{
    assemble_document, iso_date, parse_front_matter, parse_timestamp, FrontMatter,
    FrontMatterError, MessageMetadata,
};
pub use filename::{document_filename, DocumentNameError};
pub use strategy::{
    parse_repo_path, rewrite_host, MalformedInput, RepoPath, Strategy, REPOSITORY_HOST,
    REPOSITORY_PREFIX, TREE_VIEWER_HOST, WEB_PREFIX,
};

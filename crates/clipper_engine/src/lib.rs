//! Clipper engine: fetching, markup extraction and conversion, and message sync.
mod convert;
mod decode;
mod extract;
mod fetch;
mod persist;
mod resolver;
mod sync;
mod types;

pub use convert::{Converter, HeadingStyle, MarkdownConverter};
pub use decode::{decode_body, DecodeError};
pub use extract::{ExtractedContent, Extractor, ReadabilityLikeExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_document_dir, DocumentStore, PersistError};
pub use resolver::{ExtractionError, ResolveError, Resolver};
pub use sync::{
    parse_messages, LineMessage, MessageError, MessageOutcome, MessageReport, SyncError,
    SyncReport, Syncer,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};

pub use scraper::Html;

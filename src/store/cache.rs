use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::markdown::ParsedDocument;

/// Hex SHA-256 of the document text.
pub fn content_digest(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

/// Last successful parse, keyed by the exact text it came from.
pub(crate) struct CachedDocument {
    digest: String,
    pub(crate) parsed: Arc<ParsedDocument>,
}

impl CachedDocument {
    pub(crate) fn new(source: &str, parsed: ParsedDocument) -> Self {
        Self {
            digest: content_digest(source),
            parsed: Arc::new(parsed),
        }
    }

    pub(crate) fn matches(&self, source: &str) -> bool {
        self.digest == content_digest(source)
    }
}

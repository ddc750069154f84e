use std::fmt;

use super::config::RequestMethod;
use crate::listing::DirectoryEntry;

/// Identity of the element a picker is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(String);

impl TriggerId {
    pub fn new(id: impl Into<String>) -> Self {
        TriggerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags every listing request so its reply can be matched to the popup
/// session and row that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub trigger: TriggerId,
    /// Incremented each time the popup opens.
    pub session: u64,
    pub seq: u64,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}.{}", self.trigger, self.session, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub id: RequestId,
    pub endpoint: String,
    pub method: RequestMethod,
    /// Directory relative to the base, as last reported by the server.
    pub dir: String,
    pub base_directory: String,
}

/// Completion of a [`ListingRequest`]. The error is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingReply {
    pub id: RequestId,
    pub result: Result<Vec<DirectoryEntry>, String>,
}

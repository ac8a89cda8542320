use super::tag::Tag;

/// Monotonic id stamped on each issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

/// A query sent to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub query: String,
}

/// The endpoint's answer to one request. Failures carry a short reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub token: RequestToken,
    pub outcome: Result<Vec<Tag>, String>,
}

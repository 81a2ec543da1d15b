//! Search suggestion API.
//!
//! Endpoint: `GET /api/search/suggest/web?s=<keyword>&limit=<n>`
//!
//! Response JSON:
//! ```json
//! {
//!   "code": 200,
//!   "result": {
//!     "songs":     [ { "id": 347230, "name": "...", "artists": [...], "album": {...} } ],
//!     "albums":    [ { "id": 34209, "name": "...", "artist": {...} } ],
//!     "artists":   [ { "id": 11127, "name": "..." } ],
//!     "playlists": [ { "id": 101, "name": "...", "trackCount": 50 } ],
//!     "order": ["songs", "artists", "albums", "playlists"]
//!   }
//! }
//! ```
//!
//! Groups with no match are omitted by the server.

use crate::client::{Music163Client, ensure_code};
use crate::error::Result;
use crate::query::QueryOptions;
use crate::types::{SearchSuggestResult, SearchSuggestion};

pub(crate) const SEARCH_SUGGEST_PATH: &str = "search/suggest/web";

/// Options for [`Music163Client::search_suggest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Search keyword (`s`).
    pub keyword: String,
    /// Maximum entries per group (`limit`); server default when `None`.
    pub limit: Option<u32>,
}

impl SearchOptions {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            limit: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl QueryOptions for SearchOptions {
    fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let mut pairs = vec![("s", self.keyword.clone())];
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        Ok(pairs)
    }
}

impl Music163Client {
    /// Search-as-you-type suggestions for songs, albums, artists and
    /// playlists.
    ///
    /// # Errors
    ///
    /// - [`Music163Error::Transport`](crate::Music163Error::Transport) — network failure
    /// - [`Music163Error::Api`](crate::Music163Error::Api) — non-2xx status
    /// - [`Music163Error::Code`](crate::Music163Error::Code) — body `code` other than 200
    pub fn search_suggest(&self, options: &SearchOptions) -> Result<SearchSuggestion> {
        let resp: SearchSuggestResult = self.get_json(SEARCH_SUGGEST_PATH, Some(options))?;
        ensure_code(resp.code, resp.message.as_deref())?;
        Ok(resp.result)
    }
}

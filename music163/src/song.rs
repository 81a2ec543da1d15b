//! Song detail API.
//!
//! Endpoint: `GET /api/song/detail?id=<first id>&ids=[<id>,<id>,...]`
//!
//! `ids` is a JSON array; `id` repeats the first entry.
//!
//! Response JSON:
//! ```json
//! {
//!   "code": 200,
//!   "songs": [{
//!     "id": 347230, "name": "...",
//!     "artists": [ { "id": 11127, "name": "..." } ],
//!     "album": { "id": 34209, "name": "...", "picUrl": "..." },
//!     "duration": 326000,
//!     "mp3Url": "http://m2.music.126.net/..."
//!   }]
//! }
//! ```
//!
//! Unknown ids are silently dropped from `songs`.

use crate::client::{Music163Client, ensure_code};
use crate::error::{Music163Error, Result};
use crate::query::QueryOptions;
use crate::types::{Song, SongDetailResult};

pub(crate) const SONG_DETAIL_PATH: &str = "song/detail";

/// Query options for `song/detail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDetailOptions {
    pub ids: Vec<u64>,
}

impl QueryOptions for SongDetailOptions {
    fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let first = self
            .ids
            .first()
            .ok_or_else(|| Music163Error::Encoding("at least one song id is required".into()))?;
        let ids =
            serde_json::to_string(&self.ids).map_err(|e| Music163Error::Encoding(e.to_string()))?;
        Ok(vec![("id", first.to_string()), ("ids", ids)])
    }
}

impl Music163Client {
    /// Get metadata for several songs in one call.
    ///
    /// Songs come back in server order; ids the server does not know are
    /// missing from the result.
    pub fn song_detail(&self, ids: &[u64]) -> Result<Vec<Song>> {
        let options = SongDetailOptions { ids: ids.to_vec() };
        let resp: SongDetailResult = self.get_json(SONG_DETAIL_PATH, Some(&options))?;
        ensure_code(resp.code, resp.message.as_deref())?;
        Ok(resp.songs)
    }

    /// Get metadata for one song.
    ///
    /// # Errors
    ///
    /// [`Music163Error::NotFound`] if the server returns no song for `id`.
    pub fn song(&self, id: u64) -> Result<Song> {
        self.song_detail(&[id])?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(Music163Error::NotFound { resource: "song", id })
    }
}

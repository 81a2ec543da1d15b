//! Playlist API.
//!
//! Endpoint: `GET /api/playlist/detail?id=<id>`
//!
//! Response:
//! ```json
//! {
//!   "code": 200,
//!   "result": {
//!     "id": 123456,
//!     "name": "...",
//!     "description": "...",
//!     "coverImgUrl": "http://p1.music.126.net/...",
//!     "trackCount": 50,
//!     "playCount": 10086,
//!     "creator": { "userId": 789, "nickname": "..." },
//!     "tracks": [
//!       { "id": 1, "name": "...", "artists": [...], "album": {...}, "duration": 240000 },
//!       ...
//!     ]
//!   }
//! }
//! ```

use crate::client::{Music163Client, ensure_code};
use crate::error::Result;
use crate::query::IdQuery;
use crate::types::{Playlist, PlaylistResult};

pub(crate) const PLAYLIST_DETAIL_PATH: &str = "playlist/detail";

impl Music163Client {
    /// Get playlist detail including all tracks.
    ///
    /// Does not require login for public playlists.
    pub fn playlist_detail(&self, id: u64) -> Result<Playlist> {
        let resp: PlaylistResult = self.get_json(PLAYLIST_DETAIL_PATH, Some(&IdQuery(id)))?;
        ensure_code(resp.code, resp.message.as_deref())?;
        Ok(resp.result)
    }
}

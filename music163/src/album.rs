//! Album API.
//!
//! Endpoint: `GET /api/album/{id}`
//!
//! Response JSON:
//! ```json
//! {
//!   "code": 200,
//!   "album": {
//!     "id": 34209, "name": "...", "picUrl": "http://p1.music.126.net/...",
//!     "publishTime": 746812800000, "company": "...", "size": 10,
//!     "artists": [ { "id": 11127, "name": "..." } ],
//!     "songs": [ { "id": 347230, "name": "...", "duration": 326000, ... } ]
//!   }
//! }
//! ```

use crate::client::{Music163Client, ensure_code};
use crate::error::Result;
use crate::types::{Album, AlbumResult};

pub(crate) fn album_path(id: u64) -> String {
    format!("album/{id}")
}

impl Music163Client {
    /// Get an album with its track list.
    pub fn album(&self, id: u64) -> Result<Album> {
        let resp: AlbumResult = self.get_json(&album_path(id), None)?;
        ensure_code(resp.code, resp.message.as_deref())?;
        Ok(resp.album)
    }
}

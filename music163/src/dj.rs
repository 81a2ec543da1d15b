//! Radio program API.
//!
//! Endpoint: `GET /api/dj/program/detail?id=<id>`
//!
//! Response:
//! ```json
//! {
//!   "code": 200,
//!   "program": {
//!     "id": 793116451, "name": "...", "duration": 1800000,
//!     "listenerCount": 1234, "coverUrl": "...",
//!     "mainSong": { "id": 1, "name": "...", "mp3Url": "..." },
//!     "radio": { "id": 7, "name": "...", "programCount": 120 },
//!     "dj": { "userId": 9, "nickname": "..." }
//!   }
//! }
//! ```

use crate::client::{Music163Client, ensure_code};
use crate::error::Result;
use crate::query::IdQuery;
use crate::types::{DjProgram, DjProgramResult};

pub(crate) const DJ_PROGRAM_PATH: &str = "dj/program/detail";

impl Music163Client {
    /// Get a radio program (episode) with its audio track and station.
    pub fn dj_program(&self, id: u64) -> Result<DjProgram> {
        let resp: DjProgramResult = self.get_json(DJ_PROGRAM_PATH, Some(&IdQuery(id)))?;
        ensure_code(resp.code, resp.message.as_deref())?;
        Ok(resp.program)
    }
}

//! Blocking client for the music.163.com web API.
//!
//! Every endpoint goes through one pipeline: query options are encoded onto
//! a path, the path is resolved against the base endpoint
//! (`http://music.163.com/api/`), the request gets the fixed `Referer` and
//! `User-Agent` headers, and the response is either decoded as JSON, copied
//! to a byte sink, or discarded. Any status outside `200..=299` becomes a
//! [`Music163Error::Api`] carrying the server's message and field errors.
//!
//! ```no_run
//! use music163::{Music163Client, SearchOptions};
//!
//! let client = Music163Client::new(None).unwrap();
//! let hits = client.search_suggest(&SearchOptions::new("beyond").limit(5)).unwrap();
//! for song in &hits.songs {
//!     println!("[{}] {} - {}", song.id, song.artist_names(), song.name);
//! }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                               | Endpoint              | Description            |
//! |--------------------------------------|-----------------------|------------------------|
//! | [`Music163Client::search_suggest`]   | `/search/suggest/web` | Search suggestions     |
//! | [`Music163Client::album`]            | `/album/{id}`         | Album with tracks      |
//! | [`Music163Client::song_detail`]      | `/song/detail`        | Song metadata          |
//! | [`Music163Client::playlist_detail`]  | `/playlist/detail`    | Playlist with tracks   |
//! | [`Music163Client::dj_program`]       | `/dj/program/detail`  | Radio program          |
//! | [`Music163Client::download`]         | any path or URL       | Raw bytes to a sink    |
//!
//! Lower-level access is available through [`Music163Client::new_request`]
//! and [`Music163Client::execute`] with a [`Destination`].

mod album;
pub mod client;
mod dj;
pub mod error;
mod playlist;
pub mod query;
pub mod response;
mod search;
mod song;
pub mod types;

pub use client::{ClientBuilder, Music163Client};
pub use error::{ErrorResponse, FieldError, Music163Error, Result};
pub use query::{IdQuery, QueryOptions, add_options};
pub use response::{Destination, JsonTarget, ResponseInfo};
pub use search::SearchOptions;
pub use song::SongDetailOptions;

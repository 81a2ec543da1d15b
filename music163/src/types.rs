//! Data types for music.163.com API responses.
//!
//! Field names follow Rust conventions (`snake_case`); serde maps them to the
//! API's camelCase. Every field defaults when absent, since the same object
//! (a song, an album) comes back with different subsets of fields depending
//! on the endpoint.
//!
//! The `*Result` types are the raw response envelopes. They carry the
//! body-level `code` and are what the endpoint methods decode into.

use serde::{Deserialize, Serialize};

/// A music artist.
///
/// API JSON fields: `id`, `name`, `picUrl`, `alias`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    /// Alternative names (translations, romanizations).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
}

/// An album.
///
/// Returned by [`Music163Client::album`](crate::Music163Client::album) with
/// `songs` populated, and embedded in every [`Song`] without them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub name: String,
    /// Cover image URL (e.g. `http://p1.music.126.net/...jpg`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    /// Release date, milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of tracks.
    pub size: u64,
    pub artists: Vec<Artist>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<Song>,
}

/// A song (track).
///
/// API JSON fields: `id`, `name`, `artists`, `album`, `duration`
/// (milliseconds), `mp3Url` (direct stream, often absent), `popularity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Song {
    pub id: u64,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    /// Duration in milliseconds.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp3_url: Option<String>,
    pub popularity: f64,
}

impl Song {
    /// Artist names joined with `" / "`.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Abbreviated user info: playlist creators and radio hosts.
///
/// API JSON fields: `userId`, `nickname`, `avatarUrl`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserBrief {
    pub user_id: u64,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// A playlist.
///
/// `tracks` is only populated by
/// [`Music163Client::playlist_detail`](crate::Music163Client::playlist_detail).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_img_url: Option<String>,
    pub track_count: u64,
    pub play_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserBrief>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<Song>,
}

/// A radio station ("DJ radio") that programs belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DjRadio {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub program_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dj: Option<UserBrief>,
}

/// A single radio program (episode).
///
/// The audio itself is `main_song`; `songs` lists tracks played in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DjProgram {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Duration in milliseconds.
    pub duration: u64,
    pub listener_count: u64,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_song: Option<Song>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<Song>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio: Option<DjRadio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dj: Option<UserBrief>,
}

/// Search suggestions, grouped by kind.
///
/// `order` lists which groups the server considers relevant, most relevant
/// first (e.g. `["songs", "artists"]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSuggestion {
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub playlists: Vec<Playlist>,
    pub order: Vec<String>,
}

impl SearchSuggestion {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
            && self.albums.is_empty()
            && self.artists.is_empty()
            && self.playlists.is_empty()
    }
}

/// Envelope of `search/suggest/web`: `{ "code": 200, "result": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSuggestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: SearchSuggestion,
}

/// Envelope of `album/{id}`: `{ "code": 200, "album": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub album: Album,
}

/// Envelope of `song/detail`: `{ "code": 200, "songs": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongDetailResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub songs: Vec<Song>,
}

/// Envelope of `playlist/detail`: `{ "code": 200, "result": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: Playlist,
}

/// Envelope of `dj/program/detail`: `{ "code": 200, "program": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DjProgramResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(alias = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub program: DjProgram,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_song_detail() {
        let json = r#"{"songs":[{"id":1,"name":"A"}],"code":200}"#;
        let res: SongDetailResult = serde_json::from_str(json).unwrap();
        assert_eq!(res.code, Some(200));
        assert_eq!(res.songs.len(), 1);
        assert_eq!(res.songs[0].id, 1);
        assert_eq!(res.songs[0].name, "A");
        assert!(res.songs[0].artists.is_empty());
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{"id":5,"name":"Mix","coverImgUrl":"http://img","trackCount":2,"playCount":99,
            "creator":{"userId":8,"nickname":"dj"},"unknownField":true}"#;
        let p: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(p.cover_img_url.as_deref(), Some("http://img"));
        assert_eq!(p.track_count, 2);
        assert_eq!(p.play_count, 99);
        assert_eq!(p.creator.unwrap().nickname, "dj");
    }

    #[test]
    fn test_msg_alias() {
        let res: AlbumResult = serde_json::from_str(r#"{"code":404,"msg":"gone"}"#).unwrap();
        assert_eq!(res.code, Some(404));
        assert_eq!(res.message.as_deref(), Some("gone"));
    }

    #[test]
    fn test_round_trip() {
        let song = Song {
            id: 347_230,
            name: "海阔天空".into(),
            artists: vec![Artist {
                id: 11127,
                name: "Beyond".into(),
                pic_url: None,
                alias: vec!["超越".into()],
            }],
            album: Album {
                id: 34209,
                name: "海阔天空".into(),
                pic_url: Some("http://p1.music.126.net/a.jpg".into()),
                publish_time: Some(746_812_800_000),
                size: 10,
                ..Album::default()
            },
            duration: 326_000,
            mp3_url: None,
            popularity: 100.0,
        };
        let program = DjProgramResult {
            code: Some(200),
            message: None,
            program: DjProgram {
                id: 9,
                name: "Ep. 9".into(),
                main_song: Some(song.clone()),
                songs: vec![song],
                radio: Some(DjRadio {
                    id: 3,
                    name: "Radio".into(),
                    ..DjRadio::default()
                }),
                ..DjProgram::default()
            },
        };
        let json = serde_json::to_string(&program).unwrap();
        assert!(json.contains("\"mainSong\""));
        let back: DjProgramResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn test_artist_names() {
        let song = Song {
            artists: vec![
                Artist {
                    name: "A".into(),
                    ..Artist::default()
                },
                Artist {
                    name: "B".into(),
                    ..Artist::default()
                },
            ],
            ..Song::default()
        };
        assert_eq!(song.artist_names(), "A / B");
    }
}

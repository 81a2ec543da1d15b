use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music163::types::Song;
use music163::{Music163Client, SearchOptions};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "music163", version, about = "music.163.com catalog lookup")]
struct Cli {
    /// API base endpoint
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search suggestions for songs, albums, artists and playlists
    Search {
        /// Search keyword
        keyword: String,
        /// Max results per group
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show an album and its tracks
    Album {
        /// Album ID
        album_id: u64,
    },
    /// Show song details
    Song {
        /// Song IDs
        #[arg(required = true)]
        song_ids: Vec<u64>,
    },
    /// Show playlist details
    Playlist {
        /// Playlist ID
        playlist_id: u64,
    },
    /// Show a radio program
    Dj {
        /// Program ID
        program_id: u64,
    },
    /// Fetch a path or URL and write the raw bytes
    Fetch {
        /// Path relative to the base endpoint, or an absolute URL
        path: String,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;
    let json = cli.json;
    match cli.command {
        Command::Search { keyword, limit } => cmd_search(&client, keyword, limit, json),
        Command::Album { album_id } => cmd_album(&client, album_id, json),
        Command::Song { song_ids } => cmd_song(&client, &song_ids, json),
        Command::Playlist { playlist_id } => cmd_playlist(&client, playlist_id, json),
        Command::Dj { program_id } => cmd_dj(&client, program_id, json),
        Command::Fetch { path, output } => cmd_fetch(&client, &path, output),
    }
}

fn build_client(cli: &Cli) -> Result<Music163Client> {
    let mut builder = Music163Client::builder();
    if let Some(url) = &cli.base_url {
        builder = builder.base_url(url.as_str());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("failed to create API client")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn song_line(s: &Song) -> String {
    format!("[{}] {} - {} ({})", s.id, s.artist_names(), s.name, s.album.name)
}

// ── search ──

fn cmd_search(client: &Music163Client, keyword: String, limit: Option<u32>, json: bool) -> Result<()> {
    let mut options = SearchOptions::new(keyword);
    options.limit = limit;
    let hits = client.search_suggest(&options).context("search failed")?;
    if json {
        return print_json(&hits);
    }
    if hits.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    if !hits.songs.is_empty() {
        println!("Songs:");
        for s in &hits.songs {
            println!("  {}", song_line(s));
        }
    }
    if !hits.albums.is_empty() {
        println!("Albums:");
        for a in &hits.albums {
            println!("  [{}] {}", a.id, a.name);
        }
    }
    if !hits.artists.is_empty() {
        println!("Artists:");
        for a in &hits.artists {
            println!("  [{}] {}", a.id, a.name);
        }
    }
    if !hits.playlists.is_empty() {
        println!("Playlists:");
        for p in &hits.playlists {
            println!("  [{}] {} ({} tracks)", p.id, p.name, p.track_count);
        }
    }
    Ok(())
}

// ── album / song ──

fn cmd_album(client: &Music163Client, album_id: u64, json: bool) -> Result<()> {
    let album = client.album(album_id).context("album lookup failed")?;
    if json {
        return print_json(&album);
    }
    let artists: Vec<&str> = album.artists.iter().map(|a| a.name.as_str()).collect();
    println!("Album:   {} (id={})", album.name, album.id);
    println!("Artists: {}", artists.join(", "));
    if let Some(company) = &album.company {
        println!("Label:   {company}");
    }
    println!("Tracks:  {}", album.size);
    println!();
    for (i, s) in album.songs.iter().enumerate() {
        println!("  {:>2}. [{}] {}", i + 1, s.id, s.name);
    }
    Ok(())
}

fn cmd_song(client: &Music163Client, song_ids: &[u64], json: bool) -> Result<()> {
    let songs = client.song_detail(song_ids).context("song lookup failed")?;
    if json {
        return print_json(&songs);
    }
    if songs.is_empty() {
        println!("No songs found.");
    }
    for s in &songs {
        println!("Song:     {} (id={})", s.name, s.id);
        println!("Artists:  {}", s.artist_names());
        println!("Album:    {} (id={})", s.album.name, s.album.id);
        println!("Duration: {}:{:02}", s.duration / 60000, (s.duration / 1000) % 60);
        if let Some(url) = &s.mp3_url {
            println!("Stream:   {url}");
        }
        println!();
    }
    Ok(())
}

// ── playlist / dj ──

fn cmd_playlist(client: &Music163Client, playlist_id: u64, json: bool) -> Result<()> {
    let p = client
        .playlist_detail(playlist_id)
        .context("playlist lookup failed")?;
    if json {
        return print_json(&p);
    }
    println!("Playlist: {} (id={})", p.name, p.id);
    println!("Tracks:   {}", p.track_count);
    if let Some(desc) = &p.description {
        println!("Desc:     {desc}");
    }
    if let Some(creator) = &p.creator {
        println!("Creator:  {} (id={})", creator.nickname, creator.user_id);
    }
    if !p.tracks.is_empty() {
        println!();
        for s in &p.tracks {
            println!("  {}", song_line(s));
        }
    }
    Ok(())
}

fn cmd_dj(client: &Music163Client, program_id: u64, json: bool) -> Result<()> {
    let program = client
        .dj_program(program_id)
        .context("radio program lookup failed")?;
    if json {
        return print_json(&program);
    }
    println!("Program:   {} (id={})", program.name, program.id);
    if let Some(radio) = &program.radio {
        println!("Radio:     {} (id={})", radio.name, radio.id);
    }
    if let Some(dj) = &program.dj {
        println!("Host:      {}", dj.nickname);
    }
    println!("Listeners: {}", program.listener_count);
    if let Some(song) = &program.main_song {
        println!("Audio:     [{}] {}", song.id, song.name);
    }
    Ok(())
}

// ── fetch ──

fn cmd_fetch(client: &Music163Client, path: &str, output: Option<PathBuf>) -> Result<()> {
    if let Some(dest) = output {
        let mut file = File::create(&dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;
        let size = client.download(path, &mut file).context("fetch failed")?;
        eprintln!("Wrote {} ({} bytes)", dest.display(), size);
    } else {
        let mut stdout = io::stdout().lock();
        client.download(path, &mut stdout).context("fetch failed")?;
        stdout.flush()?;
    }
    Ok(())
}

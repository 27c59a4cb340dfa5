use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::envelope::RelationshipObject;
use super::resource::{decode_related, decode_related_one, CatalogResource, Relationship};

/// Artwork image with a templated URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Artwork {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Contains `{w}` and `{h}` placeholders
    pub url: String,
    pub bg_color: Option<String>,
    pub text_color1: Option<String>,
    pub text_color2: Option<String>,
    pub text_color3: Option<String>,
    pub text_color4: Option<String>,
}

impl Artwork {
    /// Returns the image URL for the given pixel size
    pub fn url_for(&self, width: u32, height: u32) -> String {
        self.url
            .replace("{w}", &width.to_string())
            .replace("{h}", &height.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorialNotes {
    pub standard: Option<String>,
    pub short: Option<String>,
}

/// Parameters needed to start playback of a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayParameters {
    pub id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preview {
    pub url: String,
    pub artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRating {
    Clean,
    Explicit,
}

/// Parses a catalog release date, which is either `YYYY-MM-DD` or `YYYY`
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        value
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    })
}

// === Artists ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtistAttributes {
    pub name: String,
    pub genre_names: Vec<String>,
    pub editorial_notes: Option<EditorialNotes>,
    pub artwork: Option<Artwork>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtistRelationships {
    pub albums: Vec<Album>,
    pub genres: Vec<Genre>,
    pub music_videos: Vec<MusicVideo>,
    pub playlists: Vec<Playlist>,
    pub station: Option<Station>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub id: String,
    pub href: Option<String>,
    pub attributes: ArtistAttributes,
    pub relationships: ArtistRelationships,
}

fn artist_albums(artist: &mut Artist, rel: &RelationshipObject) -> serde_json::Result<()> {
    artist.relationships.albums = decode_related(rel)?;
    Ok(())
}

fn artist_genres(artist: &mut Artist, rel: &RelationshipObject) -> serde_json::Result<()> {
    artist.relationships.genres = decode_related(rel)?;
    Ok(())
}

fn artist_music_videos(artist: &mut Artist, rel: &RelationshipObject) -> serde_json::Result<()> {
    artist.relationships.music_videos = decode_related(rel)?;
    Ok(())
}

fn artist_playlists(artist: &mut Artist, rel: &RelationshipObject) -> serde_json::Result<()> {
    artist.relationships.playlists = decode_related(rel)?;
    Ok(())
}

fn artist_station(artist: &mut Artist, rel: &RelationshipObject) -> serde_json::Result<()> {
    artist.relationships.station = decode_related_one(rel)?;
    Ok(())
}

impl CatalogResource for Artist {
    const KIND: &'static str = "artists";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[
        Relationship { name: "albums", merge: artist_albums },
        Relationship { name: "genres", merge: artist_genres },
        Relationship { name: "music-videos", merge: artist_music_videos },
        Relationship { name: "playlists", merge: artist_playlists },
        Relationship { name: "station", merge: artist_station },
    ];
    type Attributes = ArtistAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: ArtistAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: ArtistRelationships::default(),
        }
    }
}

// === Songs ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub artwork: Option<Artwork>,
    pub composer_name: Option<String>,
    pub content_rating: Option<ContentRating>,
    pub disc_number: Option<u32>,
    pub duration_in_millis: Option<u64>,
    pub editorial_notes: Option<EditorialNotes>,
    pub genre_names: Vec<String>,
    pub isrc: Option<String>,
    pub play_params: Option<PlayParameters>,
    pub previews: Vec<Preview>,
    pub release_date: Option<String>,
    pub track_number: Option<u32>,
    pub url: Option<String>,
}

impl SongAttributes {
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_release_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SongRelationships {
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub genres: Vec<Genre>,
    pub station: Option<Station>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub id: String,
    pub href: Option<String>,
    pub attributes: SongAttributes,
    pub relationships: SongRelationships,
}

fn song_albums(song: &mut Song, rel: &RelationshipObject) -> serde_json::Result<()> {
    song.relationships.albums = decode_related(rel)?;
    Ok(())
}

fn song_artists(song: &mut Song, rel: &RelationshipObject) -> serde_json::Result<()> {
    song.relationships.artists = decode_related(rel)?;
    Ok(())
}

fn song_genres(song: &mut Song, rel: &RelationshipObject) -> serde_json::Result<()> {
    song.relationships.genres = decode_related(rel)?;
    Ok(())
}

fn song_station(song: &mut Song, rel: &RelationshipObject) -> serde_json::Result<()> {
    song.relationships.station = decode_related_one(rel)?;
    Ok(())
}

impl CatalogResource for Song {
    const KIND: &'static str = "songs";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[
        Relationship { name: "albums", merge: song_albums },
        Relationship { name: "artists", merge: song_artists },
        Relationship { name: "genres", merge: song_genres },
        Relationship { name: "station", merge: song_station },
    ];
    type Attributes = SongAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: SongAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: SongRelationships::default(),
        }
    }
}

// === Albums ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlbumAttributes {
    pub name: String,
    pub artist_name: String,
    pub artwork: Option<Artwork>,
    pub content_rating: Option<ContentRating>,
    pub copyright: Option<String>,
    pub editorial_notes: Option<EditorialNotes>,
    pub genre_names: Vec<String>,
    pub is_complete: bool,
    pub is_single: bool,
    pub play_params: Option<PlayParameters>,
    pub record_label: Option<String>,
    pub release_date: Option<String>,
    pub track_count: u32,
    pub url: Option<String>,
}

impl AlbumAttributes {
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_release_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlbumRelationships {
    pub artists: Vec<Artist>,
    pub genres: Vec<Genre>,
    pub tracks: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub id: String,
    pub href: Option<String>,
    pub attributes: AlbumAttributes,
    pub relationships: AlbumRelationships,
}

fn album_artists(album: &mut Album, rel: &RelationshipObject) -> serde_json::Result<()> {
    album.relationships.artists = decode_related(rel)?;
    Ok(())
}

fn album_genres(album: &mut Album, rel: &RelationshipObject) -> serde_json::Result<()> {
    album.relationships.genres = decode_related(rel)?;
    Ok(())
}

fn album_tracks(album: &mut Album, rel: &RelationshipObject) -> serde_json::Result<()> {
    album.relationships.tracks = decode_related(rel)?;
    Ok(())
}

impl CatalogResource for Album {
    const KIND: &'static str = "albums";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[
        Relationship { name: "artists", merge: album_artists },
        Relationship { name: "genres", merge: album_genres },
        Relationship { name: "tracks", merge: album_tracks },
    ];
    type Attributes = AlbumAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: AlbumAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: AlbumRelationships::default(),
        }
    }
}

// === Playlists ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaylistAttributes {
    pub name: String,
    pub artwork: Option<Artwork>,
    pub curator_name: Option<String>,
    pub description: Option<EditorialNotes>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub play_params: Option<PlayParameters>,
    /// `user-shared`, `editorial`, `external` or `personal-mix`
    pub playlist_type: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaylistRelationships {
    pub curator: Option<Curator>,
    pub tracks: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    pub id: String,
    pub href: Option<String>,
    pub attributes: PlaylistAttributes,
    pub relationships: PlaylistRelationships,
}

fn playlist_curator(playlist: &mut Playlist, rel: &RelationshipObject) -> serde_json::Result<()> {
    playlist.relationships.curator = decode_related_one(rel)?;
    Ok(())
}

fn playlist_tracks(playlist: &mut Playlist, rel: &RelationshipObject) -> serde_json::Result<()> {
    playlist.relationships.tracks = decode_related(rel)?;
    Ok(())
}

impl CatalogResource for Playlist {
    const KIND: &'static str = "playlists";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[
        Relationship { name: "curator", merge: playlist_curator },
        Relationship { name: "tracks", merge: playlist_tracks },
    ];
    type Attributes = PlaylistAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: PlaylistAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: PlaylistRelationships::default(),
        }
    }
}

// === Stations ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationAttributes {
    pub name: String,
    pub artwork: Option<Artwork>,
    pub duration_in_millis: Option<u64>,
    pub editorial_notes: Option<EditorialNotes>,
    pub episode_number: Option<u32>,
    pub is_live: bool,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    pub href: Option<String>,
    pub attributes: StationAttributes,
}

impl CatalogResource for Station {
    const KIND: &'static str = "stations";
    type Attributes = StationAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: StationAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
        }
    }
}

// === Curators, Apple curators and activities ===
//
// All three share one attribute shape and only relate to playlists.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CuratorAttributes {
    pub name: String,
    pub artwork: Option<Artwork>,
    pub editorial_notes: Option<EditorialNotes>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CuratorRelationships {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curator {
    pub id: String,
    pub href: Option<String>,
    pub attributes: CuratorAttributes,
    pub relationships: CuratorRelationships,
}

fn curator_playlists(curator: &mut Curator, rel: &RelationshipObject) -> serde_json::Result<()> {
    curator.relationships.playlists = decode_related(rel)?;
    Ok(())
}

impl CatalogResource for Curator {
    const KIND: &'static str = "curators";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[Relationship {
        name: "playlists",
        merge: curator_playlists,
    }];
    type Attributes = CuratorAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: CuratorAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: CuratorRelationships::default(),
        }
    }
}

/// A curator run by Apple Music editors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppleCurator {
    pub id: String,
    pub href: Option<String>,
    pub attributes: CuratorAttributes,
    pub relationships: CuratorRelationships,
}

fn apple_curator_playlists(
    curator: &mut AppleCurator,
    rel: &RelationshipObject,
) -> serde_json::Result<()> {
    curator.relationships.playlists = decode_related(rel)?;
    Ok(())
}

impl CatalogResource for AppleCurator {
    const KIND: &'static str = "apple-curators";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[Relationship {
        name: "playlists",
        merge: apple_curator_playlists,
    }];
    type Attributes = CuratorAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: CuratorAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: CuratorRelationships::default(),
        }
    }
}

/// An activity, e.g. "Party" or "Focus"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: String,
    pub href: Option<String>,
    pub attributes: CuratorAttributes,
    pub relationships: CuratorRelationships,
}

fn activity_playlists(activity: &mut Activity, rel: &RelationshipObject) -> serde_json::Result<()> {
    activity.relationships.playlists = decode_related(rel)?;
    Ok(())
}

impl CatalogResource for Activity {
    const KIND: &'static str = "activities";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[Relationship {
        name: "playlists",
        merge: activity_playlists,
    }];
    type Attributes = CuratorAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: CuratorAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: CuratorRelationships::default(),
        }
    }
}

// === Music videos ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MusicVideoAttributes {
    pub name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub artwork: Option<Artwork>,
    pub content_rating: Option<ContentRating>,
    pub duration_in_millis: Option<u64>,
    pub editorial_notes: Option<EditorialNotes>,
    pub genre_names: Vec<String>,
    #[serde(rename = "has4K")]
    pub has4k: bool,
    #[serde(rename = "hasHDR")]
    pub has_hdr: bool,
    pub isrc: Option<String>,
    pub play_params: Option<PlayParameters>,
    pub previews: Vec<Preview>,
    pub release_date: Option<String>,
    pub track_number: Option<u32>,
    pub url: Option<String>,
    pub video_sub_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MusicVideoRelationships {
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicVideo {
    pub id: String,
    pub href: Option<String>,
    pub attributes: MusicVideoAttributes,
    pub relationships: MusicVideoRelationships,
}

fn music_video_albums(video: &mut MusicVideo, rel: &RelationshipObject) -> serde_json::Result<()> {
    video.relationships.albums = decode_related(rel)?;
    Ok(())
}

fn music_video_artists(video: &mut MusicVideo, rel: &RelationshipObject) -> serde_json::Result<()> {
    video.relationships.artists = decode_related(rel)?;
    Ok(())
}

fn music_video_genres(video: &mut MusicVideo, rel: &RelationshipObject) -> serde_json::Result<()> {
    video.relationships.genres = decode_related(rel)?;
    Ok(())
}

impl CatalogResource for MusicVideo {
    const KIND: &'static str = "music-videos";
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[
        Relationship { name: "albums", merge: music_video_albums },
        Relationship { name: "artists", merge: music_video_artists },
        Relationship { name: "genres", merge: music_video_genres },
    ];
    type Attributes = MusicVideoAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: MusicVideoAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
            relationships: MusicVideoRelationships::default(),
        }
    }
}

// === Genres ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenreAttributes {
    pub name: String,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub id: String,
    pub href: Option<String>,
    pub attributes: GenreAttributes,
}

impl CatalogResource for Genre {
    const KIND: &'static str = "genres";
    type Attributes = GenreAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: GenreAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
        }
    }
}

// === Storefronts ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorefrontAttributes {
    pub name: String,
    pub default_language_tag: String,
    pub supported_language_tags: Vec<String>,
    pub explicit_content_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Storefront {
    pub id: String,
    pub href: Option<String>,
    pub attributes: StorefrontAttributes,
}

impl CatalogResource for Storefront {
    const KIND: &'static str = "storefronts";
    const STOREFRONT_SCOPED: bool = false;
    type Attributes = StorefrontAttributes;

    fn from_attributes(id: String, href: Option<String>, attributes: StorefrontAttributes) -> Self {
        Self {
            id,
            href,
            attributes,
        }
    }
}

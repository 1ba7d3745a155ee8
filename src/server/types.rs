use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::helpers::{ArtistInput, ShowListing, VenueInput, split_genres};
use crate::entity::{artist_calendar, artists, venues};

/// Reads a yes/no form flag. Empty counts as "no".
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Text(String),
    }

    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(flag) => Ok(flag),
        RawFlag::Text(text) => parse_flag(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("not a yes/no value: {text:?}"))),
    }
}

pub fn parse_show_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
pub fn parse_show_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct VenueRequest {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<VenueRequest> for VenueInput {
    fn from(request: VenueRequest) -> Self {
        VenueInput {
            name: request.name,
            city: request.city,
            state: request.state,
            address: request.address,
            phone: request.phone,
            genres: request.genres,
            image_link: request.image_link,
            facebook_link: request.facebook_link,
            website: request.website,
            seeking_talent: request.seeking_talent,
            seeking_description: non_empty(request.seeking_description),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ArtistRequest {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<ArtistRequest> for ArtistInput {
    fn from(request: ArtistRequest) -> Self {
        ArtistInput {
            name: request.name,
            city: request.city,
            state: request.state,
            phone: request.phone,
            genres: request.genres,
            image_link: request.image_link,
            facebook_link: request.facebook_link,
            website: request.website,
            seeking_venue: request.seeking_venue,
            seeking_description: non_empty(request.seeking_description),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SearchRequest {
    pub search_term: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateShowRequest {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_date: String,
    pub start_time: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCalendarRequest {
    pub artist_id: i32,
    pub dates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NamedItem {
    pub id: i32,
    pub name: String,
}

impl From<&venues::Model> for NamedItem {
    fn from(venue: &venues::Model) -> Self {
        NamedItem {
            id: venue.id,
            name: venue.name.clone(),
        }
    }
}

impl From<&artists::Model> for NamedItem {
    fn from(artist: &artists::Model) -> Self {
        NamedItem {
            id: artist.id,
            name: artist.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub new_artists: Vec<NamedItem>,
    pub new_venues: Vec<NamedItem>,
}

#[derive(Debug, Serialize)]
pub struct AreaResponse {
    pub city: String,
    pub state: String,
    pub venues: Vec<NamedItem>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub data: Vec<NamedItem>,
}

impl SearchResponse {
    pub fn new(data: Vec<NamedItem>) -> Self {
        SearchResponse {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<venues::Model> for VenueResponse {
    fn from(venue: venues::Model) -> Self {
        VenueResponse {
            id: venue.id,
            genres: split_genres(&venue.genres),
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            image_link: venue.image_link,
            facebook_link: venue.facebook_link,
            website: venue.website,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<artists::Model> for ArtistResponse {
    fn from(artist: artists::Model) -> Self {
        ArtistResponse {
            id: artist.id,
            genres: split_genres(&artist.genres),
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            image_link: artist.image_link,
            facebook_link: artist.facebook_link,
            website: artist.website,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
}

impl From<ShowListing> for ShowResponse {
    fn from(listing: ShowListing) -> Self {
        ShowResponse {
            id: listing.show.id,
            venue_id: listing.venue.id,
            venue_name: listing.venue.name,
            venue_image_link: listing.venue.image_link,
            artist_id: listing.artist.id,
            artist_name: listing.artist.name,
            artist_image_link: listing.artist.image_link,
            start_date: listing.show.start_date,
            start_time: listing.show.start_time,
        }
    }
}

/// Past and upcoming shows, as shown on venue and artist pages.
#[derive(Debug, Serialize)]
pub struct ShowsSplit {
    pub past_shows: Vec<ShowResponse>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<ShowResponse>,
    pub upcoming_shows_count: usize,
}

impl ShowsSplit {
    pub fn new(past: Vec<ShowListing>, upcoming: Vec<ShowListing>) -> Self {
        ShowsSplit {
            past_shows_count: past.len(),
            upcoming_shows_count: upcoming.len(),
            past_shows: past.into_iter().map(Into::into).collect(),
            upcoming_shows: upcoming.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    #[serde(flatten)]
    pub shows: ShowsSplit,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    #[serde(flatten)]
    pub shows: ShowsSplit,
}

#[derive(Debug, Serialize)]
pub struct CalendarEntryResponse {
    pub id: i32,
    pub date: NaiveDate,
}

impl From<artist_calendar::Model> for CalendarEntryResponse {
    fn from(entry: artist_calendar::Model) -> Self {
        CalendarEntryResponse {
            id: entry.id,
            date: entry.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub artist: NamedItem,
    pub calendar: Vec<CalendarEntryResponse>,
}

#[derive(Debug, Serialize)]
pub struct CalendarAddedResponse {
    pub message: String,
    pub created: Vec<CalendarEntryResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        for yes in ["True", "true", "y", "YES", "on", "1"] {
            assert_eq!(parse_flag(yes), Some(true), "{yes}");
        }
        for no in ["False", "n", "No", "off", "0", "", "  "] {
            assert_eq!(parse_flag(no), Some(false), "{no}");
        }
        assert_eq!(parse_flag("__import__('os')"), None);
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn request_flag_from_bool_or_text() {
        let request: VenueRequest =
            serde_json::from_str(r#"{"name": "Hop", "seeking_talent": "True"}"#).unwrap();
        assert!(request.seeking_talent);

        let request: ArtistRequest =
            serde_json::from_str(r#"{"name": "Sax", "seeking_venue": false}"#).unwrap();
        assert!(!request.seeking_venue);

        let request: ArtistRequest = serde_json::from_str(r#"{"name": "Sax"}"#).unwrap();
        assert!(!request.seeking_venue);

        assert!(serde_json::from_str::<VenueRequest>(r#"{"seeking_talent": "1 == 1"}"#).is_err());
    }

    #[test]
    fn show_times_with_or_without_seconds() {
        let expected = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        assert_eq!(parse_show_time("20:00"), Some(expected));
        assert_eq!(parse_show_time("20:00:00"), Some(expected));
        assert_eq!(parse_show_time("8pm"), None);
        assert_eq!(parse_show_date("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(parse_show_date("05/01/2024"), None);
    }

    #[test]
    fn blank_description_is_dropped() {
        let input: VenueInput = VenueRequest {
            seeking_description: Some("   ".to_string()),
            ..Default::default()
        }
        .into();
        assert_eq!(input.seeking_description, None);
    }
}

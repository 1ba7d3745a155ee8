//! Queries and writes over the entity store. Every function takes any
//! `ConnectionTrait` so callers can run it inside their own transaction.

mod artists;
mod shows;
mod venues;

pub use artists::{
    ArtistInput, create_artist, delete_artist, list_artists, recent_artists, require_artist,
    search_artists, update_artist,
};
pub use shows::{ShowListing, list_shows, shows_for_artist, shows_for_venue, split_by_date};
pub use venues::{
    VenueInput, create_venue, delete_venue, recent_venues, require_venue, search_venues,
    update_venue, venue_areas,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
}

/// Genres are persisted as one comma separated column.
pub fn join_genres(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// Case-insensitive substring match on a name. `needle` must already be
/// lowercased. SQLite's `lower()` and `LIKE` only fold ASCII, so names are
/// folded here.
fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genres_survive_storage() {
        let genres = vec!["Jazz".to_string(), " Blues ".to_string(), String::new()];
        let stored = join_genres(&genres);
        assert_eq!(stored, "Jazz,Blues");
        assert_eq!(split_genres(&stored), vec!["Jazz", "Blues"]);
    }

    #[test]
    fn empty_genre_column_is_empty_list() {
        assert!(split_genres("").is_empty());
        assert!(split_genres(" , ").is_empty());
    }

    #[test]
    fn names_fold_beyond_ascii() {
        assert!(name_contains("Éclair Hall", "éclair"));
        assert!(name_contains("The Musical Hop", "hop"));
        assert!(!name_contains("The Musical Hop", "%"));
        assert!(name_contains("100% Rock", "%"));
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{ArtistInput, VenueInput};

    pub(crate) fn venue(name: &str, city: &str, state: &str) -> VenueInput {
        VenueInput {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: "123-123-1234".to_string(),
            genres: vec!["Jazz".to_string(), "Reggae".to_string()],
            ..Default::default()
        }
    }

    pub(crate) fn artist(name: &str) -> ArtistInput {
        ArtistInput {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: "326-123-5000".to_string(),
            genres: vec!["Rock n Roll".to_string()],
            ..Default::default()
        }
    }
}

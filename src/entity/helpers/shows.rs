use std::collections::HashMap;

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select};

use crate::entity::{artists, shows, venues};

/// A show joined with the artist playing it and the venue hosting it.
#[derive(Debug, Clone)]
pub struct ShowListing {
    pub show: shows::Model,
    pub artist: artists::Model,
    pub venue: venues::Model,
}

pub async fn list_shows<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<ShowListing>> {
    load_listings(db, shows::Entity::find()).await
}

pub async fn shows_for_venue<C: ConnectionTrait>(
    db: &C,
    venue_id: i32,
) -> anyhow::Result<Vec<ShowListing>> {
    load_listings(
        db,
        shows::Entity::find().filter(shows::Column::VenueId.eq(venue_id)),
    )
    .await
}

pub async fn shows_for_artist<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
) -> anyhow::Result<Vec<ShowListing>> {
    load_listings(
        db,
        shows::Entity::find().filter(shows::Column::ArtistId.eq(artist_id)),
    )
    .await
}

/// Splits into (past, upcoming). A show on `today` counts as upcoming.
pub fn split_by_date(
    listings: Vec<ShowListing>,
    today: NaiveDate,
) -> (Vec<ShowListing>, Vec<ShowListing>) {
    listings
        .into_iter()
        .partition(|listing| listing.show.start_date < today)
}

async fn load_listings<C: ConnectionTrait>(
    db: &C,
    query: Select<shows::Entity>,
) -> anyhow::Result<Vec<ShowListing>> {
    let found = query
        .order_by_asc(shows::Column::StartDate)
        .order_by_asc(shows::Column::StartTime)
        .find_also_related(artists::Entity)
        .all(db)
        .await
        .context("failed to load shows")?;

    let venue_ids: Vec<i32> = found.iter().map(|(show, _)| show.venue_id).collect();
    let venues: HashMap<i32, venues::Model> = venues::Entity::find()
        .filter(venues::Column::Id.is_in(venue_ids))
        .all(db)
        .await
        .context("failed to load show venues")?
        .into_iter()
        .map(|venue| (venue.id, venue))
        .collect();

    // rows whose artist or venue is gone are skipped
    let listings = found
        .into_iter()
        .filter_map(|(show, artist)| {
            let venue = venues.get(&show.venue_id)?.clone();
            Some(ShowListing {
                artist: artist?,
                venue,
                show,
            })
        })
        .collect();
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{NewShow, create_show};
    use crate::data::dbconnector::memory_connector;
    use crate::entity::helpers::fixtures::{artist, venue};
    use crate::entity::helpers::{create_artist, create_venue};
    use chrono::NaiveTime;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn listings_join_artist_and_venue_in_date_order() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();
        let hop = create_venue(db, venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let petals = create_artist(db, artist("Guns N Petals")).await.unwrap();
        let sax = create_artist(db, artist("The Wild Sax Band")).await.unwrap();

        for (artist_id, day) in [(sax.id, "2035-04-01"), (petals.id, "2019-05-21")] {
            create_show(
                db,
                NewShow {
                    artist_id,
                    venue_id: hop.id,
                    start_date: date(day),
                    start_time: NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
                },
            )
            .await
            .unwrap();
        }

        let all = list_shows(db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].artist.name, "Guns N Petals");
        assert_eq!(all[1].venue.name, "The Musical Hop");

        let (past, upcoming) = split_by_date(
            shows_for_venue(db, hop.id).await.unwrap(),
            date("2024-01-01"),
        );
        assert_eq!(past.len(), 1);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].artist.id, sax.id);

        assert_eq!(shows_for_artist(db, petals.id).await.unwrap().len(), 1);
        assert!(shows_for_venue(db, hop.id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn show_on_today_is_upcoming() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();
        let hop = create_venue(db, venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let petals = create_artist(db, artist("Guns N Petals")).await.unwrap();
        create_show(
            db,
            NewShow {
                artist_id: petals.id,
                venue_id: hop.id,
                start_date: date("2024-05-01"),
                start_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            },
        )
        .await
        .unwrap();

        let (past, upcoming) =
            split_by_date(list_shows(db).await.unwrap(), date("2024-05-01"));
        assert!(past.is_empty());
        assert_eq!(upcoming.len(), 1);
    }
}

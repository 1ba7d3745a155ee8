use chrono::{DateTime, FixedOffset, NaiveDate};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::BookingError;
use crate::entity::artist_calendar;
use crate::entity::helpers::require_artist;

/// Turns a submitted calendar date into the date the user picked.
///
/// Plain `YYYY-MM-DD` values are taken as-is. Date pickers post the chosen day
/// as local midnight serialized in UTC (`2024-04-30T22:00:00.000Z` for May 1st
/// at UTC+2), so timestamps are moved into the clients' offset before the date
/// is read off.
pub fn normalize_date(raw: &str, client_offset: FixedOffset) -> Result<NaiveDate, BookingError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&client_offset).date_naive())
        .map_err(|_| BookingError::InvalidDate(raw.to_string()))
}

/// Adds the dates to the artist's calendar, skipping ones already there.
/// Returns only the entries this call created. Nothing is written if any date
/// fails to parse.
pub async fn add_availability<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
    dates: &[String],
    client_offset: FixedOffset,
) -> Result<Vec<artist_calendar::Model>, BookingError> {
    require_artist(db, artist_id).await?;

    let mut wanted = dates
        .iter()
        .map(|raw| normalize_date(raw, client_offset))
        .collect::<Result<Vec<_>, _>>()?;
    wanted.sort();
    wanted.dedup();

    let mut created = Vec::new();
    for date in wanted {
        let existing = artist_calendar::Entity::find()
            .filter(artist_calendar::Column::ArtistId.eq(artist_id))
            .filter(artist_calendar::Column::Date.eq(date))
            .one(db)
            .await?;
        if existing.is_some() {
            debug!("Artist {artist_id} already available on {date}");
            continue;
        }

        let entry = artist_calendar::ActiveModel {
            artist_id: Set(artist_id),
            date: Set(date),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created.push(entry);
    }

    debug!(
        "Added {} calendar entries for artist {artist_id}",
        created.len()
    );
    Ok(created)
}

/// Drops one calendar entry. Shows already booked on that date stay.
pub async fn remove_availability<C: ConnectionTrait>(
    db: &C,
    entry_id: i32,
) -> Result<(), BookingError> {
    let deleted = artist_calendar::Entity::delete_by_id(entry_id)
        .exec(db)
        .await?;

    if deleted.rows_affected == 0 {
        return Err(BookingError::NotFound {
            entity: "calendar entry",
            id: entry_id,
        });
    }
    Ok(())
}

pub async fn calendar_for<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
) -> Result<Vec<artist_calendar::Model>, DbErr> {
    artist_calendar::Entity::find()
        .filter(artist_calendar::Column::ArtistId.eq(artist_id))
        .order_by_asc(artist_calendar::Column::Date)
        .all(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::is_available;
    use crate::data::dbconnector::memory_connector;
    use crate::entity::helpers::create_artist;
    use crate::entity::helpers::fixtures::artist;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn plain_dates_pass_through() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(normalize_date("2024-05-01", plus_two).unwrap(), date("2024-05-01"));
        assert_eq!(normalize_date(" 2024-05-01 ", utc()).unwrap(), date("2024-05-01"));
    }

    #[test]
    fn timestamps_use_the_client_offset() {
        let picked = "2024-04-30T22:00:00.000Z";
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(normalize_date(picked, plus_two).unwrap(), date("2024-05-01"));
        assert_eq!(normalize_date(picked, utc()).unwrap(), date("2024-04-30"));

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            normalize_date("2024-05-01T05:00:00Z", minus_five).unwrap(),
            date("2024-05-01")
        );
    }

    #[test]
    fn garbage_is_rejected() {
        for raw in ["", "tomorrow", "2024-13-01", "01/05/2024"] {
            assert!(matches!(
                normalize_date(raw, utc()),
                Err(BookingError::InvalidDate(_))
            ));
        }
    }

    #[tokio::test]
    async fn adding_twice_keeps_one_row() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();
        let artist = create_artist(db, artist("Guns N Petals")).await.unwrap();
        let dates = vec!["2024-05-01".to_string()];

        let first = add_availability(db, artist.id, &dates, utc()).await.unwrap();
        let second = add_availability(db, artist.id, &dates, utc()).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());

        let both = vec!["2024-05-01".to_string(), "2024-05-01T00:00:00Z".to_string()];
        add_availability(db, artist.id, &both, utc()).await.unwrap();
        assert_eq!(calendar_for(db, artist.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_date_writes_nothing() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();
        let artist = create_artist(db, artist("Guns N Petals")).await.unwrap();

        let dates = vec!["2024-05-01".to_string(), "soon".to_string()];
        let err = add_availability(db, artist.id, &dates, utc())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidDate(raw) if raw == "soon"));
        assert!(calendar_for(db, artist.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_artist_is_rejected() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();

        let err = add_availability(db, 7, &["2024-05-01".to_string()], utc())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::NotFound {
                entity: "artist",
                id: 7
            }
        ));
    }

    #[tokio::test]
    async fn removing_last_entry_lifts_the_restriction() {
        let connector = memory_connector().await;
        let db = connector.connection().unwrap();
        let artist = create_artist(db, artist("Guns N Petals")).await.unwrap();
        let created = add_availability(
            db,
            artist.id,
            &["2024-05-02".to_string(), "2024-05-01".to_string()],
            utc(),
        )
        .await
        .unwrap();

        let listed = calendar_for(db, artist.id).await.unwrap();
        assert_eq!(listed[0].date, date("2024-05-01"));
        assert_eq!(listed[1].date, date("2024-05-02"));

        assert!(!is_available(db, artist.id, date("2024-06-01")).await.unwrap());
        for entry in &created {
            remove_availability(db, entry.id).await.unwrap();
        }
        assert!(is_available(db, artist.id, date("2024-06-01")).await.unwrap());

        let err = remove_availability(db, created[0].id).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound { .. }));
    }
}

//! Show booking gated by the artist availability calendar.
//!
//! Every operation here runs on the connection it is handed. The HTTP layer
//! passes a transaction it opened for the request and commits it once the
//! operation returns `Ok`; returning early drops the transaction and rolls the
//! writes back.

mod availability;
mod calendar;

pub use availability::is_available;
pub use calendar::{add_availability, calendar_for, remove_availability};

use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};

use crate::entity::helpers::{StoreError, require_artist, require_venue};
use crate::entity::shows;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("artist {artist_id} is not available on {date}")]
    NotAvailable { artist_id: i32, date: NaiveDate },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("unrecognized date {0:?}")]
    InvalidDate(String),
    #[error("storage failure")]
    Persistence(#[source] anyhow::Error),
}

impl From<DbErr> for BookingError {
    fn from(err: DbErr) -> Self {
        BookingError::Persistence(err.into())
    }
}

impl From<anyhow::Error> for BookingError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::NotFound { entity, id }) => BookingError::NotFound {
                entity: *entity,
                id: *id,
            },
            None => BookingError::Persistence(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewShow {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Books a show if the artist is available on its date and returns the new
/// show id. Nothing is written when the artist is unavailable.
///
/// Concurrent bookings for the same artist and date are not serialized beyond
/// the database's own write locking.
pub async fn create_show<C: ConnectionTrait>(
    db: &C,
    new_show: NewShow,
) -> Result<i32, BookingError> {
    require_artist(db, new_show.artist_id).await?;
    require_venue(db, new_show.venue_id).await?;

    if !is_available(db, new_show.artist_id, new_show.start_date).await? {
        warn!(
            "Artist {} is not available on {}",
            new_show.artist_id, new_show.start_date
        );
        return Err(BookingError::NotAvailable {
            artist_id: new_show.artist_id,
            date: new_show.start_date,
        });
    }

    let show = shows::ActiveModel {
        artist_id: Set(new_show.artist_id),
        venue_id: Set(new_show.venue_id),
        start_date: Set(new_show.start_date),
        start_time: Set(new_show.start_time),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Booked show {} for artist {} at venue {} on {}",
        show.id, show.artist_id, show.venue_id, show.start_date
    );
    Ok(show.id)
}

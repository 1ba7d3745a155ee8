use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::entity::artist_calendar;

/// An artist with no calendar entries is bookable on every date, otherwise
/// only on the dates they listed. Unknown artists have no entries.
pub async fn is_available<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
    date: NaiveDate,
) -> Result<bool, DbErr> {
    let entries = artist_calendar::Entity::find()
        .filter(artist_calendar::Column::ArtistId.eq(artist_id))
        .all(db)
        .await?;

    Ok(entries.is_empty() || entries.iter().any(|entry| entry.date == date))
}

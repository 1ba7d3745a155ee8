use anyhow::Context;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect, Set};

use super::{StoreError, join_genres, name_contains};
use crate::entity::venues;

/// Every editable venue field. Edits overwrite all of them.
#[derive(Debug, Clone, Default)]
pub struct VenueInput {
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

impl VenueInput {
    fn apply(self, active: &mut venues::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.genres = Set(join_genres(&self.genres));
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website = Set(self.website);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description);
    }
}

/// Venues sharing a city and state.
#[derive(Debug, Clone)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<venues::Model>,
}

/// All venues, grouped by area.
pub async fn venue_areas<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<Area>> {
    let found = venues::Entity::find()
        .order_by_asc(venues::Column::State)
        .order_by_asc(venues::Column::City)
        .order_by_asc(venues::Column::Name)
        .all(db)
        .await
        .context("failed to load venues by area")?;

    let mut areas: Vec<Area> = Vec::new();
    for venue in found {
        if let Some(area) = areas
            .last_mut()
            .filter(|area| area.city == venue.city && area.state == venue.state)
        {
            area.venues.push(venue);
            continue;
        }
        areas.push(Area {
            city: venue.city.clone(),
            state: venue.state.clone(),
            venues: vec![venue],
        });
    }
    Ok(areas)
}

pub async fn recent_venues<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> anyhow::Result<Vec<venues::Model>> {
    let found = venues::Entity::find()
        .order_by_desc(venues::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .context("failed to load recent venues")?;
    Ok(found)
}

pub async fn find_venue<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> anyhow::Result<Option<venues::Model>> {
    let found = venues::Entity::find_by_id(id)
        .one(db)
        .await
        .context("failed to load venue")?;
    Ok(found)
}

pub async fn require_venue<C: ConnectionTrait>(db: &C, id: i32) -> anyhow::Result<venues::Model> {
    find_venue(db, id).await?.ok_or_else(|| {
        StoreError::NotFound {
            entity: "venue",
            id,
        }
        .into()
    })
}

pub async fn search_venues<C: ConnectionTrait>(
    db: &C,
    term: &str,
) -> anyhow::Result<Vec<venues::Model>> {
    let needle = term.to_lowercase();
    let found = venues::Entity::find()
        .order_by_asc(venues::Column::Name)
        .all(db)
        .await
        .context("failed to search venues")?;
    Ok(found
        .into_iter()
        .filter(|venue| name_contains(&venue.name, &needle))
        .collect())
}

pub async fn create_venue<C: ConnectionTrait>(
    db: &C,
    input: VenueInput,
) -> anyhow::Result<venues::Model> {
    let mut venue = venues::ActiveModel {
        ..Default::default()
    };
    input.apply(&mut venue);

    let venue = venue.insert(db).await.context("failed to insert venue")?;
    Ok(venue)
}

pub async fn update_venue<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: VenueInput,
) -> anyhow::Result<venues::Model> {
    let mut venue: venues::ActiveModel = require_venue(db, id).await?.into();
    input.apply(&mut venue);

    let venue = venue.update(db).await.context("failed to update venue")?;
    Ok(venue)
}

/// Shows at the venue go with it through the foreign key cascade.
pub async fn delete_venue<C: ConnectionTrait>(db: &C, id: i32) -> anyhow::Result<()> {
    let deleted = venues::Entity::delete_by_id(id)
        .exec(db)
        .await
        .context("failed to delete venue")?;

    if deleted.rows_affected == 0 {
        Err(StoreError::NotFound {
            entity: "venue",
            id,
        }
        .into())
    } else {
        Ok(())
    }
}

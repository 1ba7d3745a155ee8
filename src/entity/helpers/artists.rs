use anyhow::Context;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect, Set};

use super::{StoreError, join_genres, name_contains};
use crate::entity::artists;

#[derive(Debug, Clone, Default)]
pub struct ArtistInput {
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

impl ArtistInput {
    fn apply(self, active: &mut artists::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.genres = Set(join_genres(&self.genres));
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website = Set(self.website);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description);
    }
}

pub async fn list_artists<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<artists::Model>> {
    let found = artists::Entity::find()
        .order_by_asc(artists::Column::Id)
        .all(db)
        .await
        .context("failed to load artists")?;
    Ok(found)
}

pub async fn recent_artists<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> anyhow::Result<Vec<artists::Model>> {
    let found = artists::Entity::find()
        .order_by_desc(artists::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .context("failed to load recent artists")?;
    Ok(found)
}

pub async fn find_artist<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> anyhow::Result<Option<artists::Model>> {
    let found = artists::Entity::find_by_id(id)
        .one(db)
        .await
        .context("failed to load artist")?;
    Ok(found)
}

pub async fn require_artist<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> anyhow::Result<artists::Model> {
    find_artist(db, id).await?.ok_or_else(|| {
        StoreError::NotFound {
            entity: "artist",
            id,
        }
        .into()
    })
}

pub async fn search_artists<C: ConnectionTrait>(
    db: &C,
    term: &str,
) -> anyhow::Result<Vec<artists::Model>> {
    let needle = term.to_lowercase();
    let found = artists::Entity::find()
        .order_by_asc(artists::Column::Name)
        .all(db)
        .await
        .context("failed to search artists")?;
    Ok(found
        .into_iter()
        .filter(|artist| name_contains(&artist.name, &needle))
        .collect())
}

pub async fn create_artist<C: ConnectionTrait>(
    db: &C,
    input: ArtistInput,
) -> anyhow::Result<artists::Model> {
    let mut artist = artists::ActiveModel {
        ..Default::default()
    };
    input.apply(&mut artist);

    let artist = artist.insert(db).await.context("failed to insert artist")?;
    Ok(artist)
}

pub async fn update_artist<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: ArtistInput,
) -> anyhow::Result<artists::Model> {
    let mut artist: artists::ActiveModel = require_artist(db, id).await?.into();
    input.apply(&mut artist);

    let artist = artist.update(db).await.context("failed to update artist")?;
    Ok(artist)
}

/// Removes the artist together with their shows and calendar entries.
pub async fn delete_artist<C: ConnectionTrait>(db: &C, id: i32) -> anyhow::Result<()> {
    let deleted = artists::Entity::delete_by_id(id)
        .exec(db)
        .await
        .context("failed to delete artist")?;

    if deleted.rows_affected == 0 {
        return Err(StoreError::NotFound {
            entity: "artist",
            id,
        }
        .into());
    }
    Ok(())
}

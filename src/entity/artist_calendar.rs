use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A date an artist has declared themselves bookable on. An artist without any
/// rows is bookable on every date.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist_calendar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub artist_id: i32,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entity::artists::Entity",
        from = "Column::ArtistId",
        to = "crate::entity::artists::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Artists,
}

impl Related<crate::entity::artists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

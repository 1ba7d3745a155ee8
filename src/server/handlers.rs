use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Local;
use log::info;
use sea_orm::TransactionTrait;

use super::ServerState;
use super::error::{ApiJson, AppError};
use super::types::{
    AreaResponse, ArtistDetailResponse, ArtistRequest, ArtistResponse, CalendarAddedResponse,
    CalendarResponse, CreateCalendarRequest, CreateShowRequest, CreatedResponse, HomeResponse,
    NamedItem, SearchRequest, SearchResponse, ShowResponse, ShowsSplit, SuccessResponse,
    VenueDetailResponse, VenueRequest, VenueResponse, parse_show_date, parse_show_time,
};
use crate::booking::{self, NewShow};
use crate::entity::helpers;

pub type HandlerResult<T> = Result<Json<T>, AppError>;
type Created = Result<(StatusCode, Json<CreatedResponse>), AppError>;

const RECENT_LIMIT: u64 = 10;

pub async fn home(State(state): State<ServerState>) -> HandlerResult<HomeResponse> {
    let db = state.database.connection()?;
    let new_artists = helpers::recent_artists(db, RECENT_LIMIT).await?;
    let new_venues = helpers::recent_venues(db, RECENT_LIMIT).await?;

    Ok(Json(HomeResponse {
        new_artists: new_artists.iter().map(NamedItem::from).collect(),
        new_venues: new_venues.iter().map(NamedItem::from).collect(),
    }))
}

// Venues

pub async fn list_venues(State(state): State<ServerState>) -> HandlerResult<Vec<AreaResponse>> {
    let db = state.database.connection()?;
    let areas = helpers::venue_areas(db).await?;

    Ok(Json(
        areas
            .into_iter()
            .map(|area| AreaResponse {
                venues: area.venues.iter().map(NamedItem::from).collect(),
                city: area.city,
                state: area.state,
            })
            .collect(),
    ))
}

pub async fn search_venues(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SearchRequest>,
) -> HandlerResult<SearchResponse> {
    let db = state.database.connection()?;
    let found = helpers::search_venues(db, &payload.search_term).await?;

    Ok(Json(SearchResponse::new(
        found.iter().map(NamedItem::from).collect(),
    )))
}

pub async fn get_venue(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> HandlerResult<VenueDetailResponse> {
    let db = state.database.connection()?;
    let venue = helpers::require_venue(db, id).await?;
    let shows = helpers::shows_for_venue(db, id).await?;
    let (past, upcoming) = helpers::split_by_date(shows, Local::now().date_naive());

    Ok(Json(VenueDetailResponse {
        venue: venue.into(),
        shows: ShowsSplit::new(past, upcoming),
    }))
}

pub async fn create_venue(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<VenueRequest>,
) -> Created {
    let txn = state.database.connection()?.begin().await?;
    let venue = helpers::create_venue(&txn, payload.into()).await?;
    txn.commit().await?;

    info!("Venue {} was successfully listed", venue.name);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: venue.id })))
}

pub async fn update_venue(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<VenueRequest>,
) -> HandlerResult<VenueResponse> {
    let txn = state.database.connection()?.begin().await?;
    let venue = helpers::update_venue(&txn, id, payload.into()).await?;
    txn.commit().await?;

    info!("Venue {} was successfully updated", venue.name);
    Ok(Json(venue.into()))
}

pub async fn delete_venue(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> HandlerResult<SuccessResponse> {
    let txn = state.database.connection()?.begin().await?;
    helpers::delete_venue(&txn, id).await?;
    txn.commit().await?;

    info!("Venue {id} deleted");
    Ok(Json(SuccessResponse { success: true }))
}

// Artists

pub async fn list_artists(State(state): State<ServerState>) -> HandlerResult<Vec<NamedItem>> {
    let db = state.database.connection()?;
    let artists = helpers::list_artists(db).await?;
    Ok(Json(artists.iter().map(NamedItem::from).collect()))
}

pub async fn search_artists(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SearchRequest>,
) -> HandlerResult<SearchResponse> {
    let db = state.database.connection()?;
    let found = helpers::search_artists(db, &payload.search_term).await?;

    Ok(Json(SearchResponse::new(
        found.iter().map(NamedItem::from).collect(),
    )))
}

pub async fn get_artist(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> HandlerResult<ArtistDetailResponse> {
    let db = state.database.connection()?;
    let artist = helpers::require_artist(db, id).await?;
    let shows = helpers::shows_for_artist(db, id).await?;
    let (past, upcoming) = helpers::split_by_date(shows, Local::now().date_naive());

    Ok(Json(ArtistDetailResponse {
        artist: artist.into(),
        shows: ShowsSplit::new(past, upcoming),
    }))
}

pub async fn create_artist(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ArtistRequest>,
) -> Created {
    let txn = state.database.connection()?.begin().await?;
    let artist = helpers::create_artist(&txn, payload.into()).await?;
    txn.commit().await?;

    info!("Artist {} was successfully listed", artist.name);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: artist.id })))
}

pub async fn update_artist(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<ArtistRequest>,
) -> HandlerResult<ArtistResponse> {
    let txn = state.database.connection()?.begin().await?;
    let artist = helpers::update_artist(&txn, id, payload.into()).await?;
    txn.commit().await?;

    info!("Artist {} was successfully updated", artist.name);
    Ok(Json(artist.into()))
}

pub async fn delete_artist(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> HandlerResult<SuccessResponse> {
    let txn = state.database.connection()?.begin().await?;
    helpers::delete_artist(&txn, id).await?;
    txn.commit().await?;

    info!("Artist {id} deleted");
    Ok(Json(SuccessResponse { success: true }))
}

// Calendar

pub async fn get_artist_calendar(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> HandlerResult<CalendarResponse> {
    let db = state.database.connection()?;
    let artist = helpers::require_artist(db, id).await?;
    let entries = booking::calendar_for(db, id).await?;

    Ok(Json(CalendarResponse {
        artist: NamedItem::from(&artist),
        calendar: entries.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_calendar(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CreateCalendarRequest>,
) -> HandlerResult<CalendarAddedResponse> {
    let txn = state.database.connection()?.begin().await?;
    let created = booking::add_availability(
        &txn,
        payload.artist_id,
        &payload.dates,
        state.client_offset,
    )
    .await?;
    txn.commit().await?;

    Ok(Json(CalendarAddedResponse {
        message: String::from("Calendar Added"),
        created: created.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_calendar(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> HandlerResult<SuccessResponse> {
    let txn = state.database.connection()?.begin().await?;
    booking::remove_availability(&txn, id).await?;
    txn.commit().await?;

    Ok(Json(SuccessResponse { success: true }))
}

// Shows

pub async fn list_shows(State(state): State<ServerState>) -> HandlerResult<Vec<ShowResponse>> {
    let db = state.database.connection()?;
    let shows = helpers::list_shows(db).await?;
    Ok(Json(shows.into_iter().map(Into::into).collect()))
}

pub async fn create_show(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CreateShowRequest>,
) -> Created {
    let start_date = parse_show_date(&payload.start_date).ok_or_else(|| {
        AppError::BadRequest(format!("invalid start_date {:?}", payload.start_date))
    })?;
    let start_time = parse_show_time(&payload.start_time).ok_or_else(|| {
        AppError::BadRequest(format!("invalid start_time {:?}", payload.start_time))
    })?;

    let txn = state.database.connection()?.begin().await?;
    let id = booking::create_show(
        &txn,
        NewShow {
            artist_id: payload.artist_id,
            venue_id: payload.venue_id,
            start_date,
            start_time,
        },
    )
    .await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

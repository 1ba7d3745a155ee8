//! HTTP error handling and response types.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use sea_orm::DbErr;
use serde::Serialize;

use crate::booking::BookingError;
use crate::entity::helpers::StoreError;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// The artist cannot be booked on the requested date.
    NotAvailable(String),
    /// Logged in full, reported to the client as a generic failure.
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::NotAvailable(msg) => (StatusCode::CONFLICT, "NOT_AVAILABLE", msg),
            AppError::Internal(err) => {
                error!("Request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    String::from("An error occurred, nothing was saved."),
                )
            }
        };

        (status, Json(ApiError { code, message })).into_response()
    }
}

/// `Json` that answers malformed bodies with a 400 `ApiError`.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(not_found @ StoreError::NotFound { .. }) => AppError::NotFound(not_found.to_string()),
            None => AppError::Internal(err),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotAvailable { .. } => AppError::NotAvailable(err.to_string()),
            BookingError::NotFound { .. } => AppError::NotFound(err.to_string()),
            BookingError::InvalidDate(_) => AppError::BadRequest(err.to_string()),
            BookingError::Persistence(inner) => AppError::Internal(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn booking_errors_map_to_statuses() {
        let unavailable = BookingError::NotAvailable {
            artist_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        };
        let cases = [
            (AppError::from(unavailable), StatusCode::CONFLICT),
            (
                AppError::from(BookingError::NotFound {
                    entity: "artist",
                    id: 1,
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(BookingError::InvalidDate("soon".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(BookingError::Persistence(anyhow::anyhow!("disk full"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn store_not_found_survives_anyhow() {
        let err: anyhow::Error = StoreError::NotFound {
            entity: "venue",
            id: 3,
        }
        .into();
        match AppError::from(err) {
            AppError::NotFound(msg) => assert_eq!(msg, "venue 3 not found"),
            other => panic!("unexpected {other:?}"),
        }
    }
}

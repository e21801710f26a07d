use crate::error::{AppError, AppResult};
use crate::models::{CreateMovieRequest, Movie, Runtime};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Response;
use chrono::Utc;
use validator::Validate;

use super::helpers::{read_json, write_json, Envelope, IdParam};

/// Accept a new movie.
///
/// Storage lives outside this service, so the validated input is echoed back
/// with `202 Accepted`.
pub async fn create_movie(body: Result<Bytes, BytesRejection>) -> AppResult<Response> {
    let input: CreateMovieRequest = read_json(body)?;
    input.validate()?;

    tracing::info!(title = %input.title, year = input.year, "Movie accepted");

    write_json(
        StatusCode::ACCEPTED,
        &Envelope::new("movie", input),
        HeaderMap::new(),
    )
}

/// Show a movie by id
pub async fn show_movie(IdParam(id): IdParam) -> AppResult<Response> {
    let movie = Movie {
        id,
        created_at: Utc::now(),
        title: "Casablanca".to_string(),
        year: 0,
        runtime: Runtime(102),
        genres: vec![
            "drama".to_string(),
            "romance".to_string(),
            "war".to_string(),
        ],
        version: 1,
    };

    write_json(StatusCode::OK, &Envelope::new("movie", movie), HeaderMap::new())
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}

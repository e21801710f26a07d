mod runtime;

pub use runtime::Runtime;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

/// A movie in the catalog.
///
/// `created_at` is internal bookkeeping and never encoded. `year`, `runtime`
/// and `genres` are left out of the JSON when unset.
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// Bumped on every update, used for optimistic concurrency.
    pub version: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

/// Request body for creating a movie
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 bytes long"))]
    pub title: String,

    #[validate(custom(function = "validate_year"))]
    pub year: i32,

    #[validate(custom(function = "validate_runtime"))]
    pub runtime: Runtime,

    #[validate(
        length(min = 1, max = 5, message = "must contain between 1 and 5 genres"),
        custom(function = "validate_genres")
    )]
    pub genres: Vec<String>,
}

fn validate_year(year: i32) -> Result<(), ValidationError> {
    if year < 1888 {
        return Err(ValidationError::new("year").with_message("must be 1888 or later".into()));
    }
    if year > Utc::now().year() {
        return Err(ValidationError::new("year").with_message("must not be in the future".into()));
    }
    Ok(())
}

fn validate_runtime(runtime: &Runtime) -> Result<(), ValidationError> {
    if runtime.minutes() <= 0 {
        return Err(
            ValidationError::new("runtime").with_message("must be a positive integer".into()),
        );
    }
    Ok(())
}

fn validate_genres(genres: &[String]) -> Result<(), ValidationError> {
    let unique: HashSet<&str> = genres.iter().map(String::as_str).collect();
    if unique.len() != genres.len() {
        return Err(
            ValidationError::new("genres").with_message("must not contain duplicate values".into()),
        );
    }
    Ok(())
}

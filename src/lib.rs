//! greenlight - a JSON API for a movie catalog.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod util;

//! Movie similarity recommendations over precomputed embeddings.
//!
//! The core is an exact cosine nearest-neighbor index (`index`) over an
//! immutable catalog of movie embeddings (`catalog`), wrapped in an HTTP API
//! (`routes`) that assembles each result with TMDB metadata and poster art
//! (`services`).

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

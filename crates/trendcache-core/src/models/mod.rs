//! Data models for trending movie data.
//!
//! This module contains the data structures used to represent
//! the trending collection:
//!
//! - `Movie`: one trending entry as the API returns it
//! - `MovieList`: a non-empty, ordered run of movies
//! - `TrendingResponse`: the API envelope around the results array

pub mod movie;

pub use movie::{Movie, MovieList, TrendingResponse};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Movie;

/// The locally storable part of a [`Movie`].
///
/// Genre ids only exist in the network schema and are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMovie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub media_type: Option<String>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
    pub video: Option<bool>,
    pub adult: Option<bool>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

impl From<&Movie> for CachedMovie {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            original_title: movie.original_title.clone(),
            overview: movie.overview.clone(),
            poster_path: movie.poster_path.clone(),
            backdrop_path: movie.backdrop_path.clone(),
            media_type: movie.media_type.clone(),
            original_language: movie.original_language.clone(),
            popularity: movie.popularity,
            release_date: movie.release_date.clone(),
            video: movie.video,
            adult: movie.adult,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
        }
    }
}

impl From<CachedMovie> for Movie {
    fn from(cached: CachedMovie) -> Self {
        Self {
            id: cached.id,
            title: cached.title,
            original_title: cached.original_title,
            overview: cached.overview,
            poster_path: cached.poster_path,
            backdrop_path: cached.backdrop_path,
            media_type: cached.media_type,
            original_language: cached.original_language,
            // not stored locally
            genre_ids: Vec::new(),
            popularity: cached.popularity,
            release_date: cached.release_date,
            video: cached.video,
            adult: cached.adult,
            vote_average: cached.vote_average,
            vote_count: cached.vote_count,
        }
    }
}

/// Build the records for a new snapshot.
///
/// Records are keyed by id. If the same id shows up twice, the later
/// record replaces the earlier one and takes its position in the order.
pub(crate) fn to_records(movies: &[Movie]) -> Vec<CachedMovie> {
    let last_index: HashMap<i64, usize> = movies
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, i))
        .collect();

    movies
        .iter()
        .enumerate()
        .filter(|(i, m)| last_index.get(&m.id) == Some(i))
        .map(|(_, m)| CachedMovie::from(m))
        .collect()
}

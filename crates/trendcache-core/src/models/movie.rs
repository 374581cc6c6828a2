use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for poster and backdrop images.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// A single entry from the trending collection.
///
/// Only `id` is guaranteed by the API. `genre_ids` exists on the wire but is
/// not kept in the local snapshot, so movies served from cache carry an
/// empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub video: Option<bool>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
}

impl Movie {
    /// Create a movie with only an id and title set.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            original_title: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            media_type: None,
            original_language: None,
            genre_ids: Vec::new(),
            popularity: None,
            release_date: None,
            video: None,
            adult: None,
            vote_average: None,
            vote_count: None,
        }
    }

    /// Year portion of the release date, if it has one.
    pub fn release_year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        let year = date.get(..4)?;
        if year.chars().all(|c| c.is_ascii_digit()) {
            Some(year)
        } else {
            None
        }
    }

    /// Full poster URL at the given size (e.g. "w500", "original").
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| image_url(size, path))
    }

    /// Full backdrop URL at the given size.
    pub fn backdrop_url(&self, size: &str) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| image_url(size, path))
    }

    pub fn rating_display(&self) -> String {
        match (self.vote_average, self.vote_count) {
            (Some(avg), Some(count)) if count > 0 => format!("{:.1} ({} votes)", avg, count),
            (Some(avg), None) => format!("{:.1}", avg),
            _ => "Not rated".to_string(),
        }
    }

    /// Case-insensitive match of the query against the title.
    pub fn matches_query(&self, query: &str) -> bool {
        crate::utils::contains_ignore_case(&self.title, query)
    }
}

fn image_url(size: &str, path: &str) -> String {
    format!("{}/{}/{}", IMAGE_BASE_URL, size, path.trim_start_matches('/'))
}

/// An ordered, non-empty run of movies.
///
/// The only way to build one is [`MovieList::new`], which refuses an empty
/// vector. A successful fetch with nothing in it is therefore unrepresentable
/// as a list and has to be reported some other way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MovieList(Vec<Movie>);

impl MovieList {
    pub fn new(movies: Vec<Movie>) -> Option<Self> {
        if movies.is_empty() {
            None
        } else {
            Some(Self(movies))
        }
    }

    pub fn as_slice(&self) -> &[Movie] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Movie> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for parity with slices.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &Movie {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.0.iter()
    }
}

impl std::ops::Deref for MovieList {
    type Target = [Movie];

    fn deref(&self) -> &[Movie] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MovieList {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<MovieList> for Vec<Movie> {
    fn from(list: MovieList) -> Self {
        list.0
    }
}

// Response from /trending/movie/day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: Option<i64>,
    #[serde(default)]
    pub total_results: Option<i64>,
}

impl TrendingResponse {
    pub fn into_movies(self) -> Vec<Movie> {
        self.results
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

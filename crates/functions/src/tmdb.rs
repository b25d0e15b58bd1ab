//! TMDB client — now-playing listings and movie reviews.
//!
//! Uses The Movie Database v3 API with an API key passed as a query
//! parameter. Responses are flattened into compact plain text for the
//! transcript rather than forwarded as raw JSON.

use marquee_core::error::FunctionError;
use serde::Deserialize;
use tracing::debug;

/// Maximum entries included in a now-playing listing.
const NOW_PLAYING_LIMIT: usize = 10;

/// Maximum reviews included in a reviews result.
const REVIEW_LIMIT: usize = 3;

/// Maximum characters of a single review excerpt.
const REVIEW_EXCERPT_LEN: usize = 400;

pub struct TmdbClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn api_key(&self) -> Result<&str, FunctionError> {
        self.api_key.as_deref().ok_or_else(|| {
            FunctionError::NotConfigured("TMDB_API_KEY is not set".into())
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FunctionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FunctionError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(FunctionError::ApiError {
                status_code: status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| FunctionError::BadResponse(e.to_string()))
    }

    /// List of movies currently in theaters.
    pub async fn now_playing(&self) -> Result<String, FunctionError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/movie/now_playing?api_key={}&language=en-US&page=1",
            self.base_url, api_key
        );

        debug!("Fetching now-playing movies from TMDB");
        let body = self.get_json(&url).await?;

        let page: NowPlayingPage = serde_json::from_value(body)
            .map_err(|e| FunctionError::BadResponse(e.to_string()))?;

        Ok(format_now_playing(&page))
    }

    /// Reviews for a movie by TMDB movie ID.
    pub async fn reviews(&self, movie_id: &str) -> Result<String, FunctionError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/movie/{}/reviews?api_key={}&language=en-US&page=1",
            self.base_url, movie_id, api_key
        );

        debug!(movie_id, "Fetching reviews from TMDB");
        let body = self.get_json(&url).await?;

        let page: ReviewPage = serde_json::from_value(body)
            .map_err(|e| FunctionError::BadResponse(e.to_string()))?;

        Ok(format_reviews(movie_id, &page))
    }
}

// --- TMDB API types (internal) ---

#[derive(Debug, Deserialize)]
struct NowPlayingPage {
    #[serde(default)]
    results: Vec<MovieEntry>,
}

#[derive(Debug, Deserialize)]
struct MovieEntry {
    id: u64,
    title: String,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    vote_average: f64,
}

#[derive(Debug, Deserialize)]
struct ReviewPage {
    #[serde(default)]
    results: Vec<ReviewEntry>,
}

#[derive(Debug, Deserialize)]
struct ReviewEntry {
    author: String,
    content: String,
}

fn format_now_playing(page: &NowPlayingPage) -> String {
    if page.results.is_empty() {
        return "No movies are currently playing in theaters.".into();
    }

    let mut out = String::from("Movies now playing in theaters:\n");
    for movie in page.results.iter().take(NOW_PLAYING_LIMIT) {
        out.push_str(&format!(
            "- {} (id: {}, released: {}, rating: {:.1}/10)\n",
            movie.title, movie.id, movie.release_date, movie.vote_average
        ));
    }
    out
}

fn format_reviews(movie_id: &str, page: &ReviewPage) -> String {
    if page.results.is_empty() {
        return format!("No reviews found for movie id {movie_id}.");
    }

    let mut out = format!("Reviews for movie id {movie_id}:\n");
    for review in page.results.iter().take(REVIEW_LIMIT) {
        let excerpt: String = review.content.chars().take(REVIEW_EXCERPT_LEN).collect();
        let ellipsis = if review.content.chars().count() > REVIEW_EXCERPT_LEN {
            "…"
        } else {
            ""
        };
        out.push_str(&format!("- {}: {}{}\n", review.author, excerpt, ellipsis));
    }
    out
}

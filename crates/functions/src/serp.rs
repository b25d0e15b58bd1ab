//! SerpAPI client — movie showtimes lookups.
//!
//! Queries Google via SerpAPI for "<title> theater <location>" and formats
//! the structured `showtimes` block into plain text. SerpAPI groups
//! showtimes by day, then by theater, then by showing type (Standard,
//! 3D, IMAX, ...).

use marquee_core::error::FunctionError;
use serde::Deserialize;
use tracing::debug;

pub struct SerpClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl SerpClient {
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

    /// Showtimes for a movie title in a location (zip code).
    pub async fn showtimes(&self, title: &str, location: &str) -> Result<String, FunctionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            FunctionError::NotConfigured("SERPAPI_API_KEY is not set".into())
        })?;

        debug!(title, location, "Fetching showtimes from SerpAPI");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", &format!("{title} theater {location}")),
                ("location", location),
                ("hl", "en"),
                ("gl", "us"),
                ("api_key", api_key),
            ])
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

        let body: ShowtimesResponse = response
            .json()
            .await
            .map_err(|e| FunctionError::BadResponse(e.to_string()))?;

        Ok(format_showtimes(title, location, &body))
    }
}

// --- SerpAPI response types (internal) ---

#[derive(Debug, Deserialize)]
struct ShowtimesResponse {
    #[serde(default)]
    showtimes: Vec<ShowtimeDay>,
}

#[derive(Debug, Deserialize)]
struct ShowtimeDay {
    #[serde(default)]
    day: String,
    #[serde(default)]
    theaters: Vec<Theater>,
}

#[derive(Debug, Deserialize)]
struct Theater {
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    showing: Vec<Showing>,
}

#[derive(Debug, Deserialize)]
struct Showing {
    #[serde(default)]
    time: Vec<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

fn format_showtimes(title: &str, location: &str, body: &ShowtimesResponse) -> String {
    if body.showtimes.is_empty() {
        return format!("No showtimes found for '{title}' in {location}.");
    }

    let mut out = format!("Showtimes for '{title}' in {location}:\n");
    for day in &body.showtimes {
        if !day.day.is_empty() {
            out.push_str(&format!("{}:\n", day.day));
        }
        for theater in &day.theaters {
            out.push_str(&format!("  {}", theater.name));
            if !theater.address.is_empty() {
                out.push_str(&format!(" ({})", theater.address));
            }
            out.push('\n');
            for showing in &theater.showing {
                let label = showing.kind.as_deref().unwrap_or("Standard");
                out.push_str(&format!("    {}: {}\n", label, showing.time.join(", ")));
            }
        }
    }
    out
}

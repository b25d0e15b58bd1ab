//! Movie-data provider functions for Marquee.
//!
//! Implements the `MovieData` trait against real backends:
//! - TMDB for now-playing listings and reviews
//! - SerpAPI for showtimes
//! - A local ticket desk for the purchase / confirmation flow
//!
//! Every operation returns plain text meant for direct re-insertion into
//! the transcript as a system message; the model composes the user-facing
//! answer from it.

pub mod serp;
pub mod ticketing;
pub mod tmdb;

use async_trait::async_trait;
use marquee_config::AppConfig;
use marquee_core::error::FunctionError;
use marquee_core::function::MovieData;

pub use serp::SerpClient;
pub use ticketing::TicketDesk;
pub use tmdb::TmdbClient;

/// The aggregate movie-data provider wired up by the CLI.
pub struct MovieApi {
    tmdb: TmdbClient,
    serp: SerpClient,
    tickets: TicketDesk,
}

impl MovieApi {
    pub fn new(tmdb: TmdbClient, serp: SerpClient, tickets: TicketDesk) -> Self {
        Self { tmdb, serp, tickets }
    }
}

/// Build the movie-data provider from configuration.
pub fn build_from_config(config: &AppConfig) -> MovieApi {
    MovieApi::new(
        TmdbClient::new(config.tmdb.api_key.clone(), &config.tmdb.api_url),
        SerpClient::new(config.serp.api_key.clone(), &config.serp.api_url),
        TicketDesk::new(config.assistant.confirm_purchases),
    )
}

#[async_trait]
impl MovieData for MovieApi {
    async fn now_playing(&self) -> Result<String, FunctionError> {
        self.tmdb.now_playing().await
    }

    async fn showtimes(&self, title: &str, location: &str) -> Result<String, FunctionError> {
        self.serp.showtimes(title, location).await
    }

    async fn buy_ticket(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> Result<String, FunctionError> {
        self.tickets.buy_ticket(theater, movie, showtime).await
    }

    async fn confirm_ticket_purchase(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> Result<String, FunctionError> {
        self.tickets
            .confirm_ticket_purchase(theater, movie, showtime)
            .await
    }

    async fn reviews(&self, movie_id: &str) -> Result<String, FunctionError> {
        self.tmdb.reviews(movie_id).await
    }
}

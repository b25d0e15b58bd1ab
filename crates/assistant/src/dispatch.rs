//! Function dispatcher — maps wire names to movie-data collaborators.
//!
//! The dispatcher is deliberately forgiving: missing argument keys default
//! to empty text, unknown names and collaborator failures become ordinary
//! text results. Everything is fed back to the model as a system message;
//! the model, not the dispatcher, decides how to recover.

use marquee_core::function::{Capability, CapabilitySet, FunctionCall, MovieData};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Dispatcher {
    movie_data: Arc<dyn MovieData>,
    capabilities: CapabilitySet,
}

impl Dispatcher {
    pub fn new(movie_data: Arc<dyn MovieData>, capabilities: CapabilitySet) -> Self {
        Self {
            movie_data,
            capabilities,
        }
    }

    /// The function set exposed to the model in this session.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Execute a function call and return its textual result.
    ///
    /// Never fails: names outside the capability set yield an
    /// "Unknown function" text, and collaborator errors are rendered as
    /// descriptive text.
    pub async fn dispatch(&self, call: &FunctionCall) -> String {
        let Some(capability) = self.capabilities.resolve(&call.function_name) else {
            warn!(function = %call.function_name, "Unknown function requested");
            return format!("Unknown function '{}' cannot be called", call.function_name);
        };

        debug!(function = %call.function_name, "Dispatching function call");

        let result = match capability {
            Capability::NowPlaying => self.movie_data.now_playing().await,
            Capability::Showtimes => {
                self.movie_data
                    .showtimes(call.arg("title"), call.arg("location"))
                    .await
            }
            Capability::BuyTicket => {
                self.movie_data
                    .buy_ticket(call.arg("theater"), call.arg("movie"), call.arg("showtime"))
                    .await
            }
            Capability::ConfirmTicketPurchase => {
                self.movie_data
                    .confirm_ticket_purchase(
                        call.arg("theater"),
                        call.arg("movie"),
                        call.arg("showtime"),
                    )
                    .await
            }
            Capability::Reviews => self.movie_data.reviews(call.arg("movie_id")).await,
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                warn!(function = %call.function_name, error = %e, "Function call failed");
                format!("Function '{}' failed: {e}", call.function_name)
            }
        }
    }
}

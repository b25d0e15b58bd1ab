//! Function-call domain types and the movie-data collaborator trait.
//!
//! The model requests external lookups by embedding a JSON object with
//! exactly two top-level keys in its response text:
//!
//! ```json
//! {"function_name": "get_showtimes", "args": {"title": "Despicable Me 4", "location": "94110"}}
//! ```
//!
//! `FunctionCall` is the parsed form of that object. It is ephemeral: it
//! lives for one dispatch and is never appended to the transcript.

use crate::error::FunctionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Wire names of the callable functions.
pub const GET_NOW_PLAYING_MOVIES: &str = "get_now_playing_movies";
pub const GET_SHOWTIMES: &str = "get_showtimes";
pub const BUY_TICKET: &str = "buy_ticket";
pub const CONFIRM_TICKET_PURCHASE: &str = "confirm_ticket_purchase";
pub const GET_REVIEWS: &str = "get_reviews";

/// A function call parsed from one assistant response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The wire name of the function to invoke
    pub function_name: String,

    /// Argument mapping; values are expected to be strings
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl FunctionCall {
    /// Look up an argument by key, defaulting to empty text.
    ///
    /// Missing keys and non-string values both degrade to `""` rather than
    /// aborting the turn; the collaborator is left to produce a clarifying
    /// or degraded result.
    pub fn arg(&self, key: &str) -> &str {
        self.args.get(key).and_then(|v| v.as_str()).unwrap_or("")
    }
}

/// A single callable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    NowPlaying,
    Showtimes,
    BuyTicket,
    ConfirmTicketPurchase,
    Reviews,
}

impl Capability {
    /// The wire name the model uses for this capability.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::NowPlaying => GET_NOW_PLAYING_MOVIES,
            Self::Showtimes => GET_SHOWTIMES,
            Self::BuyTicket => BUY_TICKET,
            Self::ConfirmTicketPurchase => CONFIRM_TICKET_PURCHASE,
            Self::Reviews => GET_REVIEWS,
        }
    }
}

/// The set of functions exposed to the model in one session.
///
/// Two deployed variants of the assistant existed: a one-step flow where
/// `buy_ticket` completes the purchase directly, and a two-step flow where
/// `buy_ticket` proposes and `confirm_ticket_purchase` finalizes. Both are
/// one configuration of this set, not divergent implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    capabilities: Vec<Capability>,
}

impl CapabilitySet {
    /// The one-step variant: four functions, purchase completes directly.
    pub fn one_step() -> Self {
        Self {
            capabilities: vec![
                Capability::NowPlaying,
                Capability::Showtimes,
                Capability::BuyTicket,
                Capability::Reviews,
            ],
        }
    }

    /// The two-step variant: five functions, confirmation-gated purchase.
    pub fn two_step() -> Self {
        Self {
            capabilities: vec![
                Capability::NowPlaying,
                Capability::Showtimes,
                Capability::BuyTicket,
                Capability::ConfirmTicketPurchase,
                Capability::Reviews,
            ],
        }
    }

    /// Whether the two-step confirmation flow is active.
    pub fn confirmation_gated(&self) -> bool {
        self.capabilities.contains(&Capability::ConfirmTicketPurchase)
    }

    /// Resolve a wire name to a capability in this set.
    pub fn resolve(&self, wire_name: &str) -> Option<Capability> {
        self.capabilities
            .iter()
            .copied()
            .find(|c| c.wire_name() == wire_name)
    }

    /// Iterate the capabilities in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::two_step()
    }
}

/// The movie-data collaborators behind the dispatcher.
///
/// All five operations return plain text intended for direct re-insertion
/// into the transcript as a system message. The model, not the caller,
/// composes any user-facing explanation of the result.
#[async_trait]
pub trait MovieData: Send + Sync {
    /// List of movies currently in theaters.
    async fn now_playing(&self) -> std::result::Result<String, FunctionError>;

    /// Showtimes for a movie title in a location (zip code).
    async fn showtimes(
        &self,
        title: &str,
        location: &str,
    ) -> std::result::Result<String, FunctionError>;

    /// Propose (or in the one-step variant, complete) a ticket purchase.
    async fn buy_ticket(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> std::result::Result<String, FunctionError>;

    /// Finalize a previously proposed ticket purchase.
    async fn confirm_ticket_purchase(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> std::result::Result<String, FunctionError>;

    /// Reviews for a movie by TMDB movie ID.
    async fn reviews(&self, movie_id: &str) -> std::result::Result<String, FunctionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_defaults_to_empty() {
        let call = FunctionCall {
            function_name: GET_SHOWTIMES.into(),
            args: serde_json::from_str(r#"{"title": "Dune", "count": 3}"#).unwrap(),
        };
        assert_eq!(call.arg("title"), "Dune");
        assert_eq!(call.arg("location"), "");
        // Non-string values degrade to empty text too
        assert_eq!(call.arg("count"), "");
    }

    #[test]
    fn one_step_set_excludes_confirmation() {
        let set = CapabilitySet::one_step();
        assert!(!set.confirmation_gated());
        assert!(set.resolve(CONFIRM_TICKET_PURCHASE).is_none());
        assert_eq!(set.resolve(BUY_TICKET), Some(Capability::BuyTicket));
    }

    #[test]
    fn two_step_set_has_five_functions() {
        let set = CapabilitySet::two_step();
        assert!(set.confirmation_gated());
        assert_eq!(set.iter().count(), 5);
        assert_eq!(
            set.resolve(CONFIRM_TICKET_PURCHASE),
            Some(Capability::ConfirmTicketPurchase)
        );
    }

    #[test]
    fn unknown_wire_name_does_not_resolve() {
        let set = CapabilitySet::two_step();
        assert!(set.resolve("foo").is_none());
    }

    #[test]
    fn function_call_deserializes_from_wire_format() {
        let json = r#"{"function_name": "get_now_playing_movies", "args": {}}"#;
        let call: FunctionCall = serde_json::from_str(json).unwrap();
        assert_eq!(call.function_name, GET_NOW_PLAYING_MOVIES);
        assert!(call.args.is_empty());
    }
}

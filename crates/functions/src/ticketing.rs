//! Ticket desk — the purchase / confirmation collaborator.
//!
//! `buy_ticket` either completes a purchase directly (one-step variant) or
//! records it as pending and echoes the details back so the model can ask
//! the user to confirm (two-step variant). `confirm_ticket_purchase`
//! finalizes whatever is pending. At most one purchase is pending per desk;
//! a new `buy_ticket` replaces it.

use marquee_core::error::FunctionError;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingTicket {
    theater: String,
    movie: String,
    showtime: String,
}

pub struct TicketDesk {
    /// Two-step flow: `buy_ticket` proposes, `confirm_ticket_purchase` finalizes.
    confirmation_required: bool,
    pending: Mutex<Option<PendingTicket>>,
}

impl TicketDesk {
    pub fn new(confirmation_required: bool) -> Self {
        Self {
            confirmation_required,
            pending: Mutex::new(None),
        }
    }

    /// Propose (or in the one-step variant, complete) a ticket purchase.
    pub async fn buy_ticket(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> Result<String, FunctionError> {
        if !self.confirmation_required {
            info!(theater, movie, showtime, "Ticket purchased (one-step)");
            return Ok(purchase_receipt(theater, movie, showtime));
        }

        let ticket = PendingTicket {
            theater: theater.to_string(),
            movie: movie.to_string(),
            showtime: showtime.to_string(),
        };
        *self.pending.lock().unwrap() = Some(ticket);

        Ok(format!(
            "Ticket purchase pending confirmation:\n\
             - Movie: {movie}\n\
             - Theater: {theater}\n\
             - Showtime: {showtime}\n\
             Please ask the user to confirm this purchase before finalizing."
        ))
    }

    /// Finalize a previously proposed ticket purchase.
    pub async fn confirm_ticket_purchase(
        &self,
        theater: &str,
        movie: &str,
        showtime: &str,
    ) -> Result<String, FunctionError> {
        let taken = self.pending.lock().unwrap().take();
        if taken.is_none() {
            return Err(FunctionError::NoPendingPurchase);
        }

        info!(theater, movie, showtime, "Ticket purchase confirmed");
        Ok(purchase_receipt(theater, movie, showtime))
    }
}

fn purchase_receipt(theater: &str, movie: &str, showtime: &str) -> String {
    format!(
        "Ticket purchased!\n\
         - Movie: {movie}\n\
         - Theater: {theater}\n\
         - Showtime: {showtime}\n\
         Enjoy the show."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn one_step_purchase_completes_directly() {
        let desk = TicketDesk::new(false);
        let result = desk
            .buy_ticket("AMC Metreon 16", "Despicable Me 4", "7:00pm")
            .await
            .unwrap();
        assert!(result.contains("Ticket purchased!"));
        assert!(result.contains("Despicable Me 4"));
    }

    #[tokio::test]
    async fn two_step_purchase_asks_for_confirmation() {
        let desk = TicketDesk::new(true);
        let result = desk
            .buy_ticket("AMC Metreon 16", "Despicable Me 4", "7:00pm")
            .await
            .unwrap();
        assert!(result.contains("pending confirmation"));
        assert!(result.contains("AMC Metreon 16"));
    }

    #[tokio::test]
    async fn confirm_finalizes_pending_purchase() {
        let desk = TicketDesk::new(true);
        desk.buy_ticket("AMC Metreon 16", "Despicable Me 4", "7:00pm")
            .await
            .unwrap();
        let result = desk
            .confirm_ticket_purchase("AMC Metreon 16", "Despicable Me 4", "7:00pm")
            .await
            .unwrap();
        assert!(result.contains("Ticket purchased!"));

        // Second confirm has nothing pending
        let err = desk
            .confirm_ticket_purchase("AMC Metreon 16", "Despicable Me 4", "7:00pm")
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::NoPendingPurchase));
    }

    #[tokio::test]
    async fn confirm_without_buy_is_an_error() {
        let desk = TicketDesk::new(true);
        let err = desk
            .confirm_ticket_purchase("Roxie", "Eraserhead", "9:00pm")
            .await
            .unwrap_err();
        assert!(matches!(err, FunctionError::NoPendingPurchase));
    }

    #[tokio::test]
    async fn new_buy_replaces_pending() {
        let desk = TicketDesk::new(true);
        desk.buy_ticket("Roxie", "Eraserhead", "9:00pm").await.unwrap();
        desk.buy_ticket("AMC Metreon 16", "Twisters", "6:30pm")
            .await
            .unwrap();
        let result = desk
            .confirm_ticket_purchase("AMC Metreon 16", "Twisters", "6:30pm")
            .await
            .unwrap();
        assert!(result.contains("Twisters"));
    }
}

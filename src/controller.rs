//! Exchange and reset state machine over an owned [`Transcript`].
//!
//! Each network operation is split into a `begin_*` phase that mutates the
//! transcript and hands out a ticket, and a `complete_*` phase that applies
//! the backend's result. The UI holds the controller in a signal and cannot
//! keep it borrowed across the await in between.
//!
//! At most one exchange is pending at a time. A reset bumps the epoch, and
//! tickets from an older epoch are ignored when they complete.

use crate::backend::{ChatBackend, ChatResult, ResetReply, SendReply};
use crate::transcript::{IndicatorHandle, Transcript};
use crate::types::Sender;
use std::time::Duration;

pub const DEFAULT_SEND_ERROR: &str =
    "Lo siento, ha ocurrido un error. Por favor, inténtalo de nuevo.";
pub const DEFAULT_RESET_ERROR: &str = "Lo siento, ha ocurrido un error al reiniciar el chat.";

/// User-visible texts shown in place of a failed reply or reset.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackMessages {
    pub send_error: String,
    pub reset_error: String,
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            send_error: DEFAULT_SEND_ERROR.to_string(),
            reset_error: DEFAULT_RESET_ERROR.to_string(),
        }
    }
}

/// A started exchange, redeemed with [`ChatController::complete_exchange`].
#[derive(Debug)]
pub struct ExchangeTicket {
    epoch: u64,
    indicator: IndicatorHandle,
    content: String,
}

impl ExchangeTicket {
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A started reset, redeemed with [`ChatController::complete_reset`].
#[derive(Debug)]
pub struct ResetTicket {
    epoch: u64,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; nothing changed.
    Empty,
    /// A reply is still pending; nothing changed.
    Busy,
    Started(ExchangeTicket),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Replied,
    Failed,
    /// The conversation was reset while the request was in flight.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The backend accepted the reset; a greeting exchange should follow.
    Greet,
    Failed,
    Stale,
}

#[derive(Debug, Default)]
pub struct ChatController {
    transcript: Transcript,
    fallback: FallbackMessages,
    pending: Option<IndicatorHandle>,
    epoch: u64,
}

impl ChatController {
    pub fn new(fallback: FallbackMessages) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Handle text typed by the user. On success the user's message is
    /// already in the transcript and the typing indicator is shown.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.is_awaiting_reply() {
            tracing::debug!("submit rejected while a reply is pending");
            return SubmitOutcome::Busy;
        }

        self.transcript.append(Sender::User, message);
        match self.begin_exchange(message) {
            Some(ticket) => SubmitOutcome::Started(ticket),
            None => SubmitOutcome::Busy,
        }
    }

    /// Show the typing indicator for a request carrying `content`. Returns
    /// `None` when another exchange is still pending.
    pub fn begin_exchange(&mut self, content: &str) -> Option<ExchangeTicket> {
        if self.pending.is_some() {
            return None;
        }
        let indicator = self.transcript.show_typing_indicator();
        self.pending = Some(indicator);
        tracing::info!(epoch = self.epoch, greeting = content.is_empty(), "exchange started");
        Some(ExchangeTicket {
            epoch: self.epoch,
            indicator,
            content: content.to_string(),
        })
    }

    /// Start the greeting exchange scheduled while the conversation was at
    /// `epoch`. Returns `None` when a reset happened since, or when busy.
    pub fn begin_greeting(&mut self, epoch: u64) -> Option<ExchangeTicket> {
        if epoch != self.epoch {
            tracing::info!(
                scheduled_epoch = epoch,
                epoch = self.epoch,
                "skipping greeting for a reset conversation"
            );
            return None;
        }
        self.begin_exchange("")
    }

    pub fn complete_exchange(
        &mut self,
        ticket: ExchangeTicket,
        result: ChatResult<SendReply>,
    ) -> ExchangeOutcome {
        if ticket.epoch != self.epoch {
            tracing::info!(
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "discarding reply from a reset conversation"
            );
            return ExchangeOutcome::Stale;
        }

        self.transcript.hide_typing_indicator(ticket.indicator);
        if self.pending == Some(ticket.indicator) {
            self.pending = None;
        }

        match result {
            Ok(reply) => {
                self.transcript.append(Sender::Bot, reply.response);
                ExchangeOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(error = %err, "send_message failed");
                self.transcript
                    .append(Sender::Bot, self.fallback.send_error.clone());
                ExchangeOutcome::Failed
            }
        }
    }

    /// Clear the transcript and abandon any pending exchange before the
    /// backend has confirmed anything.
    pub fn begin_reset(&mut self) -> ResetTicket {
        self.transcript.clear();
        self.pending = None;
        self.epoch += 1;
        tracing::info!(epoch = self.epoch, "conversation reset started");
        ResetTicket { epoch: self.epoch }
    }

    pub fn complete_reset(
        &mut self,
        ticket: ResetTicket,
        result: ChatResult<ResetReply>,
    ) -> ResetOutcome {
        if ticket.epoch != self.epoch {
            return ResetOutcome::Stale;
        }
        match result {
            Ok(reply) if reply.is_success() => ResetOutcome::Greet,
            Ok(reply) => {
                tracing::warn!(status = ?reply.status, "reset_conversation rejected");
                self.reset_failed()
            }
            Err(err) => {
                tracing::warn!(error = %err, "reset_conversation failed");
                self.reset_failed()
            }
        }
    }

    fn reset_failed(&mut self) -> ResetOutcome {
        self.transcript
            .append(Sender::Bot, self.fallback.reset_error.clone());
        ResetOutcome::Failed
    }

    // ============================================
    // Async drivers
    // ============================================

    /// Run a full exchange for `content`. Returns `None` when busy.
    pub async fn exchange<B>(&mut self, backend: &B, content: &str) -> Option<ExchangeOutcome>
    where
        B: ChatBackend + ?Sized,
    {
        let ticket = self.begin_exchange(content)?;
        let result = backend.send_message(ticket.content()).await;
        Some(self.complete_exchange(ticket, result))
    }

    /// Submit user input and wait for the bot's reply.
    pub async fn send_user_input<B>(&mut self, backend: &B, input: &str) -> Option<ExchangeOutcome>
    where
        B: ChatBackend + ?Sized,
    {
        match self.submit(input) {
            SubmitOutcome::Started(ticket) => {
                let result = backend.send_message(ticket.content()).await;
                Some(self.complete_exchange(ticket, result))
            }
            SubmitOutcome::Empty | SubmitOutcome::Busy => None,
        }
    }

    pub async fn reset<B>(&mut self, backend: &B) -> ResetOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let ticket = self.begin_reset();
        let result = backend.reset_conversation().await;
        self.complete_reset(ticket, result)
    }

    /// Reset, then after `delay` ask for a fresh greeting if the backend
    /// accepted the reset.
    pub async fn reset_and_greet<B>(&mut self, backend: &B, delay: Duration) -> ResetOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let outcome = self.reset(backend).await;
        if outcome == ResetOutcome::Greet {
            let epoch = self.epoch;
            tokio::time::sleep(delay).await;
            if let Some(ticket) = self.begin_greeting(epoch) {
                let result = backend.send_message(ticket.content()).await;
                self.complete_exchange(ticket, result);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ChatError;

    fn failure() -> ChatError {
        ChatError::Status {
            status: 500,
            body: "boom".into(),
        }
    }

    #[test]
    fn test_blank_input_changes_nothing() {
        let mut controller = ChatController::default();
        for input in ["", "   ", "\n\t "] {
            assert!(matches!(controller.submit(input), SubmitOutcome::Empty));
        }
        assert!(controller.transcript().is_empty());
        assert!(!controller.transcript().has_typing_indicator());
        assert!(!controller.is_awaiting_reply());
    }

    #[test]
    fn test_submit_trims_and_shows_indicator() {
        let mut controller = ChatController::default();
        let SubmitOutcome::Started(ticket) = controller.submit("  Hola  ") else {
            panic!("expected exchange to start");
        };
        assert_eq!(ticket.content(), "Hola");
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript().messages()[0].content, "Hola");
        assert!(controller.transcript().has_typing_indicator());
        assert!(controller.is_awaiting_reply());
    }

    #[test]
    fn test_second_submit_is_busy() {
        let mut controller = ChatController::default();
        let SubmitOutcome::Started(_ticket) = controller.submit("uno") else {
            panic!("expected exchange to start");
        };
        assert!(matches!(controller.submit("dos"), SubmitOutcome::Busy));
        assert!(controller.begin_exchange("").is_none());
        assert_eq!(controller.transcript().len(), 1);
    }

    #[test]
    fn test_failed_exchange_shows_fallback() {
        let mut controller = ChatController::new(FallbackMessages {
            send_error: "send failed".into(),
            reset_error: "reset failed".into(),
        });
        let ticket = controller.begin_exchange("").expect("idle controller");
        let outcome = controller.complete_exchange(ticket, Err(failure()));
        assert_eq!(outcome, ExchangeOutcome::Failed);
        assert_eq!(
            controller.transcript().last().map(|m| (m.sender, m.content.as_str())),
            Some((Sender::Bot, "send failed"))
        );
        assert!(!controller.transcript().has_typing_indicator());
        assert!(!controller.is_awaiting_reply());
    }

    #[test]
    fn test_reply_after_reset_is_discarded() {
        let mut controller = ChatController::default();
        let SubmitOutcome::Started(ticket) = controller.submit("Hola") else {
            panic!("expected exchange to start");
        };
        let reset = controller.begin_reset();
        assert!(controller.transcript().is_empty());
        assert!(!controller.is_awaiting_reply());

        let outcome = controller.complete_exchange(ticket, Ok(SendReply::new("tarde")));
        assert_eq!(outcome, ExchangeOutcome::Stale);
        assert!(controller.transcript().is_empty());

        let outcome = controller.complete_reset(reset, Ok(ResetReply::with_status("success")));
        assert_eq!(outcome, ResetOutcome::Greet);
    }

    #[test]
    fn test_stale_exchange_leaves_new_indicator() {
        let mut controller = ChatController::default();
        let old = controller.begin_exchange("").expect("idle controller");
        let reset = controller.begin_reset();
        controller.complete_reset(reset, Ok(ResetReply::with_status("success")));
        let _greeting = controller.begin_exchange("").expect("idle after reset");

        controller.complete_exchange(old, Ok(SendReply::new("viejo")));
        assert!(controller.transcript().has_typing_indicator());
        assert!(controller.is_awaiting_reply());
    }

    #[test]
    fn test_reset_during_greeting_delay_skips_greeting() {
        let mut controller = ChatController::default();
        let scheduled = controller.epoch();

        let reset = controller.begin_reset();
        let outcome = controller.complete_reset(reset, Ok(ResetReply::with_status("failure")));
        assert_eq!(outcome, ResetOutcome::Failed);

        assert!(controller.begin_greeting(scheduled).is_none());
        assert!(!controller.transcript().has_typing_indicator());
        assert!(!controller.is_awaiting_reply());
        let contents: Vec<_> = controller
            .transcript()
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, [DEFAULT_RESET_ERROR]);
    }

    #[test]
    fn test_only_latest_greeting_runs_after_reset() {
        let mut controller = ChatController::default();
        let on_load = controller.epoch();

        let reset = controller.begin_reset();
        controller.complete_reset(reset, Ok(ResetReply::with_status("success")));
        let after_reset = controller.epoch();

        assert!(controller.begin_greeting(on_load).is_none());
        let ticket = controller.begin_greeting(after_reset).expect("current greeting");
        assert_eq!(ticket.content(), "");
        assert!(controller.transcript().has_typing_indicator());
    }

    #[test]
    fn test_overlapping_resets_only_latest_counts() {
        let mut controller = ChatController::default();
        let first = controller.begin_reset();
        let second = controller.begin_reset();
        assert_eq!(controller.complete_reset(first, Err(failure())), ResetOutcome::Stale);
        assert!(controller.transcript().is_empty());
        assert_eq!(controller.complete_reset(second, Err(failure())), ResetOutcome::Failed);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.epoch(), 2);
    }
}

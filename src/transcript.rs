//! Owned conversation transcript.
//!
//! Messages are kept in insertion order. The typing indicator is not a
//! message: it is an optional handle that always renders after the last
//! message, so at most one can exist at a time.

use crate::types::{Message, Sender};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

/// Identity of the typing indicator currently shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndicatorHandle(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
    indicator: Option<IndicatorHandle>,
    next_indicator: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message stamped with the current local time of day.
    pub fn append(&mut self, sender: Sender, content: impl Into<String>) -> &Message {
        self.append_at(sender, content, current_time())
    }

    pub fn append_at(
        &mut self,
        sender: Sender,
        content: impl Into<String>,
        at: OffsetDateTime,
    ) -> &Message {
        self.messages.push(Message {
            sender,
            content: content.into(),
            timestamp: format_time_of_day(at),
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Show the typing indicator, replacing any indicator already shown.
    pub fn show_typing_indicator(&mut self) -> IndicatorHandle {
        let handle = IndicatorHandle(self.next_indicator);
        self.next_indicator += 1;
        self.indicator = Some(handle);
        handle
    }

    /// Hide the indicator if `handle` is the one currently shown.
    pub fn hide_typing_indicator(&mut self, handle: IndicatorHandle) -> bool {
        if self.indicator == Some(handle) {
            self.indicator = None;
            true
        } else {
            false
        }
    }

    pub fn typing_indicator(&self) -> Option<IndicatorHandle> {
        self.indicator
    }

    pub fn has_typing_indicator(&self) -> bool {
        self.indicator.is_some()
    }

    /// Drop every message and the indicator.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.indicator = None;
    }
}

fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Format `at` as `HH:MM` in the local offset, falling back to the offset
/// already carried by `at` when the local one is unknown.
pub fn format_time_of_day(at: OffsetDateTime) -> String {
    let mut datetime = at;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    format_fixed(datetime)
}

fn format_fixed(at: OffsetDateTime) -> String {
    at.format(MESSAGE_TIME_FORMAT)
        .unwrap_or_else(|_| format!("{:02}:{:02}", at.hour(), at.minute()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_time_is_zero_padded() {
        assert_eq!(format_fixed(datetime!(2024-03-01 07:05 UTC)), "07:05");
        assert_eq!(format_fixed(datetime!(2024-03-01 23:59 UTC)), "23:59");
    }

    #[test]
    fn test_local_time_has_clock_shape() {
        let stamp = format_time_of_day(OffsetDateTime::now_utc());
        assert_eq!(stamp.len(), 5);
        assert_eq!(&stamp[2..3], ":");
        assert!(stamp.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_append_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.append(Sender::User, "uno");
        transcript.append(Sender::Bot, "dos");
        let contents: Vec<_> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["uno", "dos"]);
        assert_eq!(transcript.last().map(|m| m.sender), Some(Sender::Bot));
    }

    #[test]
    fn test_single_indicator() {
        let mut transcript = Transcript::new();
        let first = transcript.show_typing_indicator();
        let second = transcript.show_typing_indicator();
        assert_ne!(first, second);
        assert_eq!(transcript.typing_indicator(), Some(second));

        // The replaced handle no longer controls the indicator.
        assert!(!transcript.hide_typing_indicator(first));
        assert!(transcript.has_typing_indicator());
        assert!(transcript.hide_typing_indicator(second));
        assert!(!transcript.has_typing_indicator());
    }

    #[test]
    fn test_clear_drops_indicator() {
        let mut transcript = Transcript::new();
        transcript.append(Sender::User, "hola");
        let handle = transcript.show_typing_indicator();
        transcript.clear();
        assert!(transcript.is_empty());
        assert!(!transcript.has_typing_indicator());
        assert!(!transcript.hide_typing_indicator(handle));
    }
}

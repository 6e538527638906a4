//! Event and message system for the tour
//!
//! Messages flow from the terminal loop into the [`crate::AppCoordinator`],
//! and every dispatched message is broadcast on the [`MessageBus`]. Operation
//! observers publish [`Message::Redraw`] on the same bus so the loop repaints
//! as soon as a simulated request settles.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::broadcast;

use crate::error::CoreError;
use crate::page::PageId;
use crate::theme::Theme;

/// Messages that can be sent through the tour
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Message {
    // === Page navigation ===
    /// Switch to a specific page by ID
    SelectPage(PageId),
    /// Switch to the next page
    NextPage,
    /// Switch to the previous page
    PrevPage,

    // === Panel navigation (handled by the active page) ===
    /// Activate the panel tab at the given position
    SelectPanelTab(usize),
    /// Activate the next panel tab
    NextPanelTab,
    /// Activate the previous panel tab
    PrevPanelTab,

    // === Theme ===
    /// Replace the application theme
    SetTheme(Theme),
    /// Swap between the dark and light presets
    ToggleTheme,

    // === Error boundary ===
    /// A page failed on purpose and wants the boundary to take over
    PageFault {
        /// Page that raised the fault
        page: PageId,
        /// Description rendered by the fallback
        message: String,
    },
    /// Clear a tripped boundary and reset the faulty page
    ResetBoundary,

    // === Global ===
    /// Some state changed off the input path; repaint
    Redraw,
    /// Toggle help display
    ToggleHelp,
    /// Quit the application
    Quit,

    // === Input ===
    /// Keyboard input event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),

    // === Batch ===
    /// Multiple messages to process in sequence
    Batch(Vec<Message>),

    /// No operation (used for optional returns)
    #[default]
    None,
}

impl Message {
    /// Creates a batch of messages
    pub fn batch(messages: Vec<Message>) -> Self {
        Message::Batch(messages)
    }

    /// Returns true if this is a no-op message
    pub fn is_none(&self) -> bool {
        matches!(self, Message::None)
    }

    /// Flattens nested batch messages into a single level, dropping no-ops.
    ///
    /// ```
    /// use featuretour_core::event::Message;
    ///
    /// let nested = Message::Batch(vec![
    ///     Message::Quit,
    ///     Message::Batch(vec![Message::NextPage, Message::None]),
    /// ]);
    /// assert_eq!(nested.flatten(), vec![Message::Quit, Message::NextPage]);
    /// ```
    pub fn flatten(self) -> Vec<Message> {
        match self {
            Message::Batch(msgs) => msgs.into_iter().flat_map(|m| m.flatten()).collect(),
            Message::None => vec![],
            other => vec![other],
        }
    }

    /// Maps a raw key press onto a global message.
    ///
    /// Keys without a global meaning come back as [`Message::Key`] so the
    /// active page can interpret them.
    pub fn from_key(key: KeyEvent) -> Self {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c' | 'q')) => Message::Quit,
            (KeyModifiers::NONE, KeyCode::Tab) => Message::NextPage,
            (_, KeyCode::BackTab) => Message::PrevPage,
            (KeyModifiers::CONTROL, KeyCode::Right) => Message::NextPanelTab,
            (KeyModifiers::CONTROL, KeyCode::Left) => Message::PrevPanelTab,
            (_, KeyCode::F(n @ 1..=3)) => Message::SelectPanelTab(usize::from(n - 1)),
            (_, KeyCode::F(10)) => Message::ToggleHelp,
            _ => Message::Key(key),
        }
    }
}

/// Message bus for broadcasting messages to multiple subscribers
///
/// Cloning the bus shares the underlying channel, which is how observers
/// living inside spawned tasks reach the terminal loop.
#[derive(Debug, Clone)]
pub struct MessageBus {
    sender: broadcast::Sender<Message>,
}

impl MessageBus {
    /// Creates a new message bus with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        MessageBus { sender }
    }

    /// Subscribe to receive messages sent after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Send a message to all subscribers
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EventError` if there are no active subscribers.
    pub fn send(&self, msg: Message) -> Result<usize, CoreError> {
        self.sender
            .send(msg)
            .map_err(|e| CoreError::EventError(format!("failed to send message: {}", e)))
    }

    /// Returns the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        MessageBus::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_message_none_is_default() {
        assert!(Message::default().is_none());
        assert!(!Message::Quit.is_none());
    }

    #[test]
    fn test_flatten_nested_batch() {
        let msg = Message::batch(vec![
            Message::Quit,
            Message::Batch(vec![Message::NextPage, Message::PrevPage]),
            Message::None,
        ]);
        assert_eq!(msg.flatten().len(), 3);
    }

    #[test]
    fn test_from_key_globals() {
        assert_eq!(
            Message::from_key(key(KeyModifiers::CONTROL, KeyCode::Char('q'))),
            Message::Quit
        );
        assert_eq!(
            Message::from_key(key(KeyModifiers::NONE, KeyCode::Tab)),
            Message::NextPage
        );
        assert_eq!(
            Message::from_key(key(KeyModifiers::SHIFT, KeyCode::BackTab)),
            Message::PrevPage
        );
        assert_eq!(
            Message::from_key(key(KeyModifiers::NONE, KeyCode::F(2))),
            Message::SelectPanelTab(1)
        );
        assert_eq!(
            Message::from_key(key(KeyModifiers::CONTROL, KeyCode::Right)),
            Message::NextPanelTab
        );
    }

    #[test]
    fn test_from_key_forwards_text_input() {
        let k = key(KeyModifiers::NONE, KeyCode::Char('a'));
        assert_eq!(Message::from_key(k), Message::Key(k));
    }

    #[test]
    fn test_bus_send_without_subscribers_fails() {
        let bus = MessageBus::new(8);
        assert!(bus.send(Message::Redraw).is_err());
    }

    #[tokio::test]
    async fn test_bus_clone_shares_channel() {
        let bus = MessageBus::new(8);
        let mut rx = bus.subscribe();
        let cloned = bus.clone();
        assert_eq!(cloned.subscriber_count(), 1);

        cloned.send(Message::Redraw).expect("send should succeed");
        let received = rx.recv().await.expect("should receive");
        assert_eq!(received, Message::Redraw);
    }
}

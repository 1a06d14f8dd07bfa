use tokio::sync::mpsc;

use crate::events::UiEvent;

/// Handlers send their result events here; the loop drains it.
pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tokio::sync::broadcast;
use tracing::debug;
use upscalex::Notification;

/// Maximum number of notifications to buffer in the broadcast channel.
/// If subscribers cannot keep up, older notifications are dropped.
const NOTIFICATION_BUFFER_SIZE: usize = 100;

/// Fan-out of transient user messages.
///
/// Publishing is fire-and-forget: with no subscriber the message is
/// dropped.
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<Notification>,
}

impl NotificationHub {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(NOTIFICATION_BUFFER_SIZE);
        Self { tx }
    }

    /// Publishes a notification to every current subscriber.
    pub fn publish(&self, notification: Notification) {
        match self.tx.send(notification) {
            Ok(receivers) => debug!(receivers, "Published notification"),
            Err(broadcast::error::SendError(dropped)) => {
                debug!(session_id = %dropped.session_id, "No subscribers for notification");
            }
        }
    }

    /// Subscribes to notifications published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

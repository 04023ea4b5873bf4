use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Feed of recent app events shown in the HUD, newest first.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
    default_duration: Duration,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::with_default_duration(Duration::from_secs(4))
    }

    pub fn with_default_duration(default_duration: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            default_duration,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, level: NotificationLevel) {
        self.notify_for(message, level, self.default_duration);
    }

    pub fn notify_for(
        &mut self,
        message: impl Into<String>,
        level: NotificationLevel,
        duration: Duration,
    ) {
        self.notifications
            .insert(0, Notification::new(message, level, duration));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Info);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, NotificationLevel::Error);
    }

    /// Remove expired notifications, returns true if any were removed
    pub fn update(&mut self) -> bool {
        let initial_len = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired());
        self.notifications.len() != initial_len
    }

    pub fn current(&self) -> Option<&Notification> {
        self.notifications.first()
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn dismiss_current(&mut self) -> bool {
        if self.notifications.is_empty() {
            false
        } else {
            self.notifications.remove(0);
            true
        }
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    pub fn count(&self) -> usize {
        self.notifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn notification_expiration() {
        let notification =
            Notification::new("test", NotificationLevel::Info, Duration::from_millis(50));
        assert!(!notification.is_expired());

        thread::sleep(Duration::from_millis(60));
        assert!(notification.is_expired());
    }

    #[test]
    fn manager_adds_newest_first() {
        let mut manager = NotificationManager::new();

        manager.info("First");
        manager.warn("Second");
        manager.error("Third");

        assert_eq!(manager.count(), 3);

        let current = manager.current().unwrap();
        assert_eq!(current.message, "Third");
        assert_eq!(current.level, NotificationLevel::Error);
    }

    #[test]
    fn manager_removes_expired() {
        let mut manager = NotificationManager::with_default_duration(Duration::from_millis(50));

        manager.info("Short-lived");
        assert_eq!(manager.count(), 1);

        thread::sleep(Duration::from_millis(60));
        let changed = manager.update();

        assert!(changed);
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn manager_dismiss_current() {
        let mut manager = NotificationManager::new();

        manager.info("First");
        manager.info("Second");

        assert_eq!(manager.count(), 2);
        assert!(manager.dismiss_current());
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.current().unwrap().message, "First");
    }
}

use super::response_state::ExecutionResult;
use super::workspace::RequestEditor;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

/// Oldest notifications are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub editor: RequestEditor,
    pub request_status: RequestStatus,
    pub response: Option<ExecutionResult>,
    pub notifications: Vec<Notification>,
}

impl AppState {
    pub fn is_sending(&self) -> bool {
        self.request_status == RequestStatus::Loading
    }

    pub fn notify(&mut self, title: impl Into<String>, description: impl Into<String>, variant: Variant) {
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            let overflow = self.notifications.len() + 1 - MAX_NOTIFICATIONS;
            self.notifications.drain(..overflow);
        }
        self.notifications.push(Notification {
            title: title.into(),
            description: description.into(),
            variant,
        });
    }

    pub fn dismiss(&mut self, index: usize) -> Option<Notification> {
        (index < self.notifications.len()).then(|| self.notifications.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_are_capped_oldest_first() {
        let mut state = AppState::default();
        for i in 0..MAX_NOTIFICATIONS + 5 {
            state.notify(format!("n{i}"), "", Variant::Default);
        }
        assert_eq!(state.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(state.notifications[0].title, "n5");
        assert_eq!(state.notifications.last().unwrap().title, format!("n{}", MAX_NOTIFICATIONS + 4));
    }

    #[test]
    fn test_dismiss_out_of_range() {
        let mut state = AppState::default();
        state.notify("a", "b", Variant::Destructive);
        assert!(state.dismiss(3).is_none());
        assert_eq!(state.dismiss(0).unwrap().title, "a");
        assert!(state.notifications.is_empty());
    }
}

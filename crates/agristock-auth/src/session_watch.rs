//! Session-user subscription.
//!
//! Interested parties subscribe instead of reading ambient global
//! state: the gate publishes the current profile after login/logout
//! and every receiver observes the change. Dropping the receiver
//! unsubscribes.

use agristock_core::models::user::UserProfile;
use tokio::sync::watch;

/// Publish/subscribe handle for the most recent session user.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    tx: watch::Sender<Option<UserProfile>>,
}

impl SessionWatch {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish a new session user (`None` = signed out).
    pub fn publish(&self, user: Option<UserProfile>) {
        // send_replace never fails, even with zero subscribers.
        self.tx.send_replace(user);
    }

    /// Subscribe to session-user changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.tx.subscribe()
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agristock_core::models::role::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: format!("{username}@example.com"),
            username: username.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone_number: None,
            role: Role::User,
            team_id: None,
            is_active: true,
            is_approved: true,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscribers_observe_published_user() {
        let watch = SessionWatch::new();
        let mut rx = watch.subscribe();

        assert!(rx.borrow().is_none());

        watch.publish(Some(profile("alice")));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().username, "alice");

        watch.publish(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let watch = SessionWatch::new();
        watch.publish(Some(profile("bob")));

        // A late subscriber sees the latest value immediately.
        let rx = watch.subscribe();
        assert_eq!(rx.borrow().as_ref().unwrap().username, "bob");
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::idle::{IdleState, IdleWatch};
use crate::middleware::CurrentUser;

struct Session {
    user: CurrentUser,
    watch: IdleWatch,
}

/// What a sweep pass observed: sessions that just crossed the warning
/// threshold, and sessions that were logged out.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub warned: Vec<Uuid>,
    pub expired: Vec<Uuid>,
}

/// In-process session container. All state transitions go through the typed
/// actions below (`login`, `touch`, `logout`, `sweep`); handlers reach it
/// through axum state, never as a global.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, Session>>>,
    idle_timeout: Duration,
    idle_warning: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, idle_warning: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
            idle_warning,
        }
    }

    /// Create a session for an authenticated user and return its token.
    pub fn login(&self, user: CurrentUser) -> Uuid {
        let token = Uuid::new_v4();
        let session = Session {
            user,
            watch: IdleWatch::new(self.idle_timeout, self.idle_warning),
        };
        self.inner.lock().unwrap().insert(token, session);
        token
    }

    /// Resolve a token to its user, recording activity. An expired session
    /// is removed here even if the sweeper has not run yet.
    pub fn touch(&self, token: Uuid) -> Option<CurrentUser> {
        self.touch_at(token, Instant::now())
    }

    pub fn touch_at(&self, token: Uuid, now: Instant) -> Option<CurrentUser> {
        let mut sessions = self.inner.lock().unwrap();
        match sessions.get_mut(&token) {
            Some(session) if session.watch.is_expired(now) => {
                sessions.remove(&token);
                None
            }
            Some(session) => {
                session.watch.touch(now);
                Some(session.user.clone())
            }
            None => None,
        }
    }

    pub fn logout(&self, token: Uuid) -> bool {
        self.inner.lock().unwrap().remove(&token).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One watchdog pass over all sessions. Expired sessions are removed,
    /// so the logout side effect happens exactly once per session.
    pub fn sweep(&self, now: Instant) -> SweepReport {
        let mut report = SweepReport::default();
        let mut sessions = self.inner.lock().unwrap();
        sessions.retain(|token, session| match session.watch.poll(now) {
            IdleState::Expired => {
                report.expired.push(*token);
                false
            }
            IdleState::WarnNow => {
                report.warned.push(*token);
                true
            }
            IdleState::Active | IdleState::Warned => true,
        });
        report
    }

    /// Background watchdog driving `sweep` once a second.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            loop {
                tick.tick().await;
                let report = store.sweep(Instant::now());
                for token in &report.warned {
                    log::warn!("session {token} is idle, automatic logout soon");
                }
                for token in &report.expired {
                    log::info!("session {token} logged out after inactivity");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            user_id: 1,
            username: "amara".into(),
            email: "amara@example.com".into(),
            role_id: Some(2),
            permissions: vec!["inventory:read".into()],
        }
    }

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(900), Duration::from_secs(60))
    }

    #[test]
    fn login_then_touch_resolves_user() {
        let store = store();
        let token = store.login(user());
        let resolved = store.touch(token).expect("session should resolve");
        assert_eq!(resolved.username, "amara");
        assert!(store.touch(Uuid::new_v4()).is_none());
    }

    #[test]
    fn sweep_warns_then_expires_once() {
        let store = store();
        let token = store.login(user());
        let start = Instant::now();

        let report = store.sweep(start + Duration::from_secs(840));
        assert_eq!(report.warned, vec![token]);
        assert!(report.expired.is_empty());

        // Warning does not repeat.
        let report = store.sweep(start + Duration::from_secs(860));
        assert!(report.warned.is_empty());

        let report = store.sweep(start + Duration::from_secs(900));
        assert_eq!(report.expired, vec![token]);
        assert!(store.is_empty());

        // Session is gone, so logout cannot fire a second time.
        let report = store.sweep(start + Duration::from_secs(1000));
        assert!(report.expired.is_empty());
    }

    #[test]
    fn touch_resets_the_countdowns() {
        let store = store();
        let token = store.login(user());
        let start = Instant::now();

        assert!(store.touch_at(token, start + Duration::from_secs(800)).is_some());
        // 840s after login would have warned, but activity at 800s re-armed.
        let report = store.sweep(start + Duration::from_secs(840));
        assert!(report.warned.is_empty());
        let report = store.sweep(start + Duration::from_secs(800 + 840));
        assert_eq!(report.warned, vec![token]);
    }

    #[test]
    fn stale_session_is_rejected_without_sweeper() {
        let store = store();
        let token = store.login(user());
        let start = Instant::now();
        assert!(store.touch_at(token, start + Duration::from_secs(901)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn logout_removes_the_session() {
        let store = store();
        let token = store.login(user());
        assert!(store.logout(token));
        assert!(!store.logout(token));
        assert!(store.touch(token).is_none());
    }
}

//! # Session state: the time-limited authentication flag
//!
//! A session is two correlated storage entries: a flag (`"true"` once a login
//! succeeded) and the epoch-millisecond instant it was set. [`SessionState`] owns
//! both keys; nothing else reads or writes them, so the expiry rule cannot be
//! bypassed.
//!
//! ## Validity
//!
//! | Flag | Timestamp | Status |
//! |------|-----------|--------|
//! | absent / not `"true"` | any | [`SessionStatus::Missing`] |
//! | `"true"` | absent | [`SessionStatus::Active`] with no expiry |
//! | `"true"` | elapsed ≤ window | [`SessionStatus::Active`] |
//! | `"true"` | elapsed > window, or unparseable | [`SessionStatus::Expired`], record cleared |
//! | store unreachable | any | [`SessionStatus::Unavailable`] |
//!
//! Elapsed time is measured in fractional hours, and the comparison is strict:
//! a session exactly one window old is still honoured.
//!
//! ## Lazy expiry
//!
//! Reading an expired record clears it. Clearing is idempotent, so a second read
//! after the boundary simply finds nothing and reports [`SessionStatus::Missing`].
//!
//! ## Failure
//!
//! Reads never error. A storage failure is logged and reported as
//! [`SessionStatus::Unavailable`], which is never valid.

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::storage::{KeyValueStore, StorageError};

const FLAG_VALUE: &str = "true";
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// The raw pair of session entries, as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub authenticated: bool,
    /// Epoch milliseconds. `None` when absent or not a decimal integer.
    pub issued_at: Option<i64>,
}

/// Result of checking the session record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The flag is set and within the expiry window. `issued_at` is `None` for a
    /// flag stored without a timestamp, which never expires.
    Active { issued_at: Option<i64> },
    /// No flag, or a flag other than `"true"`.
    Missing,
    /// The flag outlived the expiry window and was cleared.
    Expired,
    /// The store could not be read.
    Unavailable,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active { .. })
    }
}

/// Owner of the persisted session record.
#[derive(Clone, Debug)]
pub struct SessionState<S, C = SystemClock> {
    store: S,
    clock: C,
    config: SessionConfig,
}

impl<S: KeyValueStore> SessionState<S> {
    /// Session state over `store` using the platform clock and default keys.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, SessionConfig::default())
    }
}

impl<S: KeyValueStore, C: Clock> SessionState<S, C> {
    pub fn with_clock(store: S, clock: C, config: SessionConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The clock session ages are measured against.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether a navigation may treat the user as signed in.
    pub fn is_valid(&self) -> bool {
        self.status().is_active()
    }

    /// Classify the stored record, clearing it if it has expired.
    pub fn status(&self) -> SessionStatus {
        let flag = match self.store.get(&self.config.flag_key) {
            Ok(flag) => flag,
            Err(e) => {
                warn!("Session flag unreadable, treating as signed out: {}", e);
                return SessionStatus::Unavailable;
            }
        };
        if flag.as_deref() != Some(FLAG_VALUE) {
            return SessionStatus::Missing;
        }

        let raw = match self.store.get(&self.config.issued_at_key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Session timestamp unreadable, treating as signed out: {}", e);
                return SessionStatus::Unavailable;
            }
        };
        let Some(raw) = raw else {
            return SessionStatus::Active { issued_at: None };
        };

        match parse_millis(&raw) {
            Some(issued_at) if !self.is_past_window(issued_at) => {
                SessionStatus::Active {
                    issued_at: Some(issued_at),
                }
            }
            Some(issued_at) => {
                debug!("Session issued at {} has expired, clearing", issued_at);
                self.clear_after_expiry();
                SessionStatus::Expired
            }
            None => {
                debug!("Session timestamp {:?} is not epoch millis, clearing", raw);
                self.clear_after_expiry();
                SessionStatus::Expired
            }
        }
    }

    /// Remove both session entries. Succeeds when they are already absent.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.config.flag_key)?;
        self.store.remove(&self.config.issued_at_key)?;
        Ok(())
    }

    /// Record a successful login at the current instant.
    pub fn establish(&self) -> Result<(), StorageError> {
        let now = self.clock.now_millis();
        // Timestamp first: a flag never becomes visible without it.
        self.store.set(&self.config.issued_at_key, &now.to_string())?;
        self.store.set(&self.config.flag_key, FLAG_VALUE)?;
        info!("Session established at {}", now);
        Ok(())
    }

    /// The stored pair, without applying the expiry rule.
    pub fn record(&self) -> Result<SessionRecord, StorageError> {
        let authenticated = self.store.get(&self.config.flag_key)?.as_deref() == Some(FLAG_VALUE);
        let issued_at = self
            .store
            .get(&self.config.issued_at_key)?
            .as_deref()
            .and_then(parse_millis);
        Ok(SessionRecord {
            authenticated,
            issued_at,
        })
    }

    /// Epoch milliseconds at which the active session stops being honoured.
    /// `None` when there is no active session or it never expires.
    pub fn expires_at(&self) -> Option<i64> {
        match self.status() {
            SessionStatus::Active {
                issued_at: Some(issued_at),
            } => Some(issued_at.saturating_add(self.window_millis())),
            _ => None,
        }
    }

    fn is_past_window(&self, issued_at: i64) -> bool {
        // Stored timestamps are untrusted; f64 cannot overflow on extreme values.
        let elapsed_hours = (self.clock.now_millis() as f64 - issued_at as f64) / MILLIS_PER_HOUR;
        elapsed_hours > self.config.expiry_hours
    }

    fn window_millis(&self) -> i64 {
        (self.config.expiry_hours * MILLIS_PER_HOUR) as i64
    }

    fn clear_after_expiry(&self) {
        if let Err(e) = self.clear() {
            warn!("Failed to clear expired session: {}", e);
        }
    }
}

fn parse_millis(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::memory::MemoryStorage;

    const HOUR: i64 = 3_600_000;
    const NOW: i64 = 1_700_000_000_000;

    fn fixture() -> (SessionState<MemoryStorage, ManualClock>, MemoryStorage, ManualClock) {
        let store = MemoryStorage::new();
        let clock = ManualClock::new(NOW);
        let state = SessionState::with_clock(store.clone(), clock.clone(), SessionConfig::default());
        (state, store, clock)
    }

    fn seed(store: &MemoryStorage, flag: Option<&str>, issued_at: Option<&str>) {
        if let Some(flag) = flag {
            store.set("hajimi_authenticated", flag).unwrap();
        }
        if let Some(issued_at) = issued_at {
            store.set("hajimi_auth_time", issued_at).unwrap();
        }
    }

    /// Store whose backend cannot be reached.
    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("no window".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("no window".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("no window".to_string()))
        }
    }

    #[test]
    fn test_establish_then_valid() {
        let (state, store, _clock) = fixture();
        assert!(!state.is_valid());

        state.establish().unwrap();
        assert_eq!(store.get("hajimi_authenticated").unwrap(), Some("true".to_string()));
        assert_eq!(store.get("hajimi_auth_time").unwrap(), Some(NOW.to_string()));
        assert_eq!(
            state.status(),
            SessionStatus::Active {
                issued_at: Some(NOW)
            }
        );
        assert!(state.is_valid());
    }

    #[test]
    fn test_system_clock_session() {
        let store = MemoryStorage::new();
        let state = SessionState::new(store.clone());

        state.establish().unwrap();
        assert!(state.is_valid());
        assert!(state.expires_at().is_some());

        state.clear().unwrap();
        assert_eq!(state.status(), SessionStatus::Missing);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_flag_is_invalid_for_any_timestamp() {
        for issued_at in [None, Some(NOW.to_string()), Some("0".to_string()), Some("junk".to_string())] {
            let (state, store, _clock) = fixture();
            seed(&store, None, issued_at.as_deref());
            assert_eq!(state.status(), SessionStatus::Missing);
            assert!(!state.is_valid());
        }
    }

    #[test]
    fn test_flag_must_be_exactly_true() {
        for flag in ["false", "1", "TRUE", "", "true "] {
            let (state, store, _clock) = fixture();
            seed(&store, Some(flag), Some(&NOW.to_string()));
            assert_eq!(state.status(), SessionStatus::Missing, "flag {flag:?}");
        }
    }

    #[test]
    fn test_flag_without_timestamp_never_expires() {
        let (state, store, clock) = fixture();
        seed(&store, Some("true"), None);
        clock.advance(1_000 * HOUR);

        assert_eq!(state.status(), SessionStatus::Active { issued_at: None });
        assert_eq!(state.expires_at(), None);
    }

    #[test]
    fn test_exactly_at_window_is_still_valid() {
        let (state, store, _clock) = fixture();
        seed(&store, Some("true"), Some(&(NOW - 24 * HOUR).to_string()));

        assert!(state.is_valid());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_one_millisecond_past_window_expires_and_clears() {
        let (state, store, _clock) = fixture();
        seed(&store, Some("true"), Some(&(NOW - 24 * HOUR - 1).to_string()));

        assert_eq!(state.status(), SessionStatus::Expired);
        assert!(store.is_empty());
    }

    #[test]
    fn test_session_expires_as_clock_advances() {
        let (state, store, clock) = fixture();
        state.establish().unwrap();

        clock.advance(23 * HOUR);
        assert!(state.is_valid());

        clock.advance(HOUR);
        assert!(state.is_valid());

        clock.advance(1);
        assert!(!state.is_valid());
        assert!(store.is_empty());
    }

    #[test]
    fn test_repeated_reads_after_expiry() {
        let (state, store, clock) = fixture();
        state.establish().unwrap();
        clock.advance(25 * HOUR);

        assert_eq!(state.status(), SessionStatus::Expired);
        assert!(store.is_empty());

        // The second read finds the record already gone.
        assert_eq!(state.status(), SessionStatus::Missing);
        assert!(!state.is_valid());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unparseable_timestamp_fails_closed() {
        let (state, store, _clock) = fixture();
        seed(&store, Some("true"), Some("yesterday"));

        assert_eq!(state.status(), SessionStatus::Expired);
        assert!(store.is_empty());
    }

    #[test]
    fn test_future_timestamp_is_active() {
        let (state, store, _clock) = fixture();
        seed(&store, Some("true"), Some(&(NOW + HOUR).to_string()));
        assert!(state.is_valid());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (state, store, _clock) = fixture();
        state.establish().unwrap();
        store.set("unrelated", "kept").unwrap();

        state.clear().unwrap();
        let after_once = store.get("unrelated").unwrap();
        assert_eq!(store.len(), 1);

        state.clear().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("unrelated").unwrap(), after_once);
        assert_eq!(state.record().unwrap(), SessionRecord::default());
    }

    /// Store that reads fine but refuses to delete anything.
    struct UndeletableStorage {
        inner: MemoryStorage,
    }

    impl KeyValueStore for UndeletableStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Operation("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_expired_session_stays_denied_when_clear_fails() {
        let store = MemoryStorage::new();
        seed(&store, Some("true"), Some(&(NOW - 25 * HOUR).to_string()));
        let state = SessionState::with_clock(
            UndeletableStorage {
                inner: store.clone(),
            },
            ManualClock::new(NOW),
            SessionConfig::default(),
        );

        assert_eq!(state.status(), SessionStatus::Expired);
        assert!(!state.is_valid());
        // The record could not be removed, yet it is never honoured.
        assert_eq!(store.len(), 2);
        assert_eq!(state.expires_at(), None);
    }

    #[test]
    fn test_oldest_possible_timestamp_expires() {
        let (state, store, _clock) = fixture();
        seed(&store, Some("true"), Some(&i64::MIN.to_string()));

        assert_eq!(state.status(), SessionStatus::Expired);
        assert!(!state.is_valid());
        assert!(store.is_empty());
    }

    #[test]
    fn test_latest_possible_timestamp_does_not_overflow() {
        let (state, store, _clock) = fixture();
        seed(&store, Some("true"), Some(&i64::MAX.to_string()));

        assert!(state.is_valid());
        assert_eq!(state.expires_at(), Some(i64::MAX));
    }

    #[test]
    fn test_clock_accessor_shares_instant() {
        let (state, _store, clock) = fixture();
        clock.advance(HOUR);
        assert_eq!(state.clock().now_millis(), NOW + HOUR);
    }

    #[test]
    fn test_storage_failure_fails_closed() {
        let state = SessionState::with_clock(BrokenStorage, ManualClock::new(NOW), SessionConfig::default());

        assert_eq!(state.status(), SessionStatus::Unavailable);
        assert!(!state.is_valid());
        assert_eq!(state.expires_at(), None);
        assert!(state.establish().is_err());
        assert!(state.clear().is_err());
        assert!(state.record().is_err());
    }

    #[test]
    fn test_record_reports_raw_pair() {
        let (state, store, clock) = fixture();
        seed(&store, Some("true"), Some("12"));
        clock.advance(100 * HOUR);

        // record() does not apply expiry
        assert_eq!(
            state.record().unwrap(),
            SessionRecord {
                authenticated: true,
                issued_at: Some(12)
            }
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expires_at_uses_window() {
        let (state, _store, _clock) = fixture();
        state.establish().unwrap();
        assert_eq!(state.expires_at(), Some(NOW + 24 * HOUR));
    }

    #[test]
    fn test_custom_keys_and_window() {
        let store = MemoryStorage::new();
        let clock = ManualClock::new(NOW);
        let config = SessionConfig {
            flag_key: "auth".to_string(),
            issued_at_key: "auth_at".to_string(),
            expiry_hours: 0.5,
        };
        let state = SessionState::with_clock(store.clone(), clock.clone(), config);

        state.establish().unwrap();
        assert_eq!(store.get("auth").unwrap(), Some("true".to_string()));
        assert_eq!(store.get("hajimi_authenticated").unwrap(), None);

        clock.advance(HOUR / 2);
        assert!(state.is_valid());
        clock.advance(1);
        assert!(!state.is_valid());
    }
}

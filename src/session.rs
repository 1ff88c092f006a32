use crate::api::{AuthResponse, User};
use crate::storage::{Storage, StorageError};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// The signed-in user and the tokens the backend issued for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Holds the current session and mirrors it into durable storage.
///
/// The refresh token is kept but never exchanged; an expired access token
/// simply makes authenticated requests fail.
pub struct SessionStore {
    storage: Box<dyn Storage>,
    current: Option<Session>,
}

impl SessionStore {
    /// Restore whatever session the storage holds.
    pub fn restore(storage: Box<dyn Storage>) -> Self {
        let current = Self::read(storage.as_ref());
        match &current {
            Some(session) => tracing::info!(user = %session.user.username, "restored session"),
            None => tracing::debug!("no stored session"),
        }
        Self { storage, current }
    }

    fn read(storage: &dyn Storage) -> Option<Session> {
        let access_token = storage.get(ACCESS_TOKEN_KEY)?;
        let user_json = storage.get(USER_KEY)?;
        let user = match serde_json::from_str::<User>(&user_json) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable stored user record");
                return None;
            }
        };
        Some(Session {
            user,
            access_token,
            refresh_token: storage.get(REFRESH_TOKEN_KEY),
        })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn access_token(&self) -> Option<String> {
        self.current.as_ref().map(|s| s.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Adopt the session from a successful login or registration.
    ///
    /// The in-memory session is set even when persisting fails, so the user
    /// stays signed in until the program exits; the error is returned so the
    /// caller can tell them.
    pub fn commit(&mut self, auth: AuthResponse) -> Result<(), StorageError> {
        let persisted = self.persist(&auth);
        tracing::info!(user = %auth.user.username, "session started");
        self.current = Some(Session {
            user: auth.user,
            access_token: auth.tokens.access,
            refresh_token: Some(auth.tokens.refresh),
        });
        persisted
    }

    fn persist(&mut self, auth: &AuthResponse) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&auth.user)?;
        self.storage.set_all(&[
            (ACCESS_TOKEN_KEY, auth.tokens.access.as_str()),
            (REFRESH_TOKEN_KEY, auth.tokens.refresh.as_str()),
            (USER_KEY, user_json.as_str()),
        ])
    }

    /// Forget the session, in memory and on disk.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        if let Some(session) = self.current.take() {
            tracing::info!(user = %session.user.username, "session ended");
        }
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Tokens;
    use crate::storage::MemoryStorage;

    fn auth(id: i64, name: &str) -> AuthResponse {
        AuthResponse {
            user: User {
                id,
                username: name.to_string(),
                email: None,
            },
            tokens: Tokens {
                access: format!("access-{id}"),
                refresh: format!("refresh-{id}"),
            },
        }
    }

    #[test]
    fn test_empty_storage_has_no_session() {
        let store = SessionStore::restore(Box::new(MemoryStorage::default()));
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());
    }

    #[test]
    fn test_commit_persists_three_keys() {
        let mut store = SessionStore::restore(Box::new(MemoryStorage::default()));
        store.commit(auth(3, "ana")).unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.access_token().as_deref(), Some("access-3"));
        assert_eq!(store.user().unwrap().username, "ana");
        assert_eq!(store.storage().get(ACCESS_TOKEN_KEY).as_deref(), Some("access-3"));
        assert_eq!(store.storage().get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-3"));
        let user: User = serde_json::from_str(&store.storage().get(USER_KEY).unwrap()).unwrap();
        assert_eq!(user.id, 3);
    }

    #[test]
    fn test_restore_after_commit() {
        let mut storage = MemoryStorage::default();
        let mut store = SessionStore::restore(Box::new(storage.clone()));
        store.commit(auth(5, "bo")).unwrap();
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            storage.set(key, &store.storage().get(key).unwrap()).unwrap();
        }

        let restored = SessionStore::restore(Box::new(storage));
        assert_eq!(restored.current(), store.current());
    }

    #[test]
    fn test_restore_requires_token_and_user() {
        let mut storage = MemoryStorage::default();
        storage.set(USER_KEY, r#"{"id":1,"username":"ana"}"#).unwrap();
        assert!(!SessionStore::restore(Box::new(storage.clone())).is_authenticated());

        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        assert!(SessionStore::restore(Box::new(storage.clone())).is_authenticated());

        storage.set(USER_KEY, "{broken").unwrap();
        assert!(!SessionStore::restore(Box::new(storage)).is_authenticated());
    }

    /// Rejects writes to one key.
    struct FailingStorage {
        inner: MemoryStorage,
        fail_on: &'static str,
    }

    impl Storage for FailingStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.fail_on {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_commit_never_pairs_new_token_with_old_user() {
        let mut inner = MemoryStorage::default();
        inner.set(ACCESS_TOKEN_KEY, "access-1").unwrap();
        inner.set(REFRESH_TOKEN_KEY, "refresh-1").unwrap();
        inner.set(USER_KEY, r#"{"id":1,"username":"ana"}"#).unwrap();

        let mut store = SessionStore::restore(Box::new(FailingStorage {
            inner,
            fail_on: USER_KEY,
        }));
        assert_eq!(store.user().unwrap().username, "ana");

        assert!(store.commit(auth(2, "bo")).is_err());
        // Still signed in for this run
        assert_eq!(store.user().unwrap().username, "bo");
        // Nothing half-written survives a restart
        assert_eq!(SessionStore::read(store.storage()), None);
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let mut store = SessionStore::restore(Box::new(MemoryStorage::default()));
        store.commit(auth(3, "ana")).unwrap();
        store.clear().unwrap();

        assert!(!store.is_authenticated());
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            assert!(store.storage().get(key).is_none(), "{key} still stored");
        }
    }
}

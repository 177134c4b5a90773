use crate::store::{DocumentStore, StoreError, UserRole};

/// The logged in user, if any.
#[derive(Debug, Default, Clone)]
pub struct Session {
    user: Option<UserRole>,
}

impl Session {
    /// Returns whether the credentials were accepted. A rejected attempt keeps
    /// the current user.
    pub fn login(
        &mut self,
        store: &dyn DocumentStore,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        match store.login(username, password)? {
            Some(role) => {
                tracing::info!(target: "audit", "{username} logged in (write: {})", role.write);
                self.user = Some(role);
                Ok(true)
            }
            None => {
                tracing::warn!(target: "audit", "Failed login attempt for {username}");
                Ok(false)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(target: "audit", "{} logged out", user.username);
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    #[must_use]
    pub fn has_write_privileges(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.write)
    }
}

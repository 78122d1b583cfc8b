//! Admin session use cases.
//!
//! The session is a single persisted flag; it survives reopening the same
//! backend until `logout` clears it.

use crate::config::DEFAULT_ADMIN_PASSWORD;
use crate::repo::collections::{ADMIN_SESSION_ACTIVE, ADMIN_SESSION_KEY};
use crate::repo::kv_repo::KvRepository;
use crate::service::error::ServiceResult;
use log::{info, warn};

/// Admin login/logout service.
pub struct AdminService<R: KvRepository> {
    repo: R,
    password: String,
}

impl<R: KvRepository> AdminService<R> {
    /// Creates a service accepting `DEFAULT_ADMIN_PASSWORD`.
    pub fn new(repo: R) -> Self {
        Self::with_password(repo, DEFAULT_ADMIN_PASSWORD)
    }

    pub fn with_password(repo: R, password: impl Into<String>) -> Self {
        Self {
            repo,
            password: password.into(),
        }
    }

    /// Starts an admin session when `password` matches.
    ///
    /// A wrong password leaves any existing session untouched.
    pub fn login(&self, password: &str) -> ServiceResult<bool> {
        if password != self.password {
            warn!("event=admin_login module=admin status=rejected");
            return Ok(false);
        }
        self.repo.put(ADMIN_SESSION_KEY, ADMIN_SESSION_ACTIVE)?;
        info!("event=admin_login module=admin status=ok");
        Ok(true)
    }

    pub fn is_logged_in(&self) -> ServiceResult<bool> {
        let flag = self.repo.get(ADMIN_SESSION_KEY)?;
        Ok(flag.as_deref() == Some(ADMIN_SESSION_ACTIVE))
    }

    pub fn logout(&self) -> ServiceResult<()> {
        self.repo.delete(ADMIN_SESSION_KEY)?;
        info!("event=admin_logout module=admin status=ok");
        Ok(())
    }
}

//! Wired services shared by every caller of the core.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{AccountService, ProfileService};
use crate::context::RequestContext;
use crate::infrastructure::CachedProfileRepository;
use crate::infrastructure::persistence::{PgAccountRepository, PgProfileStore};

pub type Accounts = AccountService<PgAccountRepository>;
pub type Profiles = ProfileService<CachedProfileRepository<PgProfileStore>>;

/// Shared application state.
///
/// Cheap to clone: the services are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<Accounts>,
    pub profiles: Arc<Profiles>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Fresh anonymous context bounded by the configured request timeout.
    pub fn context(&self) -> RequestContext {
        RequestContext::new().with_timeout(self.request_timeout)
    }
}

//! Account entity holding login credentials.

/// A registered account.
///
/// The password is an opaque comparison value: it is stored and compared
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub status: i16,
}

impl Account {
    /// Creates a new Account instance.
    pub fn new(id: i64, email: String, password: String, status: i16) -> Self {
        Self {
            id,
            email,
            password,
            status,
        }
    }

    /// Exact comparison against the stored credential.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Input data for registering an account. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub status: i16,
}

impl NewAccount {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            status: 0,
        }
    }
}

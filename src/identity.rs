/// Source of the current authenticated user id.
///
/// Injected rather than read from ambient global state so tests and embedders
/// control exactly who is signed in.
pub trait Identity: Send + Sync {
    /// Id of the signed-in user, if any.
    fn current_user(&self) -> Option<Box<str>>;
}

/// Identity pinned to one user id.
pub struct StaticIdentity(Box<str>);

impl StaticIdentity {
    pub fn new(user: &str) -> Self {
        Self(user.into())
    }
}

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<Box<str>> {
        Some(self.0.clone())
    }
}

/// Identity with nobody signed in.
pub struct Anonymous;

impl Identity for Anonymous {
    fn current_user(&self) -> Option<Box<str>> {
        None
    }
}

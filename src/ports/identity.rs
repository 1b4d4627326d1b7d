//! Identity port: who is calling.

/// Supplies the signed-in caller's identity.
///
/// Authentication itself happens at the identity provider; this boundary
/// only answers whether a caller is present and who they are.
pub trait IdentityProvider: Send + Sync {
    /// Returns the caller's user id, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<String>;
}

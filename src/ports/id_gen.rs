//! ID generator port for producing unique identifiers.

/// Generates unique identifiers.
///
/// Used for client-side session ids (onboarding runs) and by the in-memory
/// store. Replaying a cassette substitutes a predictable sequence.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}

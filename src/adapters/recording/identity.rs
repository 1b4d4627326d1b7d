//! Recording adapter for the `IdentityProvider` port.

use super::record_interaction;
use crate::cassette::session::SharedRecorder;
use crate::ports::IdentityProvider;

/// Records identity lookups while delegating to an inner implementation.
pub struct RecordingIdentity {
    inner: Box<dyn IdentityProvider>,
    recorder: SharedRecorder,
}

impl RecordingIdentity {
    /// Creates a new recording identity provider wrapping the given implementation.
    pub fn new(inner: Box<dyn IdentityProvider>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl IdentityProvider for RecordingIdentity {
    fn current_user(&self) -> Option<String> {
        let result = self.inner.current_user();
        record_interaction(&self.recorder, "identity", "current_user", &(), &result);
        result
    }
}

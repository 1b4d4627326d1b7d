//! Replaying adapters that serve recorded interactions back to the core.

pub mod calendar;
pub mod clock;
pub mod id_gen;
pub mod identity;
pub mod llm;
pub mod store;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

pub use calendar::ReplayingCalendar;
pub use clock::ReplayingClock;
pub use id_gen::ReplayingIdGenerator;
pub use identity::ReplayingIdentity;
pub use llm::ReplayingLlmClient;
pub use store::ReplayingStore;

/// Shared handle to one port's replayer.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Pull the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics when the port has no cassette, or the cassette has no more
/// interactions for this method.
pub(crate) fn next_output(replayer: Option<&SharedReplayer>, port: &str, method: &str) -> Value {
    let Some(replayer) = replayer else {
        panic!("{port} port not configured in CassetteConfig: no cassette loaded for {port}");
    };
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output.clone()
}

/// Decode a recorded `{"Ok": v}` / `{"Err": msg}` output.
///
/// Lowercase keys are accepted for hand-written cassettes.
///
/// # Panics
///
/// Panics when the output carries neither key.
pub(crate) fn replay_result<T: DeserializeOwned>(output: Value) -> Result<T, PortError> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
        return Err(message.into());
    }
    let Some(ok) = output.get("Ok").or_else(|| output.get("ok")) else {
        panic!("recorded output is not a Result: {output}");
    };
    serde_json::from_value(ok.clone())
        .map_err(|e| format!("failed to decode recorded output: {e}").into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SharedReplayer;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use std::sync::{Arc, Mutex};

    /// Build a shared replayer from in-memory interactions.
    pub(crate) fn shared(interactions: Vec<Interaction>) -> SharedReplayer {
        let cassette = Cassette::from_interactions("test", interactions);
        Arc::new(Mutex::new(CassetteReplayer::new(&cassette)))
    }
}

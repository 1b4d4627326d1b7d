//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter delegates to an inner (usually live) implementation and
//! appends the call and its outcome to the port's recorder.

pub mod calendar;
pub mod clock;
pub mod id_gen;
pub mod identity;
pub mod llm;
pub mod store;

use serde::Serialize;
use serde_json::{json, Value};

use crate::cassette::session::SharedRecorder;

pub use calendar::RecordingCalendar;
pub use clock::RecordingClock;
pub use id_gen::RecordingIdGenerator;
pub use identity::RecordingIdentity;
pub use llm::RecordingLlmClient;
pub use store::RecordingStore;

fn to_json<V: Serialize + ?Sized>(value: &V) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "unserializable": e.to_string() }))
}

/// Record an interaction with a plain (non-Result) return value.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize + ?Sized,
    O: Serialize + ?Sized,
{
    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, to_json(input), to_json(output));
}

/// Record a `Result` as `{"Ok": v}` or `{"Err": message}`, the shape
/// [`replay_result`](crate::adapters::replaying) decodes.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize + ?Sized,
{
    let output = match result {
        Ok(v) => json!({ "Ok": to_json(v) }),
        Err(e) => json!({ "Err": e.to_string() }),
    };
    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, to_json(input), output);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;

    #[test]
    fn record_result_uses_ok_err_convention() {
        let dir = std::env::temp_dir().join("opsboard_rec_helpers_test");
        let recorder = test_support::recorder(&dir, "store");

        let ok: Result<Vec<u32>, String> = Ok(vec![1, 2]);
        let err: Result<Vec<u32>, String> = Err("HTTP 502".into());
        record_result(&recorder, "store", "list_jobs", &(), &ok);
        record_result(&recorder, "store", "list_jobs", &(), &err);

        let cassette = test_support::finish(recorder);
        let outputs: Vec<&Interaction> = cassette.interactions.iter().collect();
        assert_eq!(outputs[0].output, json!({"Ok": [1, 2]}));
        assert_eq!(outputs[1].output, json!({"Err": "HTTP 502"}));
    }
}

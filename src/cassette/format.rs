//! Cassette data structures for recording and replaying port interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call across a port boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`store`, `llm`, `identity`, `calendar`, `clock`, `id_gen`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments sent to the port.
    pub input: serde_json::Value,
    /// Value returned from the port.
    pub output: serde_json::Value,
}

impl Interaction {
    /// Convenience constructor for hand-built fixtures; `seq` starts at zero.
    pub fn new(
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) -> Self {
        Self { seq: 0, port: port.into(), method: method.into(), input, output }
    }
}

/// A recorded session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of the client that produced the recording.
    pub app_version: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Builds a cassette from fixtures, numbering interactions in order.
    pub fn from_interactions(name: impl Into<String>, interactions: Vec<Interaction>) -> Self {
        let interactions = interactions
            .into_iter()
            .enumerate()
            .map(|(seq, interaction)| Interaction { seq: seq as u64, ..interaction })
            .collect();
        Self {
            name: name.into(),
            recorded_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            interactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_round_trip() {
        let cassette = Cassette::from_interactions(
            "feed-load",
            vec![
                Interaction::new("store", "list_jobs", json!({}), json!({"Ok": []})),
                Interaction::new("identity", "current_user", json!(null), json!("user_1")),
            ],
        );
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        let deserialized: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(cassette, deserialized);
    }

    #[test]
    fn from_interactions_numbers_sequentially() {
        let cassette = Cassette::from_interactions(
            "seq",
            vec![
                Interaction::new("clock", "now", json!(null), json!("2025-01-01T00:00:00Z")),
                Interaction::new("clock", "now", json!(null), json!("2025-01-01T00:00:01Z")),
            ],
        );
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }
}

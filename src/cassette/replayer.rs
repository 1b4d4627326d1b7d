//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Interactions are queued per port and method so that independent ports
/// can be consumed in any interleaving.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

impl PortMethodKey {
    fn new(port: &str, method: &str) -> Self {
        Self { port: port.to_string(), method: method.to_string() }
    }
}

/// Serves a cassette's interactions back in recorded order.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry(PortMethodKey::new(&interaction.port, &interaction.method))
                .or_default()
                .push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination. Replay is a test harness: a missing
    /// interaction means the code under test made a call nobody recorded.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        let key = PortMethodKey::new(port, method);

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        assert!(
            *cursor < queue.len(),
            "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
             have been consumed. Last interaction was seq={last_seq}.",
            count = queue.len(),
            last_seq = queue.last().map_or(0, |i| i.seq),
        );

        let interaction = &queue[*cursor];
        *cursor += 1;
        interaction
    }

    /// How many interactions for `port::method` have not been served yet.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        let key = PortMethodKey::new(port, method);
        let total = self.queues.get(&key).map_or(0, Vec::len);
        let used = self.cursors.get(&key).copied().unwrap_or(0);
        total.saturating_sub(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed_cassette() -> Cassette {
        Cassette::from_interactions(
            "feed",
            vec![
                Interaction::new(
                    "store",
                    "get_task",
                    json!({"id": "t1"}),
                    json!({"Ok": {"_id": "t1", "title": "A"}}),
                ),
                Interaction::new("store", "list_owners", json!({}), json!({"Ok": []})),
                Interaction::new("store", "get_task", json!({"id": "t2"}), json!({"Ok": null})),
            ],
        )
    }

    #[test]
    fn serves_each_method_in_recorded_order() {
        let mut replayer = CassetteReplayer::new(&feed_cassette());

        let first = replayer.next_interaction("store", "get_task");
        assert_eq!(first.seq, 0);
        assert_eq!(first.input, json!({"id": "t1"}));

        let owners = replayer.next_interaction("store", "list_owners");
        assert_eq!(owners.seq, 1);

        let second = replayer.next_interaction("store", "get_task");
        assert_eq!(second.seq, 2);
        assert_eq!(second.output, json!({"Ok": null}));
    }

    #[test]
    fn remaining_tracks_consumption() {
        let mut replayer = CassetteReplayer::new(&feed_cassette());
        assert_eq!(replayer.remaining("store", "get_task"), 2);
        let _ = replayer.next_interaction("store", "get_task");
        assert_eq!(replayer.remaining("store", "get_task"), 1);
        assert_eq!(replayer.remaining("llm", "complete"), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_queue_panics() {
        let mut replayer = CassetteReplayer::new(&feed_cassette());
        let _ = replayer.next_interaction("store", "list_owners");
        let _ = replayer.next_interaction("store", "list_owners");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_method_panics() {
        let mut replayer = CassetteReplayer::new(&feed_cassette());
        let _ = replayer.next_interaction("store", "list_qbos");
    }
}

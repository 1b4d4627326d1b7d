//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports left as `None` are unconfigured and
/// panic when called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the data store cassette.
    pub store: Option<PathBuf>,
    /// Path to the LLM cassette.
    pub llm: Option<PathBuf>,
    /// Path to the identity cassette.
    pub identity: Option<PathBuf>,
    /// Path to the calendar cassette.
    pub calendar: Option<PathBuf>,
    /// Path to the clock cassette.
    pub clock: Option<PathBuf>,
    /// Path to the ID generator cassette.
    pub id_gen: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
#[derive(Debug, Default)]
pub struct PortReplayers {
    /// Replayer for the data store.
    pub store: Option<CassetteReplayer>,
    /// Replayer for the LLM.
    pub llm: Option<CassetteReplayer>,
    /// Replayer for the identity provider.
    pub identity: Option<CassetteReplayer>,
    /// Replayer for the calendar provider.
    pub calendar: Option<CassetteReplayer>,
    /// Replayer for the clock.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the ID generator.
    pub id_gen: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points every port at `<dir>/<port>.cassette.yaml`, the layout a
    /// recording session writes. Ports whose file is absent stay unconfigured.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let pick = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            store: pick("store"),
            llm: pick("llm"),
            identity: pick("identity"),
            calendar: pick("calendar"),
            clock: pick("clock"),
            id_gen: pick("id_gen"),
        }
    }

    /// Load a cassette file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| path.as_deref().map(Self::load_cassette).transpose();
        Ok(PortReplayers {
            store: load(&self.store)?,
            llm: load(&self.llm)?,
            identity: load(&self.identity)?,
            calendar: load(&self.calendar)?,
            clock: load(&self.clock)?,
            id_gen: load(&self.id_gen)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette::from_interactions("test", interactions);
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn panic_on_unspecified_returns_all_none() {
        let config = CassetteConfig::panic_on_unspecified();
        assert!(config.store.is_none());
        assert!(config.llm.is_none());
        assert!(config.identity.is_none());
        assert!(config.calendar.is_none());
        assert!(config.clock.is_none());
        assert!(config.id_gen.is_none());
    }

    #[test]
    fn load_all_only_loads_configured_ports() {
        let dir = std::env::temp_dir().join("opsboard_cassette_config_load_all");
        std::fs::create_dir_all(&dir).unwrap();
        let store_path = dir.join("store.cassette.yaml");
        write_cassette(
            &store_path,
            vec![Interaction::new("store", "list_jobs", json!({}), json!({"Ok": []}))],
        );

        let config = CassetteConfig { store: Some(store_path), ..CassetteConfig::default() };
        let mut replayers = config.load_all().unwrap();

        let store = replayers.store.as_mut().unwrap();
        assert_eq!(store.next_interaction("store", "list_jobs").output, json!({"Ok": []}));
        assert!(replayers.llm.is_none());
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_session_dir_skips_missing_files() {
        let dir = std::env::temp_dir().join("opsboard_cassette_config_session_dir");
        std::fs::create_dir_all(&dir).unwrap();
        write_cassette(&dir.join("llm.cassette.yaml"), vec![]);

        let config = CassetteConfig::from_session_dir(&dir);
        assert!(config.llm.is_some());
        assert!(config.store.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reports_unreadable_file() {
        let err = CassetteConfig::load_cassette(Path::new("/nonexistent/opsboard.cassette.yaml"))
            .unwrap_err();
        assert!(err.contains("Failed to read cassette file"));
    }
}

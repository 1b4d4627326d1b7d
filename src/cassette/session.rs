//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Shared handle to one port's recorder.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Owns one recorder per port for the duration of a recorded command.
///
/// Cassettes land in `<root>/<timestamp>/<port>.cassette.yaml`, which is the
/// layout [`CassetteConfig::from_session_dir`](super::config::CassetteConfig::from_session_dir)
/// reads back.
pub struct RecordingSession {
    /// Recorder for the data store.
    pub store: SharedRecorder,
    /// Recorder for LLM completions.
    pub llm: SharedRecorder,
    /// Recorder for identity lookups.
    pub identity: SharedRecorder,
    /// Recorder for calendar calls.
    pub calendar: SharedRecorder,
    /// Recorder for clock reads.
    pub clock: SharedRecorder,
    /// Recorder for generated ids.
    pub id_gen: SharedRecorder,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session in a timestamped directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory already exists or cannot be created.
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> SharedRecorder {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"))))
        };

        Ok(Self {
            store: make_recorder("store"),
            llm: make_recorder("llm"),
            identity: make_recorder("identity"),
            calendar: make_recorder("calendar"),
            clock: make_recorder("clock"),
            id_gen: make_recorder("id_gen"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// Ports that saw no traffic do not get a file.
    ///
    /// # Errors
    ///
    /// Returns an error if a recording adapter is still alive or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(shared: SharedRecorder, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(shared)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            if recorder.is_empty() {
                return Ok(());
            }
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.store, "store")?;
        finish_one(self.llm, "llm")?;
        finish_one(self.identity, "identity")?;
        finish_one(self.calendar, "calendar")?;
        finish_one(self.clock, "clock")?;
        finish_one(self.id_gen, "id_gen")?;

        Ok(self.output_dir)
    }
}

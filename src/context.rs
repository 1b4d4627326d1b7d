//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{
    GoogleCalendar, LiveClock, LiveIdGenerator, LiveLlmClient, LiveStore, StaticIdentity,
};
use crate::adapters::recording::{
    RecordingCalendar, RecordingClock, RecordingIdGenerator, RecordingIdentity, RecordingLlmClient,
    RecordingStore,
};
use crate::adapters::replaying::{
    ReplayingCalendar, ReplayingClock, ReplayingIdGenerator, ReplayingIdentity, ReplayingLlmClient,
    ReplayingStore, SharedReplayer,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::AppConfig;
use crate::ports::{
    CalendarProvider, Clock, DashboardStore, IdGenerator, IdentityProvider, LlmClient,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying);
/// tests swap individual fields for fakes.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// ID generator for unique identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Who is calling.
    pub identity: Box<dyn IdentityProvider>,
    /// The dashboard REST API.
    pub store: Box<dyn DashboardStore>,
    /// LLM client for onboarding completions.
    pub llm: Box<dyn LlmClient>,
    /// Calendar provider.
    pub calendar: Box<dyn CalendarProvider>,
    /// Settings the context was built from.
    pub config: AppConfig,
}

impl ServiceContext {
    /// Creates a live context talking to the configured services.
    #[must_use]
    pub fn live(config: AppConfig) -> Self {
        Self {
            clock: Box::new(LiveClock),
            id_gen: Box::new(LiveIdGenerator::new()),
            identity: Box::new(StaticIdentity::new(config.user_id.clone())),
            store: Box::new(LiveStore::from_config(&config)),
            llm: Box::new(LiveLlmClient::from_config(&config)),
            calendar: Box::new(GoogleCalendar::from_config(&config)),
            config,
        }
    }

    /// Creates a live context whose every port call is captured into a new
    /// cassette session under `root`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`] is
    /// called, since the adapters share the session's recorders.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording(config: AppConfig, root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root)?;
        let live = Self::live(config);

        let ctx = Self {
            clock: Box::new(RecordingClock::new(live.clock, Arc::clone(&session.clock))),
            id_gen: Box::new(RecordingIdGenerator::new(live.id_gen, Arc::clone(&session.id_gen))),
            identity: Box::new(RecordingIdentity::new(
                live.identity,
                Arc::clone(&session.identity),
            )),
            store: Box::new(RecordingStore::new(live.store, Arc::clone(&session.store))),
            llm: Box::new(RecordingLlmClient::new(live.llm, Arc::clone(&session.llm))),
            calendar: Box::new(RecordingCalendar::new(
                live.calendar,
                Arc::clone(&session.calendar),
            )),
            config: live.config,
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette file holding
    /// interactions for any mix of ports.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let shared: SharedReplayer = Arc::new(Mutex::new(CassetteConfig::load_cassette(path)?));

        Ok(Self {
            clock: Box::new(ReplayingClock::new(Arc::clone(&shared))),
            id_gen: Box::new(ReplayingIdGenerator::new(Arc::clone(&shared))),
            identity: Box::new(ReplayingIdentity::new(Arc::clone(&shared))),
            store: Box::new(ReplayingStore::new(Arc::clone(&shared))),
            llm: Box::new(ReplayingLlmClient::new(Arc::clone(&shared))),
            calendar: Box::new(ReplayingCalendar::new(shared)),
            config: AppConfig::default(),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(cassettes: &CassetteConfig) -> Result<Self, String> {
        let replayers = cassettes.load_all()?;
        let share = |r| Arc::new(Mutex::new(r));

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(share(r))),
                None => Box::new(ReplayingClock::unconfigured()),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(share(r))),
                None => Box::new(ReplayingIdGenerator::unconfigured()),
            },
            identity: match replayers.identity {
                Some(r) => Box::new(ReplayingIdentity::new(share(r))),
                None => Box::new(ReplayingIdentity::unconfigured()),
            },
            store: match replayers.store {
                Some(r) => Box::new(ReplayingStore::new(share(r))),
                None => Box::new(ReplayingStore::unconfigured()),
            },
            llm: match replayers.llm {
                Some(r) => Box::new(ReplayingLlmClient::new(share(r))),
                None => Box::new(ReplayingLlmClient::unconfigured()),
            },
            calendar: match replayers.calendar {
                Some(r) => Box::new(ReplayingCalendar::new(share(r))),
                None => Box::new(ReplayingCalendar::unconfigured()),
            },
            config: AppConfig::default(),
        })
    }
}

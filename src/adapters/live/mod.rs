//! Live adapters for real external interactions.

pub mod calendar;
pub mod clock;
pub mod id_gen;
pub mod identity;
pub mod llm;
pub mod store;

pub use calendar::GoogleCalendar;
pub use clock::LiveClock;
pub use id_gen::LiveIdGenerator;
pub use identity::StaticIdentity;
pub use llm::LiveLlmClient;
pub use store::LiveStore;

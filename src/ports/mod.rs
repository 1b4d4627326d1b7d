//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the dashboard core and an
//! external system (time, ids, identity, the data store, the completion
//! provider, the calendar provider). Implementations live in `src/adapters/`.

pub mod calendar;
pub mod clock;
pub mod id_gen;
pub mod identity;
pub mod llm;
pub mod store;

pub use calendar::{Calendar, CalendarEvent, CalendarProvider};
pub use clock::Clock;
pub use id_gen::IdGenerator;
pub use identity::IdentityProvider;
pub use llm::{ChunkSender, CompletionRequest, CompletionResponse, LlmClient, LlmFuture};
pub use store::{DashboardStore, StoreFuture};

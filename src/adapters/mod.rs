//! Port implementations.
//!
//! `live` talks to real services, `recording` wraps live adapters and writes
//! cassettes, `replaying` serves cassettes back, and `memory` keeps a whole
//! store in process.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;

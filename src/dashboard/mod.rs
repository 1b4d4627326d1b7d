//! View-state layer: the feed, boards and flows the CLI commands drive.
//!
//! Every view keeps one canonical copy of what it loaded and patches it after
//! each successful store call. Anything derived (filtered lists, decorated
//! rows, progress) is recomputed on read.

pub mod cascade;
pub mod chat;
pub mod feed;
pub mod filter;
pub mod jobs;
pub mod lookup;
pub mod notice;
pub mod onboarding;
pub mod progress;
pub mod qbo;
pub mod search;

pub use cascade::{clear_next_task_references, CascadeReport};
pub use feed::FeedState;
pub use filter::{filter_tasks, FilterKey, FilterValue, TaskFilters};
pub use jobs::{JobBoard, JobRow};
pub use lookup::Lookups;
pub use notice::{Notice, NoticeKind, Notices};
pub use onboarding::{BusinessDetails, Onboarding, Step};
pub use qbo::{QboBoard, QboForm, QboRow};

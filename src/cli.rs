//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `opsboard`.
#[derive(Debug, Parser)]
#[command(name = "opsboard", version, about = "Run a small business from the terminal")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every job's next task.
    Feed {
        /// Filter as `key=value` (focusLevel, joyLevel, owner, minHours,
        /// maxHours, dueDate, businessFunctionId). Repeatable.
        #[arg(short, long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },
    /// Act on a task in the feed.
    Task {
        /// Task action.
        #[command(subcommand)]
        action: TaskAction,
    },
    /// List jobs with progress.
    Jobs,
    /// Create, edit or delete a job and its tasks.
    Job {
        /// Job action.
        #[command(subcommand)]
        action: JobAction,
    },
    /// List quantified business objectives.
    Qbos,
    /// Create, edit or delete a QBO.
    Qbo {
        /// QBO action.
        #[command(subcommand)]
        action: QboAction,
    },
    /// Describe the business and get suggested outcome metrics.
    Onboard(OnboardArgs),
    /// Calendar integration.
    Calendar {
        /// Calendar action.
        #[command(subcommand)]
        action: CalendarAction,
    },
    /// Search jobs, tasks and QBOs.
    Search {
        /// Text to look for.
        query: String,
    },
    /// Print a stored AI conversation.
    Chat {
        /// Chat id.
        chat_id: String,
    },
}

/// Actions on a feed task.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Mark a task completed; it leaves the feed.
    Complete {
        /// Task id.
        id: String,
    },
    /// Mark a task not completed.
    Reopen {
        /// Task id.
        id: String,
    },
    /// Edit task fields. An empty value clears an optional field.
    Edit {
        /// Task id.
        id: String,
        /// Changes to apply.
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
    /// Show a task's notes.
    Notes {
        /// Task id.
        id: String,
    },
    /// Add a task to your calendar.
    AddToCalendar {
        /// Task id.
        id: String,
    },
}

/// Editable task fields.
#[derive(Debug, Clone, Default, Args)]
pub struct TaskFields {
    /// Title.
    #[arg(long)]
    pub title: Option<String>,
    /// Owner id.
    #[arg(long)]
    pub owner: Option<String>,
    /// Focus level.
    #[arg(long)]
    pub focus: Option<String>,
    /// Joy level.
    #[arg(long)]
    pub joy: Option<String>,
    /// Estimated hours.
    #[arg(long)]
    pub hours: Option<String>,
    /// Due date, `YYYY-MM-DD`.
    #[arg(long)]
    pub due: Option<String>,
    /// Notes.
    #[arg(long)]
    pub notes: Option<String>,
    /// Tag; repeat to set several. Replaces existing tags.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Actions on the job board.
#[derive(Debug, Subcommand)]
pub enum JobAction {
    /// Create a job.
    Create(JobFields),
    /// Edit a job. An empty value clears an optional field.
    Edit {
        /// Job id.
        id: String,
        /// Changes to apply.
        #[command(flatten)]
        fields: JobFields,
        /// Task to make the job's next step.
        #[arg(long)]
        next_task: Option<String>,
    },
    /// Delete a job.
    Delete {
        /// Job id.
        id: String,
    },
    /// Create a task under a job.
    AddTask {
        /// Job id.
        job_id: String,
        /// Task fields; a title is required.
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Mark a job's task completed.
    CompleteTask {
        /// Task id.
        task_id: String,
    },
    /// Mark a job's task not completed.
    ReopenTask {
        /// Task id.
        task_id: String,
    },
    /// Delete a job's task.
    DeleteTask {
        /// Task id.
        task_id: String,
    },
    /// Show completion progress for one or more jobs.
    Progress {
        /// Job ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Job fields for create and edit.
#[derive(Debug, Clone, Default, Args)]
pub struct JobFields {
    /// Title.
    #[arg(long)]
    pub title: Option<String>,
    /// Owner id.
    #[arg(long)]
    pub owner: Option<String>,
    /// Business-function id.
    #[arg(long)]
    pub function: Option<String>,
    /// Due date, `YYYY-MM-DD`.
    #[arg(long)]
    pub due: Option<String>,
}

/// Actions on the QBO board.
#[derive(Debug, Subcommand)]
pub enum QboAction {
    /// Create a QBO.
    Create(QboFields),
    /// Edit a QBO; omitted fields keep their values.
    Edit {
        /// QBO id.
        id: String,
        /// Changes to apply.
        #[command(flatten)]
        fields: QboFields,
    },
    /// Delete a QBO.
    Delete {
        /// QBO id.
        id: String,
    },
}

/// QBO dialog fields. Empty numbers count as 0.
#[derive(Debug, Clone, Default, Args)]
pub struct QboFields {
    /// Objective name.
    #[arg(long)]
    pub name: Option<String>,
    /// Unit of measure.
    #[arg(long)]
    pub unit: Option<String>,
    /// Starting value.
    #[arg(long = "beginning")]
    pub beginning_value: Option<String>,
    /// Current value.
    #[arg(long = "current")]
    pub current_value: Option<String>,
    /// Target value.
    #[arg(long = "target")]
    pub target_value: Option<String>,
    /// Deadline, `YYYY-MM-DD`.
    #[arg(long)]
    pub deadline: Option<String>,
    /// Points out of 100.
    #[arg(long)]
    pub points: Option<String>,
    /// Notes.
    #[arg(long)]
    pub notes: Option<String>,
}

/// Onboarding answers.
#[derive(Debug, Clone, Args)]
pub struct OnboardArgs {
    /// Business name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Industry.
    #[arg(long, default_value = "")]
    pub industry: String,
    /// Growth stage: Pre-seed, Seed, Early, Growth, Expansion, Mature, or your own.
    #[arg(long, default_value = "")]
    pub stage: String,
    /// Months in business.
    #[arg(long)]
    pub months: Option<u32>,
    /// Annual revenue.
    #[arg(long)]
    pub revenue: Option<f64>,
    /// Business description.
    #[arg(long, conflicts_with = "description_file")]
    pub description: Option<String>,
    /// Read the business description from a file.
    #[arg(long)]
    pub description_file: Option<PathBuf>,
}

/// Calendar actions.
#[derive(Debug, Subcommand)]
pub enum CalendarAction {
    /// Print the URL that grants calendar access.
    Connect,
    /// List calendars.
    List,
    /// Show upcoming events.
    Events {
        /// Calendar ids; all calendars when omitted.
        calendar_ids: Vec<String>,
    },
}

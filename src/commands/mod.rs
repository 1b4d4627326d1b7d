//! Command dispatch and handlers.

pub mod calendar;
pub mod chat;
pub mod feed;
pub mod fields;
pub mod jobs;
pub mod onboard;
pub mod qbos;
pub mod search;
pub mod task;

use crate::cassette::session::RecordingSession;
use crate::cli::{CalendarAction, Command};
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::dashboard::Notice;

/// Dispatch a parsed command to its handler.
///
/// When `OPSBOARD_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files under that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = AppConfig::from_env()?;
    let (ctx, session) = match config.record_dir.clone() {
        Some(root) => {
            let (ctx, session) = ServiceContext::recording(config, &root)?;
            (ctx, Some(session))
        }
        None => (ServiceContext::live(config), None),
    };

    let result = run_with_context(command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Run a command against an already-built context on a current-thread runtime.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the command fails.
pub fn run_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    runtime.block_on(execute(command, ctx))
}

async fn execute(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Feed { filters } => feed::run(ctx, filters).await,
        Command::Task { action } => task::run(ctx, action).await,
        Command::Jobs => jobs::list(ctx).await,
        Command::Job { action } => jobs::run(ctx, action).await,
        Command::Qbos => qbos::list(ctx).await,
        Command::Qbo { action } => qbos::run(ctx, action).await,
        Command::Onboard(args) => onboard::run(ctx, args).await,
        Command::Calendar { action } => match action {
            CalendarAction::Connect => calendar::connect(ctx),
            CalendarAction::List => calendar::list(ctx),
            CalendarAction::Events { calendar_ids } => calendar::events(ctx, calendar_ids),
        },
        Command::Search { query } => search::run(ctx, query).await,
        Command::Chat { chat_id } => chat::run(ctx, chat_id).await,
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Prints success notices to stdout and error notices to stderr.
pub(crate) fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
}

/// Prints a left-aligned table with a dashed rule under the header.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(header.len(), usize::max)
        })
        .collect();

    print_row(&widths, headers.iter().copied());
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&widths, rules.iter().map(String::as_str));
    for row in rows {
        print_row(&widths, row.iter().map(String::as_str));
    }
}

fn print_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let rendered: Vec<String> =
        widths.iter().zip(cells).map(|(width, cell)| format!("{cell:<width$}")).collect();
    println!("{}", rendered.join("  ").trim_end());
}

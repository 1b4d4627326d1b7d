//! `opsboard onboard` command.

use std::io::Write;

use crate::cli::OnboardArgs;
use crate::context::ServiceContext;
use crate::dashboard::{BusinessDetails, Onboarding};

use super::print_notices;

/// Execute the `onboard` command.
///
/// Runs the whole flow in one go: details, description, then the streamed
/// outcome-metrics suggestion, printed as it arrives.
///
/// # Errors
///
/// Returns an error string for missing answers, an unreadable description
/// file, a failed save, a provider error or the timeout.
pub async fn run(ctx: &ServiceContext, args: &OnboardArgs) -> Result<(), String> {
    let mut flow = Onboarding::from_config(&ctx.config);

    let details = BusinessDetails {
        name: args.name.clone(),
        industry: args.industry.clone(),
        growth_stage: args.stage.clone(),
        months_in_business: args.months,
        annual_revenue: args.revenue,
    };
    let accepted = flow.submit_details(details);
    print_notices(flow.drain_notices());
    accepted.map_err(|e| e.to_string())?;

    let description = match (&args.description, &args.description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read description from {}: {e}", path.display()))?,
        (None, None) => String::new(),
    };

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let submit = async {
        flow.submit_description(
            ctx.store.as_ref(),
            ctx.llm.as_ref(),
            ctx.id_gen.as_ref(),
            &description,
            Some(tx),
        )
        .await
        .map(|_| ())
    };
    let relay = async {
        let mut stdout = std::io::stdout();
        let mut streamed = false;
        while let Some(chunk) = rx.recv().await {
            streamed = true;
            let _ = write!(stdout, "{chunk}");
            let _ = stdout.flush();
        }
        if streamed {
            println!();
        }
    };
    let (outcome, ()) = tokio::join!(submit, relay);

    print_notices(flow.drain_notices());
    outcome.map_err(|e| e.to_string())?;
    if let Some(id) = flow.session_id() {
        tracing::info!(session_id = id, "onboarding complete");
    }
    Ok(())
}

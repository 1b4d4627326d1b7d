//! `opsboard calendar` commands.

use crate::context::ServiceContext;

/// Print the consent URL that connects a calendar.
///
/// # Errors
///
/// Returns an error string when the OAuth client settings are missing.
pub fn connect(ctx: &ServiceContext) -> Result<(), String> {
    let url =
        ctx.calendar.authorization_url().map_err(|e| format!("Cannot connect calendar: {e}"))?;
    println!("Open this URL to grant calendar access:\n{url}");
    Ok(())
}

/// List connected calendars.
///
/// # Errors
///
/// Returns an error string when the provider cannot list calendars.
pub fn list(ctx: &ServiceContext) -> Result<(), String> {
    let calendars =
        ctx.calendar.list_calendars().map_err(|e| format!("Cannot list calendars: {e}"))?;
    for calendar in &calendars {
        println!("{}  {}", calendar.id, calendar.summary);
    }
    Ok(())
}

/// Show upcoming events.
///
/// # Errors
///
/// Returns an error string when the provider cannot read events.
pub fn events(ctx: &ServiceContext, calendar_ids: &[String]) -> Result<(), String> {
    let events =
        ctx.calendar.upcoming_events(calendar_ids).map_err(|e| format!("Cannot read events: {e}"))?;
    for event in &events {
        println!("{}  {}", event.start.format("%a %b %-d %H:%M"), event.summary);
    }
    Ok(())
}

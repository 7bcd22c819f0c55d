//! Recurring quote update timer tied to widget presence.
//!
//! The timer runs while at least one widget is configured and stops when the
//! last one is removed.

use stockwidget_core::settings::SettingsStore;
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Starts or stops the recurring timer to match the configured widgets.
pub fn sync_recurring_updates(state: &AppState) {
    let has_widgets = match state.prefs.widgets() {
        Ok(widgets) => !widgets.is_empty(),
        Err(e) => {
            warn!("Cannot read widgets, leaving update timer unchanged: {}", e);
            return;
        }
    };

    match (has_widgets, state.scheduler.recurring_interval()) {
        (true, None) => schedule_from_settings(state),
        (false, Some(_)) => {
            info!("Last widget removed, stopping quote updates");
            state.scheduler.cancel_recurring();
        }
        _ => {}
    }
}

/// Restarts the timer with the stored interval, if it is running.
pub fn reschedule_if_running(state: &AppState) {
    if state.scheduler.recurring_interval().is_some() {
        schedule_from_settings(state);
    }
}

fn schedule_from_settings(state: &AppState) {
    match state.prefs.refresh_interval_minutes() {
        Ok(minutes) => {
            state.scheduler.schedule_recurring(minutes);
        }
        Err(e) => warn!("Cannot read refresh interval: {}", e),
    }
}

//! Process-level events shared by every docket front end.

use tracing::{error, info, warn};

use crate::errors::DocketError;

pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

pub fn log_app_shutdown(command: &str, success: bool) {
    info!(
        event = "core.app.shutdown_started",
        command = command,
        success = success
    );
}

/// The backend a command is about to talk to, after config and flags merged.
pub fn log_backend_resolved(base_url: &str, timeout_secs: u64) {
    info!(
        event = "core.app.backend_resolved",
        base_url = base_url,
        timeout_secs = timeout_secs
    );
}

/// User errors (bad input, rejected actions) are warnings; the rest are errors.
pub fn log_app_error(error: &dyn DocketError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code(),
            user_error = true
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code(),
            user_error = false
        );
    }
}

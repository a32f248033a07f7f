//! Logging macros for the network engine with verbosity level control.
//!
//! The macros emit `tracing` events and are skipped entirely when the
//! configured verbosity is below their level. Levels:
//! - 0: SILENT (only warnings and errors)
//! - 1: CHANGES (stage summaries: event counts, ranks, project duration)
//! - 2: CHECKS (per-event and per-job decisions)
//! - 3: DEBUG (per-edge relaxations)

use tracing_subscriber::EnvFilter;

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: stage summaries.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: event ranking, edge bindings, reserve checks.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: individual relaxations in the forward and backward passes.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}

/// Default `EnvFilter` directive for a verbosity level.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        VERBOSITY_SILENT => "pert_network=warn",
        VERBOSITY_CHANGES => "pert_network=info",
        VERBOSITY_CHECKS => "pert_network=debug",
        _ => "pert_network=trace",
    }
}

/// Install a stderr subscriber for the crate's log output.
///
/// `RUST_LOG` takes precedence over the verbosity-derived default.
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(verbosity: u8) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_constants() {
        assert_eq!(VERBOSITY_SILENT, 0);
        assert_eq!(VERBOSITY_CHANGES, 1);
        assert_eq!(VERBOSITY_CHECKS, 2);
        assert_eq!(VERBOSITY_DEBUG, 3);
    }

    #[test]
    fn test_default_directive_per_level() {
        assert_eq!(default_directive(0), "pert_network=warn");
        assert_eq!(default_directive(1), "pert_network=info");
        assert_eq!(default_directive(2), "pert_network=debug");
        assert_eq!(default_directive(3), "pert_network=trace");
        assert_eq!(default_directive(9), "pert_network=trace");
    }

    #[test]
    fn test_log_macros_compile() {
        // Just verify macros compile and don't panic
        let verbosity = VERBOSITY_DEBUG;
        log_changes!(verbosity, "test {}", 1);
        log_checks!(verbosity, "test {}", 2);
        log_debug!(verbosity, "test {}", 3);
    }
}

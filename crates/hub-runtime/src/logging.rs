/// Centralized logging macros for the actor system
///
/// These macros provide consistent logging across all actors with:
/// - Debug-only compilation for everything below error level
/// - Consistent formatting with actor context
///
/// Log debug-level message (only in debug builds)
///
/// # Example
/// ```
/// use hub_runtime::hub_debug;
/// hub_debug!("HubActor: routed {} → {}", 3, 0);
/// ```
#[macro_export]
macro_rules! hub_debug {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            eprintln!("[DEBUG] {}", format!($($arg)*));
        }
    };
}

/// Log info-level message (only in debug builds)
///
/// Use for important state changes and user-facing events
#[macro_export]
macro_rules! hub_info {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            eprintln!("[INFO] {}", format!($($arg)*));
        }
    };
}

/// Log warning-level message (only in debug builds)
///
/// Use for recoverable errors and unexpected conditions
#[macro_export]
macro_rules! hub_warn {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            eprintln!("[WARN] {}", format!($($arg)*));
        }
    };
}

/// Log error-level message (always compiled, even in release)
///
/// Use for critical errors that should always be visible
#[macro_export]
macro_rules! hub_error {
    ($($arg:tt)*) => {
        {
            eprintln!("[ERROR] {}", format!($($arg)*));
        }
    };
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    #[test]
    fn test_logging_macros_compile() {
        // Just verify macros compile
        hub_debug!("test debug");
        hub_info!("test info");
        hub_warn!("test warn");
        hub_error!("test error");
    }

    #[test]
    fn test_logging_with_format_args() {
        hub_debug!("HubActor: {} → {}", "Disconnected", "Connected");
        hub_info!("Connected to {}", "192.168.1.10:9990");
        hub_warn!("Retry attempt {}/{}", 1, 5);
        hub_error!("Failed to reach router: {}", "Connection refused");
    }
}

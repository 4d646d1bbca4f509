use log::LevelFilter;

/// Level used when nothing else asks for more detail.
fn default_level(debug_enabled: bool) -> LevelFilter {
    if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize logging for the solver.
///
/// # Behavior
/// - **Native (CLI):** `Debug` if `debug_enabled`, else `Info`; `RUST_LOG` overrides both, e.g.
///   `RUST_LOG=wordeq=trace` shows every individual rewrite.
/// - **WASM:** console logging at `Debug` or `Info`.
///
/// Calling it again is harmless: the second call leaves the first logger in place.
pub fn init_logger(debug_enabled: bool) {
    let level = default_level(debug_enabled);

    #[cfg(target_arch = "wasm32")]
    {
        let level = level.to_level().unwrap_or(log::Level::Info);
        match console_log::init_with_level(level) {
            Ok(()) => log::info!("wasm logger initialized at {level:?} level"),
            Err(e) => {
                // keep going without logs rather than failing the module
                let msg = format!("Failed to initialize console_log: {e}. Logging will be unavailable.");
                web_sys::console::error_1(&msg.into());
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut builder = env_logger::Builder::new();
        builder
            .filter(None, level)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false);

        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }

        if builder.try_init().is_ok() {
            log::debug!("native logger initialized at {level:?} level");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), LevelFilter::Debug);
        assert_eq!(default_level(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false);
        init_logger(true);
    }
}

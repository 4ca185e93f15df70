use std::sync::Once;

use boxsave_config::Config;
use boxsave_core::format::SymbolFormatter;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "boxsave=info";

/// Initializes the global tracing subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // Another subscriber may already be installed by the host application.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// Builds the amount formatter described by `config`.
pub fn formatter_for(config: &Config) -> SymbolFormatter {
    SymbolFormatter::new(config.currency_symbol.clone(), config.grouping_separator)
}

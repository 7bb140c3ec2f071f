use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "jyut_core=warn,jyut_cli=warn";
const VERBOSE_FILTER: &str = "jyut_core=debug,jyut_cli=debug";

/// Log to stderr. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
            )
            .init();
    });
}

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set. Otherwise the level is `debug` for this crate
/// with `--verbose`, and `warn` everywhere without it.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "invitro_leads=debug,warn"
    } else {
        "warn"
    }
}

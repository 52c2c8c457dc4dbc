//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor `--log` is given.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Installs the global `fmt` subscriber. `RUST_LOG` wins over `directives`.
pub fn init_tracing(directives: &str) {
    // RUST_LOG=julia_viewer=trace shows per-frame fps
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .try_init();
}

/// Routes panics through tracing so they land in the same log.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(%location, %payload, "panic");
    }));
}

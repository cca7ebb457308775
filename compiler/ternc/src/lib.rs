//! Tern command-line front end.
//!
//! The commands produce [`Report`](commands::Report)s instead of printing,
//! so they can be driven in memory; `main.rs` does the printing.

use std::sync::Once;

use tern_diagnostic::emitter::ColorMode;

pub mod commands;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Nothing is installed when `RUST_LOG` is unset. With `TERN_LOG_TREE=1`
/// spans are rendered as an indented tree instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let registry = tracing_subscriber::registry().with(filter);
            if std::env::var_os("TERN_LOG_TREE").is_some_and(|v| v == "1") {
                registry
                    .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                    .init();
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_level(true)
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
        }
    });
}

/// Pick the color mode: an explicit `--color` wins, then `NO_COLOR`.
pub fn color_mode(flag: Option<ColorMode>, no_color: bool) -> ColorMode {
    match flag {
        Some(mode) => mode,
        None if no_color => ColorMode::Never,
        None => ColorMode::Auto,
    }
}

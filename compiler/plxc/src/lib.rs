//! PLX command-line driver.
//!
//! The binary is a thin dispatcher over [`commands`]; the library half exists
//! so argument handling can be tested.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only active when `PLX_LOG` is set, e.g. `PLX_LOG=plx_lexer=trace`.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("PLX_LOG").is_ok() {
            let filter = EnvFilter::from_env("PLX_LOG");
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}

//! Tracing setup for hosts that embed the resolver.
//!
//! Output format is picked by `JSYM_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span tree via `tracing-tree`, handy for following
//!   one `resolve` or `type_of` query through the hierarchy walks
//! - `json`: one JSON object per event
//!
//! ```bash
//! JSYM_LOG=debug JSYM_LOG_FORMAT=tree my-indexer src/
//! JSYM_LOG="jsym_checker=debug,jsym_solver=trace" my-indexer src/
//! ```
//!
//! Nothing is installed unless `JSYM_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unrecognised values fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("JSYM_LOG_FORMAT").unwrap_or_default())
    }
}

/// `JSYM_LOG` wins over `RUST_LOG`; both take `RUST_LOG` directive syntax.
fn build_filter() -> EnvFilter {
    match std::env::var("JSYM_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Returns without doing anything when neither `JSYM_LOG` nor `RUST_LOG`
/// is set, or when a subscriber is already installed.
pub fn init_tracing() {
    if std::env::var_os("JSYM_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    let _ = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
}

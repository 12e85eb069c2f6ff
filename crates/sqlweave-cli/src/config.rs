//! Dialect resolution.
//!
//! Later sources override earlier ones: the JSON config file, then the
//! database URL, then the `--dialect` and `--h2-mode` flags.

use std::path::Path;

use anyhow::Context;
use sqlweave_core::{DialectContext, DialectKind, H2Mode};

pub fn resolve_context(
    config: Option<&Path>,
    database: Option<&str>,
    dialect: Option<DialectKind>,
    h2_mode: Option<H2Mode>,
) -> anyhow::Result<DialectContext> {
    let mut ctx = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => DialectContext::default(),
    };
    if let Some(url) = database {
        ctx = DialectContext::from_url(url)?;
    }
    if let Some(dialect) = dialect {
        ctx.dialect = dialect;
    }
    if let Some(mode) = h2_mode {
        ctx.h2_mode = Some(mode);
    }
    Ok(ctx)
}

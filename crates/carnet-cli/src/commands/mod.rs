//! CLI subcommand implementations.

pub mod check;
pub mod compute;
pub mod init;
pub mod policies;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use carnet_core::model::{Policy, Scope};
use carnet_core::parser::parse_policy;
use carnet_core::policies::find_builtin;

use crate::config::CarnetConfig;

/// Resolve `--policy`: a readable `.toml` path wins, then the built-in
/// catalog; without the flag the configured default policy is used.
pub(crate) fn resolve_policy(arg: Option<&str>, config: &CarnetConfig) -> Result<Policy> {
    let id_or_path = arg.unwrap_or(&config.default_policy);
    let path = Path::new(id_or_path);
    if path.is_file() {
        return parse_policy(path);
    }
    find_builtin(id_or_path)?.with_context(|| {
        format!("unknown policy '{id_or_path}' (not a built-in id or a readable file)")
    })
}

pub(crate) fn parse_scope(raw: &str) -> Result<Scope> {
    raw.parse::<Scope>().map_err(|e| anyhow::anyhow!("{e}"))
}

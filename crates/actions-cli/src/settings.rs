use actions_core::CompileConfig;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

/// Compile settings shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct CompileArgs {
    /// YAML file with db/output/locale/fallback_locale settings
    #[arg(long, global = true, env = "ACTIONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the raw.sqlite export [default: actions/MacOS-15.4/raw.sqlite]
    #[arg(long, global = true, env = "ACTIONS_DB")]
    pub db: Option<PathBuf>,

    /// Destination for the compiled JSON [default: compiled.json]
    #[arg(long, short = 'o', global = true, env = "ACTIONS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Preferred locale for localized strings [default: en]
    #[arg(long, global = true, env = "ACTIONS_LOCALE")]
    pub locale: Option<String>,

    /// Fallback locale when a string is missing [default: en]
    #[arg(long, global = true, env = "ACTIONS_FALLBACK_LOCALE")]
    pub fallback_locale: Option<String>,

    /// Disable the fallback locale entirely
    #[arg(long, global = true, conflicts_with = "fallback_locale")]
    pub no_fallback: bool,
}

/// Resolve the effective compile settings.
///
/// Priority:
/// 1. Explicit flags / environment variables
/// 2. Values from `--config`, if given
/// 3. Built-in defaults
pub fn resolve(args: &CompileArgs) -> anyhow::Result<CompileConfig> {
    let mut cfg = match &args.config {
        Some(path) => CompileConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CompileConfig::default(),
    };

    if let Some(db) = &args.db {
        cfg.db = db.clone();
    }
    if let Some(output) = &args.output {
        cfg.output = output.clone();
    }
    if let Some(locale) = &args.locale {
        cfg.locale = locale.clone();
    }
    if let Some(fallback) = &args.fallback_locale {
        cfg.fallback_locale = Some(fallback.clone());
    }
    if args.no_fallback {
        cfg.fallback_locale = None;
    }

    Ok(cfg)
}

use crate::output::print_json;
use actions_core::{compile_to_file, CompileConfig};
use anyhow::Context;

pub fn run(cfg: &CompileConfig, json: bool) -> anyhow::Result<()> {
    let doc = compile_to_file(cfg).context("failed to compile action catalog")?;

    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct CompileSummary<'a> {
            output: String,
            action_count: usize,
            locale: &'a str,
            fallback_locale: Option<&'a str>,
        }

        return print_json(&CompileSummary {
            output: cfg.output.display().to_string(),
            action_count: doc.metadata.action_count,
            locale: &doc.metadata.locale,
            fallback_locale: doc.metadata.fallback_locale.as_deref(),
        });
    }

    println!(
        "Compiled {} actions to {}",
        doc.metadata.action_count,
        cfg.output.display()
    );
    Ok(())
}

use crate::output::{print_json, print_table};
use actions_core::{compile, CompileConfig};
use anyhow::Context;

pub fn run(cfg: &CompileConfig, json: bool) -> anyhow::Result<()> {
    let doc = compile(cfg).context("failed to compile action catalog")?;

    if json {
        return print_json(&doc.actions);
    }

    let rows: Vec<Vec<String>> = doc
        .actions
        .iter()
        .map(|(id, action)| {
            vec![
                id.clone(),
                action.name.clone(),
                action.arguments.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "ARGS"], &rows);
    Ok(())
}

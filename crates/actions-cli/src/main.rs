mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use settings::CompileArgs;

#[derive(Parser)]
#[command(
    name = "compile-actions",
    about = "Compile per-action argument metadata from a raw action tool SQLite export",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    args: CompileArgs,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the export and write the JSON catalog (default)
    Compile,

    /// Compile in memory and list the resulting actions
    List,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = settings::resolve(&cli.args).and_then(|cfg| match cli.command {
        None | Some(Commands::Compile) => cmd::compile::run(&cfg, cli.json),
        Some(Commands::List) => cmd::list::run(&cfg, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

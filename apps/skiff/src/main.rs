mod cli;
mod logging;
mod store_fs;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use skiff_bootstrap::fragment;
use skiff_prefs::{PrefsBlob, PrefsExporter, PrefsImporter};

use cli::{BootstrapArgs, Cli, Command, PrefsCommand};
use store_fs::FsProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.logging.to_config()).context("failed to initialize logging")?;

    match cli.command {
        Command::Prefs { command } => run_prefs(cli.data_dir, command).await,
        Command::Bootstrap(args) => run_bootstrap(&args),
    }
}

async fn run_prefs(data_dir: Option<PathBuf>, command: PrefsCommand) -> Result<()> {
    let store = Arc::new(FsProfileStore::open(data_dir)?);
    match command {
        PrefsCommand::Export { output } => {
            let blob = PrefsExporter::new(store.clone(), store)
                .export()
                .await
                .context("preference export failed")?;
            let text =
                serde_json::to_string_pretty(&blob).context("failed to serialize blob")?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, text)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!(
                        "Exported {} profile(s) to {}",
                        blob.hterm.len(),
                        path.display()
                    );
                }
                None => println!("{text}"),
            }
        }
        PrefsCommand::Import { path } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let blob: PrefsBlob = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a preference blob", path.display()))?;
            PrefsImporter::new(store)
                .import(&blob)
                .await
                .context("preference import failed")?;
            eprintln!("Imported {} profile(s)", blob.hterm.len());
        }
    }
    Ok(())
}

fn run_bootstrap(args: &BootstrapArgs) -> Result<()> {
    // Accept the fragment with or without its leading '#'.
    let fragment_text = args.fragment.strip_prefix('#').unwrap_or(&args.fragment);
    let endpoint =
        fragment::parse(fragment_text).context("failed to parse bootstrap fragment")?;
    if args.json {
        println!("{}", serde_json::to_string(&endpoint)?);
    } else {
        println!("{}:{}", endpoint.host, endpoint.port);
    }
    Ok(())
}

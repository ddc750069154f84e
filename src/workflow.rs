use crate::cli::{Command, ListArgs, ListFormat, PickArgs, ServeArgs};
use crate::{cli, clipboard, config, tui};
use filepicker::listing::{DirectoryLister, ListingResponse};
use filepicker::logging::{self, LogOutput};
use filepicker::picker::{PickerConfig, render_listing};
use filepicker::server;
use filepicker::source::{Fetcher, HttpSource, ListingSource, LocalSource};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;

// Runs the HTTP listing server until it is interrupted.
fn run_serve(args: &ServeArgs) -> Result<()> {
    let config = config::server_config(args)?;
    let _guard = logging::init(LogOutput::Stdout, config.log_dir.as_deref(), "filepicker.log")?;

    actix_web::rt::System::new()
        .block_on(server::run(config))
        .context("listing server stopped with an error")
}

// Prints one listing, as the server would send it or as the widget renders it.
fn run_list(args: &ListArgs) -> Result<()> {
    let _guard = logging::init(LogOutput::Stderr, None, "")?;
    let lister = DirectoryLister::new(&args.root);

    match args.format {
        ListFormat::Json => {
            let response = lister.respond(&args.dir);
            println!("{}", serde_json::to_string_pretty(&response)?);
            if let ListingResponse { success: false, error, .. } = response {
                bail!(error.unwrap_or_default());
            }
        }
        ListFormat::Html => {
            let entries = lister.list(&args.dir)?;
            let config = PickerConfig {
                base_directory: args.base_directory.clone(),
                ..PickerConfig::default()
            };
            println!("{}", render_listing(entries, &config));
        }
    }
    Ok(())
}

// Resolves where listings come from: a remote endpoint or a local root.
fn build_source(args: &PickArgs, config: &mut PickerConfig) -> Result<Arc<dyn ListingSource>> {
    if let Some(url) = &args.source {
        let source = HttpSource::new(url.clone()).context("failed to build HTTP client")?;
        return Ok(Arc::new(source));
    }

    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let root: PathBuf = root
        .canonicalize()
        .with_context(|| format!("cannot browse {}", root.display()))?;
    if args.base_directory.is_none() {
        config.base_directory = root.display().to_string();
    }
    Ok(Arc::new(LocalSource::new(DirectoryLister::new(root))))
}

// Opens the terminal picker and reports the chosen file.
fn run_pick(args: &PickArgs) -> Result<()> {
    let _guard = logging::init(LogOutput::Off, args.log_dir.as_deref(), "filepicker-pick.log")?;

    let mut config = PickerConfig::from(args);
    let source = build_source(args, &mut config)?;
    let (fetcher, replies) = Fetcher::new(source);

    match tui::run_picker(config, fetcher, replies)? {
        Some(path) => {
            println!("{path}");
            if args.copy {
                clipboard::copy_path(&path)?;
                eprintln!("✅ Copied the selected path to the clipboard.");
            }
        }
        None => eprintln!("No file selected."),
    }
    Ok(())
}

// Main orchestrator: dispatches to the chosen subcommand.
pub fn run_filepicker(cli_args: cli::Cli) -> Result<()> {
    match &cli_args.command {
        Command::Serve(args) => run_serve(args),
        Command::List(args) => run_list(args),
        Command::Pick(args) => run_pick(args),
    }
}

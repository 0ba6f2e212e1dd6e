use std::path::Path;

use anyhow::{Context, Result, bail};
use folio_core::path::{last_segment, normalize, parent_of};
use folio_core::{AppConfig, Folio, FolderConfig, ItemRecord};
use tracing::debug;

use crate::cli::{Commands, ConfigArgs};

mod support;


use self::support::{print_json, report_error};

pub(crate) fn run_from_root(root: Option<&Path>, command: Commands) -> Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(root) = root {
        config = config.with_root(root);
    }
    let app = Folio::new(config).context("failed to create folio")?;
    let stats = app.initialize().context("failed to build index")?;
    debug!(
        target: "folio::cli",
        root = %app.config().root.display(),
        folders = stats.folders,
        items = stats.items,
        "store opened"
    );

    let (operation, path) = command_label(&command);
    let result = run_validated(&app, command);
    if let Err(err) = &result {
        report_error(operation, path.as_deref(), err);
    }
    result
}

fn run_validated(app: &Folio, command: Commands) -> Result<()> {
    match command {
        Commands::Rebuild(args) => {
            let stats = app.rebuild(args.path.as_deref())?;
            print_json(&stats)?;
        }
        Commands::Ls(args) => match args.page {
            Some(page_index) => print_json(&app.page(&args.path, page_index)?)?,
            None => print_json(&app.get_dir_contents(&args.path)?)?,
        },
        Commands::Search(args) => {
            if args.select {
                print_json(&app.select(&args.query)?)?;
            } else {
                print_json(&app.search(&args.query)?)?;
            }
        }
        Commands::Suggest(args) => {
            print_json(&app.suggest(&args.path)?)?;
        }
        Commands::Open(args) => {
            let intent = app.open_item(&args.dir, &args.name)?;
            print_json(&intent)?;
        }
        Commands::CanEnter(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            let allowed = runtime.block_on(app.can_enter(&args.path, args.user_id))?;
            print_json(&serde_json::json!({
                "path": normalize(&args.path),
                "user_id": args.user_id,
                "allowed": allowed,
            }))?;
        }
        Commands::Mkdir(args) => {
            let key = normalize(&args.path);
            let Some(parent) = parent_of(&key) else {
                bail!("mkdir needs a folder name: {}", args.path);
            };
            let created = app.create_folder(parent, last_segment(&key))?;
            print_json(&serde_json::json!({
                "status": "ok",
                "path": created,
            }))?;
        }
        Commands::Put(args) => {
            let record: ItemRecord = serde_json::from_str(&args.record)
                .with_context(|| format!("invalid item record: {}", args.record))?;
            let stored = app.put_item(&args.dir, &args.name, &record)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "dir": normalize(&args.dir),
                "name": stored,
                "kind": record.kind(),
            }))?;
        }
        Commands::Link(args) => {
            let stored = app.link(&args.dir, &args.name, &args.target)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "dir": normalize(&args.dir),
                "name": stored,
                "target_path": normalize(&args.target),
            }))?;
        }
        Commands::Config(args) => {
            let path = normalize(&args.path);
            let config = merge_folder_config(app.store().read_folder_config(&path), args);
            app.set_folder_config(&path, &config)?;
            print_json(&config)?;
        }
        Commands::Rm(args) => {
            let removed = match args.name.as_deref() {
                Some(name) => app.remove_item(&args.dir, name)?,
                None => app.remove_folder(&args.dir)?,
            };
            print_json(&serde_json::json!({
                "status": "ok",
                "removed": removed,
            }))?;
        }
        Commands::Mv(args) => {
            let renamed = app.rename_entry(&args.dir, &args.from, &args.to)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "renamed": renamed,
            }))?;
        }
    }
    Ok(())
}

/// Applies only the flags that were given on top of the stored config.
fn merge_folder_config(existing: Option<FolderConfig>, args: ConfigArgs) -> FolderConfig {
    let mut config = existing.unwrap_or_default();
    if let Some(icon) = args.icon {
        config.icon = Some(icon).filter(|icon| !icon.trim().is_empty());
    }
    if let Some(channel) = args.locked_channel {
        config.locked_channel = Some(channel).filter(|channel| !channel.trim().is_empty());
    }
    if !args.suggestions.is_empty() {
        config.suggestions = Some(args.suggestions);
    }
    config
}

fn command_label(command: &Commands) -> (&'static str, Option<String>) {
    match command {
        Commands::Rebuild(args) => ("rebuild", args.path.clone()),
        Commands::Ls(args) => ("ls", Some(args.path.clone())),
        Commands::Search(_) => ("search", None),
        Commands::Suggest(args) => ("suggest", Some(args.path.clone())),
        Commands::Open(args) => ("open", Some(args.dir.clone())),
        Commands::CanEnter(args) => ("can_enter", Some(args.path.clone())),
        Commands::Mkdir(args) => ("mkdir", Some(args.path.clone())),
        Commands::Put(args) => ("put", Some(args.dir.clone())),
        Commands::Link(args) => ("link", Some(args.dir.clone())),
        Commands::Config(args) => ("config", Some(args.path.clone())),
        Commands::Rm(args) => ("rm", Some(args.dir.clone())),
        Commands::Mv(args) => ("mv", Some(args.dir.clone())),
    }
}

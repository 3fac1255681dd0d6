use clap::Parser;
use colored::*;
use sitepad::api::SiteApi;
use sitepad::commands::rebuild::WebhookNotifier;
use sitepad::commands::{MessageLevel, OpMessage};
use sitepad::config::{SitePaths, SitepadConfig};
use sitepad::error::Result;
use sitepad::model::{default_content, default_settings};
use sitepad::render::PageRenderer;
use sitepad::server::AdminServer;
use sitepad::store::fs::FileStore;
use sitepad::store::DocumentStore;
use std::fs;
use std::path::Path;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { ref bind } => handle_serve(&cli.root, bind.clone()),
        Commands::Regen => handle_regen(&cli.root),
        Commands::Backup => handle_backup(&cli.root),
        Commands::Init => handle_init(&cli.root),
    }
}

fn init_api(root: &Path) -> Result<(SitepadConfig, SiteApi<FileStore>)> {
    let config = SitepadConfig::load(root)?;
    let paths = SitePaths::new(root);
    let store = FileStore::new(paths.data_dir());
    let renderer = PageRenderer::new(paths);

    let mut api = SiteApi::new(store, renderer);
    if let Some(url) = &config.rebuild_hook {
        api = api.with_notifier(Box::new(WebhookNotifier::new(url)));
    }

    Ok((config, api))
}

fn handle_serve(root: &Path, bind: Option<String>) -> Result<()> {
    let (config, api) = init_api(root)?;
    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());

    println!(
        "Serving admin API for {} on {}",
        root.display(),
        bind_addr.bold()
    );
    AdminServer::new(api, &config).run(&bind_addr)
}

fn handle_regen(root: &Path) -> Result<()> {
    let (_, mut api) = init_api(root)?;
    let result = api.regenerate_all()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_backup(root: &Path) -> Result<()> {
    let (_, api) = init_api(root)?;
    let result = api.create_backup()?;
    if let Some(path) = &result.backup_file {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(root: &Path) -> Result<()> {
    let paths = SitePaths::new(root);

    if paths.data_dir().exists() {
        println!("{}", "Site root already initialized.".dimmed());
        return Ok(());
    }

    fs::create_dir_all(paths.assets_dir())?;
    fs::create_dir_all(paths.page_backups_dir())?;

    SitepadConfig::default().save(root)?;
    let mut store = FileStore::new(paths.data_dir());
    store.save_settings(&default_settings())?;
    store.save_content(&default_content())?;

    println!("{}", format!("Initialized {}", root.display()).green());
    Ok(())
}

fn print_messages(messages: &[OpMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

use blockmark::application::init::init;
use blockmark::application::{BulkScanner, ConfigService, ItemDraft, SaveContentService};
use blockmark::cli::{format_config, format_resync, format_saved, format_scan_event, Cli, Commands};
use blockmark::domain::content::parse_published;
use blockmark::domain::ScanRequest;
use blockmark::error::{BlockmarkError, Result};
use blockmark::infrastructure::{ContentStore, FileSystemStore};
use chrono::{Local, SubsecRound};
use clap::Parser;
use std::io::Write;

fn main() {
    blockmark::logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path, site_url } => {
            let config = init(&path, site_url)?;
            println!("Initialized blockmark store at {}", path.display());
            println!("Site URL: {}", config.site_url);
            Ok(())
        }
        Commands::Save {
            id,
            title,
            kind,
            published,
            slug,
            body,
            body_file,
        } => {
            let published = published
                .map(|raw| {
                    parse_published(&raw).ok_or_else(|| {
                        BlockmarkError::InvalidInput(format!(
                            "Invalid --published value: '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
                            raw
                        ))
                    })
                })
                .transpose()?;
            let body = match body_file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => body,
            };

            let draft = ItemDraft {
                id: Some(id),
                title,
                kind,
                slug,
                published,
                body,
            };

            let service = SaveContentService::new(FileSystemStore::discover()?);
            let now = Local::now().naive_local().trunc_subsecs(0);
            let (item, change) = service.save_draft(draft, now)?;
            println!("{}", format_saved(&item, change));
            Ok(())
        }
        Commands::Show { id } => {
            let store = FileSystemStore::discover()?;
            let (url, title) = store.get_permalink_and_title(id)?;
            println!("{}", title);
            println!("{}", url);
            Ok(())
        }
        Commands::Resync => {
            let service = SaveContentService::new(FileSystemStore::discover()?);
            let summary = service.resync()?;
            println!("{}", format_resync(&summary));
            Ok(())
        }
        Commands::ScanMarkedContent {
            date_before,
            date_after,
        } => {
            let request = ScanRequest::new(date_after, date_before);
            request.validate()?;
            let store = FileSystemStore::discover()?;
            let page_size = store.load_config()?.get_page_size()?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            BulkScanner::new(&store)
                .with_page_size(page_size)
                .scan(&request, Local::now().naive_local(), |event| {
                    writeln!(out, "{}", format_scan_event(&event))?;
                    Ok(())
                })?;
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let service = ConfigService::new(FileSystemStore::discover()?);

            if list {
                println!("{}", format_config(&service.list()?));
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
                Ok(())
            } else {
                println!("Usage: blockmark config [--list | <key> [<value>]]");
                println!("Valid keys: page_size, site_url, created");
                Ok(())
            }
        }
    }
}

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use content_store::config::{Args, Command, Config};
use content_store::validation::Severity;
use content_store::{ContentLoader, ContentStore, Document, LiveStore, check_store, slugify};

/// One row of `list --recent`
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    title: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if let Some(path) = &config.config_path {
        log::debug!("Loaded configuration from {}", path.display());
    }

    let loader = ContentLoader::new(&config.root).with_extensions(config.extensions.clone());

    match args.command {
        Command::List {
            recent,
            limit,
            json,
        } => {
            let limit = recent.then(|| limit.unwrap_or(config.recent_limit));
            list(&load(&loader)?, limit, json)
        }
        Command::Show { id, raw, json } => show(&load(&loader)?, &id, raw, json),
        Command::Check { json } => check(&load(&loader)?, json),
        Command::Slug { title } => {
            println!("{}", slugify(&title.join(" ")));
            Ok(())
        }
        Command::Watch => watch(loader).await,
    }
}

fn load(loader: &ContentLoader) -> Result<ContentStore> {
    loader
        .load()
        .with_context(|| format!("Failed to load content from {}", loader.root().display()))
}

fn list(store: &ContentStore, recent: Option<usize>, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();

    match recent {
        Some(limit) => {
            let docs = store.recent(limit);
            if json {
                let entries: Vec<ListEntry> = docs
                    .iter()
                    .map(|d| ListEntry {
                        id: &d.id,
                        title: &d.title,
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut out, &entries)?;
                writeln!(out)?;
            } else {
                for doc in docs {
                    writeln!(out, "{}  ·  {}", doc.title, doc.id)?;
                }
            }
        }
        None => {
            // Store order is unspecified; sort for stable output
            let mut ids = store.list_identifiers();
            ids.sort_unstable();
            if json {
                serde_json::to_writer_pretty(&mut out, &ids)?;
                writeln!(out)?;
            } else {
                for id in ids {
                    writeln!(out, "{id}")?;
                }
            }
        }
    }

    Ok(())
}

fn show(store: &ContentStore, id: &str, raw: bool, json: bool) -> Result<()> {
    let document = store.get(id)?;
    let mut out = io::stdout().lock();

    if raw {
        write!(out, "{}", document.content)?;
    } else if json {
        serde_json::to_writer_pretty(&mut out, document)?;
        writeln!(out)?;
    } else {
        print_outline(&mut out, document)?;
    }

    Ok(())
}

fn print_outline(out: &mut impl Write, document: &Document) -> io::Result<()> {
    writeln!(out, "{}", document.title)?;
    writeln!(out, "{}", document.id)?;

    for section in &document.sections {
        let blocks = section.blocks.len();
        if section.is_lead() {
            writeln!(out, "  (lead) {blocks} blocks")?;
        } else {
            let indent = "  ".repeat(section.level as usize);
            writeln!(out, "{indent}{} ({blocks} blocks)", section.heading)?;
        }
    }

    Ok(())
}

fn check(store: &ContentStore, json: bool) -> Result<()> {
    let result = check_store(store);
    let mut out = io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        for diagnostic in &result.diagnostics {
            let location = match diagnostic.line {
                Some(line) => format!("{}:{}", diagnostic.document, line),
                None => diagnostic.document.clone(),
            };
            writeln!(
                out,
                "{location}: {}: {}",
                diagnostic.severity, diagnostic.message
            )?;
        }
        writeln!(
            out,
            "{} documents checked, {} errors, {} warnings",
            store.len(),
            result.count(Severity::Error),
            result.count(Severity::Warning)
        )?;
    }

    if !result.is_valid() {
        bail!(
            "{} document check(s) failed",
            result.count(Severity::Error)
        );
    }

    Ok(())
}

async fn watch(loader: ContentLoader) -> Result<()> {
    let mut live = LiveStore::open(loader).context("Failed to open content store")?;
    live.start_watching().await?;
    let mut reloads = live.subscribe();

    log::info!(
        "Watching {} documents, press Ctrl-C to stop",
        live.snapshot().await.len()
    );

    loop {
        tokio::select! {
            event = reloads.recv() => match event {
                Ok(event) => println!(
                    "reloaded {} documents after change to {}",
                    event.documents,
                    event.path.display()
                ),
                Err(RecvError::Lagged(missed)) => {
                    log::warn!("Missed {} reload notifications", missed);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping");
                break;
            }
        }
    }

    Ok(())
}

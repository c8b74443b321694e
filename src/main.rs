//! Pokédex CLI - Browse the public Pokédex API from the terminal
//!
//! Builds a single cached data client and uses it to list catalog pages or
//! show creature details, as text or JSON.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pokedex::cli::{Cli, Command, ListArgs};
use pokedex::data::PokemonRef;
use pokedex::render::{render_details, render_failure, render_page};
use pokedex::DataClient;

/// Installs the log subscriber; logs go to stderr so stdout stays parseable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Lists one catalog page, optionally fanning out to every entry's details
async fn run_list(client: &DataClient, args: &ListArgs, json: bool) -> anyhow::Result<()> {
    let (offset, limit) = args.resolve(client.config().page_size)?;
    let page = client.fetch_list(offset, limit).await?;

    let details = if args.details {
        let ids: Vec<PokemonRef> = page
            .items
            .iter()
            .map(|item| PokemonRef::parse(&item.name))
            .collect();
        Some(client.fetch_details_many(&ids).await)
    } else {
        None
    };

    let mut stdout = io::stdout().lock();
    let mut failures = 0;

    if json {
        let details_json = details.as_ref().map(|results| {
            results
                .iter()
                .filter_map(|result| result.as_ref().ok())
                .map(|d| serde_json::to_value(Arc::as_ref(d)))
                .collect::<Result<Vec<_>, _>>()
        });
        let value = match details_json {
            Some(list) => {
                let list = list?;
                serde_json::json!({ "page": &*page, "details": list })
            }
            None => serde_json::to_value(&*page)?,
        };
        writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        write!(stdout, "{}", render_page(&page))?;
    }

    if let Some(results) = &details {
        for (item, result) in page.items.iter().zip(results) {
            match result {
                Ok(d) if !json => writeln!(stdout, "\n{}", render_details(d).trim_end())?,
                Ok(_) => {}
                Err(err) => {
                    failures += 1;
                    eprintln!("{}", render_failure(&item.name, err));
                }
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} detail lookups failed", failures, page.items.len());
    }
    Ok(())
}

/// Shows detail cards for each requested creature
async fn run_show(client: &DataClient, ids: &[PokemonRef], json: bool) -> anyhow::Result<()> {
    let results = client.fetch_details_many(ids).await;

    let mut stdout = io::stdout().lock();
    let mut found = Vec::new();
    let mut failures = 0;

    for (id, result) in ids.iter().zip(&results) {
        match result {
            Ok(details) => found.push(Arc::as_ref(details)),
            Err(err) => {
                failures += 1;
                eprintln!("{}", render_failure(&id.to_string(), err));
            }
        }
    }

    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&found)?)?;
    } else {
        let cards: Vec<String> = found.iter().map(|d| render_details(d)).collect();
        write!(stdout, "{}", cards.join("\n"))?;
    }

    if failures > 0 {
        bail!("{} of {} lookups failed", failures, ids.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let client = DataClient::new(cli.client_config());

    let result = match &cli.command {
        Command::List(args) => run_list(&client, args, cli.json).await,
        Command::Show { ids } => run_show(&client, ids, cli.json).await,
    };

    debug!(cache = ?client.cache_stats(), "done");
    result
}

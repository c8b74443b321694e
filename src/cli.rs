//! Command-line interface parsing for the Pokédex CLI
//!
//! Handles the `list` and `show` subcommands and the global flags that
//! override the client configuration.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::data::PokemonRef;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// Pages are numbered from 1
    #[error("Invalid page: {0}. Pages are numbered from 1")]
    InvalidPage(u32),

    /// A list page must hold at least one item
    #[error("Invalid limit: {0}. Limit must be greater than zero")]
    InvalidLimit(u32),
}

/// Pokédex CLI - Browse creatures from the public Pokédex API
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the Pokédex API from the terminal")]
#[command(version)]
pub struct Cli {
    /// API root to query instead of the public Pokédex API
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Number of retries after a failed request
    #[arg(long, global = true, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Print normalized records as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List one page of the catalog
    ///
    /// Examples:
    ///   pokedex list                 # First 36 entries
    ///   pokedex list --page 3        # Entries 73-108
    ///   pokedex list --offset 150 --limit 10 --details
    List(ListArgs),

    /// Show details for one or more creatures, by id or name
    Show {
        #[arg(required = true, value_name = "ID_OR_NAME", value_parser = parse_pokemon_ref)]
        ids: Vec<PokemonRef>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Number of entries to skip
    #[arg(long, conflicts_with = "page")]
    pub offset: Option<u32>,

    /// 1-based page number, using the page size as stride
    #[arg(long)]
    pub page: Option<u32>,

    /// Entries per page (defaults to the configured page size)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Also fetch details for every entry on the page
    #[arg(long)]
    pub details: bool,
}

/// Parses an id or name, rejecting id 0, blank names and path-like names
fn parse_pokemon_ref(s: &str) -> Result<PokemonRef, String> {
    s.parse()
}

impl ListArgs {
    /// Resolves the requested `(offset, limit)` pair.
    ///
    /// # Arguments
    /// * `page_size` - Limit to use when none was given
    ///
    /// # Returns
    /// * `Ok((offset, limit))`
    /// * `Err(CliError)` if the page or limit is zero
    pub fn resolve(&self, page_size: u32) -> Result<(u32, u32), CliError> {
        let limit = self.limit.unwrap_or(page_size);
        if limit == 0 {
            return Err(CliError::InvalidLimit(limit));
        }

        let offset = match self.page {
            Some(0) => return Err(CliError::InvalidPage(0)),
            Some(page) => (page - 1).saturating_mul(limit),
            None => self.offset.unwrap_or(0),
        };
        Ok((offset, limit))
    }
}

impl Cli {
    /// Builds the client configuration, applying any overrides from flags
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Command::List(ListArgs {
            limit: Some(limit), ..
        }) = &self.command
        {
            if *limit > 0 {
                config = config.with_page_size(*limit);
            }
        }
        config
    }
}

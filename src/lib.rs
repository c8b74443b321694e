//! Pokédex data client
//!
//! A cached, retrying client for the public Pokédex API, plus the pieces the
//! `pokedex` binary uses to present its results.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod transport;

pub use cache::CacheStats;
pub use client::DataClient;
pub use config::ClientConfig;
pub use data::{PokemonDetails, PokemonPage, PokemonRef, PokemonSummary};
pub use error::{FetchError, RequestError};
pub use transport::{HttpTransport, RawResponse, Transport};

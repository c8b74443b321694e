//! Core data models for the Pokédex client
//!
//! Upstream documents are decoded into the wire schema in [`api`] and then
//! normalized into the flat records defined here, which is what callers of
//! the data client receive.

pub mod api;
pub mod format;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use format::{format_name, type_color};

use api::{DetailsResponse, ListResponse};

/// One entry of a list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    /// Positional id: `offset + index + 1`
    pub id: u32,
    pub name: String,
    /// Upstream detail URL for this entry
    pub url: String,
}

/// A page of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonPage {
    /// Entries in upstream order
    pub items: Vec<PokemonSummary>,
    /// Size of the whole collection as reported upstream
    pub total_count: u32,
    /// Whether the upstream advertised a next page
    pub has_more: bool,
    /// Offset this page was requested with
    pub offset: u32,
    /// Limit this page was requested with
    pub limit: u32,
}

impl PokemonPage {
    /// Normalize an upstream list document
    ///
    /// Ids are derived from list position, not from the upstream payload. When
    /// an item URL carries a different numeric id the mismatch is logged, but
    /// the positional id is kept.
    pub fn from_response(response: ListResponse, offset: u32, limit: u32) -> Self {
        let items = response
            .results
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = offset.saturating_add(index as u32 + 1);
                if let Some(url_id) = id_from_url(&entry.url) {
                    if url_id != id {
                        tracing::warn!(
                            name = %entry.name,
                            positional_id = id,
                            url_id,
                            "list position disagrees with upstream id"
                        );
                    }
                }
                PokemonSummary {
                    id,
                    name: entry.name,
                    url: entry.url,
                }
            })
            .collect();

        Self {
            items,
            total_count: response.count,
            has_more: response.next.is_some(),
            offset,
            limit,
        }
    }

    /// Offset of the following page, if there is one
    pub fn next_offset(&self) -> Option<u32> {
        self.offset.checked_add(self.limit).filter(|_| self.has_more)
    }

    /// Offset of the preceding page, if this is not the first
    pub fn previous_offset(&self) -> Option<u32> {
        (self.offset > 0).then(|| self.offset.saturating_sub(self.limit))
    }

    /// 1-based page number
    pub fn page_number(&self) -> u32 {
        self.offset / self.limit.max(1) + 1
    }

    /// Number of pages needed to show the whole collection
    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(self.limit.max(1)).max(1)
    }
}

/// Extract a trailing numeric id from a resource URL (`.../pokemon/25/`)
fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Image variants for one creature; any of them may be missing upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front: Option<String>,
    pub back: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
    pub official_artwork: Option<String>,
    pub official_artwork_shiny: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub formatted_name: String,
    /// Hex color conventionally associated with the type
    pub color_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatInfo {
    pub name: String,
    pub base_value: u32,
    pub effort: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityInfo {
    pub name: String,
    pub formatted_name: String,
    pub is_hidden: bool,
}

/// Normalized detail record for a single creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub id: u32,
    /// Raw upstream name
    pub name: String,
    /// Title-cased display name
    pub display_name: String,
    pub sprites: Sprites,
    /// Types ordered by slot
    pub types: Vec<TypeInfo>,
    /// Height in upstream units (decimetres), unconverted
    pub height: Option<u32>,
    /// Weight in upstream units (hectograms), unconverted
    pub weight: Option<u32>,
    pub stats: Vec<StatInfo>,
    pub abilities: Vec<AbilityInfo>,
    pub base_experience: Option<u32>,
    pub order: Option<i32>,
    /// Raw move list, left for downstream consumers to resolve
    pub moves: Vec<serde_json::Value>,
    /// When this record was normalized
    pub fetched_at: DateTime<Utc>,
}

impl PokemonDetails {
    /// Normalize an upstream detail document, stamping it with `fetched_at`
    pub fn from_response(response: DetailsResponse, fetched_at: DateTime<Utc>) -> Self {
        let artwork = response
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .unwrap_or_default();

        let sprites = Sprites {
            front: response.sprites.front_default,
            back: response.sprites.back_default,
            front_shiny: response.sprites.front_shiny,
            back_shiny: response.sprites.back_shiny,
            official_artwork: artwork.front_default,
            official_artwork_shiny: artwork.front_shiny,
        };

        let mut type_slots = response.types;
        type_slots.sort_by_key(|slot| slot.slot);
        let types = type_slots
            .into_iter()
            .map(|slot| TypeInfo {
                formatted_name: format_name(&slot.kind.name),
                color_hint: type_color(&slot.kind.name).to_string(),
                name: slot.kind.name,
            })
            .collect();

        let stats = response
            .stats
            .into_iter()
            .map(|entry| StatInfo {
                name: entry.stat.name,
                base_value: entry.base_stat,
                effort: entry.effort,
            })
            .collect();

        let abilities = response
            .abilities
            .into_iter()
            .map(|slot| AbilityInfo {
                formatted_name: format_name(&slot.ability.name),
                name: slot.ability.name,
                is_hidden: slot.is_hidden,
            })
            .collect();

        Self {
            id: response.id,
            display_name: format_name(&response.name),
            name: response.name,
            sprites,
            types,
            height: response.height,
            weight: response.weight,
            stats,
            abilities,
            base_experience: response.base_experience,
            order: response.order,
            moves: response.moves,
            fetched_at,
        }
    }

    /// Sum of all base stat values
    pub fn base_stat_total(&self) -> u32 {
        self.stats.iter().map(|stat| stat.base_value).sum()
    }
}

/// Identifier for a single creature: numeric id or name
///
/// Names are trimmed and lower-cased on construction, so `"Pikachu"` and
/// `"pikachu"` address the same record and share a cache entry. Decoded
/// names go through the same normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged, from = "RawPokemonRef")]
pub enum PokemonRef {
    Id(u32),
    Name(String),
}

/// Decoding shape for [`PokemonRef`], before normalization
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPokemonRef {
    Id(u32),
    Name(String),
}

impl From<RawPokemonRef> for PokemonRef {
    fn from(raw: RawPokemonRef) -> Self {
        match raw {
            RawPokemonRef::Id(id) => PokemonRef::Id(id),
            RawPokemonRef::Name(name) => PokemonRef::parse(&name),
        }
    }
}

impl PokemonRef {
    /// Build a reference from free text; numeric text becomes an id
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(id) => PokemonRef::Id(id),
            Err(_) => PokemonRef::Name(trimmed.to_lowercase()),
        }
    }

    /// Cache key for the detail record: `details_<idOrName>`
    pub fn cache_key(&self) -> String {
        format!("details_{}", self)
    }

    /// Why this reference cannot be requested, if it cannot
    pub fn validation_error(&self) -> Option<&'static str> {
        match self {
            PokemonRef::Id(0) => Some("id must be a positive integer"),
            PokemonRef::Name(name) if name.is_empty() => Some("name must not be empty"),
            PokemonRef::Name(name)
                if name == "."
                    || name == ".."
                    || name.contains(['/', '\\', '?', '#', '%']) =>
            {
                Some("name must not contain path or query characters")
            }
            _ => None,
        }
    }
}

impl fmt::Display for PokemonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokemonRef::Id(id) => write!(f, "{}", id),
            PokemonRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for PokemonRef {
    fn from(id: u32) -> Self {
        PokemonRef::Id(id)
    }
}

impl From<&str> for PokemonRef {
    fn from(input: &str) -> Self {
        PokemonRef::parse(input)
    }
}

impl FromStr for PokemonRef {
    type Err = String;

    /// Strict parse used for command-line input; rejects anything `validation_error` flags
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = PokemonRef::parse(s);
        match parsed.validation_error() {
            Some(reason) => Err(format!("'{}': {}", s, reason)),
            None => Ok(parsed),
        }
    }
}

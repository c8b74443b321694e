//! Upstream wire schema
//!
//! These structs mirror the JSON documents served by the Pokédex API. Every
//! field the upstream may omit or null is an explicit `Option` or defaults to
//! empty, so a sparse document still decodes and normalization decides what
//! to do with the gaps.

use serde::Deserialize;

/// `GET /pokemon?offset&limit`
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    /// Total number of items in the collection
    pub count: u32,
    /// URL of the next page, absent on the last page
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A `{ name, url }` reference, used throughout the API
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// `GET /pokemon/{idOrName}`
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub sprites: SpritesResponse,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    /// Passed through untouched for downstream consumers
    #[serde(default)]
    pub moves: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpritesResponse {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub back_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub back_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtworkSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

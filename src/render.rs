//! Plain-text rendering of client results for the terminal

use std::fmt::Write;

use crate::data::{PokemonDetails, PokemonPage};
use crate::error::FetchError;

/// Width of the stat bar at the maximum base value
const STAT_BAR_WIDTH: u32 = 30;

/// Highest base value any single stat reaches upstream
const MAX_BASE_STAT: u32 = 255;

/// Renders a list page as one line per entry plus a pagination footer
pub fn render_page(page: &PokemonPage) -> String {
    let mut out = String::new();
    for item in &page.items {
        let _ = writeln!(out, "#{:<5} {}", item.id, crate::data::format_name(&item.name));
    }

    let _ = write!(
        out,
        "Page {} of {} ({} total)",
        page.page_number(),
        page.total_pages(),
        page.total_count
    );
    if let Some(next) = page.next_offset() {
        let _ = write!(out, " - next: --offset {}", next);
    }
    out.push('\n');
    out
}

/// Renders a detail record as a text card
pub fn render_details(details: &PokemonDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", details.id, details.display_name);

    let types: Vec<&str> = details
        .types
        .iter()
        .map(|t| t.formatted_name.as_str())
        .collect();
    let _ = writeln!(out, "  Types:     {}", types.join(" / "));

    let _ = writeln!(
        out,
        "  Height:    {}",
        details
            .height
            .map(|h| format!("{:.1} m", f64::from(h) / 10.0))
            .unwrap_or_else(|| "unknown".to_string())
    );
    let _ = writeln!(
        out,
        "  Weight:    {}",
        details
            .weight
            .map(|w| format!("{:.1} kg", f64::from(w) / 10.0))
            .unwrap_or_else(|| "unknown".to_string())
    );
    if let Some(exp) = details.base_experience {
        let _ = writeln!(out, "  Base exp:  {}", exp);
    }

    if !details.abilities.is_empty() {
        let abilities: Vec<String> = details
            .abilities
            .iter()
            .map(|a| {
                if a.is_hidden {
                    format!("{} (hidden)", a.formatted_name)
                } else {
                    a.formatted_name.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "  Abilities: {}", abilities.join(", "));
    }

    if !details.stats.is_empty() {
        let _ = writeln!(out, "  Stats:");
        for stat in &details.stats {
            let bar_len = stat.base_value.min(MAX_BASE_STAT) * STAT_BAR_WIDTH / MAX_BASE_STAT;
            let _ = writeln!(
                out,
                "    {:<16} {:>3} {}",
                crate::data::format_name(&stat.name),
                stat.base_value,
                "█".repeat(bar_len as usize)
            );
        }
        let _ = writeln!(out, "    {:<16} {:>3}", "Total", details.base_stat_total());
    }

    if let Some(artwork) = details
        .sprites
        .official_artwork
        .as_deref()
        .or(details.sprites.front.as_deref())
    {
        let _ = writeln!(out, "  Image:     {}", artwork);
    }
    out
}

/// Renders a failed lookup in a user-facing way
pub fn render_failure(subject: &str, err: &FetchError) -> String {
    match err {
        FetchError::RetriesExhausted { .. } if err.status() == Some(404) => {
            format!("{}: not found", subject)
        }
        _ => format!("{}: {}", subject, err),
    }
}

//! Persona card embeds for command replies
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use crate::core::{clamp_display_name, truncate_for_embed};
use crate::features::personas::PersonaRecord;
use serenity::builder::CreateEmbed;

/// Accent color used on persona cards
pub const CARD_COLOR: u32 = 0x7289DA;

/// Build a persona card: author (name + avatar icon), trigger, universe and registration date.
pub fn persona_card(record: &PersonaRecord) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.author(|a| {
        a.name(clamp_display_name(&record.name));
        if let Some(url) = &record.avatar {
            a.icon_url(url);
        }
        a
    });
    if let Some(url) = &record.avatar {
        embed.thumbnail(url);
    }
    embed.color(CARD_COLOR);
    embed.description(truncate_for_embed(&card_description(record)));
    embed
}

/// Plain-text body of a persona card
pub fn card_description(record: &PersonaRecord) -> String {
    let mut body = format!("**Trigger:** `{}`", record.trigger);
    if let Some(universe) = &record.universe {
        body.push_str(&format!("\n**Universe:** {universe}"));
    }
    match &record.avatar {
        Some(_) => body.push_str("\n**Avatar:** set"),
        None => body.push_str("\n**Avatar:** your own"),
    }
    body.push_str(&format!(
        "\n**Registered:** {}",
        record.created_at.format("%Y-%m-%d")
    ));
    body
}

use poise::serenity_prelude::{CreateEmbed, Timestamp};

use crate::config::EmbedConfig;

pub const COLOR_ERROR: u32 = 0xE74C3C; // Red

pub fn error(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("[ERROR] {}", title))
        .description(description)
        .color(COLOR_ERROR)
}

/// Node statistics embed. Fields keep their order and are never inline.
pub fn stats<I, V>(config: &EmbedConfig, fields: I) -> CreateEmbed
where
    I: IntoIterator<Item = (&'static str, V)>,
    V: Into<String>,
{
    let mut embed = CreateEmbed::new()
        .title(&config.title)
        .color(config.color)
        .timestamp(Timestamp::now());

    if !config.logo.is_empty() {
        embed = embed.thumbnail(&config.logo);
    }

    embed.fields(fields.into_iter().map(|(name, value)| (name, value, false)))
}

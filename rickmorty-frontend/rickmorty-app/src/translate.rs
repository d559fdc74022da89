//! Display labels for the free-text fields the API returns in English.

use regex::Regex;
use std::sync::LazyLock;

static EPISODE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"S(\d+)E(\d+)").expect("episode code pattern compiles"));

pub fn gender_translate(gender: &str) -> String {
    match gender.to_lowercase().as_str() {
        "male" => "Masculino".to_string(),
        "female" => "Femenino".to_string(),
        "genderless" => "Sin género".to_string(),
        "unknown" => "Desconocido".to_string(),
        _ => gender.to_string(),
    }
}

pub fn status_translate(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "alive" => "Vivo".to_string(),
        "dead" => "Muerto".to_string(),
        "unknown" => "Desconocido".to_string(),
        _ => status.to_string(),
    }
}

/// Season and episode numbers from an `S01E11` style code.
pub fn parse_episode_code(code: &str) -> Option<(u32, u32)> {
    let captures = EPISODE_CODE.captures(code)?;
    let season = captures.get(1)?.as_str().parse().ok()?;
    let episode = captures.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}

/// `S01E11` becomes `Episode 11 (Season 1)`; anything else is returned unchanged.
pub fn format_episode_code(code: &str) -> String {
    match parse_episode_code(code) {
        Some((season, episode)) => format!("Episode {episode} (Season {season})"),
        None => code.to_string(),
    }
}

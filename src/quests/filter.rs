/*!
 * Heuristics separating player-facing text from technical values.
 *
 * The filter is a blacklist: it trades some recall (short legitimate strings
 * that look like identifiers are skipped) for never sending ids, flags or
 * colour codes to the translation service.
 */

use once_cell::sync::Lazy;
use regex::RegexSet;

static TECHNICAL_VALUE: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^[a-z_]+:[a-z_]+$",   // resource identifiers (minecraft:stone)
        r"^[A-Z_][A-Z_0-9]*$",  // enum-like constants (ALWAYS, AND)
        r"^[a-z]+\.[a-z.]+$",   // translation keys (bq_standard.reward.command)
        r"^(true|false)$",
        r"^\d+$",
        r"^[a-f0-9\-]{36}$",    // UUIDs
        r"^#[a-fA-F0-9]{6,8}$", // colour codes
    ])
    .expect("valid technical value patterns")
});

static PLAYER_MESSAGE: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([r"/say\s+.+", r"/tell\s+.+", r"/title\s+.+"]).expect("valid player message patterns")
});

/// Whether `text` looks like something a player reads
pub fn is_translatable_text(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !TECHNICAL_VALUE.is_match(trimmed)
}

/// Whether a reward command shows text to the player
pub fn is_player_message(command: &str) -> bool {
    !command.is_empty() && PLAYER_MESSAGE.is_match(command)
}

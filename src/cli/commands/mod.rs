mod character;
mod planets;
mod roster;

pub use character::{CharacterView, cmd_character};
pub use planets::{PlanetListView, cmd_planets};
pub use roster::{RosterView, cmd_roster};

/// Shortens `text` to at most `max` characters, marking the cut with "...".
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Namek", 10), "Namek");
        assert_eq!(truncate("Saiyajin", 4), "Saiy...");
        assert_eq!(truncate("Planeta Tierra", 8), "Planeta...");
        assert_eq!(truncate("ñññññ", 2), "ññ...");
    }
}

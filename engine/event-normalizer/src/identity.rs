//! Display identity helpers: names, teams and placeholders

use crate::types::RawPlateAppearance;

/// Placeholder for a batter without a published name
pub const UNKNOWN_NAME: &str = "Unknown";

/// Placeholder for a missing team or position
pub const UNKNOWN_TEAM: &str = "UNK";

/// Turn "Last, First" into "First Last". Anything without a comma is kept as is.
pub fn display_name(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return UNKNOWN_NAME.to_string(),
    };

    match raw.split_once(',') {
        Some((last, first)) => {
            let (first, last) = (first.trim(), last.trim());
            match (first.is_empty(), last.is_empty()) {
                (true, true) => UNKNOWN_NAME.to_string(),
                (true, false) => last.to_string(),
                (false, true) => first.to_string(),
                (false, false) => format!("{first} {last}"),
            }
        }
        None => raw.to_string(),
    }
}

/// Team at bat for a plate appearance: the away side bats in the top half
pub fn batting_team(record: &RawPlateAppearance) -> Option<&str> {
    let half = record.inning_topbot.as_deref()?;
    let team = if half.eq_ignore_ascii_case("top") {
        record.away_team.as_deref()
    } else {
        record.home_team.as_deref()
    };
    team.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_flips_last_first() {
        assert_eq!(display_name(Some("Judge, Aaron")), "Aaron Judge");
        assert_eq!(display_name(Some("  Guerrero Jr., Vladimir ")), "Vladimir Guerrero Jr.");
    }

    #[test]
    fn test_display_name_placeholders() {
        assert_eq!(display_name(None), UNKNOWN_NAME);
        assert_eq!(display_name(Some("   ")), UNKNOWN_NAME);
        assert_eq!(display_name(Some("Ohtani")), "Ohtani");
        assert_eq!(display_name(Some("Soto, ")), "Soto");
    }

    #[test]
    fn test_batting_team_by_half_inning() {
        let mut record = RawPlateAppearance {
            home_team: Some("NYY".to_string()),
            away_team: Some("BOS".to_string()),
            inning_topbot: Some("Top".to_string()),
            ..Default::default()
        };
        assert_eq!(batting_team(&record), Some("BOS"));

        record.inning_topbot = Some("Bot".to_string());
        assert_eq!(batting_team(&record), Some("NYY"));

        record.inning_topbot = None;
        assert_eq!(batting_team(&record), None);
    }
}

//! Emoji annotations for condition texts and life indexes.

use crate::model::LifeIndexKind;

/// Ordered `(substring, icon)` rules; the first contained substring wins.
///
/// Order matters for mixed conditions such as 雷阵雨, which hits the rain
/// rule before the thunder rule is reached. 🌧️ for 雷阵雨 is the
/// established icon for this provider's reports and is kept on purpose.
pub const CONDITION_ICONS: &[(&str, &str)] = &[
    ("晴", "☀️"),
    ("雨", "🌧️"),
    ("雪", "❄️"),
    ("雾", "🌫️"),
    ("雷", "⛈️"),
];

pub const DEFAULT_CONDITION_ICON: &str = "☁️";

pub fn condition_icon(condition: &str) -> &'static str {
    CONDITION_ICONS
        .iter()
        .find(|(needle, _)| condition.contains(needle))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CONDITION_ICON)
}

pub fn life_index_icon(kind: LifeIndexKind) -> &'static str {
    match kind {
        LifeIndexKind::Clothing => "👕",
        LifeIndexKind::Makeup => "💄",
        LifeIndexKind::ColdRisk => "🤧",
        LifeIndexKind::CarWash => "🚗",
        LifeIndexKind::Exercise => "🏃",
        LifeIndexKind::Uv => "☀️",
        LifeIndexKind::Other => "ℹ️",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keyword_conditions() {
        assert_eq!(condition_icon("晴"), "☀️");
        assert_eq!(condition_icon("小雨"), "🌧️");
        assert_eq!(condition_icon("中雪"), "❄️");
        assert_eq!(condition_icon("大雾"), "🌫️");
        assert_eq!(condition_icon("雷电"), "⛈️");
    }

    #[test]
    fn unmatched_condition_falls_back_to_cloudy() {
        assert_eq!(condition_icon("多云"), DEFAULT_CONDITION_ICON);
        assert_eq!(condition_icon(""), DEFAULT_CONDITION_ICON);
    }

    #[test]
    fn first_matching_rule_wins() {
        // rain is listed before thunder
        assert_eq!(condition_icon("雷阵雨"), "🌧️");
        // clear is listed before everything
        assert_eq!(condition_icon("晴转雨"), "☀️");
        assert_eq!(condition_icon("雨夹雪"), "🌧️");
    }

    #[test]
    fn life_index_icons() {
        assert_eq!(life_index_icon(LifeIndexKind::ColdRisk), "🤧");
        assert_eq!(life_index_icon(LifeIndexKind::Other), "ℹ️");
    }
}

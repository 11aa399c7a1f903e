use serde::{Deserialize, Serialize};

/// Display ordering for the watchlist view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most recently created first (id descending).
    Recent,
    /// Highest rating first; unrated entries sort last.
    RatingDesc,
    /// Newest release year first.
    YearDesc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Recent => "recent",
            SortMode::RatingDesc => "rating_desc",
            SortMode::YearDesc => "year_desc",
        }
    }

    /// From a sort-control value. Anything unrecognized falls back to
    /// `Recent`, matching the default branch of the sort control.
    pub fn from_field(value: &str) -> Self {
        match value {
            "rating_desc" => SortMode::RatingDesc,
            "year_desc" => SortMode::YearDesc,
            _ => SortMode::Recent,
        }
    }
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::Recent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_value_falls_back_to_recent() {
        assert_eq!(SortMode::from_field("rating_desc"), SortMode::RatingDesc);
        assert_eq!(SortMode::from_field("year_desc"), SortMode::YearDesc);
        assert_eq!(SortMode::from_field(""), SortMode::Recent);
        assert_eq!(SortMode::from_field("alphabetical"), SortMode::Recent);
    }

    #[test]
    fn wire_names_round_trip() {
        for mode in [SortMode::Recent, SortMode::RatingDesc, SortMode::YearDesc] {
            assert_eq!(SortMode::from_field(mode.as_str()), mode);
        }
    }
}

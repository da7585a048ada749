//! Keyword table and first-match classification

use serde::{Deserialize, Serialize};

/// Command categories the dispatcher understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Open,
    Time,
    Date,
    Weather,
    Search,
    /// Nothing matched
    Help,
}

/// Trigger keywords, checked in this order
const PATTERNS: [(&str, Intent); 5] = [
    ("open", Intent::Open),
    ("time", Intent::Time),
    ("date", Intent::Date),
    ("weather", Intent::Weather),
    ("search", Intent::Search),
];

impl Intent {
    /// Classify a lower-cased transcript
    pub fn classify(command: &str) -> Self {
        PATTERNS
            .iter()
            .find(|(keyword, _)| command.contains(keyword))
            .map(|(_, intent)| *intent)
            .unwrap_or(Intent::Help)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Open => write!(f, "open"),
            Intent::Time => write!(f, "time"),
            Intent::Date => write!(f, "date"),
            Intent::Weather => write!(f, "weather"),
            Intent::Search => write!(f, "search"),
            Intent::Help => write!(f, "help"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keywords() {
        assert_eq!(Intent::classify("open youtube"), Intent::Open);
        assert_eq!(Intent::classify("what time is it"), Intent::Time);
        assert_eq!(Intent::classify("what's the date"), Intent::Date);
        assert_eq!(Intent::classify("weather in paris"), Intent::Weather);
        assert_eq!(Intent::classify("search rust lifetimes"), Intent::Search);
        assert_eq!(Intent::classify("tell me a joke"), Intent::Help);
    }

    #[test]
    fn test_first_keyword_in_table_order_wins() {
        assert_eq!(Intent::classify("search the weather"), Intent::Weather);
        assert_eq!(Intent::classify("what date and time"), Intent::Time);
        assert_eq!(Intent::classify("open the weather search page"), Intent::Open);
        assert_eq!(Intent::classify("update search"), Intent::Date);
    }
}

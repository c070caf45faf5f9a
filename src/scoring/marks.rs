use super::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Qualitative mark a punter assigns to one aspect of a boat.
///
/// Variants are declared best-first, so the derived `Ord` puts `Star` lowest;
/// use [`Mark::ALL`] when the best-to-worst order is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mark {
    Star,         // ☆
    DoubleCircle, // ◎
    Circle,       // 〇
    Square,       // □
    Triangle,     // △
    Cross,        // ×
}

impl Mark {
    pub const ALL: [Mark; 6] = [
        Mark::Star,
        Mark::DoubleCircle,
        Mark::Circle,
        Mark::Square,
        Mark::Triangle,
        Mark::Cross,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::Star => "☆",
            Mark::DoubleCircle => "◎",
            Mark::Circle => "〇",
            Mark::Square => "□",
            Mark::Triangle => "△",
            Mark::Cross => "×",
        }
    }

    /// Weight in the built-in table: ☆ = 6 down to × = 1.
    pub fn default_weight(&self) -> u32 {
        match self {
            Mark::Star => 6,
            Mark::DoubleCircle => 5,
            Mark::Circle => 4,
            Mark::Square => 3,
            Mark::Triangle => 2,
            Mark::Cross => 1,
        }
    }

    /// Parse a mark from its symbol or an ASCII alias.
    pub fn parse(s: &str) -> Result<Self, ScoringError> {
        match s.trim() {
            "☆" | "★" | "star" => Ok(Mark::Star),
            "◎" | "double" => Ok(Mark::DoubleCircle),
            "〇" | "○" | "o" | "circle" => Ok(Mark::Circle),
            "□" | "square" => Ok(Mark::Square),
            "△" | "triangle" => Ok(Mark::Triangle),
            "×" | "x" | "cross" => Ok(Mark::Cross),
            other => Err(ScoringError::invalid(
                "mark",
                format!("unknown symbol '{}' (expected one of ☆ ◎ 〇 □ △ ×)", other),
            )),
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<String> for Mark {
    type Error = ScoringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Mark::parse(&value)
    }
}

impl From<Mark> for String {
    fn from(mark: Mark) -> Self {
        mark.symbol().to_string()
    }
}

/// Weight lookup used by simple scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkTable {
    weights: BTreeMap<Mark, u32>,
}

impl Default for MarkTable {
    fn default() -> Self {
        Self {
            weights: Mark::ALL.iter().map(|m| (*m, m.default_weight())).collect(),
        }
    }
}

impl MarkTable {
    pub fn new(weights: BTreeMap<Mark, u32>) -> Self {
        Self { weights }
    }

    /// Build a table from symbol keys, as written in the config file.
    pub fn from_symbols(symbols: &BTreeMap<String, u32>) -> Result<Self, ScoringError> {
        let mut weights = BTreeMap::new();
        for (symbol, weight) in symbols {
            weights.insert(Mark::parse(symbol)?, *weight);
        }
        Ok(Self { weights })
    }

    pub fn weight(&self, mark: Mark) -> Result<u32, ScoringError> {
        self.weights.get(&mark).copied().ok_or_else(|| {
            ScoringError::invalid("mark", format!("no weight configured for '{}'", mark))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_symbols() {
        for mark in Mark::ALL {
            assert_eq!(Mark::parse(mark.symbol()).unwrap(), mark);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Mark::parse("star").unwrap(), Mark::Star);
        assert_eq!(Mark::parse("○").unwrap(), Mark::Circle);
        assert_eq!(Mark::parse(" x ").unwrap(), Mark::Cross);
    }

    #[test]
    fn test_parse_unknown_symbol() {
        let err = Mark::parse("▲").unwrap_err();
        assert!(err.to_string().contains("unknown symbol '▲'"));
    }

    #[test]
    fn test_default_table_is_six_down_to_one() {
        let table = MarkTable::default();
        let weights: Vec<u32> = Mark::ALL.iter().map(|m| table.weight(*m).unwrap()).collect();
        assert_eq!(weights, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_table_from_symbols() {
        let mut symbols = BTreeMap::new();
        symbols.insert("☆".to_string(), 10);
        symbols.insert("×".to_string(), 0);
        let table = MarkTable::from_symbols(&symbols).unwrap();
        assert_eq!(table.weight(Mark::Star).unwrap(), 10);
        assert_eq!(table.weight(Mark::Cross).unwrap(), 0);
        assert!(table.weight(Mark::Square).is_err());
    }

    #[test]
    fn test_mark_serde_uses_symbols() {
        let mark: Mark = serde_saphyr::from_str("\"◎\"").unwrap();
        assert_eq!(mark, Mark::DoubleCircle);
        assert_eq!(serde_json::to_string(&Mark::Star).unwrap(), "\"☆\"");
    }
}

use serde::{Deserialize, Serialize};

/// Coarse complexity class derived from a line span.
///
/// Used identically by the reconciler (for function nodes) and the node
/// detail view. Pure and deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Classify by span length in lines
    #[must_use]
    pub fn from_span(span: u32) -> Self {
        if span < 10 {
            Complexity::Low
        } else if span < 50 {
            Complexity::Medium
        } else {
            Complexity::High
        }
    }

    /// Classify from 1-indexed inclusive start/end line numbers
    #[must_use]
    pub fn from_lines(start_line: u32, end_line: u32) -> Self {
        Self::from_span(end_line.saturating_sub(start_line))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

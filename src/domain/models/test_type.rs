use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::AssessmentError;

/// One of the five assessment modules a candidate works through in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Spoken-response evaluation
    Speech,
    /// Listening comprehension
    Listening,
    /// Written quiz
    Written,
    /// Personality inventory
    Personality,
    /// Typing test
    Typing,
}

impl TestType {
    /// All test types in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Speech,
        Self::Listening,
        Self::Written,
        Self::Personality,
        Self::Typing,
    ];

    /// Wire name used in requests and stored state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speech => "speech",
            Self::Listening => "listening",
            Self::Written => "written",
            Self::Personality => "personality",
            Self::Typing => "typing",
        }
    }

    /// Key of this module's array in the evaluation document.
    pub const fn segment_key(self) -> &'static str {
        match self {
            Self::Speech => "speech_eval",
            Self::Listening => "listening_test",
            Self::Written => "written_test",
            Self::Personality => "personality_test",
            Self::Typing => "typing_test",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Speech => 0,
            Self::Listening => 1,
            Self::Written => 2,
            Self::Personality => 3,
            Self::Typing => 4,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speech" => Ok(Self::Speech),
            "listening" => Ok(Self::Listening),
            "written" => Ok(Self::Written),
            "personality" => Ok(Self::Personality),
            "typing" => Ok(Self::Typing),
            other => Err(AssessmentError::Validation(format!(
                "unknown test type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_wire_name() {
        for test_type in TestType::ALL {
            let parsed: TestType = test_type.as_str().parse().unwrap();
            assert_eq!(parsed, test_type);
        }
    }

    #[test]
    fn test_rejects_unknown_name() {
        assert!("technical".parse::<TestType>().is_err());
        assert!("".parse::<TestType>().is_err());
    }

    #[test]
    fn test_segment_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            TestType::ALL.iter().map(|t| t.segment_key()).collect();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_value(TestType::Personality).unwrap(),
            serde_json::json!("personality")
        );
    }
}

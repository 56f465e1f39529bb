/// Domain models for in-progress evaluation data.
///
/// Evaluation results accumulate per test module while the candidate works.
/// Two historical document shapes exist in storage: a legacy flat list of
/// spoken-response evaluations, and the current layout keyed by test module.
/// Both are accepted on read and folded into [`EvaluationSegments`] exactly
/// once, at the store boundary.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::test_type::TestType;

/// Current evaluation document shape: one array of opaque result entries per
/// test module. Entry payloads come from external scoring services and are
/// recorded as given, valid or degraded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSegments {
    /// Spoken-response evaluations
    #[serde(default)]
    pub speech_eval: Vec<Value>,

    /// Listening comprehension results
    #[serde(default)]
    pub listening_test: Vec<Value>,

    /// Written quiz results
    #[serde(default)]
    pub written_test: Vec<Value>,

    /// Personality inventory results
    #[serde(default)]
    pub personality_test: Vec<Value>,

    /// Typing test results
    #[serde(default)]
    pub typing_test: Vec<Value>,
}

impl EvaluationSegments {
    /// Read-only entries for one module.
    pub fn segment(&self, test_type: TestType) -> &Vec<Value> {
        match test_type {
            TestType::Speech => &self.speech_eval,
            TestType::Listening => &self.listening_test,
            TestType::Written => &self.written_test,
            TestType::Personality => &self.personality_test,
            TestType::Typing => &self.typing_test,
        }
    }

    /// Mutable entries for one module.
    pub fn segment_mut(&mut self, test_type: TestType) -> &mut Vec<Value> {
        match test_type {
            TestType::Speech => &mut self.speech_eval,
            TestType::Listening => &mut self.listening_test,
            TestType::Written => &mut self.written_test,
            TestType::Personality => &mut self.personality_test,
            TestType::Typing => &mut self.typing_test,
        }
    }

    /// Canonical question total: the sum of all five segment lengths.
    pub fn total_questions(&self) -> usize {
        TestType::ALL
            .iter()
            .map(|test_type| self.segment(*test_type).len())
            .sum()
    }
}

/// Evaluation document as read from the store, covering both historical
/// schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum TransientEvaluation {
    /// Legacy `{"evaluations": [...]}` document
    LegacyKeyed(Vec<Value>),

    /// Legacy bare-array document
    LegacyFlat(Vec<Value>),

    /// Current five-segment document
    Segmented(EvaluationSegments),
}

impl TransientEvaluation {
    /// Decodes a stored evaluation document, accepting both historical
    /// shapes. Returns `None` for documents in neither recognized schema;
    /// callers treat that as corrupt input rather than dropping data.
    pub fn decode(value: &Value) -> Option<Self> {
        if let Some(entries) = value.as_array() {
            return Some(Self::LegacyFlat(entries.clone()));
        }

        let object = value.as_object()?;
        if let Some(evaluations) = object.get("evaluations") {
            return Some(Self::LegacyKeyed(evaluations.as_array()?.clone()));
        }

        serde_json::from_value(value.clone()).ok().map(Self::Segmented)
    }

    /// Folds either legacy shape into the segmented layout. Legacy entries
    /// were all spoken-response evaluations, so they land in `speech_eval`.
    pub fn normalize(self) -> EvaluationSegments {
        match self {
            Self::Segmented(segments) => segments,
            Self::LegacyKeyed(evaluations) | Self::LegacyFlat(evaluations) => {
                EvaluationSegments {
                    speech_eval: evaluations,
                    ..EvaluationSegments::default()
                }
            }
        }
    }
}

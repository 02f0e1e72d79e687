//! Core data model types for the SQI engine.
//!
//! An [`Attempt`] is one recorded answer to a diagnostic question and a
//! [`StudentData`] is a learner's full attempt history. Both are plain input
//! records: the engine reads them and never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A learner's record as handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentData {
    /// Opaque student identifier.
    pub student_id: String,
    /// Attempts in the order they were recorded.
    pub attempts: Vec<Attempt>,
}

/// One scored interaction with a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Topic the question belongs to.
    pub topic: String,
    /// Concept within the topic.
    pub concept: String,
    /// Syllabus importance tier.
    pub importance: Importance,
    /// Question difficulty tier.
    pub difficulty: Difficulty,
    /// Whether the question is practical or theory.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Case-based question flag. Carried through, not scored.
    #[serde(default)]
    pub case_based: bool,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Full credit available.
    pub marks: f64,
    /// Penalty magnitude applied when incorrect.
    pub neg_marks: f64,
    /// Time the question is expected to take.
    pub expected_time_sec: f64,
    /// Time actually spent.
    pub time_spent_sec: f64,
    /// Whether the learner flagged the question for review.
    #[serde(default)]
    pub marked_review: bool,
    /// Number of return visits to the question.
    #[serde(default)]
    pub revisits: f64,
}

impl Attempt {
    /// `time_spent_sec / expected_time_sec`, or `0.0` when the ratio is not a
    /// finite non-negative number (zero or negative expected time).
    pub fn time_ratio(&self) -> f64 {
        if self.expected_time_sec <= 0.0 {
            return 0.0;
        }
        let ratio = self.time_spent_sec / self.expected_time_sec;
        if ratio.is_finite() && ratio >= 0.0 {
            ratio
        } else {
            0.0
        }
    }
}

/// Generates a categorical enum that accepts any string.
///
/// Known labels map to their variant; anything else is kept verbatim in
/// `Other` so it serializes back unchanged.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A label outside the known set.
            Other(String),
        }

        impl $name {
            /// Returns `true` if this is one of the known labels.
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $($label => $name::$variant,)+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical! {
    /// Syllabus importance tier (`A` highest).
    Importance { A => "A", B => "B", C => "C" }
}

categorical! {
    /// Difficulty tier: easy, medium, hard.
    Difficulty { E => "E", M => "M", H => "H" }
}

categorical! {
    /// Question style.
    QuestionType { Practical => "Practical", Theory => "Theory" }
}

//! Built-in surveys.

use crate::advanced::graph::{Question, SurveyGraph};
use crate::core::constants::ROOT_QUESTION_ID;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyVariant {
    #[default]
    Branching,
    Linear,
}

impl SurveyVariant {
    pub fn graph(self) -> Result<SurveyGraph> {
        match self {
            SurveyVariant::Branching => branching(),
            SurveyVariant::Linear => linear(),
        }
    }
}

fn recommend_defi() -> Question {
    Question::new("q4", "How likely are you to recommend DeFi to friends?")
        .with_option("Very likely", None)
        .with_option("Somewhat likely", None)
        .with_option("Unlikely", None)
        .with_option("Never", None)
}

/// Daily users are asked about chains, everybody else about what holds them back.
pub fn branching() -> Result<SurveyGraph> {
    SurveyGraph::builder(ROOT_QUESTION_ID)
        .add_question(
            Question::new(ROOT_QUESTION_ID, "Do you use crypto daily?")
                .with_option("Yes", Some("q2"))
                .with_option("No", Some("q3")),
        )
        .add_question(
            Question::new("q2", "Which blockchain do you prefer?")
                .with_option("Ethereum", Some("q4"))
                .with_option("Solana", Some("q4"))
                .with_option("Bitcoin", Some("q4"))
                .with_option("Other", Some("q4")),
        )
        .add_question(
            Question::new("q3", "What's stopping you?")
                .with_option("Lack of knowledge", Some("q4"))
                .with_option("Too risky", Some("q4"))
                .with_option("Other", Some("q4")),
        )
        .add_question(recommend_defi())
        .build()
}

/// Two fixed questions, same for everyone.
pub fn linear() -> Result<SurveyGraph> {
    SurveyGraph::linear(vec![
        Question::new(ROOT_QUESTION_ID, "Do you use crypto daily?")
            .with_option("Yes", None)
            .with_option("No", None),
        recommend_defi(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_surveys_validate() {
        let graph = branching().unwrap();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.root(), "q1");
        assert_eq!(graph.max_path_len(), 3);

        let graph = linear().unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.next("q1", "No").unwrap(), Some("q4"));
        assert_eq!(graph.max_path_len(), 2);
    }
}

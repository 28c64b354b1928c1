use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single-choice question. `next` maps an option to the following
/// question id, `None` meaning the survey ends there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub next: HashMap<String, Option<String>>,
}

impl Question {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options: Vec::new(),
            next: HashMap::new(),
        }
    }

    /// Adds an option routed to `next` (`None` ends the survey).
    pub fn with_option(mut self, option: impl Into<String>, next: Option<&str>) -> Self {
        let option = option.into();
        self.next.insert(option.clone(), next.map(str::to_string));
        self.options.push(option);
        self
    }

    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Where `option` leads. An option without a mapping is terminal.
    pub fn next_for(&self, option: &str) -> Option<&str> {
        self.next
            .get(option)
            .and_then(|next| next.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Validated, immutable question graph.
#[derive(Debug, Clone)]
pub struct SurveyGraph {
    root: String,
    questions: HashMap<String, Question>,
    /// Longest path, in questions, starting at each id
    depth: HashMap<String, usize>,
}

impl SurveyGraph {
    pub fn builder(root: impl Into<String>) -> SurveyGraphBuilder {
        SurveyGraphBuilder::new(root)
    }

    /// A fixed sequence: every option of question `i` leads to question `i + 1`.
    pub fn linear(questions: Vec<Question>) -> Result<Self> {
        let root = questions
            .first()
            .map(|q| q.id.clone())
            .ok_or_else(|| FlowError::InvalidGraph("survey has no questions".to_string()))?;

        let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        let mut builder = SurveyGraphBuilder::new(root);
        for (i, mut question) in questions.into_iter().enumerate() {
            let next = ids.get(i + 1).cloned();
            question.next = question
                .options
                .iter()
                .map(|o| (o.clone(), next.clone()))
                .collect();
            builder = builder.add_question(question);
        }
        builder.build()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question reached by answering `question_id` with `option`.
    pub fn next(&self, question_id: &str, option: &str) -> Result<Option<&str>> {
        let question = self
            .question(question_id)
            .ok_or_else(|| FlowError::UnknownQuestion(question_id.to_string()))?;
        if !question.offers(option) {
            return Err(FlowError::UnknownOption {
                question: question_id.to_string(),
                option: option.to_string(),
            });
        }
        Ok(question.next_for(option))
    }

    /// Number of questions on the longest path starting at `question_id`
    /// (including it). Zero for unknown ids.
    pub fn depth_from(&self, question_id: &str) -> usize {
        self.depth.get(question_id).copied().unwrap_or(0)
    }

    /// Upper bound on how many questions a respondent answers.
    pub fn max_path_len(&self) -> usize {
        self.depth_from(&self.root)
    }
}

/// Fluent builder for [`SurveyGraph`]. Validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct SurveyGraphBuilder {
    root: String,
    questions: Vec<Question>,
}

impl SurveyGraphBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            questions: Vec::new(),
        }
    }

    pub fn add_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn add_questions(mut self, questions: impl IntoIterator<Item = Question>) -> Self {
        self.questions.extend(questions);
        self
    }

    pub fn build(self) -> Result<SurveyGraph> {
        let mut questions = HashMap::with_capacity(self.questions.len());
        for question in self.questions {
            if questions.contains_key(&question.id) {
                return Err(invalid(format!("duplicate question id {}", question.id)));
            }
            questions.insert(question.id.clone(), question);
        }

        if !questions.contains_key(&self.root) {
            return Err(FlowError::UnknownQuestion(self.root));
        }

        for question in questions.values() {
            validate_question(question, &questions)?;
        }

        let depth = path_depths(&questions)?;

        Ok(SurveyGraph {
            root: self.root,
            questions,
            depth,
        })
    }
}

fn invalid(msg: String) -> FlowError {
    FlowError::InvalidGraph(msg)
}

fn validate_question(question: &Question, all: &HashMap<String, Question>) -> Result<()> {
    if question.options.is_empty() {
        return Err(invalid(format!("question {} has no options", question.id)));
    }
    for (i, option) in question.options.iter().enumerate() {
        if question.options[..i].contains(option) {
            return Err(invalid(format!(
                "question {} lists option {:?} twice",
                question.id, option
            )));
        }
    }
    for (option, next) in &question.next {
        if !question.offers(option) {
            return Err(invalid(format!(
                "question {} routes unknown option {:?}",
                question.id, option
            )));
        }
        if let Some(target) = next.as_deref().filter(|t| !t.is_empty()) {
            if !all.contains_key(target) {
                return Err(invalid(format!(
                    "question {} routes {:?} to missing question {}",
                    question.id, option, target
                )));
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Longest path length from every question. Fails on cycles, since a cycle
/// would let one question be answered twice.
fn path_depths(questions: &HashMap<String, Question>) -> Result<HashMap<String, usize>> {
    fn visit(
        id: &str,
        questions: &HashMap<String, Question>,
        marks: &mut HashMap<String, Mark>,
        depth: &mut HashMap<String, usize>,
    ) -> Result<usize> {
        match marks.get(id) {
            Some(Mark::Done) => return Ok(depth[id]),
            Some(Mark::Visiting) => {
                return Err(invalid(format!("cycle through question {}", id)));
            },
            None => {},
        }
        marks.insert(id.to_string(), Mark::Visiting);

        let question = &questions[id];
        let mut longest_tail = 0;
        for option in &question.options {
            if let Some(next) = question.next_for(option) {
                longest_tail = longest_tail.max(visit(next, questions, marks, depth)?);
            }
        }

        marks.insert(id.to_string(), Mark::Done);
        depth.insert(id.to_string(), longest_tail + 1);
        Ok(longest_tail + 1)
    }

    let mut marks = HashMap::new();
    let mut depth = HashMap::new();
    for id in questions.keys() {
        visit(id, questions, &mut marks, &mut depth)?;
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn yes_no() -> SurveyGraph {
        SurveyGraph::builder("q1")
            .add_question(
                Question::new("q1", "Ready?")
                    .with_option("Yes", Some("q2"))
                    .with_option("No", None),
            )
            .add_question(Question::new("q2", "Sure?").with_option("Yes", None))
            .build()
            .unwrap()
    }

    #[test]
    fn test_next_follows_routes() {
        let graph = yes_no();
        assert_eq!(graph.next("q1", "Yes").unwrap(), Some("q2"));
        assert_eq!(graph.next("q1", "No").unwrap(), None);
        assert_eq!(graph.next("q2", "Yes").unwrap(), None);
    }

    #[test]
    fn test_missing_route_is_terminal() {
        let mut question = Question::new("q1", "Pick").with_option("A", None);
        question.options.push("B".to_string());
        let graph = SurveyGraph::builder("q1").add_question(question).build().unwrap();
        assert_eq!(graph.next("q1", "B").unwrap(), None);
    }

    #[test]
    fn test_next_rejects_unknowns() {
        let graph = yes_no();
        assert_matches!(graph.next("q9", "Yes"), Err(FlowError::UnknownQuestion(_)));
        assert_matches!(graph.next("q1", "Maybe"), Err(FlowError::UnknownOption { .. }));
    }

    #[test]
    fn test_depths() {
        let graph = yes_no();
        assert_eq!(graph.depth_from("q1"), 2);
        assert_eq!(graph.depth_from("q2"), 1);
        assert_eq!(graph.max_path_len(), 2);
    }

    #[test]
    fn test_rejects_cycle() {
        let result = SurveyGraph::builder("a")
            .add_question(Question::new("a", "A").with_option("x", Some("b")))
            .add_question(Question::new("b", "B").with_option("y", Some("a")))
            .build();
        assert_matches!(result, Err(FlowError::InvalidGraph(msg)) if msg.contains("cycle"));
    }

    #[test]
    fn test_rejects_dangling_route_and_missing_root() {
        let dangling = SurveyGraph::builder("a")
            .add_question(Question::new("a", "A").with_option("x", Some("zz")))
            .build();
        assert_matches!(dangling, Err(FlowError::InvalidGraph(_)));

        let no_root = SurveyGraph::builder("missing")
            .add_question(Question::new("a", "A").with_option("x", None))
            .build();
        assert_matches!(no_root, Err(FlowError::UnknownQuestion(id)) if id == "missing");
    }

    #[test]
    fn test_rejects_duplicate_option() {
        let result = SurveyGraph::builder("a")
            .add_question(
                Question::new("a", "A")
                    .with_option("x", None)
                    .with_option("x", None),
            )
            .build();
        assert_matches!(result, Err(FlowError::InvalidGraph(_)));
    }

    #[test]
    fn test_linear_routes_every_option_forward() {
        let graph = SurveyGraph::linear(vec![
            Question::new("first", "One").with_option("a", None).with_option("b", None),
            Question::new("second", "Two").with_option("c", None),
        ])
        .unwrap();
        assert_eq!(graph.root(), "first");
        assert_eq!(graph.next("first", "a").unwrap(), Some("second"));
        assert_eq!(graph.next("first", "b").unwrap(), Some("second"));
        assert_eq!(graph.next("second", "c").unwrap(), None);
        assert_eq!(graph.max_path_len(), 2);
    }

    #[test]
    fn test_linear_requires_questions() {
        assert_matches!(SurveyGraph::linear(vec![]), Err(FlowError::InvalidGraph(_)));
    }
}

use crate::advanced::graph::SurveyGraph;
use crate::error::{FlowError, Result};
use crate::types::Answers;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a respondent is in the survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyState {
    pub current_question_id: String,
    pub answers: Answers,
    /// Picked but not yet committed
    pub pending_selection: Option<String>,
}

impl SurveyState {
    fn at(question_id: &str) -> Self {
        Self {
            current_question_id: question_id.to_string(),
            answers: Answers::new(),
            pending_selection: None,
        }
    }
}

/// Snapshot of the current question for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub pending_selection: Option<String>,
    /// Estimate in `[0, 1]`, never decreases along a path
    pub progress: f64,
    /// Advancing with the pending selection would finish the survey
    pub is_final_choice: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Question(QuestionView),
    Completed(Answers),
}

/// Walks one respondent through a [`SurveyGraph`].
#[derive(Debug, Clone)]
pub struct SurveyEngine {
    graph: Arc<SurveyGraph>,
    state: Option<SurveyState>,
    completed: bool,
}

impl SurveyEngine {
    pub fn new(graph: Arc<SurveyGraph>) -> Self {
        Self {
            graph,
            state: None,
            completed: false,
        }
    }

    pub fn graph(&self) -> &SurveyGraph {
        &self.graph
    }

    pub fn state(&self) -> Option<&SurveyState> {
        self.state.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Begins (or restarts) the survey at `root_question_id`.
    pub fn start(&mut self, root_question_id: &str) -> Result<QuestionView> {
        if self.graph.question(root_question_id).is_none() {
            return Err(FlowError::UnknownQuestion(root_question_id.to_string()));
        }
        self.state = Some(SurveyState::at(root_question_id));
        self.completed = false;
        debug!(root = root_question_id, "survey started");
        self.view()
    }

    pub fn reset(&mut self) {
        self.state = None;
        self.completed = false;
    }

    pub fn view(&self) -> Result<QuestionView> {
        let state = self.active_state()?;
        let question = self
            .graph
            .question(&state.current_question_id)
            .ok_or_else(|| FlowError::UnknownQuestion(state.current_question_id.clone()))?;

        let answered = state.answers.len();
        let remaining = self.graph.depth_from(&question.id);
        let progress = if self.completed {
            1.0
        } else {
            answered as f64 / (answered + remaining).max(1) as f64
        };

        let is_final_choice = state
            .pending_selection
            .as_deref()
            .map(|option| question.next_for(option).is_none())
            .unwrap_or(false);

        Ok(QuestionView {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            pending_selection: state.pending_selection.clone(),
            progress,
            is_final_choice,
        })
    }

    /// Marks `option` as the pending answer for the current question.
    pub fn select_option(&mut self, option: &str) -> Result<()> {
        self.ensure_accepting()?;
        let graph = Arc::clone(&self.graph);
        let state = self.active_state_mut()?;
        let question = graph
            .question(&state.current_question_id)
            .ok_or_else(|| FlowError::UnknownQuestion(state.current_question_id.clone()))?;
        if !question.offers(option) {
            return Err(FlowError::UnknownOption {
                question: question.id.clone(),
                option: option.to_string(),
            });
        }
        state.pending_selection = Some(option.to_string());
        debug!(question = %question.id, option, "option selected");
        Ok(())
    }

    /// Commits the pending selection and moves on.
    ///
    /// Without a pending selection nothing changes and `InvalidState` is returned.
    pub fn advance(&mut self) -> Result<Advance> {
        self.ensure_accepting()?;
        let graph = Arc::clone(&self.graph);
        let state = self.active_state_mut()?;

        let option = state
            .pending_selection
            .clone()
            .ok_or_else(|| FlowError::InvalidState("no option selected".to_string()))?;
        let current = state.current_question_id.clone();
        let next = graph.next(&current, &option)?;

        state.answers.insert(current.as_str(), option.as_str());
        state.pending_selection = None;

        match next {
            Some(next_id) if !state.answers.contains(next_id) => {
                state.current_question_id = next_id.to_string();
                debug!(from = %current, to = next_id, "advanced to next question");
                Ok(Advance::Question(self.view()?))
            },
            _ => {
                let answers = state.answers.clone();
                self.completed = true;
                info!(answers = ?answers, "survey completed");
                Ok(Advance::Completed(answers))
            },
        }
    }

    fn ensure_accepting(&self) -> Result<()> {
        if self.completed {
            return Err(FlowError::InvalidState("survey already completed".to_string()));
        }
        Ok(())
    }

    fn active_state(&self) -> Result<&SurveyState> {
        self.state
            .as_ref()
            .ok_or_else(|| FlowError::InvalidState("survey not started".to_string()))
    }

    fn active_state_mut(&mut self) -> Result<&mut SurveyState> {
        self.state
            .as_mut()
            .ok_or_else(|| FlowError::InvalidState("survey not started".to_string()))
    }
}

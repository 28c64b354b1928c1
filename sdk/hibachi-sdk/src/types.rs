use serde::{Deserialize, Serialize};

/// A wallet that answered a connection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    /// Address reported by the provider, as returned (not normalized)
    pub address: String,

    /// Chain the provider is connected to
    pub chain_id: u64,

    /// Result of the allow-list check, fixed when the session is created
    pub approved: bool,
}

/// Answers in the order the questions were visited.
///
/// Each question id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers(Vec<(String, String)>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option` for `question_id`, replacing an earlier answer in place.
    pub fn insert(&mut self, question_id: impl Into<String>, option: impl Into<String>) {
        let question_id = question_id.into();
        let option = option.into();
        match self.0.iter_mut().find(|(id, _)| *id == question_id) {
            Some(entry) => entry.1 = option,
            None => self.0.push((question_id, option)),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(id, _)| id == question_id)
            .map(|(_, option)| option.as_str())
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.get(question_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, option)| (id.as_str(), option.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for (k, v) in iter {
            answers.insert(k, v);
        }
        answers
    }
}

/// The reward handed out on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub code: String,
}

impl RewardRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

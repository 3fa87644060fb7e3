use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::id::Id;

/// Core choice data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCore {
    /// The question this choice answers. Choices are deleted with their question.
    pub question_id: Id,
    pub choice_text: String,
    pub votes: u32,
}

impl ChoiceCore {
    /// A fresh choice with no votes.
    pub fn new(question_id: Id, choice_text: impl Into<String>) -> Self {
        Self {
            question_id,
            choice_text: choice_text.into(),
            votes: 0,
        }
    }
}

/// A choice without an ID.
pub type NewChoice = ChoiceCore;

/// A choice from the store, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub choice: ChoiceCore,
}

impl Choice {
    pub fn new(id: Id, choice: ChoiceCore) -> Self {
        Self { id, choice }
    }
}

impl Deref for Choice {
    type Target = ChoiceCore;

    fn deref(&self) -> &Self::Target {
        &self.choice
    }
}

impl DerefMut for Choice {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.choice
    }
}

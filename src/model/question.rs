use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::id::Id;

/// Core question data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// The poll prompt.
    pub question_text: String,
    /// When the question becomes visible.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub pub_date: DateTime<Utc>,
}

impl QuestionCore {
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> Self {
        Self {
            question_text: question_text.into(),
            pub_date,
        }
    }

    /// True iff the question was published no more than a day before `now`.
    /// Questions scheduled for the future were not published recently.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        self.published_within(Duration::days(1), now)
    }

    /// True iff `now - window <= pub_date <= now`.
    pub fn published_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now - window <= self.pub_date && self.pub_date <= now
    }
}

/// A question without an ID.
pub type NewQuestion = QuestionCore;

/// A question from the store, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Question {
    pub fn new(id: Id, question: QuestionCore) -> Self {
        Self { id, question }
    }
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

impl DerefMut for Question {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.question
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl QuestionCore {
        /// A question published `days` from now; negative for the past.
        pub fn example(question_text: &str, days: i64) -> Self {
            Self::new(question_text, Utc::now() + Duration::days(days))
        }
    }
}

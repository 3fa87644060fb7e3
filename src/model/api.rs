//! API-friendly views of the stored types.
//!
//! These are what the JSON endpoints return, and what the HTML pages are
//! rendered from. IDs are plain hex strings and datetimes use chrono's RFC 3339
//! form instead of MongoDB's extended JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{choice::Choice, id::ApiId, question::Question};

/// A question as listed on the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: ApiId,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl From<Question> for QuestionSummary {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.into(),
            question_text: question.question.question_text,
            pub_date: question.question.pub_date,
        }
    }
}

/// Everything the index page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexContext {
    /// Eligible questions, most recently published first.
    pub latest_question_list: Vec<QuestionSummary>,
}

/// A choice as offered on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSummary {
    pub id: ApiId,
    pub choice_text: String,
}

impl From<Choice> for ChoiceSummary {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id.into(),
            choice_text: choice.choice.choice_text,
        }
    }
}

/// A question with the choices a voter can pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceSummary>,
}

/// A choice with its tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResult {
    pub id: ApiId,
    pub choice_text: String,
    pub votes: u32,
}

impl From<Choice> for ChoiceResult {
    fn from(choice: Choice) -> Self {
        Self {
            id: choice.id.into(),
            choice_text: choice.choice.choice_text,
            votes: choice.choice.votes,
        }
    }
}

/// A question with the current tally for each of its choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResults {
    #[serde(flatten)]
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceResult>,
    pub total_votes: u64,
}

impl QuestionResults {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        let choices = choices.into_iter().map(ChoiceResult::from).collect::<Vec<_>>();
        let total_votes = choices.iter().map(|c| u64::from(c.votes)).sum();
        Self {
            question: question.into(),
            choices,
            total_votes,
        }
    }
}

impl QuestionDetail {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            question: question.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json;

    use crate::model::{choice::ChoiceCore, id::Id, question::QuestionCore};

    use super::*;

    #[test]
    fn results_total_the_votes() {
        let question = Question::new(Id::new(), QuestionCore::example("Best pet?", -1));
        let mut cat = Choice::new(Id::new(), ChoiceCore::new(question.id, "Cat"));
        cat.votes = 3;
        let mut dog = Choice::new(Id::new(), ChoiceCore::new(question.id, "Dog"));
        dog.votes = 4;

        let results = QuestionResults::new(question, vec![cat, dog]);
        assert_eq!(results.total_votes, 7);
        assert_eq!(results.choices[1].choice_text, "Dog");
    }

    #[test]
    fn detail_json_is_flat() {
        let question = Question::new(Id::new(), QuestionCore::example("Best pet?", -1));
        let id = question.id;
        let cat = Choice::new(Id::new(), ChoiceCore::new(question.id, "Cat"));

        let json = serde_json::to_value(QuestionDetail::new(question, vec![cat])).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["question_text"], "Best pet?");
        assert_eq!(json["choices"][0]["choice_text"], "Cat");
        assert!(json["choices"][0].get("votes").is_none());
    }
}

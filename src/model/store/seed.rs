//! Questions loaded into the store at launch.
//!
//! The fixture file is a JSON array of questions, each with its choices:
//!
//! ```json
//! [{"question_text": "What's new?", "pub_date": "2024-01-01T09:00:00Z", "choices": ["Not much"]}]
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use rocket::serde::json::serde_json;
use serde::Deserialize;

use crate::error::Result;
use crate::model::{choice::NewChoice, question::NewQuestion};

use super::PollStore;

/// A question to load, along with the text of each of its choices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionFixture {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Read fixtures from a JSON file.
pub async fn load_fixtures(path: &Path) -> Result<Vec<QuestionFixture>> {
    let raw = rocket::tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load fixtures into the store, returning how many questions were written.
///
/// A fixture replaces any stored question with the same text, choices
/// included, so seeding the same file again leaves one copy of each question.
pub async fn seed(store: &dyn PollStore, fixtures: &[QuestionFixture]) -> Result<usize> {
    let existing = store.list_questions().await?;
    for fixture in fixtures {
        for stale in existing
            .iter()
            .filter(|q| q.question_text == fixture.question_text)
        {
            store.delete_question(stale.id).await?;
        }

        let question = store
            .insert_question(NewQuestion::new(
                fixture.question_text.clone(),
                fixture.pub_date,
            ))
            .await?;
        for choice_text in &fixture.choices {
            store
                .insert_choice(NewChoice::new(question.id, choice_text.clone()))
                .await?;
        }
    }
    Ok(fixtures.len())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::error::Error;
    use crate::model::store::MemoryStore;

    use super::*;

    fn fixture(question_text: &str, days: i64, choices: &[&str]) -> QuestionFixture {
        QuestionFixture {
            question_text: question_text.to_string(),
            pub_date: Utc::now() + Duration::days(days),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[rocket::async_test]
    async fn seeding_writes_questions_and_choices() {
        let store = MemoryStore::new();
        let fixtures = vec![
            fixture("Tea or coffee?", -1, &["Tea", "Coffee"]),
            fixture("Anyone there?", -1, &[]),
        ];

        assert_eq!(seed(&store, &fixtures).await.unwrap(), 2);

        let questions = store.list_questions().await.unwrap();
        assert_eq!(questions.len(), 2);
        let tea = questions
            .iter()
            .find(|q| q.question_text == "Tea or coffee?")
            .unwrap();
        let choices = store.get_choices(tea.id).await.unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[1].choice_text, "Coffee");
    }

    #[rocket::async_test]
    async fn reseeding_replaces_instead_of_duplicating() {
        let store = MemoryStore::new();
        seed(&store, &[fixture("Tea or coffee?", -1, &["Tea", "Coffee"])])
            .await
            .unwrap();
        seed(&store, &[fixture("Tea or coffee?", -2, &["Tea", "Coffee", "Water"])])
            .await
            .unwrap();

        let questions = store.list_questions().await.unwrap();
        assert_eq!(questions.len(), 1);
        let choices = store.get_choices(questions[0].id).await.unwrap();
        assert_eq!(choices.len(), 3);
    }

    #[rocket::async_test]
    async fn shipped_fixtures_parse() {
        let fixtures = load_fixtures(Path::new("fixtures/polls.json"))
            .await
            .unwrap();
        assert!(!fixtures.is_empty());
        assert!(fixtures.iter().any(|f| f.choices.len() >= 2));
    }

    #[rocket::async_test]
    async fn missing_fixture_file_is_an_error() {
        let result = load_fixtures(Path::new("fixtures/does-not-exist.json")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn choices_default_to_empty() {
        let fixture: QuestionFixture = serde_json::from_str(
            r#"{"question_text": "Lonely?", "pub_date": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(fixture.choices.is_empty());
    }
}

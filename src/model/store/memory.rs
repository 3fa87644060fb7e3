use std::sync::Arc;

use rocket::tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{
    choice::{Choice, NewChoice},
    id::Id,
    question::{NewQuestion, Question},
};

use super::PollStore;

/// A process-local store. Clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    choices: Vec<Choice>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl PollStore for MemoryStore {
    async fn list_questions(&self) -> Result<Vec<Question>> {
        Ok(self.tables.read().await.questions.clone())
    }

    async fn get_question(&self, id: Id) -> Result<Option<Question>> {
        let tables = self.tables.read().await;
        Ok(tables.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn get_choices(&self, question_id: Id) -> Result<Vec<Choice>> {
        let tables = self.tables.read().await;
        Ok(tables
            .choices
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question> {
        let question = Question::new(Id::new(), question);
        self.tables.write().await.questions.push(question.clone());
        Ok(question)
    }

    async fn insert_choice(&self, choice: NewChoice) -> Result<Choice> {
        let mut tables = self.tables.write().await;
        if !tables.questions.iter().any(|q| q.id == choice.question_id) {
            return Err(Error::not_found(format!(
                "Question with ID '{}'",
                choice.question_id
            )));
        }
        let choice = Choice::new(Id::new(), choice);
        tables.choices.push(choice.clone());
        Ok(choice)
    }

    async fn delete_question(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.questions.len();
        tables.questions.retain(|q| q.id != id);
        tables.choices.retain(|c| c.question_id != id);
        Ok(tables.questions.len() != before)
    }
}

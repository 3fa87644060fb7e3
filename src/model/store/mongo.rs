use std::ops::Deref;

use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::{FindOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use rocket::futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::model::{
    choice::{Choice, NewChoice},
    id::Id,
    question::{NewQuestion, Question},
};

use super::PollStore;

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoCollection for Question {
    const NAME: &'static str = "questions";
}

impl MongoCollection for Choice {
    const NAME: &'static str = "choices";
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> std::result::Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    // Choices are always looked up by their question.
    let choice_index = IndexModel::builder()
        .keys(doc! {"question_id": 1})
        .options(IndexOptions::builder().unique(false).build())
        .build();
    Coll::<Choice>::from_db(db)
        .create_index(choice_index, None)
        .await?;

    Ok(())
}

/// A [`PollStore`] backed by MongoDB.
#[derive(Clone)]
pub struct MongoStore {
    questions: Coll<Question>,
    choices: Coll<Choice>,
}

impl MongoStore {
    /// Use the collections of an already-connected database.
    pub fn from_db(db: &Database) -> Self {
        Self {
            questions: Coll::from_db(db),
            choices: Coll::from_db(db),
        }
    }

    /// Connect to the database at `uri` and make sure it is ready for use.
    pub async fn connect(uri: &str, db_name: &str) -> std::result::Result<Self, DbError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        ensure_indexes_exist(&db).await?;
        Ok(Self::from_db(&db))
    }
}

#[rocket::async_trait]
impl PollStore for MongoStore {
    async fn list_questions(&self) -> Result<Vec<Question>> {
        let questions = self
            .questions
            .find(None, None)
            .await?
            .try_collect::<Vec<_>>()
            .await?;
        Ok(questions)
    }

    async fn get_question(&self, id: Id) -> Result<Option<Question>> {
        Ok(self.questions.find_one(id.as_doc(), None).await?)
    }

    async fn get_choices(&self, question_id: Id) -> Result<Vec<Choice>> {
        // IDs are generated in insertion order.
        let options = FindOptions::builder().sort(doc! {"_id": 1}).build();
        let choices = self
            .choices
            .find(doc! {"question_id": question_id}, options)
            .await?
            .try_collect::<Vec<_>>()
            .await?;
        Ok(choices)
    }

    async fn insert_question(&self, question: NewQuestion) -> Result<Question> {
        let question = Question::new(Id::new(), question);
        self.questions.insert_one(&question, None).await?;
        Ok(question)
    }

    async fn insert_choice(&self, choice: NewChoice) -> Result<Choice> {
        if self.get_question(choice.question_id).await?.is_none() {
            return Err(Error::not_found(format!(
                "Question with ID '{}'",
                choice.question_id
            )));
        }
        let choice = Choice::new(Id::new(), choice);
        self.choices.insert_one(&choice, None).await?;
        Ok(choice)
    }

    async fn delete_question(&self, id: Id) -> Result<bool> {
        // Choices first, so a failure never leaves choices without a question.
        self.choices
            .delete_many(doc! {"question_id": id}, None)
            .await?;
        let deleted = self.questions.delete_one(id.as_doc(), None).await?;
        Ok(deleted.deleted_count == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mongodb::bson::{self, Bson};

    use crate::model::{choice::ChoiceCore, question::QuestionCore};

    use super::*;

    #[test]
    fn question_document_shape() {
        let question = Question::new(Id::new(), QuestionCore::example("What's up?", -1));
        let document = bson::to_document(&question).unwrap();

        assert_eq!(document.get_object_id("_id").unwrap(), *question.id);
        assert_eq!(document.get_str("question_text").unwrap(), "What's up?");
        assert!(matches!(document.get("pub_date"), Some(Bson::DateTime(_))));
    }

    #[test]
    fn choice_document_shape() {
        let question_id = Id::new();
        let choice = Choice::new(Id::new(), ChoiceCore::new(question_id, "Not much"));
        let document = bson::to_document(&choice).unwrap();

        assert_eq!(document.get_object_id("question_id").unwrap(), *question_id);
        assert_eq!(document.get_str("choice_text").unwrap(), "Not much");
        assert!(document.contains_key("votes"));
    }

    #[test]
    fn question_document_round_trip() {
        // BSON datetimes only keep milliseconds.
        let pub_date = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let question = Question::new(Id::new(), QuestionCore::new("What's up?", pub_date));

        let document = bson::to_document(&question).unwrap();
        let back: Question = bson::from_document(document).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn choice_document_round_trip() {
        let mut choice = Choice::new(Id::new(), ChoiceCore::new(Id::new(), "Not much"));
        choice.votes = 7;

        let document = bson::to_document(&choice).unwrap();
        let back: Choice = bson::from_document(document).unwrap();
        assert_eq!(back, choice);
    }
}

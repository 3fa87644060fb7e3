//! The storage collaborator behind every view.
//!
//! Handlers never talk to a database directly; they go through the
//! [`PollStore`] held in Rocket's managed state, which is either a
//! [`MongoStore`] or, when no database is configured, a [`MemoryStore`].

use std::ops::Deref;
use std::sync::Arc;

use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
    State,
};

use crate::error::Result;
use crate::model::{
    choice::{Choice, NewChoice},
    id::Id,
    question::{NewQuestion, Question},
};

mod memory;
mod mongo;
mod seed;

pub use memory::MemoryStore;
pub use mongo::{ensure_indexes_exist, Coll, MongoCollection, MongoStore};
pub use seed::{load_fixtures, seed, QuestionFixture};

/// Read and write access to questions and their choices.
#[rocket::async_trait]
pub trait PollStore: Send + Sync {
    /// All known questions, in no particular order.
    async fn list_questions(&self) -> Result<Vec<Question>>;

    /// The question with the given ID, if any.
    async fn get_question(&self, id: Id) -> Result<Option<Question>>;

    /// The choices belonging to the given question, in insertion order.
    /// Unknown questions simply have no choices.
    async fn get_choices(&self, question_id: Id) -> Result<Vec<Choice>>;

    /// Store a new question, assigning it an ID.
    async fn insert_question(&self, question: NewQuestion) -> Result<Question>;

    /// Store a new choice, assigning it an ID.
    /// Fails with [`crate::error::Error::NotFound`] if its question does not exist.
    async fn insert_choice(&self, choice: NewChoice) -> Result<Choice>;

    /// Delete a question along with all of its choices.
    /// Returns whether the question existed.
    async fn delete_question(&self, id: Id) -> Result<bool>;
}

/// The form in which a store lives in managed state.
pub type SharedStore = Arc<dyn PollStore>;

/// Request guard giving a handler access to the managed [`PollStore`].
#[derive(Clone)]
pub struct Store(SharedStore);

impl Store {
    pub fn new(store: SharedStore) -> Self {
        Self(store)
    }
}

impl Deref for Store {
    type Target = dyn PollStore;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Store {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.guard::<&State<SharedStore>>().await {
            request::Outcome::Success(store) => {
                request::Outcome::Success(Store(Arc::clone(store.inner())))
            }
            _ => {
                error!("No poll store in managed state");
                request::Outcome::Failure((Status::InternalServerError, ()))
            }
        }
    }
}

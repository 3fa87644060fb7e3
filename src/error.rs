use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder, serde::json::serde_json};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed fixtures: {0}")]
    Fixture(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        Err(match self {
            Self::Db(err) => {
                error!("Store failure: {err}");
                Status::InternalServerError
            }
            Self::Io(err) => {
                error!("Failed to read fixtures: {err}");
                Status::InternalServerError
            }
            Self::Fixture(err) => {
                error!("Malformed fixtures: {err}");
                Status::InternalServerError
            }
            Self::NotFound(what) => {
                debug!("Not found: {what}");
                Status::NotFound
            }
        })
    }
}

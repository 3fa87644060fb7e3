use chrono::{DateTime, Utc};
use rocket::{
    request::{self, FromRequest, Request},
    response::content::RawHtml,
    serde::json::Json,
    Route, State,
};

use crate::api::render;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    api::{IndexContext, QuestionDetail, QuestionResults},
    choice::Choice,
    eligibility::is_eligible,
    id::Id,
    question::Question,
    store::{PollStore, Store},
};

pub fn routes() -> Vec<Route> {
    routes![index_json, index, detail_json, detail, results_json, results]
}

// Every page is HTML unless the client's preferred `Accept` type is JSON.
// The JSON routes go first and forward everything else, including requests
// with no `Accept` header or a wildcard, to the format-less HTML routes.

#[get("/polls", format = "json", rank = 1)]
async fn index_json(
    _json: PrefersJson,
    store: Store,
    config: &State<Config>,
) -> Result<Json<IndexContext>> {
    let context = latest_questions(&*store, Utc::now(), config.index_limit()).await?;
    Ok(Json(context))
}

#[get("/polls", rank = 2)]
async fn index(store: Store, config: &State<Config>) -> Result<RawHtml<String>> {
    let now = Utc::now();
    let context = latest_questions(&*store, now, config.index_limit()).await?;
    Ok(RawHtml(render::index(&context, now, config.recent_window())))
}

#[get("/polls/<question_id>", format = "json", rank = 1)]
async fn detail_json(
    question_id: Id,
    _json: PrefersJson,
    store: Store,
) -> Result<Json<QuestionDetail>> {
    let (question, choices) = eligible_question(&*store, question_id, Utc::now()).await?;
    Ok(Json(QuestionDetail::new(question, choices)))
}

#[get("/polls/<question_id>", rank = 2)]
async fn detail(question_id: Id, store: Store) -> Result<RawHtml<String>> {
    let (question, choices) = eligible_question(&*store, question_id, Utc::now()).await?;
    Ok(RawHtml(render::detail(&QuestionDetail::new(question, choices))))
}

#[get("/polls/<question_id>/results", format = "json", rank = 1)]
async fn results_json(
    question_id: Id,
    _json: PrefersJson,
    store: Store,
) -> Result<Json<QuestionResults>> {
    let (question, choices) = eligible_question(&*store, question_id, Utc::now()).await?;
    Ok(Json(QuestionResults::new(question, choices)))
}

#[get("/polls/<question_id>/results", rank = 2)]
async fn results(question_id: Id, store: Store) -> Result<RawHtml<String>> {
    let (question, choices) = eligible_question(&*store, question_id, Utc::now()).await?;
    Ok(RawHtml(render::results(&QuestionResults::new(
        question, choices,
    ))))
}

/// Request guard that succeeds only when JSON is the client's preferred
/// response type, and forwards otherwise.
///
/// A route's `format` alone also matches requests with no `Accept` header
/// or with `*/*`, which should get HTML.
pub struct PrefersJson;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for PrefersJson {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.accept() {
            Some(accept) if accept.preferred().media_type().is_json() => {
                request::Outcome::Success(PrefersJson)
            }
            _ => request::Outcome::Forward(()),
        }
    }
}

/// The questions eligible at `now`, most recently published first, truncated
/// to `limit` if given.
async fn latest_questions(
    store: &dyn PollStore,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Result<IndexContext> {
    let mut eligible = Vec::new();
    for question in store.list_questions().await? {
        // No need to count choices for questions that are not yet published.
        if question.pub_date > now {
            continue;
        }
        let choice_count = store.get_choices(question.id).await?.len();
        if is_eligible(question.pub_date, now, choice_count) {
            eligible.push(question);
        }
    }

    eligible.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
    if let Some(limit) = limit {
        eligible.truncate(limit);
    }

    Ok(IndexContext {
        latest_question_list: eligible.into_iter().map(Into::into).collect(),
    })
}

/// Look up a question and its choices, failing with [`Error::NotFound`]
/// unless the question exists and is eligible at `now`.
async fn eligible_question(
    store: &dyn PollStore,
    question_id: Id,
    now: DateTime<Utc>,
) -> Result<(Question, Vec<Choice>)> {
    let question = store
        .get_question(question_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question with ID '{}'", question_id)))?;

    if question.pub_date > now {
        return Err(Error::not_found(format!(
            "Unpublished question with ID '{}'",
            question_id
        )));
    }

    let choices = store.get_choices(question_id).await?;
    if !is_eligible(question.pub_date, now, choices.len()) {
        return Err(Error::not_found(format!(
            "Question with ID '{}' has only {} choice(s)",
            question_id,
            choices.len()
        )));
    }

    Ok((question, choices))
}

//! HTML rendering for the public pages.

use std::fmt::Write;

use chrono::{DateTime, Duration, Utc};

use crate::model::api::{IndexContext, QuestionDetail, QuestionResults};

/// Shown on the index when there is nothing to list.
pub const NO_POLLS: &str = "No polls are available.";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{}</title></head>\n\
         <body>\n{body}</body>\n\
         </html>\n",
        escape(title)
    )
}

fn plural(count: u64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// The index page. Questions published within `recent_window` of `now` are
/// marked as new.
pub fn index(context: &IndexContext, now: DateTime<Utc>, recent_window: Duration) -> String {
    let mut body = String::new();
    if context.latest_question_list.is_empty() {
        let _ = writeln!(body, "<p>{NO_POLLS}</p>");
    } else {
        body.push_str("<ul>\n");
        for question in &context.latest_question_list {
            let new = if now - recent_window <= question.pub_date {
                " <em>new</em>"
            } else {
                ""
            };
            let _ = writeln!(
                body,
                "<li><a href=\"/polls/{}/\">{}</a>{new}</li>",
                question.id,
                escape(&question.question_text)
            );
        }
        body.push_str("</ul>\n");
    }
    page("Polls", &body)
}

/// A question and its choices.
pub fn detail(detail: &QuestionDetail) -> String {
    let question = &detail.question;
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&question.question_text));
    body.push_str("<ul>\n");
    for choice in &detail.choices {
        let _ = writeln!(body, "<li>{}</li>", escape(&choice.choice_text));
    }
    body.push_str("</ul>\n");
    let _ = writeln!(
        body,
        "<a href=\"/polls/{}/results/\">View results</a>",
        question.id
    );
    page(&question.question_text, &body)
}

/// A question and the tally for each of its choices.
pub fn results(results: &QuestionResults) -> String {
    let question = &results.question;
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&question.question_text));
    body.push_str("<ul>\n");
    for choice in &results.choices {
        let votes = u64::from(choice.votes);
        let _ = writeln!(
            body,
            "<li>{} -- {votes} vote{}</li>",
            escape(&choice.choice_text),
            plural(votes)
        );
    }
    body.push_str("</ul>\n");
    let _ = writeln!(
        body,
        "<p>{} vote{} in total</p>",
        results.total_votes,
        plural(results.total_votes)
    );
    let _ = writeln!(body, "<a href=\"/polls/{}/\">Back to question</a>", question.id);
    page(&question.question_text, &body)
}

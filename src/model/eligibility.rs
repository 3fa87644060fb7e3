//! The visibility rule shared by every public view.
//!
//! A question is only ever shown once it has been published and has enough
//! choices to make a meaningful poll. Neither condition is stored; both are
//! evaluated against the current time and the question's current choices on
//! every request.

use chrono::{DateTime, Utc};

/// The fewest choices a question needs before it is shown.
pub const MIN_CHOICES: usize = 2;

/// Whether a question published at `pub_date` with `choice_count` choices may
/// be displayed at time `now`.
///
/// The publish boundary is inclusive: a question published exactly at `now`
/// is eligible.
pub fn is_eligible(pub_date: DateTime<Utc>, now: DateTime<Utc>, choice_count: usize) -> bool {
    pub_date <= now && choice_count >= MIN_CHOICES
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn future_questions_are_never_eligible() {
        let now = Utc::now();
        for days in [1, 5, 30] {
            for choices in [0, 1, 2, 3, 5] {
                assert!(!is_eligible(now + Duration::days(days), now, choices));
            }
        }
        assert!(!is_eligible(now + Duration::seconds(1), now, 2));
    }

    #[test]
    fn too_few_choices() {
        let now = Utc::now();
        assert!(!is_eligible(now, now, 0));
        assert!(!is_eligible(now - Duration::days(30), now, 1));
    }

    #[test]
    fn enough_choices() {
        let now = Utc::now();
        assert!(is_eligible(now - Duration::days(5), now, 2));
        assert!(is_eligible(now - Duration::days(30), now, 3));
        assert!(is_eligible(now - Duration::days(30), now, 5));
    }

    #[test]
    fn publish_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(is_eligible(now, now, MIN_CHOICES));
    }
}

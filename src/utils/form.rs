// src/utils/form.rs

use url::form_urlencoded;

use crate::services::grading::Selections;

const USER_NAME_FIELD: &str = "user_name";
const QUESTION_FIELD_PREFIX: &str = "question_";

/// Name used when the form carries no `user_name` field at all.
/// A field that is present but blank is rejected later instead.
pub const MISSING_NAME_DEFAULT: &str = "Anonymous";

/// Decoded body of an attempt form (`application/x-www-form-urlencoded`).
///
/// Each question's selections travel in a repeatable field named
/// `question_<question id>`; checkbox groups send one pair per ticked option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptForm {
    pub user_name: String,
    pub selections: Selections,
}

impl AttemptForm {
    pub fn parse(body: &[u8]) -> Self {
        let mut user_name: Option<String> = None;
        let mut selections = Selections::new();

        for (key, value) in form_urlencoded::parse(body) {
            if key == USER_NAME_FIELD {
                // Last value wins for repeated scalar fields.
                user_name = Some(value.into_owned());
                continue;
            }

            let Some(question_id) = key
                .strip_prefix(QUESTION_FIELD_PREFIX)
                .and_then(parse_question_id)
            else {
                continue;
            };

            selections.push(question_id, value.into_owned());
        }

        Self {
            user_name: user_name.unwrap_or_else(|| MISSING_NAME_DEFAULT.to_string()),
            selections,
        }
    }
}

/// Accepts only the canonical spelling `question_<id>`, so `question_05`
/// or `question_+5` do not address question 5.
fn parse_question_id(suffix: &str) -> Option<i64> {
    let id = suffix.parse::<i64>().ok()?;
    (id.to_string() == suffix).then_some(id)
}

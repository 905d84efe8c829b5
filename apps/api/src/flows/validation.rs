//! Form-level input checks. These run before any prompt is assembled, so a
//! rejected request never reaches the model.

use crate::errors::AppError;

pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
pub const MIN_ANSWER_CHARS: usize = 10;
pub const MIN_PROJECT_DETAILS_CHARS: usize = 20;
pub const MIN_TARGET_ROLE_CHARS: usize = 3;
/// Upper bound for any single free-text field interpolated into a prompt.
pub const MAX_FIELD_CHARS: usize = 20_000;

/// Returns the trimmed value if it has between `min` and `MAX_FIELD_CHARS` characters.
pub fn require_text<'a>(field: &str, value: &'a str, min: usize) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    let chars = trimmed.chars().count();

    if chars < min {
        return Err(AppError::Validation(format!(
            "{field} must be at least {min} characters (got {chars})"
        )));
    }
    if chars > MAX_FIELD_CHARS {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_FIELD_CHARS} characters (got {chars})"
        )));
    }
    Ok(trimmed)
}

pub fn job_description(value: &str) -> Result<&str, AppError> {
    require_text("jobDescription", value, MIN_JOB_DESCRIPTION_CHARS)
}

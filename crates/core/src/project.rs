//! Field validation for project create/update payloads.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum number of tags on a project.
pub const MAX_TAGS: usize = 30;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 50;

/// Earliest accepted production year.
pub const MIN_YEAR: i32 = 1900;

/// `m:ss`, `mm:ss` or `h:mm:ss`.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,2}:[0-5]\d:[0-5]\d|\d{1,3}:[0-5]\d)$").expect("valid regex")
});

/// Trim a title and reject it if nothing is left.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("title: must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "title: must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a production year against `[MIN_YEAR, current_year + 1]`.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), CoreError> {
    let max = current_year + 1;
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(CoreError::Validation(format!(
            "year: must be between {MIN_YEAR} and {max}"
        )));
    }
    Ok(())
}

/// Validate a human-readable duration such as `2:45` or `1:02:10`.
pub fn validate_duration(duration: &str) -> Result<(), CoreError> {
    if DURATION_RE.is_match(duration.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "duration: '{duration}' must look like m:ss or h:mm:ss"
        )))
    }
}

/// Trim, drop empties and case-insensitive duplicates, preserving order.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "tags: '{trimmed}' is longer than {MAX_TAG_LENGTH} characters"
            )));
        }
        if !out.iter().any(|t| t.eq_ignore_ascii_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    if out.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "tags: at most {MAX_TAGS} tags are allowed"
        )));
    }
    Ok(out)
}

/// Empty or whitespace-only optional text is stored as `NULL`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

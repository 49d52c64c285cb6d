use regex::Regex;
use std::sync::OnceLock;

use crate::error::BuildError;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn require_email(email: &str) -> Result<(), BuildError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(BuildError::invalid_email())
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Lowercase, ASCII, hyphen-separated form of `text`
pub fn slugify(text: &str) -> String {
    slug::slugify(text.trim())
}

/// A slug is acceptable as-is only if slugifying it changes nothing
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

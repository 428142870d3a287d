//! Field-level validation rules.
//!
//! Each rule is a pure function from raw input to either the normalized value
//! or every message the input violates. Messages are user-facing and stable:
//! the same violation always yields the same string.
//!
//! Lengths are counted in characters, not bytes.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Raw form input: field name to submitted string.
pub type FormData = BTreeMap<String, String>;

/// Outcome of a single field rule.
pub type FieldResult<T = String> = Result<T, Vec<String>>;

pub const EMAIL_REQUIRED: &str = "이메일을 입력해주세요";
pub const EMAIL_INVALID: &str = "올바른 이메일 형식이 아닙니다";
pub const PASSWORD_TOO_SHORT: &str = "비밀번호는 최소 8자 이상이어야 합니다";
pub const PASSWORD_NEEDS_UPPERCASE: &str = "대문자를 포함해야 합니다";
pub const PASSWORD_NEEDS_LOWERCASE: &str = "소문자를 포함해야 합니다";
pub const PASSWORD_NEEDS_DIGIT: &str = "숫자를 포함해야 합니다";
pub const NAME_TOO_SHORT: &str = "이름은 최소 2자 이상이어야 합니다";
pub const NAME_TOO_LONG: &str = "이름은 최대 50자까지 가능합니다";
pub const TITLE_REQUIRED: &str = "제목을 입력해주세요";
pub const TITLE_TOO_SHORT: &str = "제목은 최소 5자 이상이어야 합니다";
pub const TITLE_TOO_LONG: &str = "제목은 최대 100자까지 가능합니다";
pub const MESSAGE_REQUIRED: &str = "메시지를 입력해주세요";
pub const MESSAGE_TOO_SHORT: &str = "메시지는 최소 10자 이상이어야 합니다";
pub const MESSAGE_TOO_LONG: &str = "메시지는 최대 1000자까지 가능합니다";
pub const URL_INVALID: &str = "올바른 URL 형식이 아닙니다";
pub const PHONE_INVALID: &str = "올바른 전화번호 형식이 아닙니다";

// Local part may not start with a dot or contain "..", checked separately
// because the regex crate has no lookahead.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern compiles")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:01[0-9]-?\d{3,4}-?\d{4}|0\d{1,2}-?\d{3,4}-?\d{4})$")
        .expect("phone pattern compiles")
});

/// Field-scoped violations for a whole form, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    /// Record the violations of `result` under `field` and pass the value on.
    pub fn check<T>(&mut self, field: &str, result: FieldResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(messages) => {
                self.0.entry(field.to_owned()).or_default().extend(messages);
                None
            }
        }
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

/// Value of `field`, or the empty string when it was not submitted.
pub fn field<'a>(data: &'a FormData, name: &str) -> &'a str {
    data.get(name).map(String::as_str).unwrap_or("")
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn finish<T>(value: T, errors: Vec<String>) -> FieldResult<T> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

/// Non-empty, well-formed address; accepted value is lowercased.
pub fn email(input: &str) -> FieldResult {
    let mut errors = Vec::new();
    if input.is_empty() {
        errors.push(EMAIL_REQUIRED.to_string());
    }
    if !is_email(input) {
        errors.push(EMAIL_INVALID.to_string());
    }
    finish(input.to_lowercase(), errors)
}

fn is_email(input: &str) -> bool {
    !input.starts_with('.') && !input.contains("..") && EMAIL_RE.is_match(input)
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
pub fn password(input: &str) -> FieldResult {
    let mut errors = Vec::new();
    if char_len(input) < 8 {
        errors.push(PASSWORD_TOO_SHORT.to_string());
    }
    if !input.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(PASSWORD_NEEDS_UPPERCASE.to_string());
    }
    if !input.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(PASSWORD_NEEDS_LOWERCASE.to_string());
    }
    if !input.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PASSWORD_NEEDS_DIGIT.to_string());
    }
    finish(input.to_owned(), errors)
}

fn bounded(input: &str, min: usize, max: usize, short: &str, long: &str) -> FieldResult {
    let trimmed = input.trim();
    let len = char_len(trimmed);
    let mut errors = Vec::new();
    if len < min {
        errors.push(short.to_string());
    }
    if len > max {
        errors.push(long.to_string());
    }
    finish(trimmed.to_owned(), errors)
}

fn required(input: &str, message: &str, rest: FieldResult) -> FieldResult {
    if !input.trim().is_empty() {
        return rest;
    }
    let mut errors = vec![message.to_string()];
    if let Err(more) = rest {
        errors.extend(more);
    }
    Err(errors)
}

/// 2 to 50 characters after trimming.
pub fn name(input: &str) -> FieldResult {
    bounded(input, 2, 50, NAME_TOO_SHORT, NAME_TOO_LONG)
}

/// 5 to 100 characters after trimming.
pub fn title(input: &str) -> FieldResult {
    required(
        input,
        TITLE_REQUIRED,
        bounded(input, 5, 100, TITLE_TOO_SHORT, TITLE_TOO_LONG),
    )
}

/// 10 to 1000 characters after trimming.
pub fn message(input: &str) -> FieldResult {
    required(
        input,
        MESSAGE_REQUIRED,
        bounded(input, 10, 1000, MESSAGE_TOO_SHORT, MESSAGE_TOO_LONG),
    )
}

/// Optional absolute URL; the empty string means "not provided".
pub fn optional_url(input: &str) -> FieldResult<Option<String>> {
    if input.is_empty() {
        return Ok(None);
    }
    match url::Url::parse(input) {
        Ok(_) => Ok(Some(input.to_owned())),
        Err(_) => Err(vec![URL_INVALID.to_string()]),
    }
}

/// Korean mobile or landline number, dashes optional.
pub fn phone(input: &str) -> FieldResult {
    if PHONE_RE.is_match(input) {
        Ok(input.to_owned())
    } else {
        Err(vec![PHONE_INVALID.to_string()])
    }
}

/// Optional text of at most `max` characters; the empty string means "not provided".
pub fn optional_text(input: &str, max: usize, too_long: &str) -> FieldResult<Option<String>> {
    if input.is_empty() {
        Ok(None)
    } else if char_len(input) > max {
        Err(vec![too_long.to_string()])
    } else {
        Ok(Some(input.to_owned()))
    }
}

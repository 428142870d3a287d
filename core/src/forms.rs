//! Whole-form schemas built from the field rules.
//!
//! A form validates a [`FormData`] map into a typed, normalized value or a
//! [`FieldErrors`] map. Every field is checked even after one fails so the
//! caller can show all problems at once. Missing fields count as empty.

use serde::Serialize;

use crate::validation::{self, field, FieldErrors, FormData};

pub const LOGIN_PASSWORD_REQUIRED: &str = "비밀번호를 입력해주세요";
pub const CONFIRM_PASSWORD_REQUIRED: &str = "비밀번호 확인을 입력해주세요";
pub const PASSWORD_MISMATCH: &str = "비밀번호가 일치하지 않습니다";
pub const BIO_TOO_LONG: &str = "소개는 최대 500자까지 가능합니다";

/// A form that can be validated from raw input.
pub trait FormSchema: Sized {
    fn validate(data: &FormData) -> Result<Self, FieldErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormSchema for ContactForm {
    fn validate(data: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = errors.check("name", validation::name(field(data, "name")));
        let email = errors.check("email", validation::email(field(data, "email")));
        let subject = errors.check("subject", validation::title(field(data, "subject")));
        let message = errors.check("message", validation::message(field(data, "message")));

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(Self {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl FormSchema for LoginForm {
    fn validate(data: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = errors.check("email", validation::email(field(data, "email")));
        let password = field(data, "password");
        if password.is_empty() {
            errors.add("password", LOGIN_PASSWORD_REQUIRED);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(Self {
                email,
                password: password.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormSchema for SignupForm {
    fn validate(data: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = errors.check("name", validation::name(field(data, "name")));
        let email = errors.check("email", validation::email(field(data, "email")));
        let password = errors.check("password", validation::password(field(data, "password")));

        // The mismatch check runs on the raw inputs, independent of the
        // password rules above.
        let confirm = field(data, "confirmPassword");
        if confirm.is_empty() {
            errors.add("confirmPassword", CONFIRM_PASSWORD_REQUIRED);
        }
        if field(data, "password") != confirm {
            errors.add("confirmPassword", PASSWORD_MISMATCH);
        }

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(Self {
                name,
                email,
                password,
                confirm_password: confirm.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl FormSchema for ProfileForm {
    fn validate(data: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = errors.check("name", validation::name(field(data, "name")));
        let email = errors.check("email", validation::email(field(data, "email")));
        let bio = errors.check(
            "bio",
            validation::optional_text(field(data, "bio"), 500, BIO_TOO_LONG),
        );

        match (name, email, bio) {
            (Some(name), Some(email), Some(bio)) => Ok(Self { name, email, bio }),
            _ => Err(errors),
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form validation for login, registration and profile edits.
//!
//! Validation failures stay on the form: they never reach the API and never
//! touch the session.

use crate::models::RegisterRequest;
use validator::{Validate, ValidationError, ValidationErrors};

/// Minimum password length accepted by the registration and login forms.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Require 8+ characters with upper, lower, digit and symbol.
pub fn validate_strong_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}

/// Reject values made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// First registration step: who the user is.
#[derive(Debug, Clone, Default, Validate)]
pub struct AccountStep {
    #[validate(
        custom(function = "validate_not_blank", message = "Name is required"),
        length(min = 2, message = "Name must be at least 2 characters")
    )]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

/// Second registration step: credentials and avatar.
#[derive(Clone, Default, Validate)]
pub struct SecurityStep {
    #[validate(custom(
        function = "validate_strong_password",
        message = "Password must be strong (8+ chars, upper, lower, number, symbol)"
    ))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(
        custom(function = "validate_not_blank", message = "Profile picture URL is required"),
        url(message = "Please enter a valid URL")
    )]
    pub profile_picture: String,
}

/// Two-step registration form.
///
/// Each step is validated on its own so the account step can be confirmed
/// before the user moves on to choosing a password.
#[derive(Clone, Default)]
pub struct RegisterForm {
    pub account: AccountStep,
    pub security: SecurityStep,
}

/// Which registration step the form is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStep {
    Account,
    Security,
}

impl RegisterForm {
    /// Validate the current step and return the step the form moves to.
    ///
    /// The account step advances to the security step; the security step
    /// stays put (submission is the caller's next action).
    pub fn advance(&self, step: RegisterStep) -> Result<RegisterStep, ValidationErrors> {
        match step {
            RegisterStep::Account => {
                self.account.validate()?;
                Ok(RegisterStep::Security)
            }
            RegisterStep::Security => {
                self.security.validate()?;
                Ok(RegisterStep::Security)
            }
        }
    }

    /// Validate both steps and build the API payload.
    pub fn to_request(&self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for result in [self.account.validate(), self.security.validate()] {
            if let Err(step_errors) = result {
                for (field, field_errors) in step_errors.field_errors() {
                    for error in field_errors {
                        errors.add(field_name(&field), error.clone());
                    }
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RegisterRequest {
            name: self.account.name.trim().to_string(),
            email: self.account.email.trim().to_string(),
            password: self.security.password.clone(),
            profile_picture: self.security.profile_picture.trim().to_string(),
        })
    }
}

/// `ValidationErrors::add` wants a `&'static str` field name.
fn field_name(field: &str) -> &'static str {
    match field {
        "name" => "name",
        "email" => "email",
        "password" => "password",
        "confirm_password" => "confirm_password",
        "profile_picture" => "profile_picture",
        _ => "form",
    }
}

/// First message attached to `field`, for inline display.
pub fn first_message(errors: &ValidationErrors, field: &str) -> Option<String> {
    errors
        .field_errors()
        .get(field)
        .and_then(|errs| errs.first())
        .and_then(|err| err.message.as_ref())
        .map(|msg| msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            account: AccountStep {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            security: SecurityStep {
                password: "Analyt1cal!".to_string(),
                confirm_password: "Analyt1cal!".to_string(),
                profile_picture: "https://cdn.example.com/ada.png".to_string(),
            },
        }
    }

    #[test]
    fn test_strong_password_rules() {
        assert!(validate_strong_password("Abcdef1!").is_ok());
        assert!(validate_strong_password("Abcde1!").is_err()); // too short
        assert!(validate_strong_password("abcdef1!").is_err()); // no upper
        assert!(validate_strong_password("ABCDEF1!").is_err()); // no lower
        assert!(validate_strong_password("Abcdefg!").is_err()); // no digit
        assert!(validate_strong_password("Abcdefg1").is_err()); // no symbol
    }

    #[test]
    fn test_account_step_blocks_advance() {
        let mut form = valid_form();
        form.account.name = " ".to_string();
        form.account.email = "nope".to_string();

        let errors = form.advance(RegisterStep::Account).unwrap_err();
        assert_eq!(
            first_message(&errors, "email").as_deref(),
            Some("Please enter a valid email")
        );
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_account_step_advances_to_security() {
        let form = valid_form();
        assert_eq!(
            form.advance(RegisterStep::Account).unwrap(),
            RegisterStep::Security
        );
    }

    #[test]
    fn test_security_step_password_mismatch() {
        let mut form = valid_form();
        form.security.confirm_password = "Different1!".to_string();

        let errors = form.advance(RegisterStep::Security).unwrap_err();
        assert_eq!(
            first_message(&errors, "confirm_password").as_deref(),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_security_step_requires_picture_url() {
        let mut form = valid_form();
        form.security.profile_picture = "not a url".to_string();
        let errors = form.advance(RegisterStep::Security).unwrap_err();
        assert_eq!(
            first_message(&errors, "profile_picture").as_deref(),
            Some("Please enter a valid URL")
        );
    }

    #[test]
    fn test_to_request_trims_fields() {
        let mut form = valid_form();
        form.account.email = "ada@example.com".to_string();
        form.account.name = "  Ada  ".to_string();

        let request = form.to_request().unwrap();
        assert_eq!(request.name, "Ada");
        assert_eq!(request.password, "Analyt1cal!");
    }

    #[test]
    fn test_to_request_collects_errors_from_both_steps() {
        let mut form = valid_form();
        form.account.email = "bad".to_string();
        form.security.password = "weak".to_string();
        form.security.confirm_password = "weak".to_string();

        let errors = form.to_request().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}

//! Credential form state

use serde::Serialize;

use crate::auth::AuthError;

/// Shown after a successful sign-up
pub const SIGN_UP_CONFIRMATION: &str = "Check your email for the confirmation link!";

/// What submitting the form does
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthIntent {
    #[default]
    Login,
    SignUp,
}

impl AuthIntent {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Login => Self::SignUp,
            Self::SignUp => Self::Login,
        }
    }

    /// Form heading, also used as the submit button label
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::SignUp => "Sign Up",
        }
    }

    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Login => "Need an account? Sign Up",
            Self::SignUp => "Have an account? Login",
        }
    }
}

/// Email and password as sent to the Auth Service
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Both fields are required; nothing else is checked client-side
    pub fn validate(email: &str, password: &str) -> Result<Self, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_labels() {
        let intent = AuthIntent::default();
        assert_eq!(intent.title(), "Login");
        assert_eq!(intent.toggle_label(), "Need an account? Sign Up");

        let intent = intent.toggle();
        assert_eq!(intent.title(), "Sign Up");
        assert_eq!(intent.toggle_label(), "Have an account? Login");
        assert_eq!(intent.toggle(), AuthIntent::Login);
    }

    #[test]
    fn test_validate_requires_both_fields() {
        for (email, password) in [("", "secret"), ("user@example.com", ""), ("", "")] {
            let err = Credentials::validate(email, password).unwrap_err();
            assert_eq!(err.to_string(), "Please enter email and password");
        }

        let credentials = Credentials::validate("user@example.com", "secret").unwrap();
        assert_eq!(credentials.email, "user@example.com");
    }
}

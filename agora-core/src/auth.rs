//! Sign-in flows.
//!
//! Every flow ends in one of three outcomes: signed in, cancelled by the
//! user, or failed with a message from the identity provider.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AgoraError, AgoraResult};
use crate::remote::Provider;
use crate::remote::protocol::{Register, SignIn, SignInResponse, SignOut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    EmailPassword,
    Anonymous,
    Google,
    Facebook,
}

impl AuthMethod {
    /// Social flows hand control to a third party and may be abandoned.
    pub fn is_social(&self) -> bool {
        matches!(self, AuthMethod::Google | AuthMethod::Facebook)
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMethod::EmailPassword => "email",
            AuthMethod::Anonymous => "guest",
            AuthMethod::Google => "Google",
            AuthMethod::Facebook => "Facebook",
        };
        write!(f, "{}", name)
    }
}

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.email, self.anonymous) {
            (Some(email), _) => write!(f, "{}", email),
            (None, true) => write!(f, "guest ({})", self.uid),
            (None, false) => write!(f, "{}", self.uid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn(Account),
    Cancelled,
    Failed(String),
}

/// Validated email/password pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn for_login(email: &str, password: &str) -> AgoraResult<Self> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AgoraError::InvalidInput(
                "Please enter email and password".into(),
            ));
        }

        Ok(Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
    }

    pub fn for_registration(email: &str, password: &str, confirm: &str) -> AgoraResult<Self> {
        if email.trim().is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(AgoraError::InvalidInput("Please fill all fields".into()));
        }
        if password != confirm {
            return Err(AgoraError::InvalidInput("Passwords do not match".into()));
        }

        Ok(Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
    }
}

/// A sign-in attempt.
#[derive(Debug, Clone)]
pub enum AuthRequest {
    EmailPassword(Credentials),
    Anonymous,
    Social(AuthMethod),
}

impl AuthRequest {
    pub fn method(&self) -> AuthMethod {
        match self {
            AuthRequest::EmailPassword(_) => AuthMethod::EmailPassword,
            AuthRequest::Anonymous => AuthMethod::Anonymous,
            AuthRequest::Social(method) => *method,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, request: AuthRequest) -> AuthOutcome;
    async fn register(&self, credentials: Credentials) -> AuthOutcome;
    async fn sign_out(&self) -> AgoraResult<()>;
}

fn into_outcome(result: AgoraResult<SignInResponse>) -> AuthOutcome {
    match result {
        Ok(SignInResponse::SignedIn { account }) => AuthOutcome::SignedIn(account),
        Ok(SignInResponse::Cancelled) => AuthOutcome::Cancelled,
        Err(AgoraError::Provider(message)) => AuthOutcome::Failed(message),
        Err(e) => AuthOutcome::Failed(e.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for Provider {
    async fn sign_in(&self, request: AuthRequest) -> AuthOutcome {
        let method = request.method();
        let (email, password) = match request {
            AuthRequest::EmailPassword(credentials) => {
                (Some(credentials.email), Some(credentials.password))
            }
            AuthRequest::Anonymous | AuthRequest::Social(_) => (None, None),
        };

        let outcome = into_outcome(
            self.call_interactive(SignIn {
                method,
                email,
                password,
            })
            .await,
        );

        // Only social flows can be cancelled; anything else answering
        // "cancelled" is a provider bug.
        if outcome == AuthOutcome::Cancelled && !method.is_social() {
            return AuthOutcome::Failed(format!("{} sign-in was cancelled", method));
        }

        tracing::debug!(%method, ?outcome, "sign-in finished");
        outcome
    }

    async fn register(&self, credentials: Credentials) -> AuthOutcome {
        into_outcome(
            self.call_interactive(Register {
                email: credentials.email,
                password: credentials.password,
            })
            .await,
        )
    }

    async fn sign_out(&self) -> AgoraResult<()> {
        self.call(SignOut {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let err = Credentials::for_login("  ", "secret").unwrap_err();
        assert_eq!(err.to_string(), "Please enter email and password");
        assert!(Credentials::for_login("a@b.c", "").is_err());

        let credentials = Credentials::for_login(" a@b.c ", "secret").unwrap();
        assert_eq!(credentials.email, "a@b.c");
    }

    #[test]
    fn test_registration_checks_blank_then_mismatch() {
        let err = Credentials::for_registration("a@b.c", "one", "").unwrap_err();
        assert_eq!(err.to_string(), "Please fill all fields");

        let err = Credentials::for_registration("a@b.c", "one", "two").unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        assert!(Credentials::for_registration("a@b.c", "same", "same").is_ok());
    }

    #[test]
    fn test_provider_errors_keep_provider_text() {
        let outcome = into_outcome(Err(AgoraError::Provider(
            "The password is invalid".into(),
        )));
        assert_eq!(outcome, AuthOutcome::Failed("The password is invalid".into()));

        let outcome = into_outcome(Ok(SignInResponse::Cancelled));
        assert_eq!(outcome, AuthOutcome::Cancelled);
    }

    #[test]
    fn test_account_display() {
        let guest = Account {
            uid: "u1".into(),
            email: None,
            anonymous: true,
        };
        assert_eq!(guest.to_string(), "guest (u1)");
    }
}

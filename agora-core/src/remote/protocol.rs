//! Defines the JSON protocol used between agora and provider executables
//! over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::auth::{Account, AuthMethod};
use crate::remote::document::{EventDocument, RemoteDocument};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    SignIn,
    Register,
    SignOut,
    ListDocuments,
    AddDocument,
    DeleteMatching,
}

/// Request sent from agora to the provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from the provider back to agora.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

// ============================================================================
// Auth
// ============================================================================

/// Sign in with one of the supported methods.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignIn {
    pub method: AuthMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Provider answer to a sign-in or registration. Social flows can be
/// abandoned by the user, which is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SignInResponse {
    SignedIn { account: Account },
    Cancelled,
}

impl ProviderCommand for SignIn {
    type Response = SignInResponse;
    fn command() -> Command {
        Command::SignIn
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Register {
    pub email: String,
    pub password: String,
}

impl ProviderCommand for Register {
    type Response = SignInResponse;
    fn command() -> Command {
        Command::Register
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignOut {}

impl ProviderCommand for SignOut {
    type Response = ();
    fn command() -> Command {
        Command::SignOut
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Fetch every document of the configured collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListDocuments {
    /// Provider-specific config (e.g., collection, project id)
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for ListDocuments {
    type Response = Vec<RemoteDocument>;
    fn command() -> Command {
        Command::ListDocuments
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddDocument {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub document: EventDocument,
}

impl ProviderCommand for AddDocument {
    type Response = String; // Document id
    fn command() -> Command {
        Command::AddDocument
    }
}

/// Delete every document with this title and date.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMatching {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub title: String,
    pub date: String,
}

impl ProviderCommand for DeleteMatching {
    type Response = usize;
    fn command() -> Command {
        Command::DeleteMatching
    }
}

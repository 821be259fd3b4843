//! Provider subprocess protocol.
//!
//! A provider is an executable named `agora-provider-<name>` that speaks the
//! JSON protocol in `protocol.rs`: one request on stdin, one response on
//! stdout. Providers own their credentials and the transport to the backing
//! document database.

use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::constants::{AUTH_TIMEOUT, DEFAULT_PROVIDER_TIMEOUT_SECS, PROVIDER_BINARY_PREFIX};
use crate::error::{AgoraError, AgoraResult};
use crate::remote::protocol::{Command, ProviderCommand, Request, Response};

#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    timeout_secs: u64,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider {
            name: name.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn binary_path(&self) -> AgoraResult<std::path::PathBuf> {
        let binary_name = format!("{}{}", PROVIDER_BINARY_PREFIX, self.name);
        which::which(&binary_name).map_err(|_| AgoraError::ProviderNotInstalled(binary_name))
    }

    /// Call a typed provider command and return the result.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> AgoraResult<C::Response> {
        let limit = Duration::from_secs(self.timeout_secs);
        timeout(limit, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| AgoraError::ProviderTimeout(limit.as_secs()))?
    }

    /// Like `call`, with the longer budget used for interactive sign-in flows.
    pub async fn call_interactive<C: ProviderCommand>(&self, cmd: C) -> AgoraResult<C::Response> {
        timeout(AUTH_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| AgoraError::ProviderTimeout(AUTH_TIMEOUT.as_secs()))?
    }

    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> AgoraResult<R> {
        let request = encode_request(command, params)?;
        tracing::debug!(provider = %self.name, ?command, "calling provider");

        let stdout = self.exchange(&request).await?;
        decode_response(&stdout)
    }

    /// Run the provider once: one request line in, stdout back.
    async fn exchange(&self, request: &str) -> AgoraResult<Vec<u8>> {
        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AgoraError::Provider(format!("Failed to spawn {}: {e}", binary_path.display()))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
        }

        let output = child.wait_with_output().await?;
        match output.status.code() {
            _ if output.status.success() => Ok(output.stdout),
            Some(code) => Err(AgoraError::Provider(format!(
                "{} exited with status {code}",
                self.name
            ))),
            None => Err(AgoraError::Provider(format!(
                "{} was terminated by a signal",
                self.name
            ))),
        }
    }
}

fn encode_request<P: Serialize>(command: Command, params: P) -> AgoraResult<String> {
    let params =
        serde_json::to_value(params).map_err(|e| AgoraError::Serialization(e.to_string()))?;
    serde_json::to_string(&Request { command, params })
        .map_err(|e| AgoraError::Serialization(e.to_string()))
}

fn decode_response<R: DeserializeOwned>(stdout: &[u8]) -> AgoraResult<R> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        return Err(AgoraError::Provider("Provider returned no response".into()));
    }

    let response: Response<R> = serde_json::from_str(&text)
        .map_err(|e| AgoraError::Provider(format!("Unreadable provider response: {e}")))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(AgoraError::Provider(error)),
    }
}

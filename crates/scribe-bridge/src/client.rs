//! HTTP client for the bridge.

use reqwest::StatusCode;
use serde::Serialize;

use crate::lines::{LineSplitter, StreamLine};
use crate::{BridgeEndpoint, BridgeError, BridgeResult};

#[derive(Debug, Serialize)]
struct CompileRequest<'a> {
    filename: &'a str,
    code: &'a str,
}

/// Result of a compile stream that ran to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOutcome {
    /// `ok` of the last status line; false when there was none
    pub ok: bool,
    /// Whether any status line arrived
    pub status_seen: bool,
    /// Number of lines delivered
    pub lines: usize,
}

/// Talks to the bridge. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    endpoint: BridgeEndpoint,
}

impl BridgeClient {
    pub fn new(endpoint: BridgeEndpoint) -> BridgeResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(endpoint.connect_timeout)
            .build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &BridgeEndpoint {
        &self.endpoint
    }

    /// Probes `GET /health`. Only a 200 counts as alive.
    pub async fn check_liveness(&self) -> BridgeResult<()> {
        let url = self.endpoint.url("health");
        tracing::debug!(%url, "probing bridge");

        let response = self
            .http
            .get(&url)
            .timeout(self.endpoint.probe_timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            tracing::debug!(%status, "bridge probe rejected");
            Err(BridgeError::status(status, ""))
        }
    }

    /// Sends the code to `POST /compile` and streams the output.
    ///
    /// `on_line` runs once per line, in arrival order, before the next
    /// chunk is read. A final line without a trailing newline is delivered
    /// too. Dropping the returned future cancels the stream and closes the
    /// connection.
    pub async fn compile<F>(&self, filename: &str, code: &str, mut on_line: F) -> BridgeResult<CompileOutcome>
    where
        F: FnMut(&StreamLine),
    {
        let url = self.endpoint.url("compile");
        tracing::info!(%url, filename, bytes = code.len(), "compile started");

        let mut response = self
            .http
            .post(&url)
            .json(&CompileRequest { filename, code })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "compile rejected");
            return Err(BridgeError::status(status, &body));
        }

        let mut splitter = LineSplitter::new();
        let mut outcome = CompileOutcome::default();
        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, lines = outcome.lines, "compile stream interrupted");
                    return Err(BridgeError::Stream(e));
                }
            };
            for line in splitter.push(&chunk) {
                deliver(line, &mut outcome, &mut on_line);
            }
        }
        if let Some(line) = splitter.finish() {
            deliver(line, &mut outcome, &mut on_line);
        }

        tracing::info!(ok = outcome.ok, lines = outcome.lines, "compile finished");
        Ok(outcome)
    }
}

fn deliver<F>(raw: String, outcome: &mut CompileOutcome, on_line: &mut F)
where
    F: FnMut(&StreamLine),
{
    let line = StreamLine::classify(raw);
    if let StreamLine::Status { ok, .. } = &line {
        outcome.ok = *ok;
        outcome.status_seen = true;
    }
    outcome.lines += 1;
    on_line(&line);
}

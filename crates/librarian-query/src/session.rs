//! Session persistence: a query session holds prior intents and the
//! provider selection it settled on, so follow-ups (and `--drill-down`)
//! have history to build on, per §4.4's session contract. Persisted as
//! `{ session: { sessionId, createdAt, history, llmSelection? } }`.

use std::path::Path;

use chrono::{DateTime, Utc};
use librarian_core::paths;
use serde::{Deserialize, Serialize};

/// The provider a session last settled on, and when — round-tripped through
/// the session file so a follow-up can prefer it over a fresh probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmSelection {
    pub provider: String,
    pub model_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySession {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub history: Vec<String>,
    pub llm_selection: Option<LlmSelection>,
}

/// On-disk envelope: the session file's root key is `session`, not the
/// session fields directly.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    session: QuerySession,
}

impl QuerySession {
    pub fn new(id: impl Into<String>) -> Self {
        Self { session_id: id.into(), created_at: Utc::now(), history: Vec::new(), llm_selection: None }
    }

    pub fn load(workspace: &Path, id: &str) -> anyhow::Result<Self> {
        let path = paths::session_file(workspace, id);
        if !path.exists() {
            return Ok(Self::new(id));
        }
        let raw = std::fs::read_to_string(path)?;
        let file: SessionFile = serde_json::from_str(&raw)?;
        Ok(file.session)
    }

    pub fn save(&self, workspace: &Path) -> anyhow::Result<()> {
        paths::ensure_state_dirs(workspace)?;
        let path = paths::session_file(workspace, &self.session_id);
        let file = SessionFile { session: self.clone() };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn record_intent(&mut self, intent: &str) {
        self.history.push(intent.to_string());
    }

    /// Records the provider a query settled on, stamping the update time.
    pub fn set_llm_selection(&mut self, provider: String, model_id: Option<String>) {
        self.llm_selection = Some(LlmSelection { provider, model_id, updated_at: Utc::now() });
    }

    /// Builds the synthetic intent a `--drill-down <path>` follow-up
    /// appends to history, per the session contract.
    pub fn drill_down_intent(path: &str) -> String {
        format!("Drill down: {path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = QuerySession::new("abc123");
        session.record_intent("list all handlers");
        session.set_llm_selection("codex".to_string(), Some("gpt-5-codex".to_string()));
        session.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(paths::session_file(dir.path(), "abc123")).unwrap();
        assert!(raw.contains("\"session\""));
        assert!(raw.contains("\"sessionId\""));
        assert!(raw.contains("\"llmSelection\""));

        let reloaded = QuerySession::load(dir.path(), "abc123").unwrap();
        assert_eq!(reloaded.history, vec!["list all handlers".to_string()]);
        assert_eq!(reloaded.llm_selection.as_ref().map(|s| s.provider.as_str()), Some("codex"));
        assert_eq!(reloaded.llm_selection.as_ref().and_then(|s| s.model_id.clone()), Some("gpt-5-codex".to_string()));
    }

    #[test]
    fn missing_session_file_yields_fresh_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = QuerySession::load(dir.path(), "nope").unwrap();
        assert!(session.history.is_empty());
    }
}

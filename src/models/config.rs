use serde::Deserialize;

use crate::domain::types::TelegramId;

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Configuration options for the shop backend, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path or URL of the SQLite database.
    pub database_url: String,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Comma-separated Telegram ids allowed to mutate the catalog.
    #[serde(default)]
    pub moderator_ids: String,
}

/// Immutable allow-list of Telegram identities permitted to mutate the
/// catalog. Built once at startup and never refreshed mid-process; this is a
/// coarse authorization gate, not an authentication mechanism.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList(Vec<i64>);

impl AdminAllowList {
    /// Parse a comma-separated id list. Blank and unparsable entries are
    /// skipped rather than rejected.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .filter_map(|part| part.trim().parse::<i64>().ok())
                .collect(),
        )
    }

    /// Whether the given identity may mutate the catalog.
    pub fn contains(&self, id: TelegramId) -> bool {
        self.0.contains(&id.get())
    }

    /// True when no moderators are configured at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i64> for AdminAllowList {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

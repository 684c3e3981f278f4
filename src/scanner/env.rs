// Environment file sniffer: substring needles for database/broker hints

use std::collections::BTreeSet;
use std::path::Path;

/// Substring needle to canonical label, checked against lowercased text
const DB_HINTS: &[(&str, &str)] = &[
    ("postgres", "Postgres"),
    ("postgresql", "Postgres"),
    ("psql", "Postgres"),
    ("redis", "Redis"),
    ("rediscache", "Redis"),
    ("mongo", "MongoDB"),
    ("mongodb", "MongoDB"),
    ("mysql", "MySQL"),
    ("mariadb", "MariaDB"),
    ("kafka", "Kafka"),
    ("rabbit", "RabbitMQ"),
    ("amqp", "RabbitMQ"),
    ("elasticsearch", "Elasticsearch"),
    ("opensearch", "OpenSearch"),
];

/// Sniffer for `.env`-style files
///
/// A coarse substring test over lowercased contents, not a key/value parse;
/// false positives from comments or unrelated text are accepted.
pub struct EnvSniffer {
    cap: usize,
}

impl EnvSniffer {
    /// Create a new env sniffer with the default file cap
    pub fn new() -> Self {
        Self { cap: 20 }
    }

    /// Set the maximum number of env files to read
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Collect canonical database/broker labels hinted at under `root`
    ///
    /// Candidates are `.env` plus `.env.*` matches, capped; unreadable files
    /// are skipped.
    pub fn sniff(&self, root: &Path) -> BTreeSet<String> {
        let mut hints = BTreeSet::new();

        let mut candidates = vec![root.join(".env")];
        let pattern = root.join(".env.*").to_string_lossy().to_string();
        if let Ok(paths) = glob::glob(&pattern) {
            candidates.extend(paths.filter_map(|p| p.ok()));
        }

        for path in candidates.into_iter().take(self.cap) {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text.to_lowercase(),
                Err(_) => continue,
            };
            for (needle, label) in DB_HINTS {
                if text.contains(needle) {
                    hints.insert(label.to_string());
                }
            }
        }

        hints
    }
}

impl Default for EnvSniffer {
    fn default() -> Self {
        Self::new()
    }
}

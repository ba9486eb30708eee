//! JSON-backed organization directory.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::domain::repositories::OrganizationDirectory;

#[derive(Debug, Deserialize)]
struct OrganizationEntry {
    organization: String,
    #[serde(default)]
    domains: Vec<String>,
}

/// Domain to organization map loaded from
/// `[{"organization": "...", "domains": ["a.com", ...]}, ...]`.
///
/// Domains are matched case-insensitively. When a domain is listed under
/// several organizations the first one wins.
#[derive(Debug, Clone, Default)]
pub struct JsonOrganizationDirectory {
    domains: HashMap<String, String>,
}

impl JsonOrganizationDirectory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: Vec<OrganizationEntry> =
            serde_json::from_str(json).context("invalid organization domains JSON")?;

        let mut domains = HashMap::new();
        for entry in entries {
            for domain in entry.domains {
                domains
                    .entry(domain.trim().to_ascii_lowercase())
                    .or_insert_with(|| entry.organization.clone());
            }
        }
        Ok(Self { domains })
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Loads the directory, logging and returning an empty one on failure.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };
        match Self::from_file(path) {
            Ok(directory) => {
                tracing::info!(domains = directory.len(), "Loaded organization domains");
                directory
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to load organization domains");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl OrganizationDirectory for JsonOrganizationDirectory {
    fn lookup(&self, domain: &str) -> Option<String> {
        if domain.is_empty() {
            return None;
        }
        self.domains.get(&domain.to_ascii_lowercase()).cloned()
    }
}

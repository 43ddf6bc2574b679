//! Template repository for persisting and reusing mappings.
//!
//! Each template is one pretty-printed JSON file named `{id}.json` in the
//! repository directory. Ids are the first 12 hex characters of a SHA-256
//! digest over the template name, the save time and a per-repository
//! counter. Only mapped fields are stored; unmapped fields are restored as
//! `null` when a template is turned back into a [`Mapping`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use csvmap_model::{ColumnName, Mapping, SchemaRegistry};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const ID_LEN: usize = 12;

/// A saved mapping with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Field name to column name, mapped fields only.
    pub mapping: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTemplate {
    /// Rebuilds a complete mapping for `registry`.
    ///
    /// Fields the template does not mention come back unmapped; fields the
    /// registry does not declare are an error.
    pub fn to_mapping(&self, registry: &SchemaRegistry) -> Result<Mapping> {
        let mut mapping = Mapping::unmapped(registry);
        for (field, column) in &self.mapping {
            let column = ColumnName::new(column.as_str())
                .with_context(|| format!("Template {} has an invalid column", self.id))?;
            mapping
                .assign(registry, field, Some(column))
                .with_context(|| format!("Template {} does not fit the schema", self.id))?;
        }
        Ok(mapping)
    }
}

/// Listing entry; the mapping itself is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub field_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Directory-backed store of [`StoredTemplate`]s.
#[derive(Debug)]
pub struct TemplateRepository {
    base_dir: PathBuf,
    counter: AtomicU64,
}

impl TemplateRepository {
    /// Opens the repository at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create template repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self {
            base_dir,
            counter: AtomicU64::new(0),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Stores `mapping` under a fresh id. Unmapped fields are dropped.
    pub fn save(&self, name: &str, description: &str, mapping: &Mapping) -> Result<StoredTemplate> {
        let now = Utc::now();
        let id = self.next_id(name, now);
        let template = StoredTemplate {
            id,
            name: name.to_string(),
            description: description.to_string(),
            mapping: mapping.to_assigned(),
            created_at: now,
            updated_at: now,
        };
        self.write(&template)?;
        debug!(id = %template.id, fields = template.mapping.len(), "saved template");
        Ok(template)
    }

    /// Returns `None` when no template has this id.
    pub fn get(&self, id: &str) -> Result<Option<StoredTemplate>> {
        let path = self.template_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template from {}", path.display()))?;
        let template: StoredTemplate = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse template from {}", path.display()))?;
        Ok(Some(template))
    }

    /// All readable templates, newest first. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<TemplateSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|contents| {
                    serde_json::from_str::<StoredTemplate>(&contents).map_err(anyhow::Error::from)
                });
            match parsed {
                Ok(template) => summaries.push(TemplateSummary {
                    field_count: template.mapping.len(),
                    id: template.id,
                    name: template.name,
                    description: template.description,
                    created_at: template.created_at,
                }),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable template");
                }
            }
        }
        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(summaries)
    }

    /// Replaces name, description and mapping; `created_at` is kept.
    /// Returns `false` when the id is unknown.
    pub fn update(
        &self,
        id: &str,
        name: &str,
        description: &str,
        mapping: &Mapping,
    ) -> Result<bool> {
        let Some(existing) = self.get(id)? else {
            return Ok(false);
        };
        let template = StoredTemplate {
            id: existing.id,
            name: name.to_string(),
            description: description.to_string(),
            mapping: mapping.to_assigned(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.write(&template)?;
        debug!(id = %template.id, "updated template");
        Ok(true)
    }

    /// Returns `false` when the id is unknown.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.template_path(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete template: {}", path.display()))?;
        debug!(id, "deleted template");
        Ok(true)
    }

    pub fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.template_path(id)?.exists())
    }

    fn write(&self, template: &StoredTemplate) -> Result<()> {
        let path = self.template_path(&template.id)?;
        let json = serde_json::to_string_pretty(template)
            .with_context(|| format!("Failed to serialize template {}", template.id))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write template to {}", path.display()))?;
        Ok(())
    }

    fn next_id(&self, name: &str, now: DateTime<Utc>) -> String {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(now.to_rfc3339().as_bytes());
        hasher.update(counter.to_le_bytes());
        let mut id = hex::encode(hasher.finalize());
        id.truncate(ID_LEN);
        id
    }

    /// Ids are hex only, which keeps every path inside `base_dir`.
    fn template_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.len() > 64 || !id.chars().all(|ch| ch.is_ascii_hexdigit()) {
            bail!("Invalid template id: {id:?}");
        }
        Ok(self.base_dir.join(format!("{id}.json")))
    }
}

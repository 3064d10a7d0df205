//! Campaign document storage
//!
//! A campaign is persisted as one whole document keyed by its id. Saves
//! overwrite the stored document; concurrent editors race and the later
//! save wins. A campaign that was never stored and one stored as an empty
//! document both load as a default campaign carrying the requested id.

use crate::campaign::{Campaign, CampaignId};
use crate::error::{BuilderError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ulid::Ulid;

pub trait CampaignStore: Send + Sync {
    fn load(&self, id: CampaignId) -> Result<Campaign>;

    /// Store `campaign`, assigning it an id first when it has none.
    /// Returns the id it was stored under.
    fn save(&self, campaign: &mut Campaign) -> Result<CampaignId>;

    /// Returns whether a document was removed
    fn delete(&self, id: CampaignId) -> Result<bool>;
}

fn unsaved_id() -> BuilderError {
    BuilderError::store("campaign id 0 is reserved for unsaved campaigns")
}

/// In-process store, mostly for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    campaigns: HashMap<CampaignId, Campaign>,
    last_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| BuilderError::store("campaign store lock poisoned"))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.campaigns.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CampaignStore for MemoryStore {
    fn load(&self, id: CampaignId) -> Result<Campaign> {
        if id.is_unsaved() {
            return Err(unsaved_id());
        }
        let inner = self.lock()?;
        Ok(inner
            .campaigns
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Campaign::default().with_id(id)))
    }

    fn save(&self, campaign: &mut Campaign) -> Result<CampaignId> {
        let mut inner = self.lock()?;
        if campaign.is_unsaved() {
            inner.last_id += 1;
            campaign.id = CampaignId(inner.last_id);
        } else {
            inner.last_id = inner.last_id.max(campaign.id.0);
        }
        inner.campaigns.insert(campaign.id, campaign.clone());
        Ok(campaign.id)
    }

    fn delete(&self, id: CampaignId) -> Result<bool> {
        Ok(self.lock()?.campaigns.remove(&id).is_some())
    }
}

/// One pretty-printed JSON document per campaign under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a campaign's document
    pub fn campaign_path(&self, id: CampaignId) -> PathBuf {
        self.root.join(format!("campaign-{id}.json"))
    }

    /// Ids of every stored document, ascending
    pub fn ids(&self) -> Result<Vec<CampaignId>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let id = name
                .to_str()
                .and_then(|n| n.strip_prefix("campaign-"))
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(id) = id {
                ids.push(CampaignId(id));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn next_id(&self) -> Result<CampaignId> {
        let last = self.ids()?.last().map_or(0, |id| id.0);
        Ok(CampaignId(last + 1))
    }
}

impl CampaignStore for FileStore {
    fn load(&self, id: CampaignId) -> Result<Campaign> {
        if id.is_unsaved() {
            return Err(unsaved_id());
        }
        let path = self.campaign_path(id);
        if !path.exists() {
            tracing::debug!(campaign_id = %id, "no stored document, using defaults");
            return Ok(Campaign::default().with_id(id));
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Campaign::default().with_id(id));
        }
        let mut campaign: Campaign = serde_json::from_str(&content)?;
        campaign.id = id;
        Ok(campaign)
    }

    fn save(&self, campaign: &mut Campaign) -> Result<CampaignId> {
        if campaign.is_unsaved() {
            campaign.id = self.next_id()?;
        }
        let content = serde_json::to_string_pretty(campaign)?;
        atomic_write(&self.campaign_path(campaign.id), content.as_bytes())?;
        tracing::info!(
            campaign_id = %campaign.id,
            fields = campaign.fields.len(),
            "campaign saved"
        );
        Ok(campaign.id)
    }

    fn delete(&self, id: CampaignId) -> Result<bool> {
        let path = self.campaign_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}

/// Write to a uniquely named sibling temp file, then rename over `path`
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_file_name(format!(".tmp_{}", Ulid::new()));
    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

//! Artifact map: where document and visual snapshots were stored

use serde::{Deserialize, Serialize};

/// One stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMapEntry {
    pub id: u32,
    pub path_ref: String,
    pub url: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_hash: Option<String>,
}

/// Ids of the document and visual snapshot active for a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactIds {
    pub dom_reference: u32,
    pub screen_reference: u32,
}

impl ArtifactIds {
    pub fn new(dom_reference: u32, screen_reference: u32) -> Self {
        Self {
            dom_reference,
            screen_reference,
        }
    }
}

/// Append-only record of every snapshot taken during a run.
///
/// Each collection carries its own id sequence; ids must strictly increase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMap {
    screenshots: Vec<ArtifactMapEntry>,
    dom: Vec<ArtifactMapEntry>,
}

impl ArtifactMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dom(&self) -> &[ArtifactMapEntry] {
        &self.dom
    }

    pub fn screenshots(&self) -> &[ArtifactMapEntry] {
        &self.screenshots
    }

    pub fn last_dom_id(&self) -> u32 {
        self.dom.last().map(|e| e.id).unwrap_or(0)
    }

    pub fn last_screenshot_id(&self) -> u32 {
        self.screenshots.last().map(|e| e.id).unwrap_or(0)
    }

    /// Append a document entry; rejects an id that does not advance the sequence
    pub fn push_dom(&mut self, entry: ArtifactMapEntry) -> Result<(), ArtifactMapEntry> {
        if entry.id <= self.last_dom_id() {
            return Err(entry);
        }
        self.dom.push(entry);
        Ok(())
    }

    /// Append a visual entry; rejects an id that does not advance the sequence
    pub fn push_screenshot(&mut self, entry: ArtifactMapEntry) -> Result<(), ArtifactMapEntry> {
        if entry.id <= self.last_screenshot_id() {
            return Err(entry);
        }
        self.screenshots.push(entry);
        Ok(())
    }

    pub fn dom_by_id(&self, id: u32) -> Option<&ArtifactMapEntry> {
        self.dom.iter().find(|e| e.id == id)
    }

    pub fn screenshot_by_id(&self, id: u32) -> Option<&ArtifactMapEntry> {
        self.screenshots.iter().find(|e| e.id == id)
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use action_primitives::DocumentPort;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use stepwright_core_types::{ArtifactIds, ArtifactMap, ArtifactMapEntry};
use tracing::{debug, info};

use crate::errors::{SnapErrKind, SnapError};
use crate::fs::{layout, writer};
use crate::hash::hash_bytes;
use crate::policy::{CapturePolicyView, CaptureReason};

pub type SnapResult<T> = Result<T, SnapError>;

/// Outcome of one capture decision
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureOutcome {
    pub ids: ArtifactIds,
    /// `None` when nothing was captured and the latest ids were reused
    pub reason: Option<CaptureReason>,
    pub url_after: String,
}

#[async_trait]
pub trait ArtifactCapture: Send + Sync {
    /// Capture a snapshot pair if the policy says so; otherwise return the
    /// latest ids unchanged.
    async fn maybe_capture(
        &self,
        document: &dyn DocumentPort,
        url_before: &str,
        autosuggest_visible: bool,
    ) -> SnapResult<CaptureOutcome>;

    /// Ids of the most recent captures; `(0, 0)` before any capture
    fn latest_ids(&self) -> ArtifactIds;

    fn dom_path(&self, id: u32) -> Option<PathBuf>;
    fn screenshot_path(&self, id: u32) -> Option<PathBuf>;

    fn artifact_map(&self) -> ArtifactMap;

    fn policy(&self) -> &CapturePolicyView;
}

#[derive(Clone)]
pub struct ArtifactCaptureBuilder {
    policy: CapturePolicyView,
}

impl ArtifactCaptureBuilder {
    pub fn new(policy: CapturePolicyView) -> Self {
        Self { policy }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.policy = self.policy.with_root(root);
        self
    }

    pub fn build(self) -> Arc<dyn ArtifactCapture> {
        Arc::new(FsArtifactCapture::new(self.policy))
    }
}

/// Writes snapshots under the policy root and keeps the artifact map in memory.
pub struct FsArtifactCapture {
    policy: CapturePolicyView,
    map: Mutex<ArtifactMap>,
}

impl FsArtifactCapture {
    pub fn new(policy: CapturePolicyView) -> Self {
        Self {
            policy,
            map: Mutex::new(ArtifactMap::new()),
        }
    }

    fn root(&self) -> &Path {
        &self.policy.io.root
    }

    async fn capture(
        &self,
        document: &dyn DocumentPort,
        url: &str,
    ) -> SnapResult<ArtifactIds> {
        // Fetch both payloads first so a failed capture leaves no trace
        let structure = document.capture_structure().await?;
        let visual = document
            .capture_visual(self.policy.full_page_screenshots)
            .await?;

        let (dom_id, screen_id) = {
            let map = self.map.lock();
            (map.last_dom_id() + 1, map.last_screenshot_id() + 1)
        };
        let dom_ref = layout::dom_ref(dom_id);
        let screen_ref = layout::screen_ref(screen_id);

        let dom_path = writer::write_atomic(
            layout::resolve(self.root(), &dom_ref),
            structure.as_bytes(),
        )?;
        if let Err(err) =
            writer::write_atomic(layout::resolve(self.root(), &screen_ref), &visual)
        {
            writer::discard(&dom_path);
            return Err(err.into());
        }

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let dom_entry = ArtifactMapEntry {
            id: dom_id,
            path_ref: dom_ref,
            url: url.to_string(),
            timestamp: timestamp.clone(),
            dom_hash: Some(hash_bytes("blake3", structure.as_bytes())),
        };
        let screen_entry = ArtifactMapEntry {
            id: screen_id,
            path_ref: screen_ref,
            url: url.to_string(),
            timestamp,
            dom_hash: None,
        };

        let mut map = self.map.lock();
        map.push_dom(dom_entry).map_err(|entry| {
            SnapError::from(SnapErrKind::Sequence(format!("dom id {}", entry.id)))
        })?;
        map.push_screenshot(screen_entry).map_err(|entry| {
            SnapError::from(SnapErrKind::Sequence(format!("screenshot id {}", entry.id)))
        })?;
        Ok(ArtifactIds::new(dom_id, screen_id))
    }
}

#[async_trait]
impl ArtifactCapture for FsArtifactCapture {
    async fn maybe_capture(
        &self,
        document: &dyn DocumentPort,
        url_before: &str,
        autosuggest_visible: bool,
    ) -> SnapResult<CaptureOutcome> {
        let url_after = document.current_url().await?;
        let Some(reason) = self
            .policy
            .trigger(url_before, &url_after, autosuggest_visible)
        else {
            debug!(url = %url_after, "no capture trigger fired");
            return Ok(CaptureOutcome {
                ids: self.latest_ids(),
                reason: None,
                url_after,
            });
        };

        let ids = self.capture(document, &url_after).await?;
        info!(
            reason = %reason,
            dom = ids.dom_reference,
            screen = ids.screen_reference,
            url = %url_after,
            "Captured artifacts"
        );
        Ok(CaptureOutcome {
            ids,
            reason: Some(reason),
            url_after,
        })
    }

    fn latest_ids(&self) -> ArtifactIds {
        let map = self.map.lock();
        ArtifactIds::new(map.last_dom_id(), map.last_screenshot_id())
    }

    fn dom_path(&self, id: u32) -> Option<PathBuf> {
        let map = self.map.lock();
        map.dom_by_id(id)
            .map(|entry| layout::resolve(self.root(), &entry.path_ref))
    }

    fn screenshot_path(&self, id: u32) -> Option<PathBuf> {
        let map = self.map.lock();
        map.screenshot_by_id(id)
            .map(|entry| layout::resolve(self.root(), &entry.path_ref))
    }

    fn artifact_map(&self) -> ArtifactMap {
        self.map.lock().clone()
    }

    fn policy(&self) -> &CapturePolicyView {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_primitives::{ElementFixture, PageFixture, ScriptedDocument, SiteFixture};
    use std::time::Duration;
    use stepwright_core_types::WaitKind;
    use tempfile::tempdir;

    const HOME: &str = "https://example.test/";
    const CAREERS: &str = "https://example.test/careers";

    async fn document() -> ScriptedDocument {
        let site = SiteFixture::default()
            .with_page(
                PageFixture::new(HOME, "Home")
                    .with_element(ElementFixture::new("cta", "a").with_text("Careers")),
            )
            .with_page(PageFixture::new(CAREERS, "Careers"));
        let document = ScriptedDocument::new(site);
        document
            .navigate(HOME, WaitKind::Load, Duration::from_secs(1))
            .await
            .unwrap();
        document
    }

    #[tokio::test]
    async fn captures_on_url_change_and_writes_files() {
        let dir = tempdir().unwrap();
        let capture = ArtifactCaptureBuilder::new(CapturePolicyView::default())
            .with_root(dir.path())
            .build();
        let doc = document().await;

        assert_eq!(capture.latest_ids(), ArtifactIds::new(0, 0));
        let outcome = capture.maybe_capture(&doc, "about:blank", false).await.unwrap();
        assert_eq!(outcome.ids, ArtifactIds::new(1, 1));
        assert_eq!(outcome.reason, Some(CaptureReason::UrlChanged));

        let dom = capture.dom_path(1).unwrap();
        assert!(dom.ends_with("dom/0001.html"));
        let html = std::fs::read_to_string(&dom).unwrap();
        assert!(html.contains("<title>Home</title>"));
        assert!(capture.screenshot_path(1).unwrap().exists());

        let map = capture.artifact_map();
        let entry = &map.dom()[0];
        assert_eq!(entry.url, HOME);
        assert!(entry.timestamp.ends_with('Z'));
        assert!(entry.dom_hash.as_deref().unwrap().starts_with("blake3:"));
        assert!(map.screenshots()[0].dom_hash.is_none());
    }

    #[tokio::test]
    async fn unchanged_page_reuses_latest_ids() {
        let dir = tempdir().unwrap();
        let capture = ArtifactCaptureBuilder::new(CapturePolicyView::default())
            .with_root(dir.path())
            .build();
        let doc = document().await;

        capture.maybe_capture(&doc, "about:blank", false).await.unwrap();
        let again = capture.maybe_capture(&doc, HOME, false).await.unwrap();
        assert_eq!(again.ids, ArtifactIds::new(1, 1));
        assert_eq!(again.reason, None);
        assert_eq!(capture.artifact_map().dom().len(), 1);

        let suggest = capture.maybe_capture(&doc, HOME, true).await.unwrap();
        assert_eq!(suggest.ids, ArtifactIds::new(2, 2));
        assert_eq!(suggest.reason, Some(CaptureReason::AutosuggestVisible));
    }

    #[tokio::test]
    async fn every_step_policy_always_captures() {
        let dir = tempdir().unwrap();
        let policy = CapturePolicyView {
            capture_on_every_step: true,
            full_page_screenshots: true,
            ..CapturePolicyView::default()
        };
        let capture = ArtifactCaptureBuilder::new(policy)
            .with_root(dir.path())
            .build();
        let doc = document().await;

        for expected in 1..=3 {
            let outcome = capture.maybe_capture(&doc, HOME, false).await.unwrap();
            assert_eq!(outcome.ids, ArtifactIds::new(expected, expected));
        }
        let png = std::fs::read(capture.screenshot_path(3).unwrap()).unwrap();
        assert!(String::from_utf8_lossy(&png).contains("|full|"));
        assert!(capture.dom_path(4).is_none());
    }
}

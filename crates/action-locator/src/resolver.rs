//! Element resolver over ordered candidates

use crate::{errors::LocatorError, strategies::*, types::*};
use action_primitives::{DocumentPort, SharedElement};
use async_trait::async_trait;
use stepwright_core_types::CandidateDescriptor;
use tracing::{debug, info, warn};

/// Default cap on retained alternates
pub const DEFAULT_MAX_ALTERNATES: usize = 3;

/// Locator resolver trait
#[async_trait]
pub trait LocatorResolver: Send + Sync {
    /// Resolve the first candidate, in input order, that matches exactly one
    /// visible element
    async fn resolve(
        &self,
        document: &dyn DocumentPort,
        candidates: &[CandidateDescriptor],
    ) -> Result<ResolvedTarget, LocatorError>;
}

/// Default resolver implementation
pub struct DefaultLocatorResolver {
    max_alternates: usize,
}

impl Default for DefaultLocatorResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ALTERNATES)
    }
}

impl DefaultLocatorResolver {
    pub fn new(max_alternates: usize) -> Self {
        Self { max_alternates }
    }

    pub fn max_alternates(&self) -> usize {
        self.max_alternates
    }

    /// Examine one candidate. Malformed descriptors and failing queries count
    /// as zero matches.
    async fn probe(
        &self,
        document: &dyn DocumentPort,
        position: usize,
        candidate: &CandidateDescriptor,
    ) -> (CandidateProbe, Option<SharedElement>) {
        let probe = |matches: usize, visible: usize, verdict: ProbeVerdict| CandidateProbe {
            position,
            candidate: candidate.clone(),
            matches,
            visible,
            verdict,
        };

        if let Err(err) = candidate.validate() {
            return (probe(0, 0, ProbeVerdict::Malformed(err.to_string())), None);
        }

        let handles = match document.query(candidate).await {
            Ok(handles) => handles,
            Err(err) => {
                warn!(candidate = %candidate, error = %err, "candidate query failed");
                return (probe(0, 0, ProbeVerdict::QueryFailed(err.to_string())), None);
            }
        };

        let handles: Vec<SharedElement> = match candidate.index {
            Some(index) => handles.into_iter().nth(index as usize).into_iter().collect(),
            None => handles,
        };

        let mut visible = 0;
        let mut first_visible = None;
        for handle in handles.iter().take(VISIBILITY_SAMPLE) {
            if handle.is_visible().await.unwrap_or(false) {
                visible += 1;
                if first_visible.is_none() {
                    first_visible = Some(handle.clone());
                }
            }
        }

        let verdict = match (handles.len(), visible) {
            (0, _) => ProbeVerdict::NoMatch,
            (_, 0) => ProbeVerdict::Hidden,
            (_, 1) => ProbeVerdict::Accepted,
            _ => ProbeVerdict::Ambiguous,
        };
        let element = if verdict == ProbeVerdict::Accepted {
            first_visible
        } else {
            None
        };
        (probe(handles.len(), visible, verdict), element)
    }
}

#[async_trait]
impl LocatorResolver for DefaultLocatorResolver {
    async fn resolve(
        &self,
        document: &dyn DocumentPort,
        candidates: &[CandidateDescriptor],
    ) -> Result<ResolvedTarget, LocatorError> {
        if candidates.is_empty() {
            return Err(LocatorError::NoCandidates);
        }

        let mut probes = Vec::with_capacity(candidates.len());
        for (position, candidate) in candidates.iter().enumerate() {
            let (probe, element) = self.probe(document, position, candidate).await;
            debug!(position, probe = %probe, "probed candidate");
            probes.push(probe);

            let Some(element) = element else {
                continue;
            };

            let confidence = base_confidence(candidate.strategy);
            let alternates = candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != position)
                .map(|(_, c)| c.clone())
                .take(self.max_alternates)
                .collect();

            info!(
                chosen = %candidate,
                position,
                confidence,
                element = %element.describe(),
                "Resolved element"
            );
            return Ok(ResolvedTarget {
                element,
                chosen: candidate.clone(),
                chosen_position: position,
                alternates,
                confidence,
                probes,
            });
        }

        warn!(
            tried = probes.len(),
            "No candidate resolved to a unique visible element"
        );
        Err(LocatorError::NotFound { probes })
    }
}

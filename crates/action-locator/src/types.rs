//! Core types for locator system

use std::fmt;

use action_primitives::SharedElement;
use stepwright_core_types::CandidateDescriptor;

/// Why a candidate was or was not accepted
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeVerdict {
    /// Exactly one visible match
    Accepted,
    /// Nothing matched
    NoMatch,
    /// Matches exist but none is visible
    Hidden,
    /// More than one visible match
    Ambiguous,
    /// Descriptor violates its field-group rule
    Malformed(String),
    /// The document failed to evaluate the query
    QueryFailed(String),
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeVerdict::Accepted => f.write_str("accepted"),
            ProbeVerdict::NoMatch => f.write_str("no match"),
            ProbeVerdict::Hidden => f.write_str("not visible"),
            ProbeVerdict::Ambiguous => f.write_str("ambiguous"),
            ProbeVerdict::Malformed(reason) => write!(f, "malformed: {}", reason),
            ProbeVerdict::QueryFailed(reason) => write!(f, "query failed: {}", reason),
        }
    }
}

/// Result of examining one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProbe {
    /// Position in the ordered candidate list (0 = primary)
    pub position: usize,
    pub candidate: CandidateDescriptor,
    /// Matches after the disambiguation index was applied
    pub matches: usize,
    /// Visible matches among the sampled ones
    pub visible: usize,
    pub verdict: ProbeVerdict,
}

impl CandidateProbe {
    pub fn accepted(&self) -> bool {
        self.verdict == ProbeVerdict::Accepted
    }
}

impl fmt::Display for CandidateProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.candidate, self.verdict)?;
        if matches!(self.verdict, ProbeVerdict::Hidden | ProbeVerdict::Ambiguous) {
            write!(f, " ({} matched, {} visible)", self.matches, self.visible)?;
        }
        Ok(())
    }
}

/// Successful resolution
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// The one visible element the chosen candidate matched
    pub element: SharedElement,
    pub chosen: CandidateDescriptor,
    /// Position of the chosen candidate (0 = primary)
    pub chosen_position: usize,
    /// Every other candidate in input order, capped
    pub alternates: Vec<CandidateDescriptor>,
    pub confidence: f64,
    /// Probes for every examined candidate, up to and including the chosen one
    pub probes: Vec<CandidateProbe>,
}

impl ResolvedTarget {
    /// True when the primary candidate did not resolve
    pub fn used_alternate(&self) -> bool {
        self.chosen_position > 0
    }

    pub fn tried(&self) -> Vec<CandidateDescriptor> {
        self.probes.iter().map(|p| p.candidate.clone()).collect()
    }
}

/// One line per probe, joined for run-log notes
pub fn summarize_probes(probes: &[CandidateProbe]) -> String {
    probes
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

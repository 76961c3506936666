//! Position-tolerant comparison of detections against known elements.

use crate::libs::error::{Result, TeError};
use crate::libs::transposon::Transposon;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A known element, as written by the synthetic sequence generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthRecord {
    #[serde(default)]
    pub id: Option<usize>,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub tsd: String,
    #[serde(default)]
    pub tir: String,
}

/// `{ "num_transposons": n, "transposons": [...] }`; other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    #[serde(default)]
    pub num_transposons: Option<usize>,
    pub transposons: Vec<GroundTruthRecord>,
}

impl GroundTruth {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Any failure is reported as `GroundTruthUnavailable`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TeError::GroundTruthUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json).map_err(|e| {
            TeError::GroundTruthUnavailable(format!("{}: {}", path.display(), e))
        })
    }

    pub fn records(&self) -> &[GroundTruthRecord] {
        &self.transposons
    }
}

/// Inclusive `(start, end)` on the sequence
pub trait Span {
    fn span(&self) -> (usize, usize);
}

impl Span for Transposon {
    fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl Span for GroundTruthRecord {
    fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl Span for (usize, usize) {
    fn span(&self) -> (usize, usize) {
        *self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// A truth record may be claimed by any number of detections
    #[default]
    FirstMatch,
    /// A truth record is claimed at most once
    Exclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub num_ground_truth: usize,
    pub num_detected: usize,
    pub true_positives: usize,
    pub precision: f64,
    pub recall: f64,
}

/// Overlapping, and both endpoints within `tolerance`
pub fn matches<D: Span, T: Span>(detected: &D, truth: &T, tolerance: usize) -> bool {
    let (d_start, d_end) = detected.span();
    let (t_start, t_end) = truth.span();

    d_start <= t_end
        && d_end >= t_start
        && d_start.abs_diff(t_start) <= tolerance
        && d_end.abs_diff(t_end) <= tolerance
}

/// Each detection scans the truth records in order and stops at its first match.
///
/// ```
/// # use tefind::libs::validate::{validate, MatchMode};
/// let detected: Vec<(usize, usize)> = vec![(10, 50)];
/// let truth: Vec<(usize, usize)> = vec![(12, 48)];
/// let report = validate(&detected, &truth, 10, MatchMode::FirstMatch);
/// assert_eq!(report.true_positives, 1);
/// assert_eq!(report.precision, 1.0);
/// assert_eq!(report.recall, 1.0);
/// ```
pub fn validate<D: Span, T: Span>(
    detected: &[D],
    truth: &[T],
    tolerance: usize,
    mode: MatchMode,
) -> ValidationReport {
    let mut claimed = vec![false; truth.len()];
    let mut true_positives = 0;

    for d in detected {
        let hit = truth.iter().enumerate().position(|(idx, t)| {
            !(mode == MatchMode::Exclusive && claimed[idx]) && matches(d, t, tolerance)
        });
        if let Some(idx) = hit {
            claimed[idx] = true;
            true_positives += 1;
        }
    }

    let precision = if detected.is_empty() {
        0.0
    } else {
        true_positives as f64 / detected.len() as f64
    };
    let recall = if truth.is_empty() {
        0.0
    } else {
        true_positives as f64 / truth.len() as f64
    };

    ValidationReport {
        num_ground_truth: truth.len(),
        num_detected: detected.len(),
        true_positives,
        precision,
        recall,
    }
}

//! Genome-wide inverted-repeat census: short TIRs as transposon markers.

use crate::libs::error::{Result, TeError};
use crate::libs::nt::Sequence;
use crate::libs::repeat::{
    select_inverted_repeats, BruteForce, Cancel, InvertedRepeat, RepeatScan, TirParams,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyParams {
    pub tir: TirParams,
    /// Repeats listed in the report
    pub top: usize,
    pub threads: usize,
}

impl Default for SurveyParams {
    fn default() -> Self {
        Self {
            tir: TirParams {
                min_len: 4,
                max_len: 6,
                min_gap: 10,
                max_gap: 100,
            },
            top: 20,
            threads: 1,
        }
    }
}

impl SurveyParams {
    pub fn validate(&self) -> Result<()> {
        self.tir.validate()?;
        if self.threads == 0 {
            return Err(TeError::InvalidParams(
                "thread count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthCount {
    pub length: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub name: String,
    pub length: usize,
    pub total_inverted_repeats: usize,
    /// Longest first
    pub by_length: Vec<LengthCount>,
    pub top: Vec<InvertedRepeat>,
    pub density_per_mbp: f64,
}

/// Counts pruned inverted repeats of `seq`, longest first.
pub fn survey(
    name: &str,
    seq: &Sequence,
    params: &SurveyParams,
    cancel: &Cancel,
) -> Result<SurveyReport> {
    params.validate()?;
    let scanner = BruteForce::with_threads(params.threads);
    let repeats = select_inverted_repeats(scanner.inverted(seq, &params.tir, cancel)?);
    log::info!("{}: {} inverted repeats", name, repeats.len());

    let by_length = repeats
        .iter()
        .counts_by(|ir| ir.length)
        .into_iter()
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .map(|(length, count)| LengthCount { length, count })
        .collect();

    let density_per_mbp = if seq.is_empty() {
        0.0
    } else {
        repeats.len() as f64 / seq.len() as f64 * 1_000_000.0
    };

    Ok(SurveyReport {
        name: name.to_string(),
        length: seq.len(),
        total_inverted_repeats: repeats.len(),
        by_length,
        top: repeats.iter().take(params.top).cloned().collect(),
        density_per_mbp,
    })
}

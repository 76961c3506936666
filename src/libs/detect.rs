//! The detection pipeline.
//!
//! ```text
//! sequence ─┬─ inverted repeats ── select (longest first) ──┐
//!           │                                               ├─ assemble ── select (leftmost first)
//!           └─ direct repeats ──────────────────────────────┘
//! ```
//!
//! Every stage is a pure function of its inputs. The only state is the
//! used-position set local to each selection.

use crate::libs::error::{Result, TeError};
use crate::libs::nt::Sequence;
use crate::libs::repeat::{
    select_inverted_repeats, BruteForce, Cancel, RepeatScan, TirParams, TsdParams,
};
use crate::libs::transposon::{assemble, select_transposons, Transposon};
use crate::libs::validate::{validate, GroundTruthRecord, MatchMode, ValidationReport};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectParams {
    pub tir: TirParams,
    pub tsd: TsdParams,
    /// The inner gap of a TSD pair must exceed this
    pub min_element_len: usize,
    pub threads: usize,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            tir: TirParams::default(),
            tsd: TsdParams::default(),
            min_element_len: 30,
            threads: 1,
        }
    }
}

impl DetectParams {
    pub fn validate(&self) -> Result<()> {
        self.tir.validate()?;
        self.tsd.validate()?;
        if self.threads == 0 {
            return Err(TeError::InvalidParams(
                "thread count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Detection result for one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub name: String,
    pub sequence_length: usize,
    /// After pruning
    pub num_inverted_repeats: usize,
    /// Raw candidates
    pub num_direct_repeats: usize,
    pub num_detected: usize,
    pub transposons: Vec<Transposon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl Detection {
    /// Attaches a validation report against `truth`
    pub fn validate_against(
        &mut self,
        truth: &[GroundTruthRecord],
        tolerance: usize,
        mode: MatchMode,
    ) -> &ValidationReport {
        let report = validate(&self.transposons, truth, tolerance, mode);
        info!(
            "Validation: {} true positives, precision {:.2}, recall {:.2}",
            report.true_positives, report.precision, report.recall
        );
        self.validation.insert(report)
    }
}

/// Runs the pipeline with a pluggable repeat scanner.
pub struct Detector<S: RepeatScan = BruteForce> {
    scanner: S,
    params: DetectParams,
    cancel: Cancel,
}

impl Detector<BruteForce> {
    pub fn new(params: DetectParams) -> Self {
        Self::with_scanner(BruteForce::with_threads(params.threads), params)
    }
}

impl<S: RepeatScan> Detector<S> {
    pub fn with_scanner(scanner: S, params: DetectParams) -> Self {
        Self {
            scanner,
            params,
            cancel: Cancel::none(),
        }
    }

    pub fn with_cancel(mut self, cancel: Cancel) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn params(&self) -> &DetectParams {
        &self.params
    }

    pub fn run(&self, name: &str, seq: &Sequence) -> Result<Detection> {
        self.params.validate()?;
        if seq.is_empty() {
            warn!("{}: empty sequence", name);
        }

        info!("Searching for inverted repeats (TIRs)...");
        let raw = self.scanner.inverted(seq, &self.params.tir, &self.cancel)?;
        let tirs = select_inverted_repeats(raw);
        info!("Found {} inverted repeat pairs", tirs.len());

        info!("Searching for direct repeats (TSDs)...");
        let tsds = self.scanner.direct(seq, &self.params.tsd, &self.cancel)?;
        info!("Found {} direct repeat pairs", tsds.len());

        let candidates = assemble(&tirs, &tsds, self.params.min_element_len)?;
        let transposons = select_transposons(candidates);
        info!("Detected {} transposable element(s)", transposons.len());

        Ok(Detection {
            name: name.to_string(),
            sequence_length: seq.len(),
            num_inverted_repeats: tirs.len(),
            num_direct_repeats: tsds.len(),
            num_detected: transposons.len(),
            transposons,
            validation: None,
        })
    }
}

/// Final, non-overlapping elements of `seq`
pub fn detect_transposons(seq: &Sequence, params: &DetectParams) -> Result<Vec<Transposon>> {
    Ok(Detector::new(*params).run("", seq)?.transposons)
}

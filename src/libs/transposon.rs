use crate::libs::error::Result;
use crate::libs::nt::rev_comp_str;
use crate::libs::repeat::{DirectRepeat, InvertedRepeat};
use crate::libs::resolve::{resolve_by, span, Occupancy};
use intspan::IntSpan;
use serde::{Deserialize, Serialize};

/// `high`: TIR pair flanked by a TSD pair. `medium`: TIR pair only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    /// Sort rank, stronger evidence first
    fn rank(&self) -> u8 {
        match self {
            Confidence::High => 0,
            Confidence::Medium => 1,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
        }
    }
}

/// A detected transposable element. Positions are 0-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transposon {
    pub start: usize,
    pub end: usize,
    pub length: usize,
    pub tir_left: String,
    pub tir_right: String,
    pub tir_length: usize,
    pub tir_left_pos: (usize, usize),
    pub tir_right_pos: (usize, usize),
    pub tsd: Option<String>,
    pub tsd_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsd_left_pos: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsd_right_pos: Option<(usize, usize)>,
    pub confidence: Confidence,
}

impl Occupancy for Transposon {
    fn start(&self) -> usize {
        self.start
    }

    fn occupied(&self) -> IntSpan {
        span(self.start, self.end)
    }
}

impl Transposon {
    /// TSD pair around the TIR pair
    pub fn with_tsd(ir: &InvertedRepeat, tsd: &DirectRepeat) -> Result<Self> {
        Ok(Self {
            start: tsd.first_start,
            end: tsd.second_end,
            length: tsd.second_end - tsd.first_start + 1,
            tsd: Some(tsd.repeat_seq.clone()),
            tsd_length: tsd.length,
            tsd_left_pos: Some((tsd.first_start, tsd.first_end)),
            tsd_right_pos: Some((tsd.second_start, tsd.second_end)),
            confidence: Confidence::High,
            ..Self::tir_only(ir)?
        })
    }

    /// Just the TIR region.
    ///
    /// Fails when `ir.repeat_seq` holds a symbol outside the alphabet.
    pub fn tir_only(ir: &InvertedRepeat) -> Result<Self> {
        Ok(Self {
            start: ir.left_start,
            end: ir.right_end,
            length: ir.right_end - ir.left_start + 1,
            tir_left: ir.repeat_seq.clone(),
            tir_right: rev_comp_str(&ir.repeat_seq)?,
            tir_length: ir.length,
            tir_left_pos: (ir.left_start, ir.left_end),
            tir_right_pos: (ir.right_start, ir.right_end),
            tsd: None,
            tsd_length: 0,
            tsd_left_pos: None,
            tsd_right_pos: None,
            confidence: Confidence::Medium,
        })
    }

    /// `TSD|TIR...TIR|TSD`
    pub fn structure(&self) -> String {
        match &self.tsd {
            Some(tsd) => format!("{}|{}...{}|{}", tsd, self.tir_left, self.tir_right, tsd),
            None => format!("{}...{}", self.tir_left, self.tir_right),
        }
    }
}

/// Longest TSD pair enclosing `ir` whose inner gap exceeds `min_element_len`.
///
/// Ties go to the first candidate in `tsds` order.
pub fn best_tsd<'a>(
    ir: &InvertedRepeat,
    tsds: &'a [DirectRepeat],
    min_element_len: usize,
) -> Option<&'a DirectRepeat> {
    let mut best: Option<&DirectRepeat> = None;
    for dr in tsds {
        if dr.first_end < ir.left_start
            && dr.second_start > ir.right_end
            && dr.second_start - dr.first_end > min_element_len
            && best.map_or(true, |b| dr.length > b.length)
        {
            best = Some(dr);
        }
    }
    best
}

/// One candidate per TIR, in TIR order.
pub fn assemble(
    tirs: &[InvertedRepeat],
    tsds: &[DirectRepeat],
    min_element_len: usize,
) -> Result<Vec<Transposon>> {
    tirs.iter()
        .map(|ir| match best_tsd(ir, tsds, min_element_len) {
            Some(dr) => Transposon::with_tsd(ir, dr),
            None => Transposon::tir_only(ir),
        })
        .collect()
}

/// The leftmost element wins among overlapping ones; at equal starts `high`
/// beats `medium`.
pub fn select_transposons(candidates: Vec<Transposon>) -> Vec<Transposon> {
    resolve_by(candidates, |te| (te.start, te.confidence.rank()))
}

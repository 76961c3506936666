use crate::libs::error::{Result, TeError};
use crate::libs::nt::{complement, is_n, Sequence};
use crate::libs::repeat::{collect_starts, Cancel};
use crate::libs::resolve::{resolve_by, span, Occupancy};
use intspan::IntSpan;
use log::debug;
use serde::{Deserialize, Serialize};

/// A pair of reverse-complementary windows, candidate terminal inverted repeats.
///
/// Positions are 0-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedRepeat {
    pub left_start: usize,
    pub left_end: usize,
    pub right_start: usize,
    pub right_end: usize,
    pub length: usize,
    /// Bases between the two windows
    pub spacing: usize,
    /// Content of the left window
    pub repeat_seq: String,
}

impl Occupancy for InvertedRepeat {
    fn start(&self) -> usize {
        self.left_start
    }

    fn occupied(&self) -> IntSpan {
        let mut ints = span(self.left_start, self.left_end);
        ints.merge(&span(self.right_start, self.right_end));
        ints
    }
}

/// Search window for inverted repeats.
///
/// The right window starts `min_gap..=max_gap` bases after the left window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TirParams {
    pub min_len: usize,
    pub max_len: usize,
    pub min_gap: usize,
    pub max_gap: usize,
}

impl Default for TirParams {
    fn default() -> Self {
        Self {
            min_len: 8,
            max_len: 8,
            min_gap: 10,
            max_gap: 100,
        }
    }
}

impl TirParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_len == 0 {
            return Err(TeError::InvalidParams(
                "TIR min length must be positive".to_string(),
            ));
        }
        if self.min_len > self.max_len {
            return Err(TeError::InvalidParams(format!(
                "TIR min length {} exceeds max length {}",
                self.min_len, self.max_len
            )));
        }
        if self.min_gap > self.max_gap {
            return Err(TeError::InvalidParams(format!(
                "TIR min gap {} exceeds max gap {}",
                self.min_gap, self.max_gap
            )));
        }
        Ok(())
    }
}

/// All inverted repeats, longest lengths first, then by left start.
///
/// Windows containing `N` never serve as a left window.
///
/// ```
/// # use tefind::libs::nt::Sequence;
/// # use tefind::libs::repeat::{find_inverted_repeats, TirParams};
/// let seq = Sequence::new("AAAATTTTAAAA").unwrap();
/// let params = TirParams { min_len: 4, max_len: 4, min_gap: 0, max_gap: 4 };
/// let repeats = find_inverted_repeats(&seq, &params).unwrap();
/// assert_eq!(repeats[0].left_start, 0);
/// assert_eq!(repeats[0].right_start, 4);
/// ```
pub fn find_inverted_repeats(seq: &Sequence, params: &TirParams) -> Result<Vec<InvertedRepeat>> {
    scan(seq, params, &Cancel::none(), false)
}

pub(crate) fn scan(
    seq: &Sequence,
    params: &TirParams,
    cancel: &Cancel,
    parallel: bool,
) -> Result<Vec<InvertedRepeat>> {
    params.validate()?;

    let n = seq.len();
    let mut repeats = vec![];
    for len in (params.min_len..=params.max_len).rev() {
        if len > n {
            continue;
        }
        let found = collect_starts(0..n - len + 1, parallel, cancel, |i| {
            scan_left_window(seq, params, len, i)
        })?;
        debug!("{} bp: {} inverted repeats", len, found.len());
        repeats.extend(found);
    }

    Ok(repeats)
}

fn scan_left_window(seq: &Sequence, params: &TirParams, len: usize, i: usize) -> Vec<InvertedRepeat> {
    let n = seq.len();
    let left = seq.window(i, len);
    if left.iter().any(|&nt| is_n(nt)) {
        return vec![];
    }
    // Sequence is validated, every base has a complement
    let rc: Vec<u8> = left.iter().rev().filter_map(|&nt| complement(nt)).collect();

    let lo = (i + len).saturating_add(params.min_gap);
    let hi = std::cmp::min((i + len).saturating_add(params.max_gap), n - len);
    if lo > hi {
        return vec![];
    }

    (lo..=hi)
        .filter(|&j| seq.window(j, len) == rc.as_slice())
        .map(|j| InvertedRepeat {
            left_start: i,
            left_end: i + len - 1,
            right_start: j,
            right_end: j + len - 1,
            length: len,
            spacing: j - (i + len),
            repeat_seq: seq.window_string(i, len),
        })
        .collect()
}

/// Prunes redundant candidates: longer repeats win, then the leftmost.
pub fn select_inverted_repeats(repeats: Vec<InvertedRepeat>) -> Vec<InvertedRepeat> {
    resolve_by(repeats, |ir| std::cmp::Reverse(ir.length))
}

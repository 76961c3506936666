use crate::libs::error::{Result, TeError};
use crate::libs::nt::Sequence;
use crate::libs::repeat::{collect_starts, Cancel};
use log::debug;
use serde::{Deserialize, Serialize};

/// Two identical windows, candidate target site duplications.
///
/// Positions are 0-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectRepeat {
    pub first_start: usize,
    pub first_end: usize,
    pub second_start: usize,
    pub second_end: usize,
    pub length: usize,
    /// `second_start - first_start`
    pub distance: usize,
    pub repeat_seq: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsdParams {
    pub min_len: usize,
    pub max_len: usize,
    /// Farthest second copy, counted from the end of the first
    pub max_distance: usize,
}

impl Default for TsdParams {
    fn default() -> Self {
        Self {
            min_len: 5,
            max_len: 12,
            max_distance: 100,
        }
    }
}

impl TsdParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_len == 0 {
            return Err(TeError::InvalidParams(
                "TSD min length must be positive".to_string(),
            ));
        }
        if self.min_len > self.max_len {
            return Err(TeError::InvalidParams(format!(
                "TSD min length {} exceeds max length {}",
                self.min_len, self.max_len
            )));
        }
        Ok(())
    }
}

/// All direct repeats, shortest lengths first, then by first start.
///
/// No ambiguity filter: `NNNNN` matches `NNNNN`.
pub fn find_direct_repeats(seq: &Sequence, params: &TsdParams) -> Result<Vec<DirectRepeat>> {
    scan(seq, params, &Cancel::none(), false)
}

pub(crate) fn scan(
    seq: &Sequence,
    params: &TsdParams,
    cancel: &Cancel,
    parallel: bool,
) -> Result<Vec<DirectRepeat>> {
    params.validate()?;

    let n = seq.len();
    let mut repeats = vec![];
    for len in params.min_len..=params.max_len {
        if len > n {
            break;
        }
        let found = collect_starts(0..n - len + 1, parallel, cancel, |i| {
            scan_first_window(seq, params, len, i)
        })?;
        debug!("{} bp: {} direct repeats", len, found.len());
        repeats.extend(found);
    }

    Ok(repeats)
}

fn scan_first_window(seq: &Sequence, params: &TsdParams, len: usize, i: usize) -> Vec<DirectRepeat> {
    let n = seq.len();
    let first = seq.window(i, len);

    // second copy starts strictly after the base following the first
    let lo = i + len + 1;
    let hi = std::cmp::min((i + len).saturating_add(params.max_distance), n - len);
    if lo > hi {
        return vec![];
    }

    (lo..=hi)
        .filter(|&j| seq.window(j, len) == first)
        .map(|j| DirectRepeat {
            first_start: i,
            first_end: i + len - 1,
            second_start: j,
            second_end: j + len - 1,
            length: len,
            distance: j - i,
            repeat_seq: seq.window_string(i, len),
        })
        .collect()
}

//! Nucleotide alphabet {A, C, G, T, N} and reverse complement.

use crate::libs::error::{Result, TeError};

/// Ambiguous base
pub fn is_n(nt: u8) -> bool {
    nt == b'N'
}

/// Watson-Crick complement of an uppercase base. `N` maps to itself.
///
/// ```
/// # use tefind::libs::nt::complement;
/// assert_eq!(complement(b'A'), Some(b'T'));
/// assert_eq!(complement(b'N'), Some(b'N'));
/// assert_eq!(complement(b'a'), None);
/// ```
pub fn complement(nt: u8) -> Option<u8> {
    match nt {
        b'A' => Some(b'T'),
        b'T' => Some(b'A'),
        b'G' => Some(b'C'),
        b'C' => Some(b'G'),
        b'N' => Some(b'N'),
        _ => None,
    }
}

/// Reverse complement of a window.
///
/// ```
/// # use tefind::libs::nt::rev_comp;
/// assert_eq!(rev_comp(b"GATTACA").unwrap(), b"TGTAATC".to_vec());
/// assert_eq!(rev_comp(b"AATT").unwrap(), b"AATT".to_vec());
/// assert!(rev_comp(b"ACXT").is_err());
/// ```
pub fn rev_comp(seq: &[u8]) -> Result<Vec<u8>> {
    let len = seq.len();
    seq.iter()
        .rev()
        .enumerate()
        .map(|(i, &nt)| {
            complement(nt).ok_or(TeError::InvalidSymbol {
                symbol: nt as char,
                position: len - 1 - i,
            })
        })
        .collect()
}

/// `rev_comp` over `&str`
pub fn rev_comp_str(seq: &str) -> Result<String> {
    let rc = rev_comp(seq.as_bytes())?;
    // only ASCII bases survive rev_comp
    Ok(rc.into_iter().map(char::from).collect())
}

/// An immutable, validated nucleotide sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    bases: Vec<u8>,
}

impl Sequence {
    /// Validates an uppercase sequence.
    ///
    /// ```
    /// # use tefind::libs::nt::Sequence;
    /// let seq = Sequence::new("ACGTN").unwrap();
    /// assert_eq!(seq.len(), 5);
    /// assert!(Sequence::new("acgt").is_err());
    /// ```
    pub fn new(seq: impl AsRef<[u8]>) -> Result<Self> {
        let bases = seq.as_ref().to_vec();
        if let Some(position) = bases.iter().position(|&nt| complement(nt).is_none()) {
            return Err(TeError::InvalidSymbol {
                symbol: bases[position] as char,
                position,
            });
        }
        Ok(Self { bases })
    }

    /// Uppercases first, then validates.
    pub fn normalize(seq: impl AsRef<[u8]>) -> Result<Self> {
        Self::new(seq.as_ref().to_ascii_uppercase())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Bases in `[start, start + len)`
    pub fn window(&self, start: usize, len: usize) -> &[u8] {
        &self.bases[start..start + len]
    }

    /// Window as an owned string
    pub fn window_string(&self, start: usize, len: usize) -> String {
        self.window(start, len).iter().map(|&b| char::from(b)).collect()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.window_string(0, self.len()))
    }
}

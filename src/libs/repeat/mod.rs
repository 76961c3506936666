//! Repeat scanning: inverted repeats (TIR candidates) and direct repeats (TSD candidates).
//!
//! Both scanners compare every window against every window inside a bounded
//! search range. This is the reference algorithm: O(lengths × n × width).
//!
//! # Core Components
//!
//! * [`inverted`] - Windows equal to the reverse complement of a downstream window.
//! * [`direct`] - Windows equal to a downstream window.
//! * [`RepeatScan`] - The seam an index-accelerated scanner plugs into. Any
//!   implementation must return exactly the candidates of [`BruteForce`], in
//!   the same order.
//!
//! # Parallelism
//!
//! For each window length, left-window starts are independent. With more
//! than one thread the starts are mapped on a rayon pool and the per-start
//! vectors are concatenated in start order, so the output never depends on
//! the thread count.

pub mod direct;
pub mod inverted;

pub use direct::{find_direct_repeats, DirectRepeat, TsdParams};
pub use inverted::{find_inverted_repeats, select_inverted_repeats, InvertedRepeat, TirParams};

use crate::libs::error::{Result, TeError};
use crate::libs::nt::Sequence;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation token with an optional deadline.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl Cancel {
    /// Never trips
    pub fn none() -> Self {
        Self::default()
    }

    /// Trips when [`Cancel::cancel`] is called on any clone
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fails when the deadline is too far out to represent
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        let deadline = Instant::now().checked_add(timeout).ok_or_else(|| {
            TeError::InvalidParams(format!("timeout {:?} is out of range", timeout))
        })?;
        Ok(self.with_deadline(deadline))
    }

    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::Relaxed);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        if let Some(flag) = &self.flag {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A source of raw repeat candidates.
pub trait RepeatScan {
    fn inverted(
        &self,
        seq: &Sequence,
        params: &TirParams,
        cancel: &Cancel,
    ) -> Result<Vec<InvertedRepeat>>;

    fn direct(
        &self,
        seq: &Sequence,
        params: &TsdParams,
        cancel: &Cancel,
    ) -> Result<Vec<DirectRepeat>>;
}

/// Exhaustive window comparison, optionally spread over a rayon pool.
#[derive(Debug, Clone, Copy)]
pub struct BruteForce {
    threads: usize,
}

impl Default for BruteForce {
    fn default() -> Self {
        Self::serial()
    }
}

impl BruteForce {
    pub fn serial() -> Self {
        Self { threads: 1 }
    }

    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    fn run<T, F>(&self, job: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(bool) -> Result<T> + Send,
    {
        if self.threads <= 1 {
            return job(false);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| TeError::InvalidParams(format!("thread pool: {}", e)))?;
        pool.install(|| job(true))
    }
}

impl RepeatScan for BruteForce {
    fn inverted(
        &self,
        seq: &Sequence,
        params: &TirParams,
        cancel: &Cancel,
    ) -> Result<Vec<InvertedRepeat>> {
        self.run(|parallel| inverted::scan(seq, params, cancel, parallel))
    }

    fn direct(
        &self,
        seq: &Sequence,
        params: &TsdParams,
        cancel: &Cancel,
    ) -> Result<Vec<DirectRepeat>> {
        self.run(|parallel| direct::scan(seq, params, cancel, parallel))
    }
}

/// Runs `per_start` for every left-window start and concatenates the
/// results in start order.
pub(crate) fn collect_starts<T, F>(
    starts: std::ops::Range<usize>,
    parallel: bool,
    cancel: &Cancel,
    per_start: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Vec<T> + Sync + Send,
{
    let found: Vec<Vec<T>> = if parallel {
        starts
            .into_par_iter()
            .map(|i| {
                cancel.check()?;
                Ok(per_start(i))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        starts
            .map(|i| {
                cancel.check()?;
                Ok(per_start(i))
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(found.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn random_seq(len: usize, seed: u64) -> Sequence {
        let mut rng = SmallRng::seed_from_u64(seed);
        let bases: Vec<u8> = (0..len)
            .map(|_| b"ACGTN"[rng.gen_range(0..5)])
            .collect();
        Sequence::new(bases).unwrap()
    }

    #[test]
    fn test_cancel() {
        assert!(!Cancel::none().is_cancelled());

        let token = Cancel::new();
        let other = token.clone();
        assert!(token.check().is_ok());
        other.cancel();
        assert!(matches!(token.check(), Err(TeError::Cancelled)));

        let expired = Cancel::none().with_deadline(Instant::now());
        assert!(expired.is_cancelled());

        let later = Cancel::new().with_timeout(Duration::from_secs(3600)).unwrap();
        assert!(!later.is_cancelled());
        assert!(matches!(
            Cancel::new().with_timeout(Duration::MAX),
            Err(TeError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_cancelled_scan() {
        let seq = random_seq(200, 7);
        let token = Cancel::new();
        token.cancel();

        let res = BruteForce::serial().inverted(&seq, &TirParams::default(), &token);
        assert!(matches!(res, Err(TeError::Cancelled)));

        let res = BruteForce::with_threads(2).direct(&seq, &TsdParams::default(), &token);
        assert!(matches!(res, Err(TeError::Cancelled)));
    }

    #[test]
    fn test_parallel_matches_serial() {
        for seed in 0..4 {
            let seq = random_seq(300, seed);
            let serial = BruteForce::serial();
            let parallel = BruteForce::with_threads(4);

            let tir = TirParams::default();
            assert_eq!(
                serial.inverted(&seq, &tir, &Cancel::none()).unwrap(),
                parallel.inverted(&seq, &tir, &Cancel::none()).unwrap()
            );

            let tsd = TsdParams::default();
            assert_eq!(
                serial.direct(&seq, &tsd, &Cancel::none()).unwrap(),
                parallel.direct(&seq, &tsd, &Cancel::none()).unwrap()
            );
        }
    }

    #[test]
    fn test_threads_floor() {
        assert_eq!(BruteForce::with_threads(0).threads(), 1);
        assert_eq!(BruteForce::default().threads(), 1);
    }
}

//! Aggregate progress across the uploads of one submission
//!
//! Each of the `n` uploads owns a slice `100 / n` wide of a shared 0-100 readout.
//! Slices remember the best value they have reported, so interleaved and
//! out-of-order callbacks from concurrent uploads can never move the aggregate
//! backwards.

use std::sync::{Arc, Mutex};

use clubhub_storage::ProgressFn;

const FULL_SLICE: u32 = 10_000;

/// Position of upload `index` of `total` at its own progress `progress` (0-100).
///
/// This is the aggregate seen when uploads run one after another.
pub fn compose(index: usize, total: usize, progress: f64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let width = 100.0 / total as f64;
    index as f64 * width + progress.clamp(0.0, 100.0) / total as f64
}

struct AllocatorState {
    // Basis points (0..=10_000) per slice.
    slices: Vec<u32>,
    reported: Option<u32>,
    sink: ProgressFn,
}

impl AllocatorState {
    fn aggregate(&self) -> u32 {
        let sum: u64 = self.slices.iter().map(|s| u64::from(*s)).sum();
        (sum / self.slices.len() as u64) as u32
    }
}

/// Splits one progress sink into per-upload slices.
#[derive(Clone)]
pub struct ProgressAllocator {
    state: Arc<Mutex<AllocatorState>>,
}

impl ProgressAllocator {
    /// Returns `None` when there is nothing to allocate, so the sink is never called.
    pub fn new(total: usize, sink: ProgressFn) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self {
            state: Arc::new(Mutex::new(AllocatorState {
                slices: vec![0; total],
                reported: None,
                sink,
            })),
        })
    }

    pub fn len(&self) -> usize {
        self.lock().slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current aggregate percentage.
    pub fn current(&self) -> f64 {
        f64::from(self.lock().aggregate()) / 100.0
    }

    /// Progress callback for upload `index`.
    ///
    /// The sink is invoked under the allocator lock, so it must not call back into
    /// the allocator.
    pub fn slice(&self, index: usize) -> ProgressFn {
        let state = Arc::clone(&self.state);
        Arc::new(move |percent: f64| {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            let Some(slot) = state.slices.get_mut(index) else {
                return;
            };
            // Floor so a slice only counts as complete when it reports exactly 100.
            let value = (percent.clamp(0.0, 100.0) * 100.0).floor() as u32;
            if value <= *slot {
                return;
            }
            *slot = value;

            let aggregate = state.aggregate();
            if state.reported.is_some_and(|last| aggregate <= last) {
                return;
            }
            state.reported = Some(aggregate);
            (state.sink)(f64::from(aggregate) / 100.0);
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AllocatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

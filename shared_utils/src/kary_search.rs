//! K-ary threshold search
//!
//! Finds the smallest point of `[-1, n]` whose predicate passes, assuming the
//! predicate is monotone: false for every point up to some boundary, true for
//! every point above it. Each level probes up to `k` interior points
//! concurrently, waits for all of them, then narrows the interval to the gap
//! between the highest failing and the lowest passing probe.
//!
//! ```
//! use shared_utils::kary_search::kary_search;
//!
//! let boundary = 37;
//! assert_eq!(kary_search(100, 4, |q| q > boundary), 38);
//! ```

use std::convert::Infallible;
use std::sync::mpsc;
use std::thread;
use tracing::debug;

/// Floor sentinel, treated as failing without evaluation.
pub const FLOOR: i32 = -1;

/// Smallest usable concurrency factor; lower values are clamped to it.
pub const MIN_CONCURRENCY: usize = 2;

/// Outcome of evaluating the predicate at one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub point: i32,
    pub passed: bool,
}

/// Open search window.
///
/// `start` is known to fail (or is [`FLOOR`]) and `end` is known to pass (or
/// is the domain ceiling). The answer always lies in `(start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchInterval {
    pub start: i32,
    pub end: i32,
}

impl SearchInterval {
    /// Whole domain `[-1, n]`.
    pub fn full(n: i32) -> Self {
        Self {
            start: FLOOR,
            end: n,
        }
    }

    /// Distance between the bounds, widened so `full(i32::MAX)` cannot overflow.
    #[inline]
    pub fn width(&self) -> i64 {
        i64::from(self.end) - i64::from(self.start)
    }

    /// No untested point is left between the bounds; `end` is the answer.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.width() <= 1
    }

    /// Points to probe on this level, highest first.
    ///
    /// Wider than `k`: `k` points spaced `width / k` apart. Otherwise every
    /// point. Points that land on `end` are skipped since `end` is already
    /// known, so only integers strictly between the bounds are returned.
    pub fn probe_points(&self, k: usize) -> Vec<i32> {
        let k = i64::try_from(k.max(MIN_CONCURRENCY)).unwrap_or(i64::MAX);
        let width = self.width();
        let (chunk, count) = if width > k { (width / k, k) } else { (1, width) };
        let (start, end) = (i64::from(self.start), i64::from(self.end));

        (1..=count)
            .rev()
            .map(|i| start + i * chunk)
            .filter(|&point| point < end)
            .filter_map(|point| i32::try_from(point).ok())
            .collect()
    }

    /// Tighten the bounds with one probe result.
    ///
    /// Results outside the current window are ignored, so probes may be
    /// folded in any order and more than once.
    pub fn fold(&mut self, probe: Probe) {
        if probe.point <= self.start || probe.point >= self.end {
            return;
        }
        if probe.passed {
            self.end = probe.point;
        } else {
            self.start = probe.point;
        }
    }
}

/// Search with an infallible predicate.
///
/// `n` is the domain ceiling and is never evaluated: if nothing below it
/// passes, `n` is returned. `k < 2` behaves like `k = 2`.
pub fn kary_search<F>(n: i32, k: usize, f: F) -> i32
where
    F: Fn(i32) -> bool + Sync,
{
    match try_kary_search(n, k, |point| Ok::<_, Infallible>(f(point))) {
        Ok(point) => point,
        Err(never) => match never {},
    }
}

/// Search with a fallible predicate.
///
/// The first error reported on a level aborts the search once that level's
/// probes have all returned. Nothing is retried.
pub fn try_kary_search<F, E>(n: i32, k: usize, f: F) -> Result<i32, E>
where
    F: Fn(i32) -> Result<bool, E> + Sync,
    E: Send,
{
    search_between(SearchInterval::full(n), k.max(MIN_CONCURRENCY), &f, &mut |_| {})
}

/// One level per call. `on_level` sees every interval the search enters,
/// including the resolved one it stops at.
fn search_between<F, E, O>(
    interval: SearchInterval,
    k: usize,
    f: &F,
    on_level: &mut O,
) -> Result<i32, E>
where
    F: Fn(i32) -> Result<bool, E> + Sync,
    E: Send,
    O: FnMut(&SearchInterval),
{
    on_level(&interval);
    if interval.is_resolved() {
        return Ok(interval.end);
    }

    let points = interval.probe_points(k);
    debug!(
        start = interval.start,
        end = interval.end,
        probes = ?points,
        "Probing search level"
    );

    let mut next = interval;
    for probe in probe_level(&points, f)? {
        next.fold(probe);
    }

    search_between(next, k, f, on_level)
}

/// Evaluate every point on its own thread and wait for all of them.
///
/// Results are returned in arrival order.
fn probe_level<F, E>(points: &[i32], f: &F) -> Result<Vec<Probe>, E>
where
    F: Fn(i32) -> Result<bool, E> + Sync,
    E: Send,
{
    let (tx, rx) = mpsc::sync_channel(points.len());

    thread::scope(|scope| {
        for &point in points {
            let tx = tx.clone();
            scope.spawn(move || {
                // the receiver outlives every worker in this scope
                let _ = tx.send((point, f(point)));
            });
        }
        drop(tx);

        let mut probes = Vec::with_capacity(points.len());
        let mut first_error = None;
        for (point, outcome) in rx.iter().take(points.len()) {
            match outcome {
                Ok(passed) => probes.push(Probe { point, passed }),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(probes),
        }
    })
}

//! Wall-clock accounting of containment checks, compiled in with the
//! `profiling` feature and free otherwise.
//!
//! Labels in use: `build::contains`, `count::contains`, `brute::contains`.

use std::fmt::Write;
use std::time::Duration;

/// Accumulated calls and time of one label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sample {
    /// Number of timed calls.
    pub calls: u64,
    /// Sum of their durations.
    pub total: Duration,
}

impl Sample {
    #[cfg_attr(not(feature = "profiling"), allow(dead_code))]
    fn add(&mut self, elapsed: Duration) {
        self.calls += 1;
        self.total += elapsed;
    }

    /// Average duration of one call.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.calls) {
            Ok(0) => Duration::ZERO,
            Ok(calls) => self.total / calls,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.calls as f64),
        }
    }
}

/// Lays out samples as a table, largest total first.
#[cfg_attr(not(feature = "profiling"), allow(dead_code))]
fn render(mut samples: Vec<(&'static str, Sample)>) -> String {
    if samples.is_empty() {
        return String::new();
    }
    samples.sort_by(|a, b| b.1.total.cmp(&a.1.total).then(a.0.cmp(b.0)));

    let mut out = format!("{:<20} {:>10} {:>14} {:>14}\n", "check", "calls", "total", "mean");
    for (label, sample) in samples {
        let total = format!("{:.3?}", sample.total);
        let mean = format!("{:.3?}", sample.mean());
        let _ = writeln!(out, "{label:<20} {:>10} {total:>14} {mean:>14}", sample.calls);
    }
    out
}

#[cfg(feature = "profiling")]
mod enabled {
    use std::sync::OnceLock;
    use std::time::{Duration, Instant};

    use dashmap::DashMap;

    use super::Sample;

    static SAMPLES: OnceLock<DashMap<&'static str, Sample>> = OnceLock::new();

    fn samples() -> &'static DashMap<&'static str, Sample> {
        SAMPLES.get_or_init(DashMap::new)
    }

    /// Adds the time between creation and drop to its label.
    pub struct Timer {
        label: &'static str,
        start: Instant,
    }

    impl Timer {
        /// Starts timing under `label`.
        #[inline]
        pub fn new(label: &'static str) -> Self {
            Self {
                label,
                start: Instant::now(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            record(self.label, self.start.elapsed());
        }
    }

    /// Adds one call of length `elapsed` to `label`.
    pub fn record(label: &'static str, elapsed: Duration) {
        samples().entry(label).or_default().add(elapsed);
    }

    /// Everything recorded under `label` so far.
    pub fn sample(label: &str) -> Sample {
        samples().get(label).map(|entry| *entry).unwrap_or_default()
    }

    /// Renders every label recorded so far.
    pub fn report() -> String {
        super::render(samples().iter().map(|kv| (*kv.key(), *kv.value())).collect())
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    use std::time::Duration;

    use super::Sample;

    /// No-op stand-in when profiling is compiled out.
    #[derive(Clone, Copy)]
    pub struct Timer;

    impl Timer {
        /// Does nothing.
        #[inline]
        pub const fn new(_: &'static str) -> Self {
            Self
        }
    }

    /// Does nothing.
    pub const fn record(_: &'static str, _: Duration) {}

    /// Always empty.
    pub const fn sample(_: &str) -> Sample {
        Sample {
            calls: 0,
            total: Duration::ZERO,
        }
    }

    /// Always empty.
    pub const fn report() -> String {
        String::new()
    }
}

#[cfg(feature = "profiling")]
pub use enabled::*;

#[cfg(not(feature = "profiling"))]
pub use disabled::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(calls: u64, millis: u64) -> Sample {
        Sample {
            calls,
            total: Duration::from_millis(millis),
        }
    }

    #[test]
    fn mean_divides_total_by_calls() {
        assert_eq!(timed(4, 10).mean(), Duration::from_micros(2500));
        assert_eq!(Sample::default().mean(), Duration::ZERO);
    }

    #[test]
    fn render_orders_by_total_time() {
        let table = render(vec![
            ("count::contains", timed(2, 1)),
            ("build::contains", timed(5, 7)),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("check"));
        assert!(lines[1].starts_with("build::contains"));
        assert!(lines[1].contains("7.000ms"));
        assert!(lines[2].starts_with("count::contains"));
        assert!(render(Vec::new()).is_empty());
    }

    #[test]
    fn timers_feed_the_report() {
        for _ in 0..3 {
            let _t = Timer::new("test::timer");
        }
        if cfg!(feature = "profiling") {
            assert!(sample("test::timer").calls >= 3);
            assert!(report().contains("test::timer"));
        } else {
            assert_eq!(sample("test::timer"), Sample::default());
            assert!(report().is_empty());
        }
    }
}

//! Timing instrumentation for the slow paths: decoding, rasterizing, export.
//!
//! [`ScopedTimer`] is an RAII timer: it logs the elapsed time at `debug!` when
//! dropped and escalates to `warn!` when the operation ran past its threshold.
//!
//! The `profile_scope!` macro places a timer only when the `profiling`
//! feature is enabled and compiles to nothing otherwise:
//!
//! ```ignore
//! fn render(&mut self) {
//!     profile_scope!("surface::render");
//!     // ...
//! }
//! ```

use std::time::Instant;
use tracing::{debug, warn};
#[cfg(feature = "profiling")]
use tracing::trace;

/// Threshold for interactive work (one 60 FPS frame)
pub const INTERACTIVE_WARN_MS: f64 = 16.67;

/// Threshold for file decoding and page rendering
pub const LOAD_WARN_MS: f64 = 500.0;

/// Threshold for building an export artifact
pub const EXPORT_WARN_MS: f64 = 2000.0;

/// Time a scope. Zero-cost unless the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use profile_scope;

/// Logs how long it lived when dropped.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
    #[cfg(feature = "profiling")]
    depth: usize,
}

// Nesting depth, for indenting profiling output
#[cfg(feature = "profiling")]
thread_local! {
    static CURRENT_DEPTH: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        #[cfg(feature = "profiling")]
        let depth = CURRENT_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });

        Self {
            name,
            start: Instant::now(),
            threshold_ms,
            #[cfg(feature = "profiling")]
            depth,
        }
    }

    /// A timer with a 1ms threshold, used by `profile_scope!`.
    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, 1.0)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_slow(&self) -> bool {
        self.elapsed_ms() > self.threshold_ms
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        #[cfg(feature = "profiling")]
        {
            CURRENT_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            let indent = "  ".repeat(self.depth);
            trace!("{}[PERF] {}: {:.2}ms", indent, self.name, elapsed_ms);
        }

        if elapsed_ms > self.threshold_ms {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow operation"
            );
        } else {
            debug!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                "operation finished"
            );
        }
    }
}

/// Run a closure under a [`ScopedTimer`].
#[inline]
pub fn measure_and_log<T, F: FnOnce() -> T>(name: &'static str, threshold_ms: f64, f: F) -> T {
    let _timer = ScopedTimer::new(name, threshold_ms);
    f()
}

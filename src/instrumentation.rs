use std::time::{Duration, Instant};

/// Resources used by a measured computation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Measurement {
    pub elapsed: Duration,
    /// Growth of the peak resident set size of the process in KiB.
    pub memory_delta_kib: i64,
}

impl Measurement {
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Run `f` and record its wall-clock time and the growth of the peak resident memory of the process.
///
/// Since the peak can only grow, memory that `f` allocates below an earlier peak is not observed.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Measurement) {
    let memory_before = peak_resident_memory_kib();
    let start_time = Instant::now();

    let result = f();

    let elapsed = start_time.elapsed();
    let memory_after = peak_resident_memory_kib();

    (
        result,
        Measurement {
            elapsed,
            memory_delta_kib: memory_after - memory_before,
        },
    )
}

#[cfg(unix)]
fn peak_resident_memory_kib() -> i64 {
    let rusage = unsafe {
        let mut rusage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
        if libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr()) != 0 {
            return 0;
        }
        rusage.assume_init()
    };

    // Linux reports KiB, macOS reports bytes.
    let max_rss = i64::from(rusage.ru_maxrss);
    if cfg!(target_os = "macos") {
        max_rss / 1024
    } else {
        max_rss
    }
}

#[cfg(not(unix))]
fn peak_resident_memory_kib() -> i64 {
    0
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{measure, Measurement};

    #[test]
    fn measure_returns_result_unchanged() {
        let (result, measurement) = measure(|| (0..100u64).sum::<u64>());
        assert_eq!(result, 4950);
        assert!(measurement.memory_delta_kib >= 0);
    }

    #[test]
    fn measure_records_elapsed_time() {
        let (_, measurement) = measure(|| std::thread::sleep(Duration::from_millis(5)));
        assert!(measurement.elapsed >= Duration::from_millis(5));
        assert!(measurement.elapsed_millis() >= 5.0);
    }

    #[test]
    fn elapsed_millis_converts_duration() {
        let measurement = Measurement {
            elapsed: Duration::from_micros(1500),
            memory_delta_kib: 0,
        };
        assert!((measurement.elapsed_millis() - 1.5).abs() < 1e-9);
    }
}

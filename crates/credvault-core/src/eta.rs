//! Progress estimation for long running operations

use crate::prelude::*;

/// Estimated seconds left and processing rate, given the start time and
/// progress so far
pub fn eta(start: Timestamp, done: u64, total: u64, now: Timestamp) -> (i64, f64) {
	if done == 0 || total == 0 {
		return (0, 0.0);
	}

	let runtime = (now.0 - start.0).max(1) as f64;
	let remaining = (total as f64 * runtime) / done as f64 - runtime;
	(remaining as i64, done as f64 / runtime)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_eta() {
		let (secs, rate) = eta(Timestamp(100), 25, 100, Timestamp(110));
		assert_eq!(secs, 30);
		assert!((rate - 2.5).abs() < f64::EPSILON);
	}

	#[test]
	fn test_eta_nothing_done() {
		assert_eq!(eta(Timestamp(100), 0, 100, Timestamp(110)), (0, 0.0));
		assert_eq!(eta(Timestamp(100), 5, 0, Timestamp(110)), (0, 0.0));
	}

	#[test]
	fn test_eta_zero_runtime() {
		let (secs, rate) = eta(Timestamp(100), 10, 20, Timestamp(100));
		assert_eq!(secs, 1);
		assert!((rate - 10.0).abs() < f64::EPSILON);
	}
}

// vim: ts=4

//! Verbosity-gated diagnostic sink.
//!
//! Grounded on `logger.cpp`'s `CLogControl`/`CLog`: a global verbosity mode
//! gates whether a message is reported at all, an explicit indent counter
//! (not span depth — the original increments/decrements it independent of
//! the call tree) prefixes continuation lines, and [`LogScope`] prints
//! "Entering:"/"Leaving:" markers the way `CLog`'s constructor/destructor do.
//!
//! Output itself goes through `tracing` rather than `std::clog` directly, so
//! downstream tooling can still attach its own subscriber/formatter.

use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verbosity {
	None,
	Errors,
	All,
}

impl Verbosity {
	fn as_u8(self) -> u8 {
		match self {
			Verbosity::None => 0,
			Verbosity::Errors => 1,
			Verbosity::All => 2,
		}
	}

	fn from_u8(value: u8) -> Verbosity {
		match value {
			0 => Verbosity::None,
			1 => Verbosity::Errors,
			_ => Verbosity::All,
		}
	}
}

static VERBOSITY: AtomicU8 = AtomicU8::new(2); // Verbosity::All
static INDENT: AtomicI32 = AtomicI32::new(0);

pub fn set_verbosity(mode: Verbosity) {
	VERBOSITY.store(mode.as_u8(), Ordering::Relaxed);
}

pub fn verbosity() -> Verbosity {
	Verbosity::from_u8(VERBOSITY.load(Ordering::Relaxed))
}

fn increase_indent() {
	INDENT.fetch_add(1, Ordering::Relaxed);
}

fn decrease_indent() {
	INDENT.fetch_sub(1, Ordering::Relaxed);
}

fn indent_string() -> String {
	"  ".repeat(INDENT.load(Ordering::Relaxed).max(0) as usize)
}

/// Reports `text` subject to the current verbosity mode; every embedded
/// newline is followed by the current indentation, matching the line-by-line
/// re-prefixing `CLogControl::Log` performs.
pub fn log(text: &str, is_error: bool) {
	match verbosity() {
		Verbosity::None => return,
		Verbosity::Errors if !is_error => return,
		_ => {}
	}
	let indent = indent_string();
	let mut first = true;
	for line in text.split_inclusive('\n') {
		if !first || !indent.is_empty() {
			if is_error {
				tracing::error!("{}{}", indent, line.trim_end_matches('\n'));
			} else {
				tracing::info!("{}{}", indent, line.trim_end_matches('\n'));
			}
		} else if is_error {
			tracing::error!("{}", line.trim_end_matches('\n'));
		} else {
			tracing::info!("{}", line.trim_end_matches('\n'));
		}
		first = false;
	}
}

pub fn info(text: &str) {
	log(text, false);
}

pub fn error(text: &str) {
	log(text, true);
}

/// RAII scoped task. Prints "Entering: <task>" on construction and
/// "Leaving: <task>" on drop, mirroring `CLog`'s behavior when given a
/// non-empty task name; an empty name suppresses both markers.
pub struct LogScope {
	task: String,
}

impl LogScope {
	pub fn enter(task: impl Into<String>) -> LogScope {
		let task = task.into();
		if !task.is_empty() {
			info(&format!("Entering: {task}\n"));
		}
		increase_indent();
		LogScope { task }
	}
}

impl Drop for LogScope {
	fn drop(&mut self) {
		if !self.task.is_empty() {
			info(&format!("Leaving: {}\n", self.task));
		}
		decrease_indent();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing_test::traced_test;

	#[test]
	fn verbosity_none_suppresses_everything() {
		set_verbosity(Verbosity::None);
		info("should not appear");
		set_verbosity(Verbosity::All);
	}

	#[test]
	fn errors_mode_suppresses_info() {
		set_verbosity(Verbosity::Errors);
		assert_eq!(verbosity(), Verbosity::Errors);
		set_verbosity(Verbosity::All);
	}

	#[traced_test]
	#[test]
	fn scope_emits_entering_and_leaving() {
		set_verbosity(Verbosity::All);
		{
			let _scope = LogScope::enter("unit test task");
		}
		assert!(logs_contain("Entering: unit test task"));
		assert!(logs_contain("Leaving: unit test task"));
	}

	#[test]
	fn indent_is_independent_of_nesting_depth() {
		set_verbosity(Verbosity::All);
		assert_eq!(INDENT.load(Ordering::Relaxed), 0);
		{
			let _a = LogScope::enter("outer");
			assert_eq!(INDENT.load(Ordering::Relaxed), 1);
			{
				let _b = LogScope::enter("inner");
				assert_eq!(INDENT.load(Ordering::Relaxed), 2);
			}
			assert_eq!(INDENT.load(Ordering::Relaxed), 1);
		}
		assert_eq!(INDENT.load(Ordering::Relaxed), 0);
	}
}

//! Compile-time error type shared by every core subsystem.
//!
//! Mirrors `CCompileException`/`XCompileError` from the original compiler: every
//! lexical, constant-expression, or CLI failure carries a source path, a
//! line/column, the offending token text and a human-readable reason. Compile
//! errors are not caught internally except to fill in context the inner layer
//! did not know about (see [`CompileError::with_path`]).

use std::fmt::{Display, Formatter};

use crate::token::Token;

/// A single compile-time failure, carrying enough context to point a user at
/// the exact source location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileError {
	path: Option<String>,
	line: u32,
	col: u32,
	token: String,
	reason: String,
}

impl CompileError {
	/// Construct an error with only a reason; no location is known yet.
	pub fn new(reason: impl Into<String>) -> Self {
		CompileError {
			path: None,
			line: 0,
			col: 0,
			token: String::new(),
			reason: reason.into(),
		}
	}

	/// Construct an error located at the given token.
	pub fn at_token(token: &Token, reason: impl Into<String>) -> Self {
		CompileError {
			path: token.context_path().map(str::to_owned),
			line: token.line(),
			col: token.col(),
			token: token.text().to_owned(),
			reason: reason.into(),
		}
	}

	/// Construct an error located at a raw line/column, without a captured token.
	pub fn at(line: u32, col: u32, reason: impl Into<String>) -> Self {
		CompileError {
			path: None,
			line,
			col,
			token: String::new(),
			reason: reason.into(),
		}
	}

	/// Fill in the source file path, unless one is already set (matches
	/// `CCompileException::SetPath`, which only ever enriches, never overwrites).
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		if self.path.is_none() {
			self.path = Some(path.into());
		}
		self
	}

	pub fn path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn col(&self) -> u32 {
		self.col
	}

	pub fn token(&self) -> &str {
		&self.token
	}

	pub fn reason(&self) -> &str {
		&self.reason
	}
}

impl Display for CompileError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(path) = &self.path {
			write!(f, "{path}:")?;
		}
		if self.line != 0 {
			write!(f, "{}:{}: ", self.line, self.col)?;
		}
		write!(f, "{}", self.reason)?;
		if !self.token.is_empty() {
			write!(f, " (near '{}')", self.token)?;
		}
		Ok(())
	}
}

impl std::error::Error for CompileError {}

/// Result alias used throughout the core; every fallible operation in the
/// lexer, constant-expression engine and CLI surface returns this.
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_includes_location_and_token() {
		let err = CompileError::at(3, 7, "Invalid characters following literal.")
			.with_path("foo.idl");
		let err = CompileError {
			token: "1234a".into(),
			..err
		};
		assert_eq!(
			err.to_string(),
			"foo.idl:3:7: Invalid characters following literal. (near '1234a')"
		);
	}

	#[test]
	fn with_path_does_not_override_existing_path() {
		let err = CompileError::new("oops").with_path("a.idl").with_path("b.idl");
		assert_eq!(err.path(), Some("a.idl"));
	}

	#[test]
	fn bare_reason_has_no_trailing_decoration() {
		let err = CompileError::new("Division by zero.");
		assert_eq!(err.to_string(), "Division by zero.");
	}
}

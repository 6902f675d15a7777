//! Immutable, line-aware cursor over an in-memory source buffer.
//!
//! Mirrors `CCodePos` from the original compiler: a byte-oriented view with
//! 1-based line/column tracking, independent of any particular text encoding.
//! Every [`CodePos`] clone is an independent cursor sharing the same
//! underlying buffer, the same way `BlobHeap`/`GuidHeap` share their
//! `ArcRef<[u8]>` storage.

use std::sync::Arc;

use owning_ref::ArcRef;

use crate::token::{LiteralType, Token, TokenType};

/// Width to which tab stops are aligned (columns are 1-based, so column `c`
/// advances to the next value of the form `4k + 1`).
const TAB_WIDTH: u32 = 4;

#[derive(Clone)]
pub struct CodePos {
	source: ArcRef<str>,
	offset: usize,
	line: u32,
	col: u32,
	path: Option<Arc<str>>,
}

/// A lightweight snapshot of cursor position, used to capture the start of a
/// token before scanning advances past it.
#[derive(Copy, Clone)]
pub struct Mark {
	offset: usize,
	line: u32,
	col: u32,
}

impl CodePos {
	pub fn new(source: impl Into<Arc<str>>) -> Self {
		Self::with_path(source, None)
	}

	pub fn with_path(source: impl Into<Arc<str>>, path: Option<impl Into<Arc<str>>>) -> Self {
		CodePos {
			source: ArcRef::new(source.into()).map(|s| s),
			offset: 0,
			line: 1,
			col: 1,
			path: path.map(Into::into),
		}
	}

	#[inline]
	fn bytes(&self) -> &[u8] {
		self.source.as_bytes()
	}

	/// The byte at the cursor, or `0` past the end of the buffer.
	#[inline]
	pub fn current(&self) -> u8 {
		self.peek(0)
	}

	/// The byte at `offset + n`, or `0` past the end of the buffer.
	#[inline]
	pub fn peek(&self, n: usize) -> u8 {
		self.bytes().get(self.offset + n).copied().unwrap_or(0)
	}

	#[inline]
	pub fn has_eof(&self) -> bool {
		self.current() == 0
	}

	#[inline]
	pub fn is_valid(&self) -> bool {
		true
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn col(&self) -> u32 {
		self.col
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	/// Advance the cursor by exactly one byte, applying tab and newline rules.
	/// CRLF is folded into a single logical newline by [`Self::advance`]'s
	/// caller loop (the lexer's whitespace routine consumes `\r\n` together);
	/// this method treats every `\n` as a newline and every lone `\r` as an
	/// ordinary column-advancing byte.
	fn advance_one(&mut self) {
		if self.offset >= self.bytes().len() {
			return;
		}
		let byte = self.bytes()[self.offset];
		self.offset += 1;
		match byte {
			b'\n' => {
				self.line += 1;
				self.col = 1;
			}
			b'\t' => {
				self.col = ((self.col - 1) / TAB_WIDTH + 1) * TAB_WIDTH + 1;
			}
			_ => {
				self.col += 1;
			}
		}
	}

	/// Move the cursor forward by `n` bytes, updating line and column.
	pub fn advance(&mut self, n: usize) {
		for _ in 0..n {
			self.advance_one();
		}
	}

	/// If the cursor sits on a backslash immediately followed by a newline
	/// (LF or CRLF), consume the continuation and report whether it did so.
	///
	/// In normal mode the continuation is invisible: the line counter is
	/// *not* advanced (the physical line break is spliced away, as in C).
	/// In preprocessor mode the continuation still counts as a physical
	/// newline, which is how multi-line preprocessor directives keep
	/// accurate line numbers while still being joined into one logical line.
	pub fn skip_line_continuation(&mut self, preprocessor_mode: bool) -> bool {
		if self.current() != b'\\' {
			return false;
		}
		let consumed = if self.peek(1) == b'\n' {
			2
		} else if self.peek(1) == b'\r' && self.peek(2) == b'\n' {
			3
		} else {
			return false;
		};
		self.offset += consumed;
		if preprocessor_mode {
			self.line += 1;
			self.col = 1;
		}
		true
	}

	/// Capture a [`Mark`] at the current position, to later produce a token
	/// spanning from here to wherever the cursor ends up.
	pub fn mark(&self) -> Mark {
		Mark {
			offset: self.offset,
			line: self.line,
			col: self.col,
		}
	}

	/// Seed a token at the current position; its end is stamped later via
	/// [`Self::update_location`].
	pub fn snapshot_as_token_start(&self, ty: TokenType) -> Token {
		Token::from_mark(self.mark(), ty, self.path.clone())
	}

	/// Stamp the token's end position using the cursor's current location,
	/// and fill in the text spanned since the token's start mark.
	pub fn update_location(&self, token: &mut Token) {
		self.update_location_literal(token, LiteralType::Undefined);
	}

	pub fn update_location_literal(&self, token: &mut Token, literal: LiteralType) {
		let start = token.start_offset();
		let text = self.source.clone().map(|s| &s[start..self.offset]);
		token.finish(self.line, self.col, text, literal);
	}

	/// Produce a token spanning from `mark` to the current position in one
	/// step; a convenience used by scanners that don't need the
	/// start-then-advance-then-finish dance spelled out.
	pub fn token_since(&self, mark: Mark, ty: TokenType, literal: LiteralType) -> Token {
		let mut token = Token::from_mark(mark, ty, self.path.clone());
		let text = self.source.clone().map(|s| &s[mark.offset..self.offset]);
		token.finish(self.line, self.col, text, literal);
		token
	}
}

impl Mark {
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn col(&self) -> u32 {
		self.col
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tab_aligns_to_next_multiple_of_four() {
		let mut pos = CodePos::new(" \t");
		pos.advance(1); // space: col 1 -> 2
		assert_eq!(pos.col(), 2);
		pos.advance(1); // tab: col 2 -> 5
		assert_eq!(pos.col(), 5);
	}

	#[test]
	fn newline_resets_column_and_increments_line() {
		let mut pos = CodePos::new("ab\ncd");
		pos.advance(3);
		assert_eq!(pos.line(), 2);
		assert_eq!(pos.col(), 1);
	}

	#[test]
	fn eof_reads_as_zero_byte() {
		let pos = CodePos::new("");
		assert!(pos.has_eof());
		assert_eq!(pos.current(), 0);
	}

	#[test]
	fn line_continuation_hidden_in_normal_mode() {
		let mut pos = CodePos::new("a\\\nb");
		pos.advance(1); // 'a'
		assert!(pos.skip_line_continuation(false));
		assert_eq!(pos.line(), 1);
		assert_eq!(pos.current(), b'b');
	}

	#[test]
	fn line_continuation_counts_in_preprocessor_mode() {
		let mut pos = CodePos::new("a\\\nb");
		pos.advance(1);
		assert!(pos.skip_line_continuation(true));
		assert_eq!(pos.line(), 2);
		assert_eq!(pos.col(), 1);
	}

	#[test]
	fn crlf_line_continuation_consumes_three_bytes() {
		let mut pos = CodePos::new("a\\\r\nb");
		pos.advance(1);
		assert!(pos.skip_line_continuation(false));
		assert_eq!(pos.current(), b'b');
	}
}

//! Lexical tokens produced by [`crate::lexer`].
//!
//! Mirrors `CToken`/`ETokenType`/`ETokenLiteralType` from the original
//! compiler: a token is a classified, located span of source text, optionally
//! refined with a literal sub-kind when `ty` is [`TokenType::Literal`].

use owning_ref::ArcRef;

use std::sync::Arc;

use crate::codepos::Mark;

/// Coarse classification of a token, matching `ETokenType`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
	Whitespace,
	Comment,
	Identifier,
	Keyword,
	Separator,
	Operator,
	Literal,
	Preprocessor,
	/// The empty token: signals end-of-input and doubles as the dummy value
	/// returned when a [`crate::tokenlist::TokenList`] cursor runs past the end.
	Undefined,
}

impl Default for TokenType {
	fn default() -> Self {
		TokenType::Undefined
	}
}

/// Refines [`TokenType::Literal`] tokens, matching `ETokenLiteralType`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum LiteralType {
	#[default]
	Undefined,
	DecInteger,
	HexInteger,
	OctInteger,
	BinInteger,
	DecFloatingPoint,
	HexFloatingPoint,
	FixedPoint,
	Boolean,
	Nullptr,
	Character,
	CharacterSequence,
	String,
	RawString,
}

/// A classified, located span of source text.
///
/// Cloning a `Token` is cheap: the captured text is an [`ArcRef<str>`]
/// sharing storage with the [`crate::codepos::CodePos`] it was cut from,
/// never a fresh heap copy.
#[derive(Clone)]
pub struct Token {
	ty: TokenType,
	literal: LiteralType,
	start_line: u32,
	start_col: u32,
	end_line: u32,
	end_col: u32,
	start_offset: usize,
	path: Option<Arc<str>>,
	text: Option<ArcRef<str>>,
}

impl Token {
	/// Begin a token at a captured [`Mark`]; call [`Self::finish`] once the
	/// scanner has advanced past the token's last byte.
	pub fn from_mark(mark: Mark, ty: TokenType, path: Option<Arc<str>>) -> Self {
		Token {
			ty,
			literal: LiteralType::Undefined,
			start_line: mark.line(),
			start_col: mark.col(),
			end_line: mark.line(),
			end_col: mark.col(),
			start_offset: mark.offset(),
			path,
			text: None,
		}
	}

	pub(crate) fn start_offset(&self) -> usize {
		self.start_offset
	}

	pub(crate) fn finish(&mut self, end_line: u32, end_col: u32, text: ArcRef<str>, literal: LiteralType) {
		self.end_line = end_line;
		self.end_col = end_col;
		self.literal = literal;
		self.text = Some(text);
	}

	/// A synthetic end-of-input token at the given position, carrying no text.
	pub fn eof(line: u32, col: u32, path: Option<Arc<str>>) -> Self {
		Token {
			ty: TokenType::Undefined,
			literal: LiteralType::Undefined,
			start_line: line,
			start_col: col,
			end_line: line,
			end_col: col,
			start_offset: 0,
			path,
			text: None,
		}
	}

	pub fn ty(&self) -> TokenType {
		self.ty
	}

	pub fn literal_type(&self) -> LiteralType {
		self.literal
	}

	pub fn is_literal(&self) -> bool {
		self.ty == TokenType::Literal
	}

	/// True for the empty/terminator token (see [`TokenType::Undefined`]).
	pub fn is_undefined(&self) -> bool {
		self.ty == TokenType::Undefined
	}

	pub fn start_line(&self) -> u32 {
		self.start_line
	}

	pub fn start_col(&self) -> u32 {
		self.start_col
	}

	pub fn end_line(&self) -> u32 {
		self.end_line
	}

	pub fn end_col(&self) -> u32 {
		self.end_col
	}

	/// The token's location, for error reporting: its starting line/column.
	pub fn line(&self) -> u32 {
		self.start_line
	}

	pub fn col(&self) -> u32 {
		self.start_col
	}

	pub fn context_path(&self) -> Option<&str> {
		self.path.as_deref()
	}

	/// The exact source text spanned by this token, or an empty string for a
	/// token that was never finished (e.g. the synthetic EOF marker).
	pub fn text(&self) -> &str {
		match &self.text {
			Some(text) => text,
			None => "",
		}
	}
}

impl std::fmt::Debug for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Token")
			.field("ty", &self.ty)
			.field("literal", &self.literal)
			.field("start", &(self.start_line, self.start_col))
			.field("end", &(self.end_line, self.end_col))
			.field("text", &self.text())
			.finish()
	}
}

impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		self.ty == other.ty
			&& self.literal == other.literal
			&& self.start_line == other.start_line
			&& self.start_col == other.start_col
			&& self.text() == other.text()
	}
}

impl Default for Token {
	/// The dummy/undefined token: `TokenList` returns this when the cursor
	/// runs past the end, matching `CTokenList::Current`'s `tokenDummy`.
	fn default() -> Self {
		Token::eof(0, 0, None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codepos::CodePos;

	#[test]
	fn captures_text_span_from_mark() {
		let mut pos = CodePos::new("hello world");
		let mark = pos.mark();
		pos.advance(5);
		let token = pos.token_since(mark, TokenType::Identifier, LiteralType::Undefined);
		assert_eq!(token.text(), "hello");
		assert_eq!(token.start_col(), 1);
		assert_eq!(token.end_col(), 6);
	}

	#[test]
	fn eof_token_has_no_text() {
		let token = Token::eof(3, 1, None);
		assert_eq!(token.text(), "");
		assert_eq!(token.ty(), TokenType::Undefined);
	}
}

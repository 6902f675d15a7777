//! Numeric, string, character, boolean and `nullptr` literal recognition.
//!
//! Ported from `CLexer::GetLiteral`. Scanning happens on a cloned cursor so a
//! rejected literal never perturbs the caller's position; the clone is only
//! written back on success.

use crate::codepos::CodePos;
use crate::error::{CompileError, Result};
use crate::lexer::LexingMode;
use crate::text_interpreter::{self, DecodedText, Encoding, WideWidth};
use crate::token::{LiteralType, Token, TokenType};

/// Width used for the `L`-prefixed wide encoding; the original's `wchar_t`
/// width is platform-specific (2 on Windows, 4 on Linux/macOS). Fixed to
/// 4 here: there is no target platform to detect, and 4 is the more
/// permissive choice (it only restricts wide character sequences to the
/// 2-character case, never rejects a would-be-valid 4-character one).
const WIDE_WIDTH: WideWidth = WideWidth::Four;

pub(super) fn get_literal(code: &mut CodePos, mode: LexingMode) -> Result<Token> {
	let mark = code.mark();
	let mut local = code.clone();

	let literal_ty = if local.current().is_ascii_digit() || local.current() == b'.' {
		scan_numeric(&mut local)?
	} else {
		scan_textual(&mut local)?
	};

	if mode != LexingMode::Preproc {
		let b = local.current();
		if b.is_ascii_alphanumeric() || b == b'_' {
			return Err(CompileError::at(local.line(), local.col(), "Invalid characters following literal."));
		}
	}

	*code = local;
	Ok(code.token_since(mark, TokenType::Literal, literal_ty))
}

fn scan_numeric(code: &mut CodePos) -> Result<LiteralType> {
	let mut collection: &[u8] = b"0123456789";
	let mut ty = LiteralType::DecInteger;

	if code.current() == b'0' && code.peek(1).to_ascii_lowercase() == b'x' {
		code.advance(2);
		collection = b"0123456789abcdefABCDEF";
		ty = LiteralType::HexInteger;
	} else if code.current() == b'0' && code.peek(1).to_ascii_lowercase() == b'b' {
		code.advance(2);
		collection = b"01";
		ty = LiteralType::BinInteger;
	} else if code.current() == b'0' && code.peek(1) != b'e' && code.peek(1) != b'E' && code.peek(1) != b'.' {
		collection = b"01234567";
		ty = LiteralType::OctInteger;
	}

	if !collection.contains(&code.current()) && code.current() != b'.' {
		return Err(CompileError::at(code.line(), code.col(), "Invalid number literal"));
	}

	let consume_digits = |code: &mut CodePos, collection: &[u8]| {
		while (collection.contains(&code.current()) || code.current() == b'\'') && code.current() != 0 {
			code.advance(1);
		}
	};
	consume_digits(code, collection);

	let suffix = code.current().to_ascii_lowercase();
	let starts_float = (ty == LiteralType::DecInteger && matches!(suffix, b'.' | b'e' | b'd'))
		|| (ty == LiteralType::HexInteger && matches!(suffix, b'.' | b'p'));

	if starts_float {
		if code.current() == b'.' {
			code.advance(1);
			consume_digits(code, collection);
		}

		let mut exponent = false;
		if ty == LiteralType::DecInteger {
			ty = LiteralType::DecFloatingPoint;
			if code.current().to_ascii_lowercase() == b'e' {
				exponent = true;
				code.advance(1);
			} else if code.current().to_ascii_lowercase() == b'd' {
				ty = LiteralType::FixedPoint;
				code.advance(1);
			}
		}
		if ty == LiteralType::HexInteger {
			ty = LiteralType::HexFloatingPoint;
			if code.current().to_ascii_lowercase() == b'p' {
				exponent = true;
				code.advance(1);
			}
		}

		if exponent {
			if code.current() == b'+' || code.current() == b'-' {
				code.advance(1);
			}
			if !code.current().is_ascii_digit() {
				return Err(CompileError::at(code.line(), code.col(), "Invalid float literal"));
			}
			while code.current().is_ascii_digit() {
				code.advance(1);
			}
		}

		if ty != LiteralType::FixedPoint && matches!(code.current(), b'f' | b'F' | b'l' | b'L') {
			code.advance(1);
		}
	} else {
		let mut unsigned = false;
		if code.current().to_ascii_lowercase() == b'u' {
			code.advance(1);
			unsigned = true;
		}
		if code.current().to_ascii_lowercase() == b'l' {
			if code.current() == code.peek(1) {
				code.advance(2);
			} else {
				code.advance(1);
			}
			if !unsigned && code.current().to_ascii_lowercase() == b'u' {
				code.advance(1);
			}
		}
	}

	Ok(ty)
}

/// True if `code` sits at exactly `word`, not itself followed by another
/// alphanumeric byte (so `true` matches but `truefoo` does not; a trailing
/// `_`, as in `true_foo`, still matches here and is rejected afterwards by
/// [`get_literal`]'s "no characters may follow a literal" check instead).
fn matches_keyword(code: &CodePos, word: &str) -> bool {
	if !word.bytes().enumerate().all(|(i, b)| code.peek(i) == b) {
		return false;
	}
	!code.peek(word.len()).is_ascii_alphanumeric()
}

fn scan_textual(code: &mut CodePos) -> Result<LiteralType> {
	for (word, ty, advance) in [
		("true", LiteralType::Boolean, 4),
		("TRUE", LiteralType::Boolean, 4),
		("false", LiteralType::Boolean, 5),
		("FALSE", LiteralType::Boolean, 5),
		("nullptr", LiteralType::Nullptr, 7),
		("NULL", LiteralType::Nullptr, 4),
	] {
		if matches_keyword(code, word) {
			code.advance(advance);
			return Ok(ty);
		}
	}

	let mut encoding = Encoding::Ascii;
	match code.current() {
		b'u' => {
			code.advance(1);
			if code.current() == b'8' {
				encoding = Encoding::Utf8;
				code.advance(1);
			} else {
				encoding = Encoding::Utf16;
			}
		}
		b'U' => {
			code.advance(1);
			encoding = Encoding::Utf32;
		}
		b'L' => {
			code.advance(1);
			encoding = Encoding::Wide(WIDE_WIDTH);
		}
		_ => {}
	}

	let mut raw = false;
	if code.current() == b'R' {
		raw = true;
		code.advance(1);
	}

	let is_string = code.current() == b'"';
	let is_char = code.current() == b'\'';
	if !is_string && !is_char {
		return Err(CompileError::at(code.line(), code.col(), "Expecting a literal."));
	}
	if is_char {
		if raw {
			return Err(CompileError::at(code.line(), code.col(), "No raw character literal support."));
		}
		if matches!(encoding, Encoding::Utf8) {
			return Err(CompileError::at(
				code.line(),
				code.col(),
				"No UTF-8 character literal support; use ASCII character literal instead.",
			));
		}
	}

	let mut literal_ty = if is_string {
		if raw { LiteralType::RawString } else { LiteralType::String }
	} else {
		LiteralType::Character
	};

	code.advance(1); // opening quote/apostrophe

	let mut delimiter = String::new();
	if raw {
		delimiter.push(')');
		loop {
			if delimiter.len() > 16 {
				return Err(CompileError::at(code.line(), code.col(), "Invalid string; unexpected end of file detected."));
			}
			if code.current() == 0 {
				return Err(CompileError::at(code.line(), code.col(), "Invalid string; unexpected end of file detected."));
			}
			if code.current() == b'(' {
				break;
			}
			delimiter.push(code.current() as char);
			code.advance(1);
		}
		delimiter.push('"');
		if code.current() != b'(' {
			return Err(CompileError::at(code.line(), code.col(), "Invalid string; expecting '('."));
		}
		code.advance(1);
	} else {
		delimiter.push(if is_char { '\'' } else { '"' });
	}

	let decoded = text_interpreter::decode(code, &delimiter, encoding, raw)?;

	if is_char && decoded.unit_count() > 1 {
		literal_ty = classify_sequence(&decoded, encoding, code)?;
	}

	Ok(literal_ty)
}

fn classify_sequence(decoded: &DecodedText, encoding: Encoding, code: &CodePos) -> Result<LiteralType> {
	let count = decoded.unit_count();
	match encoding {
		Encoding::Ascii => match count {
			2 | 4 | 8 => Ok(LiteralType::CharacterSequence),
			_ => Err(CompileError::at(
				code.line(),
				code.col(),
				"Invalid character sequence; only 2, 4 or 8 characters are allowed.",
			)),
		},
		Encoding::Wide(WideWidth::Two) => match count {
			2 | 4 => Ok(LiteralType::CharacterSequence),
			_ => Err(CompileError::at(code.line(), code.col(), "Invalid character sequence; only 2 or 4 characters are allowed.")),
		},
		Encoding::Wide(WideWidth::Four) => match count {
			2 => Ok(LiteralType::CharacterSequence),
			_ => Err(CompileError::at(code.line(), code.col(), "Invalid character sequence; only 2 characters are allowed.")),
		},
		_ => Err(CompileError::at(
			code.line(),
			code.col(),
			"Character sequences are only allowed with ASCII or wide characters.",
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lit(src: &str) -> (LiteralType, String) {
		let mut code = CodePos::new(src);
		let token = get_literal(&mut code, LexingMode::Idl).unwrap();
		(token.literal_type(), token.text().to_owned())
	}

	#[test]
	fn decimal_integer() {
		let (ty, text) = lit("1234");
		assert_eq!(ty, LiteralType::DecInteger);
		assert_eq!(text, "1234");
	}

	#[test]
	fn hex_integer_with_long_suffix() {
		let (ty, text) = lit("0x100LL");
		assert_eq!(ty, LiteralType::HexInteger);
		assert_eq!(text, "0x100LL");
	}

	#[test]
	fn leading_zero_is_octal_unless_it_looks_like_a_float() {
		assert_eq!(lit("010").0, LiteralType::OctInteger);
		assert_eq!(lit("0.1").0, LiteralType::DecFloatingPoint);
	}

	#[test]
	fn exponent_without_dot_is_still_floating_point() {
		let (ty, text) = lit("1e10");
		assert_eq!(ty, LiteralType::DecFloatingPoint);
		assert_eq!(text, "1e10");
	}

	#[test]
	fn dot_prefixed_float() {
		assert_eq!(lit(".1f").0, LiteralType::DecFloatingPoint);
	}

	#[test]
	fn fixed_point_suffix() {
		let (ty, text) = lit("0.1e-1d");
		assert_eq!(ty, LiteralType::FixedPoint);
		assert_eq!(text, "0.1e-1d");
	}

	#[test]
	fn hex_floating_point() {
		let (ty, text) = lit("0x1.8p0");
		assert_eq!(ty, LiteralType::HexFloatingPoint);
		assert_eq!(text, "0x1.8p0");
	}

	#[test]
	fn plain_string_literal() {
		let (ty, text) = lit(r#""hello""#);
		assert_eq!(ty, LiteralType::String);
		assert_eq!(text, r#""hello""#);
	}

	#[test]
	fn utf8_prefixed_string() {
		assert_eq!(lit(r#"u8"hi""#).0, LiteralType::String);
	}

	#[test]
	fn raw_string_with_delimiter() {
		let (ty, text) = lit(r#"R"abc(he said "hi")abc""#);
		assert_eq!(ty, LiteralType::RawString);
		assert_eq!(text, r#"R"abc(he said "hi")abc""#);
	}

	#[test]
	fn narrow_character_sequence_of_four() {
		assert_eq!(lit("'abcd'").0, LiteralType::CharacterSequence);
	}

	#[test]
	fn narrow_character_sequence_of_three_is_invalid() {
		let mut code = CodePos::new("'abc'");
		let err = get_literal(&mut code, LexingMode::Idl).unwrap_err();
		assert!(err.reason().contains("2, 4 or 8"));
	}

	#[test]
	fn utf8_character_literal_is_rejected() {
		let mut code = CodePos::new("u8'a'");
		let err = get_literal(&mut code, LexingMode::Idl).unwrap_err();
		assert!(err.reason().contains("UTF-8 character literal"));
	}

	#[test]
	fn boolean_literal() {
		assert_eq!(lit("true").0, LiteralType::Boolean);
		assert_eq!(lit("FALSE").0, LiteralType::Boolean);
	}

	#[test]
	fn nullptr_literal() {
		assert_eq!(lit("nullptr").0, LiteralType::Nullptr);
		assert_eq!(lit("NULL").0, LiteralType::Nullptr);
	}

	#[test]
	fn true_prefix_of_identifier_is_not_a_boolean_literal() {
		let mut code = CodePos::new("truefoo");
		let err = get_literal(&mut code, LexingMode::Idl).unwrap_err();
		assert!(err.reason().contains("Expecting a literal"));
	}
}

//! Dynamically typed runtime value used by generated proxy/stub code.
//!
//! Mirrors the original's tagged-union `any` type: one "active type" tag plus
//! the live payload. Unlike [`crate::const_variant::ConstVariant`] this type
//! has no `bool` alternative (the source's literal tag enumeration omits it)
//! and distinguishes several scalar kinds — `char`, `char16`, `char32`,
//! `wchar` — that would otherwise collide with a plain integer `From` impl,
//! so those are reached through named constructors rather than `From`.

use crate::error::{CompileError, Result};

/// An interface reference as seen by the marshalling layer: an opaque
/// pointer-sized handle compared by identity, never dereferenced here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceHandle(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
	Empty,
	Int8(i8),
	UInt8(u8),
	Int16(i16),
	UInt16(u16),
	Int32(i32),
	UInt32(u32),
	Int64(i64),
	UInt64(u64),
	Char(u8),
	Char16(u16),
	Char32(u32),
	WChar(u32),
	Float(f32),
	Double(f64),
	LongDouble(f64),
	Fixed(crate::const_variant::Fixed),
	Str(String),
	U8Str(String),
	U16Str(Vec<u16>),
	U32Str(Vec<u32>),
	WStr(Vec<u32>),
	InterfaceHandle(InterfaceHandle),
	InterfaceId(u64),
	ExceptionId(u64),
}

macro_rules! impl_from {
	($ty:ty, $variant:ident) => {
		impl From<$ty> for AnyValue {
			fn from(value: $ty) -> Self {
				AnyValue::$variant(value)
			}
		}
	};
}

impl_from!(i8, Int8);
impl_from!(u8, UInt8);
impl_from!(i16, Int16);
impl_from!(u16, UInt16);
impl_from!(i32, Int32);
impl_from!(u32, UInt32);
impl_from!(i64, Int64);
impl_from!(u64, UInt64);
impl_from!(f32, Float);
impl_from!(f64, Double);

impl From<&str> for AnyValue {
	/// A narrow string literal constructs as `u8string`, matching the
	/// source's `"Hello"` → `u8string` implicit-construction rule.
	fn from(value: &str) -> Self {
		AnyValue::U8Str(value.to_owned())
	}
}

impl From<String> for AnyValue {
	fn from(value: String) -> Self {
		AnyValue::U8Str(value)
	}
}

impl From<Option<&str>> for AnyValue {
	/// A null C-string pointer constructs as empty, never a crash.
	fn from(value: Option<&str>) -> Self {
		match value {
			Some(s) => AnyValue::U8Str(s.to_owned()),
			None => AnyValue::Empty,
		}
	}
}

impl From<Vec<u16>> for AnyValue {
	fn from(value: Vec<u16>) -> Self {
		AnyValue::U16Str(value)
	}
}

impl From<InterfaceHandle> for AnyValue {
	fn from(value: InterfaceHandle) -> Self {
		AnyValue::InterfaceHandle(value)
	}
}

impl From<crate::const_variant::Fixed> for AnyValue {
	fn from(value: crate::const_variant::Fixed) -> Self {
		AnyValue::Fixed(value)
	}
}

/// Disambiguating constructors for scalar kinds that share an underlying
/// Rust primitive with another tag (`char` vs `uint8`, `u32string` vs
/// `wstring`, `exception_id` vs `interface_id` vs `uint64`).
impl AnyValue {
	pub fn char(value: u8) -> Self {
		AnyValue::Char(value)
	}

	pub fn char16(value: u16) -> Self {
		AnyValue::Char16(value)
	}

	pub fn char32(value: u32) -> Self {
		AnyValue::Char32(value)
	}

	pub fn wchar(value: u32) -> Self {
		AnyValue::WChar(value)
	}

	pub fn wstring(value: Vec<u32>) -> Self {
		AnyValue::WStr(value)
	}

	pub fn u32string(value: Vec<u32>) -> Self {
		AnyValue::U32Str(value)
	}

	pub fn narrow_string(value: String) -> Self {
		AnyValue::Str(value)
	}

	pub fn interface_id(value: u64) -> Self {
		AnyValue::InterfaceId(value)
	}

	pub fn exception_id(value: u64) -> Self {
		AnyValue::ExceptionId(value)
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, AnyValue::Empty)
	}

	fn as_f64(&self) -> Option<f64> {
		match self {
			AnyValue::Int8(v) => Some(*v as f64),
			AnyValue::UInt8(v) => Some(*v as f64),
			AnyValue::Int16(v) => Some(*v as f64),
			AnyValue::UInt16(v) => Some(*v as f64),
			AnyValue::Int32(v) => Some(*v as f64),
			AnyValue::UInt32(v) => Some(*v as f64),
			AnyValue::Int64(v) => Some(*v as f64),
			AnyValue::UInt64(v) => Some(*v as f64),
			AnyValue::Char(v) => Some(*v as f64),
			AnyValue::Char16(v) => Some(*v as f64),
			AnyValue::Char32(v) => Some(*v as f64),
			AnyValue::WChar(v) => Some(*v as f64),
			AnyValue::Float(v) => Some(*v as f64),
			AnyValue::Double(v) => Some(*v),
			AnyValue::LongDouble(v) => Some(*v),
			AnyValue::Fixed(v) => Some(v.to_f64()),
			_ => None,
		}
	}

	fn as_string(&self) -> Option<String> {
		match self {
			AnyValue::Str(s) | AnyValue::U8Str(s) => Some(s.clone()),
			AnyValue::U16Str(v) => Some(String::from_utf16_lossy(v)),
			AnyValue::U32Str(v) | AnyValue::WStr(v) => Some(v.iter().filter_map(|&c| char::from_u32(c)).collect()),
			_ => None,
		}
	}

	fn is_arithmetic(&self) -> bool {
		self.as_f64().is_some()
	}

	fn is_stringlike(&self) -> bool {
		matches!(self, AnyValue::Str(_) | AnyValue::U8Str(_) | AnyValue::U16Str(_) | AnyValue::U32Str(_) | AnyValue::WStr(_))
	}

	/// Converts a value plus explicit target tag, per the source's typed
	/// construction form: string↔number parsing, canonical formatting, and
	/// an interface value converting to zero on any numeric target.
	pub fn with_tag(self, tag: AnyValueTag) -> Result<AnyValue> {
		if tag.matches(&self) {
			return Ok(self);
		}
		match tag {
			AnyValueTag::Empty => Ok(AnyValue::Empty),
			AnyValueTag::Str => Ok(AnyValue::Str(self.coerce_to_string()?)),
			AnyValueTag::U8Str => Ok(AnyValue::U8Str(self.coerce_to_string()?)),
			AnyValueTag::U16Str => Ok(AnyValue::U16Str(self.coerce_to_string()?.encode_utf16().collect())),
			AnyValueTag::U32Str | AnyValueTag::WStr => {
				let s = self.coerce_to_string()?;
				let chars = s.chars().map(|c| c as u32).collect();
				if tag == AnyValueTag::WStr {
					Ok(AnyValue::WStr(chars))
				} else {
					Ok(AnyValue::U32Str(chars))
				}
			}
			_ if tag.is_numeric() => self.coerce_to_numeric(tag),
			_ => Err(CompileError::new("Internal error: unsupported any conversion target.")),
		}
	}

	fn coerce_to_string(&self) -> Result<String> {
		if let Some(s) = self.as_string() {
			return Ok(s);
		}
		if let AnyValue::InterfaceHandle(_) = self {
			return Err(CompileError::new("Cannot convert an interface handle to a string."));
		}
		match self {
			AnyValue::Float(v) => Ok(format!("{v}")),
			AnyValue::Double(v) | AnyValue::LongDouble(v) => Ok(format!("{v}")),
			AnyValue::Fixed(v) => Ok(format!("{}", v.to_f64())),
			_ => self.as_f64().map(|v| format!("{}", v as i64)).ok_or_else(|| CompileError::new("Cannot convert this value to a string.")),
		}
	}

	fn coerce_to_numeric(&self, tag: AnyValueTag) -> Result<AnyValue> {
		let raw = if let AnyValue::InterfaceHandle(_) = self {
			0.0
		} else if let Some(s) = self.as_string() {
			parse_leading_number(&s)?
		} else if let Some(v) = self.as_f64() {
			v
		} else {
			return Err(CompileError::new("Cannot convert this value to a number."));
		};
		Ok(match tag {
			AnyValueTag::Int8 => AnyValue::Int8(raw as i8),
			AnyValueTag::UInt8 => AnyValue::UInt8(raw as u8),
			AnyValueTag::Int16 => AnyValue::Int16(raw as i16),
			AnyValueTag::UInt16 => AnyValue::UInt16(raw as u16),
			AnyValueTag::Int32 => AnyValue::Int32(raw as i32),
			AnyValueTag::UInt32 => AnyValue::UInt32(raw as u32),
			AnyValueTag::Int64 => AnyValue::Int64(raw as i64),
			AnyValueTag::UInt64 => AnyValue::UInt64(raw as u64),
			AnyValueTag::Float => AnyValue::Float(raw as f32),
			AnyValueTag::Double => AnyValue::Double(raw),
			AnyValueTag::LongDouble => AnyValue::LongDouble(raw),
			AnyValueTag::Fixed => AnyValue::Fixed(crate::const_variant::Fixed::from_f64(raw)),
			_ => unreachable!("non-numeric tag handled above"),
		})
	}

	/// `as<T>()`: coerce the stored value to a concrete Rust type, applying
	/// the same string↔number rules as [`with_tag`](Self::with_tag).
	pub fn as_f64_value(&self) -> Result<f64> {
		if let AnyValue::InterfaceHandle(_) = self {
			return Ok(0.0);
		}
		if let Some(v) = self.as_f64() {
			return Ok(v);
		}
		if let Some(s) = self.as_string() {
			return parse_leading_number(&s);
		}
		Err(CompileError::new("Cannot convert this value to a number."))
	}

	pub fn as_string_value(&self) -> Result<String> {
		self.coerce_to_string()
	}
}

fn parse_leading_number(s: &str) -> Result<f64> {
	let trimmed = s.trim_start();
	let end = trimmed
		.char_indices()
		.take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+')) || *c == 'e' || *c == 'E')
		.map(|(i, c)| i + c.len_utf8())
		.last()
		.unwrap_or(0);
	if end == 0 {
		return Err(CompileError::new("String does not begin with a number."));
	}
	trimmed[..end].parse::<f64>().map_err(|_| CompileError::new("String does not begin with a number."))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnyValueTag {
	Empty,
	Int8,
	UInt8,
	Int16,
	UInt16,
	Int32,
	UInt32,
	Int64,
	UInt64,
	Char,
	Char16,
	Char32,
	WChar,
	Float,
	Double,
	LongDouble,
	Fixed,
	Str,
	U8Str,
	U16Str,
	U32Str,
	WStr,
	InterfaceHandle,
	InterfaceId,
	ExceptionId,
}

impl AnyValueTag {
	fn is_numeric(self) -> bool {
		matches!(
			self,
			AnyValueTag::Int8
				| AnyValueTag::UInt8
				| AnyValueTag::Int16
				| AnyValueTag::UInt16
				| AnyValueTag::Int32
				| AnyValueTag::UInt32
				| AnyValueTag::Int64
				| AnyValueTag::UInt64
				| AnyValueTag::Float
				| AnyValueTag::Double
				| AnyValueTag::LongDouble
				| AnyValueTag::Fixed
		)
	}

	fn matches(self, value: &AnyValue) -> bool {
		matches!(
			(self, value),
			(AnyValueTag::Empty, AnyValue::Empty)
				| (AnyValueTag::Int8, AnyValue::Int8(_))
				| (AnyValueTag::UInt8, AnyValue::UInt8(_))
				| (AnyValueTag::Int16, AnyValue::Int16(_))
				| (AnyValueTag::UInt16, AnyValue::UInt16(_))
				| (AnyValueTag::Int32, AnyValue::Int32(_))
				| (AnyValueTag::UInt32, AnyValue::UInt32(_))
				| (AnyValueTag::Int64, AnyValue::Int64(_))
				| (AnyValueTag::UInt64, AnyValue::UInt64(_))
				| (AnyValueTag::Float, AnyValue::Float(_))
				| (AnyValueTag::Double, AnyValue::Double(_))
				| (AnyValueTag::LongDouble, AnyValue::LongDouble(_))
				| (AnyValueTag::Fixed, AnyValue::Fixed(_))
				| (AnyValueTag::Str, AnyValue::Str(_))
				| (AnyValueTag::U8Str, AnyValue::U8Str(_))
				| (AnyValueTag::U16Str, AnyValue::U16Str(_))
				| (AnyValueTag::U32Str, AnyValue::U32Str(_))
				| (AnyValueTag::WStr, AnyValue::WStr(_))
				| (AnyValueTag::InterfaceHandle, AnyValue::InterfaceHandle(_))
				| (AnyValueTag::InterfaceId, AnyValue::InterfaceId(_))
				| (AnyValueTag::ExceptionId, AnyValue::ExceptionId(_))
		)
	}
}

/// Cross-type equality per the source's comparison policy: arithmetic kinds
/// (including the disambiguated char kinds) compare numerically regardless
/// of tag; string-vs-non-string is always false, never an error.
pub fn any_eq(a: &AnyValue, b: &AnyValue) -> bool {
	match (a, b) {
		(AnyValue::Empty, AnyValue::Empty) => true,
		(AnyValue::InterfaceHandle(x), AnyValue::InterfaceHandle(y)) => x == y,
		(AnyValue::InterfaceId(x), AnyValue::InterfaceId(y)) => x == y,
		(AnyValue::ExceptionId(x), AnyValue::ExceptionId(y)) => x == y,
		_ if a.is_stringlike() && b.is_stringlike() => a.as_string() == b.as_string(),
		_ if a.is_stringlike() || b.is_stringlike() => false,
		_ if a.is_arithmetic() && b.is_arithmetic() => a.as_f64() == b.as_f64(),
		_ => false,
	}
}

/// Parallel ordering to [`any_eq`]: cross-category comparisons return
/// `None` (never panic), which callers treat as "not less, not greater, not
/// equal" — i.e. always false for every relational operator.
pub fn any_cmp(a: &AnyValue, b: &AnyValue) -> Option<std::cmp::Ordering> {
	match (a, b) {
		(AnyValue::InterfaceHandle(x), AnyValue::InterfaceHandle(y)) => Some(x.0.cmp(&y.0)),
		(AnyValue::InterfaceId(x), AnyValue::InterfaceId(y)) => Some(x.cmp(y)),
		(AnyValue::ExceptionId(x), AnyValue::ExceptionId(y)) => Some(x.cmp(y)),
		_ if a.is_stringlike() && b.is_stringlike() => a.as_string().partial_cmp(&b.as_string()),
		_ if a.is_arithmetic() && b.is_arithmetic() => a.as_f64().partial_cmp(&b.as_f64()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn null_c_string_constructs_as_empty() {
		let v: AnyValue = None.into();
		assert!(v.is_empty());
	}

	#[test]
	fn narrow_literal_constructs_as_u8string() {
		let v: AnyValue = "Hello".into();
		assert_eq!(v, AnyValue::U8Str("Hello".into()));
	}

	#[test]
	fn char_and_uint_compare_equal_cross_type() {
		let a = AnyValue::UInt32(65);
		let b = AnyValue::char(65);
		assert!(any_eq(&a, &b));
	}

	#[test]
	fn number_vs_matching_string_is_false() {
		let a = AnyValue::Double(10.1234);
		let b: AnyValue = "10.1234".into();
		assert!(!any_eq(&a, &b));
	}

	#[test]
	fn interface_to_numeric_conversion_yields_zero() {
		let handle = AnyValue::InterfaceHandle(InterfaceHandle(0xdead));
		let converted = handle.with_tag(AnyValueTag::Int32).unwrap();
		assert_eq!(converted, AnyValue::Int32(0));
	}

	#[test]
	fn string_to_integer_parses_leading_digits() {
		let v: AnyValue = "42abc".into();
		assert_eq!(v.as_f64_value().unwrap(), 42.0);
	}

	#[test]
	fn float_to_string_round_trips_canonically() {
		let v = AnyValue::Double(3.5);
		assert_eq!(v.as_string_value().unwrap(), "3.5");
	}

	#[test]
	fn empty_equals_empty_only() {
		assert!(any_eq(&AnyValue::Empty, &AnyValue::Empty));
		assert!(!any_eq(&AnyValue::Empty, &AnyValue::Int32(0)));
	}

	#[test]
	fn reflexivity_holds_for_non_empty_values() {
		let v = AnyValue::Int64(-4);
		assert!(any_eq(&v, &v.clone()));
	}

	#[test]
	fn fixed_constructs_via_from_and_round_trips_through_with_tag() {
		let fx = crate::const_variant::Fixed::from_f64(2.5);
		let v: AnyValue = fx.into();
		assert_eq!(v, AnyValue::Fixed(fx));
		let as_double = v.with_tag(AnyValueTag::Double).unwrap();
		assert_eq!(as_double, AnyValue::Double(2.5));
		let back = AnyValue::Double(2.5).with_tag(AnyValueTag::Fixed).unwrap();
		assert_eq!(back, AnyValue::Fixed(crate::const_variant::Fixed::from_f64(2.5)));
	}

	#[test]
	fn cross_category_ordering_is_none_not_panic() {
		let a = AnyValue::Int32(1);
		let b: AnyValue = "x".into();
		assert_eq!(any_cmp(&a, &b), None);
	}
}

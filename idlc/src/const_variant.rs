//! Compile-time constant value engine.
//!
//! Mirrors `CConstVariant`/`constvariant.cpp`: a tagged union over every
//! scalar and string type an IDL constant expression can evaluate to, with
//! C-style arithmetic/bitwise/relational operators, promotion through
//! [`ConstVariant::equalize`], and demotion range-checking on [`ConstVariant::convert`].
//!
//! The variant order below *is* the promotion ranking (see [`idlc_derive::Rank`]):
//! reordering these variants changes which operand a mixed-rank expression
//! promotes to.

use idlc_derive::Rank;

use crate::error::{CompileError, Result};

/// 32.32 fixed-point value backing the `fixed` rank.
///
/// The original's `fixed` class is a decimal/binary fixed-point IDL type with
/// no Rust std equivalent. A 64-bit scaled integer (rather than the wider
/// 64.64/`i128` layout one might reach for first) is used so that multiply
/// and divide can go through a single `i128` intermediate without a 256-bit
/// widening multiply; see `DESIGN.md` for the tradeoff.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Fixed(pub i64);

const FIXED_SCALE: i64 = 1 << 32;

impl Fixed {
	pub fn from_f64(value: f64) -> Self {
		Fixed((value * FIXED_SCALE as f64).round() as i64)
	}

	pub fn to_f64(self) -> f64 {
		self.0 as f64 / FIXED_SCALE as f64
	}
}

impl std::ops::Add for Fixed {
	type Output = Fixed;
	fn add(self, rhs: Fixed) -> Fixed {
		Fixed(self.0.wrapping_add(rhs.0))
	}
}

impl std::ops::Sub for Fixed {
	type Output = Fixed;
	fn sub(self, rhs: Fixed) -> Fixed {
		Fixed(self.0.wrapping_sub(rhs.0))
	}
}

impl std::ops::Mul for Fixed {
	type Output = Fixed;
	fn mul(self, rhs: Fixed) -> Fixed {
		let product = (self.0 as i128 * rhs.0 as i128) >> 32;
		Fixed(product as i64)
	}
}

impl std::ops::Div for Fixed {
	type Output = Fixed;
	fn div(self, rhs: Fixed) -> Fixed {
		let numerator = (self.0 as i128) << 32;
		Fixed((numerator / rhs.0 as i128) as i64)
	}
}

/// A dynamically typed constant-expression value.
///
/// Variant order defines the promotion ranking used by [`equalize`]: a
/// binary operation always converts its lower-ranked operand up to the
/// higher-ranked operand's alternative before evaluating.
#[derive(Debug, Clone, PartialEq, Rank)]
pub enum ConstVariant {
	Bool(bool),
	UInt8(u8),
	UInt16(u16),
	UInt32(u32),
	UInt64(u64),
	Int8(i8),
	Int16(i16),
	Int32(i32),
	Int64(i64),
	Fixed(Fixed),
	Float(f32),
	Double(f64),
	/// Distinct from [`ConstVariant::Double`] at the tag level even though
	/// both store an `f64`: `long double` classification must not collapse
	/// onto `double` regardless of the platform's actual type widths.
	LongDouble(f64),
	Str(String),
	U16Str(Vec<u16>),
	U32Str(Vec<u32>),
	WStr(Vec<u32>),
}

const RANK_STR: usize = 13;
const RANK_U16STR: usize = 14;
const RANK_U32STR: usize = 15;
const RANK_WSTR: usize = 16;

fn is_string_rank(rank: usize) -> bool {
	rank >= RANK_STR
}

impl ConstVariant {
	pub fn ranking(&self) -> usize {
		self.rank()
	}

	pub fn is_arithmetic(&self) -> bool {
		!matches!(self, ConstVariant::Str(_) | ConstVariant::U16Str(_) | ConstVariant::U32Str(_) | ConstVariant::WStr(_))
	}

	/// Matches `std::is_integral_v<T>` in the source: only `bool` and the
	/// fixed-width integer alternatives are integral. `fixed`, the floating
	/// point ranks and the string ranks are not.
	pub fn is_integral(&self) -> bool {
		matches!(
			self,
			ConstVariant::Bool(_)
				| ConstVariant::UInt8(_)
				| ConstVariant::UInt16(_)
				| ConstVariant::UInt32(_)
				| ConstVariant::UInt64(_)
				| ConstVariant::Int8(_)
				| ConstVariant::Int16(_)
				| ConstVariant::Int32(_)
				| ConstVariant::Int64(_)
		)
	}

	pub fn is_floating_point(&self) -> bool {
		matches!(self, ConstVariant::Float(_) | ConstVariant::Double(_) | ConstVariant::LongDouble(_))
	}

	pub fn is_boolean(&self) -> bool {
		matches!(self, ConstVariant::Bool(_))
	}

	pub fn is_signed(&self) -> bool {
		matches!(
			self,
			ConstVariant::Int8(_) | ConstVariant::Int16(_) | ConstVariant::Int32(_) | ConstVariant::Int64(_) | ConstVariant::Fixed(_) | ConstVariant::Float(_) | ConstVariant::Double(_) | ConstVariant::LongDouble(_)
		)
	}

	pub fn is_unsigned(&self) -> bool {
		matches!(self, ConstVariant::Bool(_) | ConstVariant::UInt8(_) | ConstVariant::UInt16(_) | ConstVariant::UInt32(_) | ConstVariant::UInt64(_))
	}

	fn type_name(&self) -> &'static str {
		match self {
			ConstVariant::Bool(_) => "bool",
			ConstVariant::UInt8(_) => "uint8",
			ConstVariant::UInt16(_) => "uint16",
			ConstVariant::UInt32(_) => "uint32",
			ConstVariant::UInt64(_) => "uint64",
			ConstVariant::Int8(_) => "int8",
			ConstVariant::Int16(_) => "int16",
			ConstVariant::Int32(_) => "int32",
			ConstVariant::Int64(_) => "int64",
			ConstVariant::Fixed(_) => "fixed",
			ConstVariant::Float(_) => "float",
			ConstVariant::Double(_) => "double",
			ConstVariant::LongDouble(_) => "long double",
			ConstVariant::Str(_) => "string",
			ConstVariant::U16Str(_) => "u16string",
			ConstVariant::U32Str(_) => "u32string",
			ConstVariant::WStr(_) => "wstring",
		}
	}

	/// Numeric value of an integral/boolean alternative, widened losslessly.
	fn as_i128(&self) -> Option<i128> {
		match self {
			ConstVariant::Bool(v) => Some(*v as i128),
			ConstVariant::UInt8(v) => Some(*v as i128),
			ConstVariant::UInt16(v) => Some(*v as i128),
			ConstVariant::UInt32(v) => Some(*v as i128),
			ConstVariant::UInt64(v) => Some(*v as i128),
			ConstVariant::Int8(v) => Some(*v as i128),
			ConstVariant::Int16(v) => Some(*v as i128),
			ConstVariant::Int32(v) => Some(*v as i128),
			ConstVariant::Int64(v) => Some(*v as i128),
			_ => None,
		}
	}

	/// Numeric value of a floating-point alternative.
	fn as_f64(&self) -> Option<f64> {
		match self {
			ConstVariant::Float(v) => Some(*v as f64),
			ConstVariant::Double(v) => Some(*v),
			ConstVariant::LongDouble(v) => Some(*v),
			_ => None,
		}
	}

	fn from_i128_at_rank(value: i128, rank: usize) -> Result<ConstVariant> {
		macro_rules! demote {
			($ty:ty, $ctor:expr) => {{
				let narrowed: $ty = value.try_into().map_err(|_| range_error(value, <$ty>::MIN as i128, stringify!($ty)))?;
				if narrowed as i128 != value {
					return Err(range_error(value, <$ty>::MIN as i128, stringify!($ty)));
				}
				Ok($ctor(narrowed))
			}};
		}
		match rank {
			0 => {
				let b = value != 0;
				if (b as i128) != value {
					return Err(range_error(value, 0, "bool"));
				}
				Ok(ConstVariant::Bool(b))
			}
			1 => demote!(u8, ConstVariant::UInt8),
			2 => demote!(u16, ConstVariant::UInt16),
			3 => demote!(u32, ConstVariant::UInt32),
			4 => demote!(u64, ConstVariant::UInt64),
			5 => demote!(i8, ConstVariant::Int8),
			6 => demote!(i16, ConstVariant::Int16),
			7 => demote!(i32, ConstVariant::Int32),
			8 => demote!(i64, ConstVariant::Int64),
			9 => {
				let scaled = value.checked_mul(FIXED_SCALE as i128).ok_or_else(|| range_error(value, i64::MIN as i128, "fixed"))?;
				let narrowed: i64 = scaled.try_into().map_err(|_| range_error(value, i64::MIN as i128, "fixed"))?;
				Ok(ConstVariant::Fixed(Fixed(narrowed)))
			}
			_ => Err(CompileError::new("Conversion from floating-point to an integral type is not allowed.")),
		}
	}

	fn from_f64_roundtrip(value: f64, rank: usize) -> Result<ConstVariant> {
		match rank {
			10 => {
				let narrowed = value as f32;
				if narrowed as f64 != value {
					return Err(CompileError::new("Value does not fit in a float without loss of precision."));
				}
				Ok(ConstVariant::Float(narrowed))
			}
			11 => Ok(ConstVariant::Double(value)),
			12 => Ok(ConstVariant::LongDouble(value)),
			_ => Err(CompileError::new("Conversion from floating-point to an integral type is not allowed.")),
		}
	}

	/// Replace the stored value with the same value re-expressed in the
	/// alternative at `target_rank`. Converting between an arithmetic rank
	/// and a string rank (in either direction), or between two different
	/// string ranks, is always an error; converting between two arithmetic
	/// ranks checks that the value round-trips exactly.
	pub fn convert(&mut self, target_rank: usize) -> Result<()> {
		if target_rank == self.ranking() {
			return Ok(());
		}
		if is_string_rank(target_rank) || is_string_rank(self.ranking()) {
			return Err(CompileError::new("Internal error: incompatible data type conversion."));
		}
		let converted = if let Some(i) = self.as_i128() {
			match target_rank {
				10..=12 => Self::from_f64_roundtrip(i as f64, target_rank)?,
				_ => Self::from_i128_at_rank(i, target_rank)?,
			}
		} else if let Some(f) = self.as_f64() {
			if target_rank == 9 {
				ConstVariant::Fixed(Fixed::from_f64(f))
			} else if (10..=12).contains(&target_rank) {
				Self::from_f64_roundtrip(f, target_rank)?
			} else {
				return Err(CompileError::new("Conversion from floating-point to an integral type is not allowed."));
			}
		} else if let ConstVariant::Fixed(fx) = self {
			let f = fx.to_f64();
			if (10..=12).contains(&target_rank) {
				Self::from_f64_roundtrip(f, target_rank)?
			} else {
				return Err(CompileError::new("Conversion from floating-point to an integral type is not allowed."));
			}
		} else {
			return Err(CompileError::new("Internal error: incompatible data type conversion."));
		};
		*self = converted;
		Ok(())
	}

	pub fn unary_not(&self) -> Result<ConstVariant> {
		match (self.as_i128(), self.as_f64()) {
			(Some(v), _) => Ok(ConstVariant::Bool(v == 0)),
			(_, Some(v)) => Ok(ConstVariant::Bool(v == 0.0)),
			_ => Err(CompileError::new("Cannot execute logical negation on this type.")),
		}
	}

	pub fn unary_bitnot(&self) -> Result<ConstVariant> {
		if matches!(self, ConstVariant::Bool(_)) {
			return Err(CompileError::new("Cannot execute bitwise operations on a boolean."));
		}
		match self {
			ConstVariant::UInt8(v) => Ok(ConstVariant::UInt8(!v)),
			ConstVariant::UInt16(v) => Ok(ConstVariant::UInt16(!v)),
			ConstVariant::UInt32(v) => Ok(ConstVariant::UInt32(!v)),
			ConstVariant::UInt64(v) => Ok(ConstVariant::UInt64(!v)),
			ConstVariant::Int8(v) => Ok(ConstVariant::Int8(!v)),
			ConstVariant::Int16(v) => Ok(ConstVariant::Int16(!v)),
			ConstVariant::Int32(v) => Ok(ConstVariant::Int32(!v)),
			ConstVariant::Int64(v) => Ok(ConstVariant::Int64(!v)),
			_ => Err(CompileError::new("Bitwise operations require an integral operand.")),
		}
	}

	pub fn unary_plus(&self) -> Result<ConstVariant> {
		Ok(self.clone())
	}

	pub fn unary_neg(&self) -> Result<ConstVariant> {
		match self {
			ConstVariant::Bool(_) => Err(CompileError::new("Cannot execute unary arithmetic operations on a boolean.")),
			ConstVariant::UInt8(v) => Ok(ConstVariant::UInt8(v.wrapping_neg())),
			ConstVariant::UInt16(v) => Ok(ConstVariant::UInt16(v.wrapping_neg())),
			ConstVariant::UInt32(v) => Ok(ConstVariant::UInt32(v.wrapping_neg())),
			ConstVariant::UInt64(v) => Ok(ConstVariant::UInt64(v.wrapping_neg())),
			ConstVariant::Int8(v) => Ok(ConstVariant::Int8(v.wrapping_neg())),
			ConstVariant::Int16(v) => Ok(ConstVariant::Int16(v.wrapping_neg())),
			ConstVariant::Int32(v) => Ok(ConstVariant::Int32(v.wrapping_neg())),
			ConstVariant::Int64(v) => Ok(ConstVariant::Int64(v.wrapping_neg())),
			ConstVariant::Fixed(v) => Ok(ConstVariant::Fixed(Fixed(v.0.wrapping_neg()))),
			ConstVariant::Float(v) => Ok(ConstVariant::Float(-v)),
			ConstVariant::Double(v) => Ok(ConstVariant::Double(-v)),
			ConstVariant::LongDouble(v) => Ok(ConstVariant::LongDouble(-v)),
			_ => Err(CompileError::new("Internal error: cannot execute unary arithmetic operation on the type.")),
		}
	}
}

fn range_error(value: i128, _min: i128, ty: &str) -> CompileError {
	CompileError::new(format!("Value {value} does not fit in {ty}."))
}

/// Promote the lower-ranked operand of a pair up to the higher rank, in
/// place. Both operands must already be arithmetic; ranks that are already
/// equal are left untouched.
pub fn equalize(a: &mut ConstVariant, b: &mut ConstVariant) -> Result<()> {
	if a.ranking() == b.ranking() {
		return Ok(());
	}
	if !a.is_arithmetic() || !b.is_arithmetic() {
		return Err(CompileError::new("The types of both operands are not compatible."));
	}
	if a.ranking() > b.ranking() {
		b.convert(a.ranking())
	} else {
		a.convert(b.ranking())
	}
}

#[derive(Debug, Copy, Clone)]
enum ArithOp {
	Add,
	Sub,
	Mul,
	Div,
	Rem,
}

/// Same-rank integral arithmetic, grounded on the plain `wrapping_*`
/// operators so same-rank overflow wraps instead of panicking in a debug
/// build; only division/modulo by zero is an error for integral operands.
trait WrappingArith: Copy {
	fn wrapping_add(self, rhs: Self) -> Self;
	fn wrapping_sub(self, rhs: Self) -> Self;
	fn wrapping_mul(self, rhs: Self) -> Self;
	fn checked_div(self, rhs: Self) -> Option<Self>;
	fn checked_rem(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_wrapping_arith {
	($($ty:ty),*) => {
		$(impl WrappingArith for $ty {
			fn wrapping_add(self, rhs: Self) -> Self { <$ty>::wrapping_add(self, rhs) }
			fn wrapping_sub(self, rhs: Self) -> Self { <$ty>::wrapping_sub(self, rhs) }
			fn wrapping_mul(self, rhs: Self) -> Self { <$ty>::wrapping_mul(self, rhs) }
			fn checked_div(self, rhs: Self) -> Option<Self> { <$ty>::checked_div(self, rhs) }
			fn checked_rem(self, rhs: Self) -> Option<Self> { <$ty>::checked_rem(self, rhs) }
		})*
	};
}
impl_wrapping_arith!(u8, u16, u32, u64, i8, i16, i32, i64);

fn apply_int<T: WrappingArith>(op: ArithOp, x: T, y: T, ty: &str) -> Result<T> {
	match op {
		ArithOp::Add => Ok(x.wrapping_add(y)),
		ArithOp::Sub => Ok(x.wrapping_sub(y)),
		ArithOp::Mul => Ok(x.wrapping_mul(y)),
		ArithOp::Div => x.checked_div(y).ok_or_else(|| CompileError::new("Division by zero.")),
		ArithOp::Rem => {
			let _ = ty;
			x.checked_rem(y).ok_or_else(|| CompileError::new("Division by zero."))
		}
	}
}

fn apply_float<T>(op: ArithOp, x: T, y: T) -> Result<T>
where
	T: Copy + PartialEq + Default + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + std::ops::Mul<Output = T> + std::ops::Div<Output = T>,
{
	match op {
		ArithOp::Add => Ok(x + y),
		ArithOp::Sub => Ok(x - y),
		ArithOp::Mul => Ok(x * y),
		ArithOp::Div => {
			if y == T::default() {
				return Err(CompileError::new("Division by zero."));
			}
			Ok(x / y)
		}
		ArithOp::Rem => Err(CompileError::new("Cannot apply the modulo operator to a floating-point value.")),
	}
}

/// Binary arithmetic dispatch shared by `+ - * / %`; operands must already
/// share a rank (call [`equalize`] first).
fn binary_arith(op: ArithOp, a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	use ConstVariant::*;
	match (a, b) {
		(Bool(_), Bool(_)) => Err(CompileError::new("Cannot execute arithmetic operations on a boolean.")),
		(UInt8(x), UInt8(y)) => Ok(UInt8(apply_int(op, *x, *y, "uint8")?)),
		(UInt16(x), UInt16(y)) => Ok(UInt16(apply_int(op, *x, *y, "uint16")?)),
		(UInt32(x), UInt32(y)) => Ok(UInt32(apply_int(op, *x, *y, "uint32")?)),
		(UInt64(x), UInt64(y)) => Ok(UInt64(apply_int(op, *x, *y, "uint64")?)),
		(Int8(x), Int8(y)) => Ok(Int8(apply_int(op, *x, *y, "int8")?)),
		(Int16(x), Int16(y)) => Ok(Int16(apply_int(op, *x, *y, "int16")?)),
		(Int32(x), Int32(y)) => Ok(Int32(apply_int(op, *x, *y, "int32")?)),
		(Int64(x), Int64(y)) => Ok(Int64(apply_int(op, *x, *y, "int64")?)),
		(Fixed(x), Fixed(y)) => match op {
			ArithOp::Rem => Err(CompileError::new("Cannot apply the modulo operator to a fixed-point value.")),
			ArithOp::Div if y.0 == 0 => Err(CompileError::new("Division by zero.")),
			ArithOp::Add => Ok(Fixed(*x + *y)),
			ArithOp::Sub => Ok(Fixed(*x - *y)),
			ArithOp::Mul => Ok(Fixed(*x * *y)),
			ArithOp::Div => Ok(Fixed(*x / *y)),
		},
		(Float(x), Float(y)) => Ok(Float(apply_float(op, *x, *y)?)),
		(Double(x), Double(y)) => Ok(Double(apply_float(op, *x, *y)?)),
		(LongDouble(x), LongDouble(y)) => Ok(LongDouble(apply_float(op, *x, *y)?)),
		(Str(_), Str(_)) | (U16Str(_), U16Str(_)) | (U32Str(_), U32Str(_)) | (WStr(_), WStr(_)) => {
			Err(CompileError::new("Cannot execute arithmetic operations on a string."))
		}
		_ => Err(CompileError::new("Internal error: operands do not share a rank.")),
	}
}

pub fn add(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	binary_arith(ArithOp::Add, a, b)
}
pub fn sub(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	binary_arith(ArithOp::Sub, a, b)
}
pub fn mul(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	binary_arith(ArithOp::Mul, a, b)
}
pub fn div(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	binary_arith(ArithOp::Div, a, b)
}
pub fn rem(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	if !a.is_integral() || !b.is_integral() {
		return Err(CompileError::new("The modulo operator requires integral operands."));
	}
	binary_arith(ArithOp::Rem, a, b)
}

macro_rules! bitwise_op {
	($name:ident, $op:tt) => {
		pub fn $name(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
			use ConstVariant::*;
			if !a.is_integral() || !b.is_integral() || a.is_boolean() || b.is_boolean() {
				return Err(CompileError::new("Bitwise operations require non-boolean integral operands."));
			}
			match (a, b) {
				(UInt8(x), UInt8(y)) => Ok(UInt8(x $op y)),
				(UInt16(x), UInt16(y)) => Ok(UInt16(x $op y)),
				(UInt32(x), UInt32(y)) => Ok(UInt32(x $op y)),
				(UInt64(x), UInt64(y)) => Ok(UInt64(x $op y)),
				(Int8(x), Int8(y)) => Ok(Int8(x $op y)),
				(Int16(x), Int16(y)) => Ok(Int16(x $op y)),
				(Int32(x), Int32(y)) => Ok(Int32(x $op y)),
				(Int64(x), Int64(y)) => Ok(Int64(x $op y)),
				_ => Err(CompileError::new("Internal error: operands do not share a rank.")),
			}
		}
	};
}

bitwise_op!(bitand, &);
bitwise_op!(bitor, |);
bitwise_op!(bitxor, ^);

pub fn shl(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	shift(a, b, true)
}

pub fn shr(a: &ConstVariant, b: &ConstVariant) -> Result<ConstVariant> {
	shift(a, b, false)
}

fn shift(a: &ConstVariant, b: &ConstVariant, left: bool) -> Result<ConstVariant> {
	use ConstVariant::*;
	if !a.is_integral() || !b.is_integral() {
		return Err(CompileError::new("Shift operations require integral operands."));
	}
	let amount = b.as_i128().unwrap_or(0).max(0) as u32;
	macro_rules! do_shift {
		($v:expr) => {
			if left {
				$v.checked_shl(amount).unwrap_or(0)
			} else {
				$v.checked_shr(amount).unwrap_or(0)
			}
		};
	}
	match a {
		Bool(_) => Err(CompileError::new("Bitwise operations require non-boolean integral operands.")),
		UInt8(x) => Ok(UInt8(do_shift!(*x))),
		UInt16(x) => Ok(UInt16(do_shift!(*x))),
		UInt32(x) => Ok(UInt32(do_shift!(*x))),
		UInt64(x) => Ok(UInt64(do_shift!(*x))),
		Int8(x) => Ok(Int8(do_shift!(*x))),
		Int16(x) => Ok(Int16(do_shift!(*x))),
		Int32(x) => Ok(Int32(do_shift!(*x))),
		Int64(x) => Ok(Int64(do_shift!(*x))),
		_ => Err(CompileError::new("Internal error: unreachable integral variant.")),
	}
}

/// `&&`/`||`: true C semantics only when both operands are integral;
/// otherwise the constant `false`, a deliberately preserved quirk rather
/// than an error.
pub fn and(a: &ConstVariant, b: &ConstVariant) -> ConstVariant {
	ConstVariant::Bool(a.is_integral() && b.is_integral() && a.as_i128().unwrap_or(0) != 0 && b.as_i128().unwrap_or(0) != 0)
}

pub fn or(a: &ConstVariant, b: &ConstVariant) -> ConstVariant {
	ConstVariant::Bool(a.is_integral() && b.is_integral() && (a.as_i128().unwrap_or(0) != 0 || b.as_i128().unwrap_or(0) != 0))
}

fn common_encoding_compare(a: &ConstVariant, b: &ConstVariant) -> Option<std::cmp::Ordering> {
	use ConstVariant::*;
	match (a, b) {
		(Str(x), Str(y)) => Some(x.cmp(y)),
		(U16Str(x), U16Str(y)) => Some(x.cmp(y)),
		(U32Str(x), U32Str(y)) => Some(x.cmp(y)),
		(WStr(x), WStr(y)) => Some(x.cmp(y)),
		_ => None,
	}
}

/// Equalizes then compares; strings compare lexicographically (both sides
/// must already share an encoding after equalization never converts a
/// string, so mixed string ranks are a type error caught by [`equalize`]).
pub fn compare(a: &ConstVariant, b: &ConstVariant) -> Result<std::cmp::Ordering> {
	let mut x = a.clone();
	let mut y = b.clone();
	equalize(&mut x, &mut y)?;
	if let Some(order) = common_encoding_compare(&x, &y) {
		return Ok(order);
	}
	if let (Some(fx), Some(fy)) = (x.as_f64().or_else(|| x.as_i128().map(|v| v as f64)), y.as_f64().or_else(|| y.as_i128().map(|v| v as f64))) {
		return fx.partial_cmp(&fy).ok_or_else(|| CompileError::new("Cannot compare NaN operands."));
	}
	if let (ConstVariant::Fixed(fx), ConstVariant::Fixed(fy)) = (&x, &y) {
		return Ok(fx.0.cmp(&fy.0));
	}
	Err(CompileError::new("The types of both operands are not compatible."))
}

impl std::fmt::Display for ConstVariant {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.type_name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ranking_matches_declaration_order() {
		assert_eq!(ConstVariant::Bool(true).ranking(), 0);
		assert_eq!(ConstVariant::Int64(0).ranking(), 8);
		assert_eq!(ConstVariant::WStr(vec![]).ranking(), 16);
	}

	#[test]
	fn equalize_promotes_lower_rank() {
		let mut a = ConstVariant::UInt8(5);
		let mut b = ConstVariant::Int32(10);
		equalize(&mut a, &mut b).unwrap();
		assert_eq!(a.ranking(), b.ranking());
		assert_eq!(a, ConstVariant::Int32(5));
	}

	#[test]
	fn equalize_rejects_string_vs_arithmetic() {
		let mut a = ConstVariant::Str("x".into());
		let mut b = ConstVariant::Int32(10);
		assert!(equalize(&mut a, &mut b).is_err());
	}

	#[test]
	fn division_by_zero_is_an_error() {
		let a = ConstVariant::Int32(10);
		let b = ConstVariant::Int32(0);
		let err = div(&a, &b).unwrap_err();
		assert_eq!(err.reason(), "Division by zero.");
	}

	#[test]
	fn float_division_by_zero_is_also_an_error() {
		let a = ConstVariant::Double(10.0);
		let b = ConstVariant::Double(0.0);
		let err = div(&a, &b).unwrap_err();
		assert_eq!(err.reason(), "Division by zero.");
	}

	#[test]
	fn unsigned_negation_is_twos_complement() {
		let v = ConstVariant::UInt8(1);
		assert_eq!(v.unary_neg().unwrap(), ConstVariant::UInt8(255));
	}

	#[test]
	fn boolean_rejects_bitnot() {
		let v = ConstVariant::Bool(true);
		assert!(v.unary_bitnot().is_err());
	}

	#[test]
	fn commutative_add_matches_either_order() {
		let a = ConstVariant::Int32(3);
		let b = ConstVariant::Int32(4);
		assert_eq!(add(&a, &b).unwrap(), add(&b, &a).unwrap());
	}

	#[test]
	fn demotion_checks_exact_value_fit() {
		let mut v = ConstVariant::Int32(1000);
		assert!(v.convert(1).is_err()); // uint8 can't hold 1000
		let mut v2 = ConstVariant::Int32(100);
		v2.convert(1).unwrap();
		assert_eq!(v2, ConstVariant::UInt8(100));
	}

	#[test]
	fn float_to_integral_conversion_is_rejected_even_when_exact() {
		let mut v = ConstVariant::Float(90.0);
		assert!(v.convert(3).is_err()); // uint32, even though 90.0 is exact
	}

	#[test]
	fn double_demotes_to_float_only_when_exact() {
		let mut v = ConstVariant::Double(100.0);
		v.convert(10).unwrap();
		assert_eq!(v, ConstVariant::Float(100.0));

		let mut v2 = ConstVariant::Double(f64::MAX);
		assert!(v2.convert(10).is_err());
	}

	#[test]
	fn string_rank_conversion_is_always_an_error() {
		let mut v = ConstVariant::Str("abc".into());
		assert!(v.convert(14).is_err()); // u16string
	}

	#[test]
	fn logical_and_is_false_for_non_integral_operands() {
		let a = ConstVariant::Double(1.0);
		let b = ConstVariant::Double(1.0);
		assert_eq!(and(&a, &b), ConstVariant::Bool(false));
	}

	#[test]
	fn string_comparison_is_lexicographic() {
		let a = ConstVariant::Str("abc".into());
		let b = ConstVariant::Str("abd".into());
		assert_eq!(compare(&a, &b).unwrap(), std::cmp::Ordering::Less);
	}

	#[test]
	fn shift_operators_require_integral_operands() {
		let a = ConstVariant::Int32(1);
		let b = ConstVariant::Int32(4);
		assert_eq!(shl(&a, &b).unwrap(), ConstVariant::Int32(16));
	}

	#[test]
	fn int_to_fixed_conversion_scales_by_fixed_point() {
		let mut v = ConstVariant::Int32(5);
		v.convert(9).unwrap(); // fixed
		assert_eq!(v, ConstVariant::Fixed(Fixed::from_f64(5.0)));
	}

	#[test]
	fn same_rank_overflow_wraps_instead_of_panicking() {
		let a = ConstVariant::UInt8(250);
		let b = ConstVariant::UInt8(10);
		assert_eq!(add(&a, &b).unwrap(), ConstVariant::UInt8(4));

		let a = ConstVariant::Int8(i8::MAX);
		let b = ConstVariant::Int8(1);
		assert_eq!(add(&a, &b).unwrap(), ConstVariant::Int8(i8::MIN));
	}
}

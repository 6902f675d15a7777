//! Deterministic byte-prefixed invocation buffer (§4.6.5).
//!
//! A generated proxy operation serializes its arguments into a flat byte
//! buffer tagged by operation id; variable-length arguments are prefixed by
//! their byte count so a reader never needs external length information.
//! Alignment inside the buffer is never guaranteed — readers must decode
//! sequentially, matching fixed-size reads against [`crate::utilities::FromByteStream`].

use std::io::Cursor;

use crate::utilities::FromByteStream;

/// An operation id plus its serialized argument/result payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationBuffer {
	pub operation_id: u32,
	bytes: Vec<u8>,
}

impl InvocationBuffer {
	pub fn new(operation_id: u32) -> InvocationBuffer {
		InvocationBuffer {
			operation_id,
			bytes: Vec::new(),
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	pub fn push_u8(&mut self, value: u8) {
		self.bytes.push(value);
	}

	pub fn push_u32(&mut self, value: u32) {
		self.bytes.extend_from_slice(&value.to_le_bytes());
	}

	pub fn push_u64(&mut self, value: u64) {
		self.bytes.extend_from_slice(&value.to_le_bytes());
	}

	pub fn push_f32(&mut self, value: f32) {
		self.bytes.extend_from_slice(&value.to_le_bytes());
	}

	pub fn push_f64(&mut self, value: f64) {
		self.bytes.extend_from_slice(&value.to_le_bytes());
	}

	/// A variable-length argument: its byte count, then its raw bytes.
	pub fn push_bytes(&mut self, data: &[u8]) {
		self.push_u32(data.len() as u32);
		self.bytes.extend_from_slice(data);
	}

	pub fn push_str(&mut self, text: &str) {
		self.push_bytes(text.as_bytes());
	}
}

/// A forward-only reader over an [`InvocationBuffer`]'s bytes.
pub struct BufferReader<'a> {
	cursor: Cursor<&'a [u8]>,
}

impl<'a> BufferReader<'a> {
	pub fn new(buffer: &'a InvocationBuffer) -> BufferReader<'a> {
		BufferReader {
			cursor: Cursor::new(buffer.as_bytes()),
		}
	}

	pub fn read_u8(&mut self) -> std::io::Result<u8> {
		u8::read(&mut self.cursor, &())
	}

	pub fn read_u32(&mut self) -> std::io::Result<u32> {
		u32::read(&mut self.cursor, &())
	}

	pub fn read_u64(&mut self) -> std::io::Result<u64> {
		u64::read(&mut self.cursor, &())
	}

	pub fn read_f32(&mut self) -> std::io::Result<f32> {
		Ok(f32::from_le_bytes(u32::read(&mut self.cursor, &())?.to_le_bytes()))
	}

	pub fn read_f64(&mut self) -> std::io::Result<f64> {
		Ok(f64::from_le_bytes(u64::read(&mut self.cursor, &())?.to_le_bytes()))
	}

	pub fn read_bytes(&mut self) -> std::io::Result<Vec<u8>> {
		let len = self.read_u32()? as usize;
		let start = self.cursor.position() as usize;
		let slice = self.cursor.get_ref();
		if start + len > slice.len() {
			return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
		}
		let data = slice[start..start + len].to_vec();
		self.cursor.set_position((start + len) as u64);
		Ok(data)
	}

	pub fn read_str(&mut self) -> std::io::Result<String> {
		let bytes = self.read_bytes()?;
		String::from_utf8(bytes).map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidData))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalar_roundtrip_is_byte_exact() {
		let mut buf = InvocationBuffer::new(7);
		buf.push_u32(42);
		buf.push_f64(1.5);
		let mut reader = BufferReader::new(&buf);
		assert_eq!(reader.read_u32().unwrap(), 42);
		assert_eq!(reader.read_f64().unwrap(), 1.5);
	}

	#[test]
	fn variable_length_argument_is_length_prefixed() {
		let mut buf = InvocationBuffer::new(1);
		buf.push_str("hello");
		buf.push_u32(99);
		let mut reader = BufferReader::new(&buf);
		assert_eq!(reader.read_str().unwrap(), "hello");
		assert_eq!(reader.read_u32().unwrap(), 99);
	}

	#[test]
	fn truncated_length_prefix_is_an_error_not_a_panic() {
		let mut buf = InvocationBuffer::new(1);
		buf.push_u32(100);
		let mut reader = BufferReader::new(&buf);
		assert!(reader.read_bytes().is_err());
	}
}

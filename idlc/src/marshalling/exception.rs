//! Exception taxonomy for the generated runtime's marshalling contract.
//!
//! System exceptions have a fixed, stable id space (`SystemExceptionId`);
//! user exceptions are declared in IDL and carry their own id plus a bag of
//! declared fields, decoded by discriminant the way the stub dispatch loop
//! decodes them (§4.6.5 step 4).

use idlc_derive::FromRepr;

use crate::any_value::AnyValue;

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromRepr)]
#[repr(u32)]
pub enum SystemExceptionId {
	NullPointer = 1,
	NoInterface = 2,
	InvalidState = 3,
	UnhandledException = 4,
	TransportFailure = 5,
}

impl SystemExceptionId {
	pub fn from_id(id: u32) -> Option<SystemExceptionId> {
		Self::from_repr(id)
	}

	pub fn id(self) -> u32 {
		self as u32
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemException {
	pub id: SystemExceptionId,
	pub message: String,
}

impl SystemException {
	pub fn new(id: SystemExceptionId, message: impl Into<String>) -> SystemException {
		SystemException {
			id,
			message: message.into(),
		}
	}

	pub fn null_pointer() -> SystemException {
		SystemException::new(SystemExceptionId::NullPointer, "A required interface pointer was null.")
	}

	pub fn no_interface() -> SystemException {
		SystemException::new(SystemExceptionId::NoInterface, "The requested interface is not implemented.")
	}

	pub fn invalid_state() -> SystemException {
		SystemException::new(SystemExceptionId::InvalidState, "The marshalling registry is in an inconsistent state.")
	}

	pub fn unhandled(context: impl Into<String>) -> SystemException {
		SystemException::new(SystemExceptionId::UnhandledException, context.into())
	}
}

impl std::fmt::Display for SystemException {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "system exception {}: {}", self.id.id(), self.message)
	}
}

impl std::error::Error for SystemException {}

/// A user-declared IDL exception, identified by a stable id assigned at
/// code generation time; its declared fields are carried as [`AnyValue`]s
/// rather than a generated struct, since this crate does not generate code.
#[derive(Debug, Clone, PartialEq)]
pub struct UserException {
	pub exception_id: u64,
	pub fields: Vec<AnyValue>,
}

impl std::fmt::Display for UserException {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "user exception {} ({} field(s))", self.exception_id, self.fields.len())
	}
}

impl std::error::Error for UserException {}

/// What a stub reply or a proxy invocation can fail with.
#[derive(Debug, Clone, PartialEq)]
pub enum MarshallError {
	System(SystemException),
	User(UserException),
}

impl std::fmt::Display for MarshallError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MarshallError::System(e) => e.fmt(f),
			MarshallError::User(e) => e.fmt(f),
		}
	}
}

impl std::error::Error for MarshallError {}

impl From<SystemException> for MarshallError {
	fn from(value: SystemException) -> Self {
		MarshallError::System(value)
	}
}

impl From<UserException> for MarshallError {
	fn from(value: UserException) -> Self {
		MarshallError::User(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn system_exception_ids_round_trip_through_from_repr() {
		assert_eq!(SystemExceptionId::from_id(1), Some(SystemExceptionId::NullPointer));
		assert_eq!(SystemExceptionId::from_id(999), None);
	}

	#[test]
	fn unknown_exception_wraps_as_unhandled() {
		let e = SystemException::unhandled("native panic during dispatch");
		assert_eq!(e.id, SystemExceptionId::UnhandledException);
	}
}

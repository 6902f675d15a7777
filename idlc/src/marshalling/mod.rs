//! Proxy/stub marshalling contract (§3.6, §4.6).
//!
//! Three pieces: the stub/proxy [`registry`], the [`buffer`] wire contract a
//! generated proxy operation serializes its arguments into, and the
//! [`exception`] taxonomy a stub reply or proxy invocation can fail with.

pub mod buffer;
pub mod exception;
pub mod registry;

pub use buffer::{BufferReader, InvocationBuffer};
pub use exception::{MarshallError, SystemException, SystemExceptionId, UserException};
pub use registry::{CommunicationService, InterfaceAccess, InterfaceId, Marshall, MarshallLink, ProxyControl, StubId, StubLink};

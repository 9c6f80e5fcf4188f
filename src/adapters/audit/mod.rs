//! Audit log adapters.

mod ring_buffer;
mod tracing_log;

pub use ring_buffer::RingBufferAuditLog;
pub use tracing_log::TracingAuditLog;

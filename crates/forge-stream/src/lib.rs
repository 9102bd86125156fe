//! Streaming buffer (C7): coalesces outbound thread events before they
//! reach a host/UI, so delta-heavy provider streams don't flood a
//! transport with one message per token.

mod buffer;

pub use buffer::StreamBuffer;
pub use buffer::DEFAULT_FLUSH_INTERVAL;

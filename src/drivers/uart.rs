//! Status UART byte sink.

use crate::app::ports::ByteSink;
use crate::drivers::hw_init;

/// Blocking writer on an installed UART port.
///
/// Must not be used from interrupt context: the driver write blocks until
/// the bytes are queued.
pub struct UartSink {
    port: i32,
}

impl UartSink {
    /// `port` must already be installed by [`hw_init::init_uart`].
    pub fn new(port: i32) -> Self {
        Self { port }
    }
}

impl ByteSink for UartSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        debug_assert!(!hw_init::in_isr(), "UART write from ISR context");
        hw_init::uart_write(self.port, bytes)
    }
}

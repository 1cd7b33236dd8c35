//! Universal Synchronous/Asynchronous Receiver Transmitter - Receiver Code
//!
//! This module is for receiving data with a USART.

use core::convert::Infallible;

use nb::Error::WouldBlock;

use super::{Flag, UsartDevice};

/// Returns the received word if one is waiting, `Err(WouldBlock)` otherwise.
pub(crate) fn read_word<D: UsartDevice>(device: &D) -> nb::Result<u16, Infallible> {
    if device.flag(Flag::RxNotEmpty) {
        Ok(device.read_data())
    } else {
        Err(WouldBlock)
    }
}

/// Busy-waits until a word arrives and returns it.
///
/// Blocks forever if no data ever arrives.
pub(crate) fn read_word_blocking<D: UsartDevice>(device: &D) -> u16 {
    loop {
        if let Ok(word) = read_word(device) {
            return word;
        }
    }
}

/// Fills `buffer` with received words, in arrival order.
///
/// This function blocks until the full buffer has been received.
pub(crate) fn read_full_blocking<D: UsartDevice>(device: &D, buffer: &mut [u16]) {
    for slot in buffer {
        *slot = read_word_blocking(device);
    }
}

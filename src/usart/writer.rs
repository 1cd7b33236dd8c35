//! Universal Synchronous/Asynchronous Receiver Transmitter - Transmitter Code
//!
//! This module is for transmitting data with a USART.

use core::convert::Infallible;

use nb::Error::WouldBlock;

use super::{DataBits, Flag, UsartDevice};

/// Returns `Err(WouldBlock)` if the transmit data register still holds the
/// previous word or `Ok(())` if it has been taken over by the shift register.
pub(crate) fn transmit_flushed<D: UsartDevice>(device: &D) -> nb::Result<(), Infallible> {
    if device.flag(Flag::TxEmpty) {
        Ok(())
    } else {
        Err(WouldBlock)
    }
}

/// Writes one word to the data register, then busy-waits until the hardware
/// has accepted it.
///
/// Blocks forever if the peripheral never raises the transmit-empty flag,
/// e.g. because it was never started.
pub(crate) fn write_word_blocking<D: UsartDevice>(device: &D, word: u16) {
    device.write_data(word);
    while transmit_flushed(device).is_err() {}
}

/// Writes words to the USART, first element first.
///
/// This function blocks until the full buffer has been sent.
pub(crate) fn write_full_blocking<D: UsartDevice>(device: &D, words: &[u16]) {
    for &word in words {
        write_word_blocking(device, word);
    }
}

/// Reverses `word` within its low `width` bits.
///
/// The shift register sends the least significant bit first; transmitting the
/// reversed word therefore puts the original word on the wire most significant
/// bit first. Bits above `width` are discarded.
pub fn reverse_word(word: u16, width: DataBits) -> u16 {
    let bits: u32 = match width {
        DataBits::Eight => 8,
        DataBits::Nine => 9,
    };
    ((word as u32).reverse_bits() >> (32 - bits)) as u16
}

/// Like [`write_word_blocking`], transmitting the word most significant bit
/// first.
pub(crate) fn write_word_msb_first<D: UsartDevice>(device: &D, word: u16, width: DataBits) {
    write_word_blocking(device, reverse_word(word, width));
}

/// Like [`write_full_blocking`], transmitting each word most significant bit
/// first.
pub(crate) fn write_full_blocking_msb_first<D: UsartDevice>(
    device: &D,
    words: &[u16],
    width: DataBits,
) {
    for &word in words {
        write_word_msb_first(device, word, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_eight_bits() {
        assert_eq!(reverse_word(0b1011_0000, DataBits::Eight), 0b0000_1101);
        assert_eq!(reverse_word(0b0000_0001, DataBits::Eight), 0b1000_0000);
        assert_eq!(reverse_word(0b1111_1111, DataBits::Eight), 0b1111_1111);
        assert_eq!(reverse_word(0x00, DataBits::Eight), 0x00);
    }

    #[test]
    fn reverse_nine_bits() {
        assert_eq!(reverse_word(0b1_0101_0000, DataBits::Nine), 0b0_0001_0101);
        assert_eq!(reverse_word(0b1_0000_0000, DataBits::Nine), 0b0_0000_0001);
        assert_eq!(reverse_word(0b1_1111_1111, DataBits::Nine), 0b1_1111_1111);
    }

    #[test]
    fn reverse_discards_bits_above_the_width() {
        // A 9-bit value reversed as an 8-bit word loses its top bit.
        assert_eq!(
            reverse_word(0b1_1011_0000, DataBits::Eight),
            reverse_word(0b0_1011_0000, DataBits::Eight)
        );
    }

    #[test]
    fn reverse_is_an_involution() {
        for word in [0u16, 0x0001, 0x00a5, 0x00ff, 0x01ff, 0x0155] {
            assert_eq!(
                reverse_word(reverse_word(word, DataBits::Nine), DataBits::Nine),
                word & 0x01ff
            );
        }
    }
}

//! Universal Synchronous/Asynchronous Receiver Transmitter - Peripheral Code
//!
//! This module ties the transmit and receive halves together into an
//! `UsartPeripheral` object moving through the `Disabled` and `Enabled`
//! states. Call order within a state is not validated; the hardware holds all
//! of the actual state.

use core::convert::Infallible;
use core::fmt;

use fugit::HertzU32;
use nb::Error::WouldBlock;

use super::*;

/// An USART Peripheral based on an underlying USART device.
pub struct UsartPeripheral<S: State, D: UsartDevice> {
    device: D,
    data_bits: DataBits,
    _state: S,
}

impl<S: State, D: UsartDevice> UsartPeripheral<S, D> {
    fn transition<To: State>(self, state: To) -> UsartPeripheral<To, D> {
        UsartPeripheral {
            device: self.device,
            data_bits: self.data_bits,
            _state: state,
        }
    }

    /// Releases the underlying device without touching its registers.
    pub fn free(self) -> D {
        self.device
    }

    /// Resets the peripheral's registers to their hardware defaults and
    /// releases the underlying device.
    pub fn deinit(self) -> D {
        self.device.reset_registers();
        self.device
    }
}

impl<D: UsartDevice> UsartPeripheral<Disabled, D> {
    /// Creates an UsartPeripheral in Disabled state.
    ///
    /// The word length used by the MSB-first transmit path starts out as
    /// 8 bits, the hardware reset value, until [`configure`] says otherwise.
    ///
    /// [`configure`]: UsartPeripheral::configure
    pub fn new(device: D) -> UsartPeripheral<Disabled, D> {
        UsartPeripheral {
            device,
            data_bits: DataBits::Eight,
            _state: Disabled,
        }
    }

    /// Configures the fixed TX/RX pin pair of this peripheral as
    /// alternate-function push-pull at the requested drive speed.
    ///
    /// The port configuration registers are shared with unrelated pins; the
    /// backend serializes the update against other users of the port.
    pub fn init_pins(&self, speed: GpioSpeed) {
        self.device.configure_pins(
            PinMask::pin(D::TX_PIN) | PinMask::pin(D::RX_PIN),
            PinMode::AltPushPull,
            speed,
        );
    }

    /// Enables the peripheral's bus clock and programs direction, frame
    /// format and baud rate in one go.
    ///
    /// `pclk` is the frequency of the bus clock feeding this peripheral
    /// (APB2 for USART1, APB1 for USART2). Fails with
    /// [`Error::BadArgument`] if the resulting divider leaves the hardware
    /// range and with [`Error::FlowControlNotSupported`] for any flow-control
    /// setting except [`FlowControl::None`]; nothing is programmed in either
    /// case.
    pub fn configure(&mut self, config: UsartConfig, pclk: HertzU32) -> Result<(), Error> {
        if config.flow_control != FlowControl::None {
            return Err(Error::FlowControlNotSupported);
        }
        let divisor = calculate_baudrate_divisor(config.baudrate, pclk)?;

        self.device.enable_bus_clock();
        self.device.apply_config(&config, divisor);
        self.data_bits = config.data_bits;
        Ok(())
    }

    /// Configures the fixed clock pin (alternate-function push-pull, maximum
    /// drive speed) and the synchronous clock generation of this peripheral.
    ///
    /// Only call this when emulating an SPI-like synchronous link; leaving it
    /// out keeps the peripheral in plain asynchronous (UART) operation.
    pub fn configure_synchronous_clock(&self, clock: ClockConfig) {
        self.device
            .configure_pins(PinMask::pin(D::CK_PIN), PinMode::AltPushPull, GpioSpeed::Mhz50);
        self.device.apply_clock_config(&clock);
    }

    /// Enables the bus clock and the peripheral itself.
    ///
    /// Enabling twice is harmless at the hardware level.
    pub fn enable(self) -> UsartPeripheral<Enabled, D> {
        self.device.enable_bus_clock();
        self.device.set_enabled(true);
        self.transition(Enabled)
    }
}

impl<D: UsartDevice> UsartPeripheral<Enabled, D> {
    /// Disables the peripheral, then gates its bus clock off.
    ///
    /// Must not be called while a transfer is pending; nothing here checks.
    pub fn disable(self) -> UsartPeripheral<Disabled, D> {
        self.device.set_enabled(false);
        self.device.disable_bus_clock();
        self.transition(Disabled)
    }

    /// Returns `Err(WouldBlock)` while the transmit data register holds an
    /// unsent word.
    pub fn transmit_flushed(&self) -> nb::Result<(), Infallible> {
        super::writer::transmit_flushed(&self.device)
    }

    /// Writes one word (8 or 9 bits, per the configured word length) and
    /// busy-waits until the hardware has accepted it.
    ///
    /// Blocks forever if the peripheral never reports the transmit data
    /// register empty, e.g. when it was never started. That is the intended
    /// contract; bounded waiting can be built on [`transmit_flushed`].
    ///
    /// [`transmit_flushed`]: UsartPeripheral::transmit_flushed
    pub fn write_word(&self, word: u16) {
        super::writer::write_word_blocking(&self.device, word);
    }

    /// Writes words to the USART, first element first.
    ///
    /// This function blocks until the full buffer has been sent.
    pub fn write_full_blocking(&self, words: &[u16]) {
        super::writer::write_full_blocking(&self.device, words);
    }

    /// Like [`write_word`](UsartPeripheral::write_word), but transmits the
    /// word most significant bit first by reversing it within the configured
    /// word length before it reaches the LSB-first shift register.
    pub fn write_word_msb_first(&self, word: u16) {
        super::writer::write_word_msb_first(&self.device, word, self.data_bits);
    }

    /// MSB-first variant of
    /// [`write_full_blocking`](UsartPeripheral::write_full_blocking).
    pub fn write_full_blocking_msb_first(&self, words: &[u16]) {
        super::writer::write_full_blocking_msb_first(&self.device, words, self.data_bits);
    }

    /// Returns the received word if one is waiting, `Err(WouldBlock)`
    /// otherwise.
    pub fn read_word(&self) -> nb::Result<u16, Infallible> {
        super::reader::read_word(&self.device)
    }

    /// Busy-waits until a word arrives and returns it.
    ///
    /// Blocks forever if no data ever arrives.
    pub fn read_word_blocking(&self) -> u16 {
        super::reader::read_word_blocking(&self.device)
    }

    /// Fills `buffer` with received words, in arrival order.
    ///
    /// This function blocks until the full buffer has been received.
    pub fn read_full_blocking(&self, buffer: &mut [u16]) {
        super::reader::read_full_blocking(&self.device, buffer);
    }
}

/// From the wanted baud rate and the bus clock feeding the peripheral,
/// calculate the baud-rate register image: a 12-bit mantissa and 4-bit
/// fraction, which together encode `pclk / baudrate` in sixteenths.
fn calculate_baudrate_divisor(
    wanted_baudrate: HertzU32,
    frequency: HertzU32,
) -> Result<u16, Error> {
    let baudrate = wanted_baudrate.to_Hz();
    let divisor = frequency
        .to_Hz()
        .checked_add(baudrate / 2)
        .and_then(|n| n.checked_div(baudrate))
        .ok_or(Error::BadArgument)?;

    // The mantissa part must be at least 1 and fit its 12 bits.
    if !(0x10..=0xFFFF).contains(&divisor) {
        return Err(Error::BadArgument);
    }
    Ok(divisor as u16)
}

impl<D: UsartDevice> fmt::Write for UsartPeripheral<Enabled, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.bytes()
            .for_each(|b| super::writer::write_word_blocking(&self.device, b.into()));
        Ok(())
    }
}

impl<D: UsartDevice> embedded_hal_nb::serial::ErrorType for UsartPeripheral<Enabled, D> {
    type Error = Error;
}

impl<D: UsartDevice> embedded_hal_nb::serial::Read<u16> for UsartPeripheral<Enabled, D> {
    fn read(&mut self) -> nb::Result<u16, Self::Error> {
        super::reader::read_word(&self.device).map_err(|e| match e {
            WouldBlock => WouldBlock,
            nb::Error::Other(v) => match v {},
        })
    }
}

impl<D: UsartDevice> embedded_hal_nb::serial::Write<u16> for UsartPeripheral<Enabled, D> {
    fn write(&mut self, word: u16) -> nb::Result<(), Self::Error> {
        if self.device.flag(Flag::TxEmpty) {
            self.device.write_data(word);
            Ok(())
        } else {
            Err(WouldBlock)
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        super::writer::transmit_flushed(&self.device).map_err(|e| match e {
            WouldBlock => WouldBlock,
            nb::Error::Other(v) => match v {},
        })
    }
}

impl<D: UsartDevice> embedded_io::ErrorType for UsartPeripheral<Enabled, D> {
    type Error = Error;
}

impl<D: UsartDevice> embedded_io::Write for UsartPeripheral<Enabled, D> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            super::writer::write_word_blocking(&self.device, byte.into());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        while super::writer::transmit_flushed(&self.device).is_err() {}
        Ok(())
    }
}

impl<D: UsartDevice> embedded_io::Read for UsartPeripheral<Enabled, D> {
    // Bytes are the low 8 bits of each word; meant for 8-bit operation.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = super::reader::read_word_blocking(&self.device) as u8;
        let mut count = 1;
        while count < buf.len() {
            match super::reader::read_word(&self.device) {
                Ok(word) => {
                    buf[count] = word as u8;
                    count += 1;
                }
                Err(WouldBlock) => break,
                Err(nb::Error::Other(v)) => match v {},
            }
        }
        Ok(count)
    }
}

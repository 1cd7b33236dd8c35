use fugit::HertzU32;

use super::pins::{GpioSpeed, PinMask, PinMode};
use crate::typelevel::Sealed;

/// Error type for USART operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bad argument : when things overflow, ...
    BadArgument,
    /// Hardware flow control is defined by the wire format but not wired to
    /// any pin by this driver; every setting except [`FlowControl::None`] is
    /// rejected.
    FlowControlNotSupported,
}

impl embedded_hal_nb::serial::Error for Error {
    fn kind(&self) -> embedded_hal_nb::serial::ErrorKind {
        embedded_hal_nb::serial::ErrorKind::Other
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// State of the USART Peripheral.
pub trait State: Sealed {}

/// USART is enabled.
pub struct Enabled;

/// USART is disabled.
pub struct Disabled;

impl State for Enabled {}
impl Sealed for Enabled {}
impl State for Disabled {}
impl Sealed for Disabled {}

/// Data bits (word length)
///
/// With parity enabled the parity bit occupies the most significant position
/// of the word, exactly as the hardware frames it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 8 bits
    Eight,
    /// 9 bits
    Nine,
}

/// Stop bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 0.5 stop bits
    Half,
    /// 2 stop bits
    Two,
    /// 1.5 stop bits
    OneAndHalf,
}

/// Parity
///
/// The "none" state of parity is represented with the Option type (None).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// Odd parity
    Odd,
    /// Even parity
    Even,
}

/// Transfer direction of the peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Receive only
    Rx,
    /// Transmit only
    Tx,
    /// Receive and transmit
    RxTx,
}

/// Hardware flow control setting.
///
/// Only [`FlowControl::None`] is supported; the other values exist so a
/// configuration can state them explicitly and be rejected, rather than
/// being accepted and silently ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    /// No flow control
    None,
    /// RTS line only
    Rts,
    /// CTS line only
    Cts,
    /// Both RTS and CTS
    RtsCts,
}

/// Clock polarity of the synchronous clock pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockPolarity {
    /// The clock idles low between words.
    IdleLow,
    /// The clock idles high between words.
    IdleHigh,
}

/// Clock phase of the synchronous clock pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockPhase {
    /// Data is captured on the first clock transition.
    FirstEdge,
    /// Data is captured on the second clock transition.
    SecondEdge,
}

/// Status flags the driver busy-waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    /// The transmit data register is empty.
    TxEmpty,
    /// The receive data register holds an unread word.
    RxNotEmpty,
}

/// A struct holding the configuration for an USART device.
///
/// The `Default` implementation is 115200 baud, 8 data bits, no parity, 1 stop
/// bit, both directions, no flow control.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct UsartConfig {
    /// The baudrate the usart will run at.
    pub baudrate: HertzU32,

    /// Transfer direction.
    pub mode: Mode,

    /// Hardware flow control. Anything but `None` makes
    /// [`configure`](super::UsartPeripheral::configure) fail.
    pub flow_control: FlowControl,

    /// The amount of data bits the usart should be configured to.
    pub data_bits: DataBits,

    /// The amount of stop bits the usart should be configured to.
    pub stop_bits: StopBits,

    /// The parity that this usart should have
    pub parity: Option<Parity>,
}

impl UsartConfig {
    /// Create a new instance of UsartConfig, transferring in both directions
    /// and without flow control.
    pub const fn new(
        baudrate: HertzU32,
        data_bits: DataBits,
        parity: Option<Parity>,
        stop_bits: StopBits,
    ) -> UsartConfig {
        UsartConfig {
            baudrate,
            mode: Mode::RxTx,
            flow_control: FlowControl::None,
            data_bits,
            stop_bits,
            parity,
        }
    }
}

impl Default for UsartConfig {
    fn default() -> Self {
        UsartConfig::new(
            HertzU32::from_raw(115_200),
            DataBits::Eight,
            None,
            StopBits::One,
        )
    }
}

/// Configuration of the synchronous clock output.
///
/// Only meaningful when the peripheral emulates an SPI-like synchronous link;
/// for plain asynchronous operation, never call
/// [`configure_synchronous_clock`](super::UsartPeripheral::configure_synchronous_clock)
/// and this struct plays no role.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Drive the clock pin during transfers.
    pub enabled: bool,
    /// Clock polarity.
    pub polarity: ClockPolarity,
    /// Clock phase.
    pub phase: ClockPhase,
    /// Also pulse the clock for the last (most significant) data bit.
    pub last_bit_pulse: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            enabled: true,
            polarity: ClockPolarity::IdleLow,
            phase: ClockPhase::FirstEdge,
            last_bit_pulse: false,
        }
    }
}

/// Trait to handle both underlying devices (USART1 & USART2)
///
/// This is the register-access seam of the driver: one implementation exists
/// per peripheral instance of the selected chip variant, and the host tests
/// substitute a recording mock. The driver above this trait never touches a
/// register.
pub trait UsartDevice: Sealed {
    /// Fixed transmit pin number on GPIO port A.
    const TX_PIN: u8;
    /// Fixed receive pin number on GPIO port A.
    const RX_PIN: u8;
    /// Fixed synchronous clock pin number on GPIO port A.
    const CK_PIN: u8;

    /// Gate the peripheral's bus clock on.
    fn enable_bus_clock(&self);

    /// Gate the peripheral's bus clock off.
    fn disable_bus_clock(&self);

    /// Program the mode and drive speed of a set of port A pins.
    fn configure_pins(&self, pins: PinMask, mode: PinMode, speed: GpioSpeed);

    /// Program direction, frame format and baud rate in one go.
    ///
    /// `divisor` is the precomputed baud-rate register image (12-bit mantissa,
    /// 4-bit fraction).
    fn apply_config(&self, config: &UsartConfig, divisor: u16);

    /// Program the synchronous clock generation bits.
    fn apply_clock_config(&self, clock: &ClockConfig);

    /// Set or clear the peripheral enable bit.
    fn set_enabled(&self, enabled: bool);

    /// Write one word to the transmit data register.
    fn write_data(&self, word: u16);

    /// Read one word from the receive data register.
    fn read_data(&self) -> u16;

    /// Query a status flag.
    fn flag(&self, flag: Flag) -> bool;

    /// Reset every peripheral register to its hardware default.
    fn reset_registers(&self);
}

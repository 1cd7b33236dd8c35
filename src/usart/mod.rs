//! Universal Synchronous/Asynchronous Receiver Transmitter (USART)
//!
//! The F1's USART moves 8- or 9-bit words, least significant bit first, either
//! as a plain asynchronous UART or with a clock signal on a dedicated pin
//! (synchronous mode, usable as a simple SPI-like link). This driver covers
//! pin setup, parameter programming, start/stop and blocking transfer; every
//! transfer spins on a status flag and never times out.
//!
//! Because the shift register is wired LSB-first, the driver also offers an
//! MSB-first transmit path that bit-reverses each word within the configured
//! word length before writing it ([`reverse_word`]).
//!
//! ## Usage
//!
//! ```no_run
//! use stm32_usart_hal::fugit::RateExtU32;
//! use stm32_usart_hal::usart::{GpioSpeed, UsartConfig, UsartPeripheral};
//!
//! let p = unsafe { stm32_usart_hal::pac::Peripherals::steal() };
//!
//! let mut usart = UsartPeripheral::new(p.USART1);
//! usart.init_pins(GpioSpeed::Mhz50);
//! usart.configure(UsartConfig::default(), 72.MHz()).unwrap();
//! let usart = usart.enable();
//!
//! usart.write_full_blocking(&[0x48, 0x69]);
//! let answer = usart.read_word_blocking();
//! # let _ = answer;
//! ```

mod peripheral;
mod pins;
mod reader;
mod utils;
mod writer;

pub use self::peripheral::UsartPeripheral;
pub use self::pins::*;
pub use self::utils::*;
pub use self::writer::reverse_word;

/// Common configurations for USART.
pub mod common_configs;

#[cfg(test)]
pub(crate) mod mock;

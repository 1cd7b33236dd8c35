//! Blocking USART driver for the STM32F1 microcontroller family
//!
//! This crate wraps the on-chip USART peripherals behind a small typestate API:
//! pin setup, communication parameters, start/stop and blocking word transfer,
//! including an MSB-first transmit path that bit-reverses each word before it
//! reaches the LSB-first shift register. See the [`usart`] module for details
//! and a usage example.
//!
//! Register access is funneled through the [`usart::UsartDevice`] trait, with
//! one implementation per supported chip variant selected at build time. Only
//! the STM32F103 backend exists today.
//!
//! # Crate features
//!
//! * **stm32f103** (default) -
//!   Build the driver for the STM32F103; pulls in the matching PAC.
//! * **stm32f072** -
//!   Placeholder for the STM32F072 variant. Selecting it fails the build until
//!   a backend exists.
//! * **rt** -
//!   Minimal startup / runtime for Cortex-M microcontrollers
//! * **critical-section-single-core** -
//!   critical section implementation for single-core chips (the whole F1
//!   family)
//! * **defmt** -
//!   Implement `defmt::Format` for several types.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(not(any(feature = "stm32f103", feature = "stm32f072")))]
compile_error!(
    "no chip variant selected: enable exactly one of the `stm32f103` or `stm32f072` features"
);

#[cfg(feature = "stm32f072")]
compile_error!("the `stm32f072` variant is declared but has no backend yet");

/// Re-export of the PAC
#[cfg(feature = "stm32f103")]
pub use stm32f1::stm32f103 as pac;

/// Re-export of the time/rate types used by [`usart::UsartConfig`]
pub use fugit;

#[cfg(feature = "stm32f103")]
mod stm32f103;
pub mod typelevel;
pub mod usart;

//! A recording [`UsartDevice`] for the host test suite.
//!
//! Register side effects are captured twice over: an ordered operation log
//! for sequencing assertions, and a shadow register file for end-state
//! assertions. Flag queries pop a per-flag script; an exhausted script falls
//! back to "transmitter idle" and "receiver holds data iff the queue is
//! non-empty".

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{ClockConfig, Flag, GpioSpeed, PinMask, PinMode, UsartConfig, UsartDevice};
use crate::typelevel::Sealed;

/// One recorded register-level operation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    BusClock(bool),
    Pins {
        pins: PinMask,
        mode: PinMode,
        speed: GpioSpeed,
    },
    Config {
        config: UsartConfig,
        divisor: u16,
    },
    ClockConfig(ClockConfig),
    Enabled(bool),
    Write(u16),
    Read(u16),
    Flag {
        flag: Flag,
        value: bool,
    },
    Reset,
}

/// End state of the mocked registers. `Default` is the hardware reset state.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Shadow {
    pub config: Option<(UsartConfig, u16)>,
    pub clock: Option<ClockConfig>,
    pub enabled: bool,
    pub bus_clock: bool,
}

#[derive(Default)]
pub(crate) struct MockUsart {
    ops: RefCell<Vec<Op>>,
    txe: RefCell<VecDeque<bool>>,
    rxne: RefCell<VecDeque<bool>>,
    rx_data: RefCell<VecDeque<u16>>,
    shadow: RefCell<Shadow>,
}

impl MockUsart {
    pub fn new() -> MockUsart {
        MockUsart::default()
    }

    /// Queue the result of an upcoming `flag` query.
    pub fn push_flag(&self, flag: Flag, value: bool) {
        match flag {
            Flag::TxEmpty => self.txe.borrow_mut().push_back(value),
            Flag::RxNotEmpty => self.rxne.borrow_mut().push_back(value),
        }
    }

    /// Queue a word in the receive data register.
    pub fn push_rx_data(&self, word: u16) {
        self.rx_data.borrow_mut().push_back(word);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn shadow(&self) -> Shadow {
        self.shadow.borrow().clone()
    }

    fn log(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }
}

impl Sealed for MockUsart {}

impl UsartDevice for MockUsart {
    const TX_PIN: u8 = 9;
    const RX_PIN: u8 = 10;
    const CK_PIN: u8 = 8;

    fn enable_bus_clock(&self) {
        self.shadow.borrow_mut().bus_clock = true;
        self.log(Op::BusClock(true));
    }

    fn disable_bus_clock(&self) {
        self.shadow.borrow_mut().bus_clock = false;
        self.log(Op::BusClock(false));
    }

    fn configure_pins(&self, pins: PinMask, mode: PinMode, speed: GpioSpeed) {
        self.log(Op::Pins { pins, mode, speed });
    }

    fn apply_config(&self, config: &UsartConfig, divisor: u16) {
        self.shadow.borrow_mut().config = Some((config.clone(), divisor));
        self.log(Op::Config {
            config: config.clone(),
            divisor,
        });
    }

    fn apply_clock_config(&self, clock: &ClockConfig) {
        self.shadow.borrow_mut().clock = Some(clock.clone());
        self.log(Op::ClockConfig(clock.clone()));
    }

    fn set_enabled(&self, enabled: bool) {
        self.shadow.borrow_mut().enabled = enabled;
        self.log(Op::Enabled(enabled));
    }

    fn write_data(&self, word: u16) {
        self.log(Op::Write(word));
    }

    fn read_data(&self) -> u16 {
        let word = self.rx_data.borrow_mut().pop_front().unwrap_or(0);
        self.log(Op::Read(word));
        word
    }

    fn flag(&self, flag: Flag) -> bool {
        let value = match flag {
            Flag::TxEmpty => self.txe.borrow_mut().pop_front().unwrap_or(true),
            Flag::RxNotEmpty => self
                .rxne
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| !self.rx_data.borrow().is_empty()),
        };
        self.log(Op::Flag { flag, value });
        value
    }

    fn reset_registers(&self) {
        {
            let mut shadow = self.shadow.borrow_mut();
            shadow.config = None;
            shadow.clock = None;
            shadow.enabled = false;
        }
        self.log(Op::Reset);
    }
}

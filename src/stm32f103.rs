//! STM32F103 register backend.
//!
//! Implements [`UsartDevice`] for the two USART instances the driver knows,
//! on top of the `stm32f1` PAC. Everything a vendor peripheral library would
//! do — bus clock gating, port A pin modes, CR/BRR programming, the reset
//! pulse — happens here; the driver above this module never sees a register.
//!
//! RCC and GPIOA are shared with the rest of the firmware, so every
//! read-modify-write of them runs inside a critical section. The USART's own
//! registers belong to the device handle the caller moved in and need no
//! locking.

use crate::pac;
use crate::typelevel::Sealed;
use crate::usart::{
    ClockConfig, ClockPhase, ClockPolarity, DataBits, Flag, GpioSpeed, Mode, Parity, PinMask,
    PinMode, StopBits, UsartConfig, UsartDevice,
};

const CR2_STOP_MASK: u32 = 0b11 << 12;
const CR2_STOP_OFFSET: u32 = 12;
const DATA_MASK: u32 = 0x01FF;

/// CRL/CRH image of one pin: CNF in the high two bits, MODE in the low two.
fn pin_config_bits(mode: PinMode, speed: GpioSpeed) -> u32 {
    let cnf: u32 = match mode {
        PinMode::AltPushPull => 0b10,
    };
    let mode_bits: u32 = match speed {
        GpioSpeed::Mhz10 => 0b01,
        GpioSpeed::Mhz2 => 0b10,
        GpioSpeed::Mhz50 => 0b11,
    };
    (cnf << 2) | mode_bits
}

fn configure_port_a_pins(pins: PinMask, mode: PinMode, speed: GpioSpeed) {
    let value = pin_config_bits(mode, speed);
    critical_section::with(|_| {
        let rcc = unsafe { &(*pac::RCC::ptr()) };
        // Alternate functions need the port clock and AFIO running.
        rcc.apb2enr
            .modify(|_, w| w.iopaen().set_bit().afioen().set_bit());

        let gpioa = unsafe { &(*pac::GPIOA::ptr()) };
        for pin in 0..16u8 {
            if !pins.contains(pin) {
                continue;
            }
            let shift = u32::from(pin % 8) * 4;
            let clear = !(0b1111u32 << shift);
            let set = value << shift;
            if pin < 8 {
                gpioa
                    .crl
                    .modify(|r, w| unsafe { w.bits((r.bits() & clear) | set) });
            } else {
                gpioa
                    .crh
                    .modify(|r, w| unsafe { w.bits((r.bits() & clear) | set) });
            }
        }
    });
}

macro_rules! impl_usart_device {
    ($USARTX:ident, $tx:expr, $rx:expr, $ck:expr, $apbenr:ident, $apbrstr:ident, $en:ident, $rst:ident) => {
        impl Sealed for pac::$USARTX {}

        impl UsartDevice for pac::$USARTX {
            const TX_PIN: u8 = $tx;
            const RX_PIN: u8 = $rx;
            const CK_PIN: u8 = $ck;

            fn enable_bus_clock(&self) {
                critical_section::with(|_| {
                    let rcc = unsafe { &(*pac::RCC::ptr()) };
                    rcc.$apbenr.modify(|_, w| w.$en().set_bit());
                });
            }

            fn disable_bus_clock(&self) {
                critical_section::with(|_| {
                    let rcc = unsafe { &(*pac::RCC::ptr()) };
                    rcc.$apbenr.modify(|_, w| w.$en().clear_bit());
                });
            }

            fn configure_pins(&self, pins: PinMask, mode: PinMode, speed: GpioSpeed) {
                configure_port_a_pins(pins, mode, speed);
            }

            fn apply_config(&self, config: &UsartConfig, divisor: u16) {
                // Divider first, so an immediately following enable sees a
                // programmed rate.
                self.brr.write(|w| unsafe { w.bits(u32::from(divisor)) });

                let stop: u32 = match config.stop_bits {
                    StopBits::One => 0b00,
                    StopBits::Half => 0b01,
                    StopBits::Two => 0b10,
                    StopBits::OneAndHalf => 0b11,
                };
                self.cr2.modify(|r, w| unsafe {
                    w.bits((r.bits() & !CR2_STOP_MASK) | (stop << CR2_STOP_OFFSET))
                });

                self.cr1.modify(|_, w| {
                    w.m().bit(matches!(config.data_bits, DataBits::Nine));
                    w.pce().bit(config.parity.is_some());
                    w.ps().bit(matches!(config.parity, Some(Parity::Odd)));
                    w.te().bit(matches!(config.mode, Mode::Tx | Mode::RxTx));
                    w.re().bit(matches!(config.mode, Mode::Rx | Mode::RxTx));
                    w
                });

                // Flow control is rejected upstream; keep the lines released
                // even if an earlier firmware stage engaged them.
                self.cr3.modify(|_, w| w.ctse().clear_bit().rtse().clear_bit());
            }

            fn apply_clock_config(&self, clock: &ClockConfig) {
                self.cr2.modify(|_, w| {
                    w.clken().bit(clock.enabled);
                    w.cpol().bit(matches!(clock.polarity, ClockPolarity::IdleHigh));
                    w.cpha().bit(matches!(clock.phase, ClockPhase::SecondEdge));
                    w.lbcl().bit(clock.last_bit_pulse);
                    w
                });
            }

            fn set_enabled(&self, enabled: bool) {
                self.cr1.modify(|_, w| w.ue().bit(enabled));
            }

            fn write_data(&self, word: u16) {
                self.dr.write(|w| unsafe { w.bits(u32::from(word) & DATA_MASK) });
            }

            fn read_data(&self) -> u16 {
                (self.dr.read().bits() & DATA_MASK) as u16
            }

            fn flag(&self, flag: Flag) -> bool {
                let sr = self.sr.read();
                match flag {
                    Flag::TxEmpty => sr.txe().bit_is_set(),
                    Flag::RxNotEmpty => sr.rxne().bit_is_set(),
                }
            }

            fn reset_registers(&self) {
                critical_section::with(|_| {
                    let rcc = unsafe { &(*pac::RCC::ptr()) };
                    rcc.$apbrstr.modify(|_, w| w.$rst().set_bit());
                    rcc.$apbrstr.modify(|_, w| w.$rst().clear_bit());
                });
            }
        }
    };
}

impl_usart_device!(USART1, 9, 10, 8, apb2enr, apb2rstr, usart1en, usart1rst);
impl_usart_device!(USART2, 2, 3, 4, apb1enr, apb1rstr, usart2en, usart2rst);

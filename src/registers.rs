//! Register maps and bitfield layouts for the supported RTC chips.
//!
//! Each chip gets an address enum in the style of a datasheet register table,
//! a set of flag masks for the single-bit status and control accessors, and
//! bitfield views of the registers whose multi-bit fields the drivers decode.

use bitfield::bitfield;

/// Register addresses for the DS1307.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ds1307Register {
    /// Seconds register, shared with the clock-halt bit
    Seconds = 0x00,
    /// Square-wave output control register
    Control = 0x07,
    /// First byte of the battery-backed RAM
    Ram = 0x08,
}

/// Register addresses for the DS3231.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ds3231Register {
    /// Seconds register, first of the seven date/time registers
    Seconds = 0x00,
    /// Alarm 1 seconds register, first of the four alarm 1 registers
    Alarm1Seconds = 0x07,
    /// Control register (oscillator, square wave, interrupts)
    Control = 0x0E,
    /// Control/Status register
    Status = 0x0F,
}

/// Register addresses for the PCF8523.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pcf8523Register {
    /// Control_1
    Control1 = 0x00,
    /// Control_2
    Control2 = 0x01,
    /// Control_3 (battery switch-over and low battery detection)
    Control3 = 0x02,
    /// Seconds register, first of the seven date/time registers
    Seconds = 0x03,
    /// Minute alarm register, first of the four alarm registers
    MinuteAlarm = 0x0A,
    /// Timer and CLKOUT control register
    TimerClockOut = 0x0F,
}

macro_rules! register_u8 {
    ($($typ:ty),+) => {
        $(
            impl From<$typ> for u8 {
                fn from(v: $typ) -> Self {
                    v as u8
                }
            }
        )+
    };
}
register_u8!(Ds1307Register, Ds3231Register, Pcf8523Register);

/// Size of the DS1307 battery-backed RAM in bytes.
pub const DS1307_RAM_SIZE: usize = 56;

/// DS1307 clock-halt bit in the seconds register.
pub const DS1307_CLOCK_HALT: u8 = 0b1000_0000;

/// DS3231 oscillator-stop flag in the status register.
pub const DS3231_OSCILLATOR_STOP_FLAG: u8 = 0b1000_0000;
/// DS3231 alarm 1 and alarm 2 triggered flags in the status register.
pub const DS3231_ALARM_FLAGS: u8 = 0b0000_0011;
/// DS3231 oscillator enable bit in the control register (active low).
pub const DS3231_OSCILLATOR_DISABLE: u8 = 0b1000_0000;

/// PCF8523 software reset pattern written to Control_1.
pub const PCF8523_SOFTWARE_RESET: u8 = 0x58;
/// PCF8523 clock stop bit in Control_1.
pub const PCF8523_STOP: u8 = 0b0001_0000;
/// PCF8523 alarm flag in Control_2.
pub const PCF8523_ALARM_FLAG: u8 = 0b0000_1000;
/// PCF8523 power management bits in Control_3.
pub const PCF8523_POWER_MANAGEMENT: u8 = 0b1110_0000;
/// PCF8523 battery switch-over flag in Control_3.
pub const PCF8523_SWITCHOVER_FLAG: u8 = 0b0001_0000;
/// PCF8523 battery low flag in Control_3.
pub const PCF8523_BATTERY_LOW: u8 = 0b0000_0100;

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// DS1307 square-wave control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Ds1307Control(u8);
    impl Debug;
    /// Output level of the SQW/OUT pin while the square wave is disabled
    pub out, set_out: 7;
    /// Square-wave enable
    pub sqwe, set_sqwe: 4;
    /// Rate select (1 Hz, 4.096 kHz, 8.192 kHz, 32.768 kHz)
    pub rate, set_rate: 1, 0;
}
from_register_u8!(Ds1307Control);

bitfield! {
    /// DS3231 control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Ds3231Control(u8);
    impl Debug;
    /// Oscillator disable while on battery (active low enable)
    pub eosc, set_eosc: 7;
    /// Battery-backed square wave enable
    pub bbsqw, set_bbsqw: 6;
    /// Force temperature conversion
    pub conv, set_conv: 5;
    /// Rate select (1 Hz, 1.024 kHz, 4.096 kHz, 8.192 kHz)
    pub rate, set_rate: 4, 3;
    /// Interrupt control: 1 routes alarms to INT/SQW instead of the square wave
    pub intcn, set_intcn: 2;
    /// Alarm 2 interrupt enable
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Alarm 1 interrupt enable
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Ds3231Control);

bitfield! {
    /// PCF8523 timer and CLKOUT control register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Pcf8523ClockOut(u8);
    impl Debug;
    /// Timer A interrupt mode
    pub tam, set_tam: 7;
    /// Timer B interrupt mode
    pub tbm, set_tbm: 6;
    /// CLKOUT frequency select
    pub cof, set_cof: 5, 3;
    /// Timer A control
    pub tac, set_tac: 2, 1;
    /// Timer B enable
    pub tbc, set_tbc: 0;
}
from_register_u8!(Pcf8523ClockOut);

bitfield! {
    /// One PCF8523 alarm register: an enable bit over a BCD value.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmField(u8);
    impl Debug;
    /// Set when the field is excluded from the alarm match
    pub disabled, set_disabled: 7;
    /// BCD encoded value
    pub value, set_value: 6, 0;
}
from_register_u8!(AlarmField);

bitfield! {
    /// DS3231 alarm 1 day/date register.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// A1M4 mask: day and date are ignored when set
    pub masked, set_masked: 7;
    /// DY/DT: 1 matches the day of week, 0 the day of month
    pub day_select, set_day_select: 6;
    /// BCD encoded day of week or day of month
    pub value, set_value: 5, 0;
}
from_register_u8!(AlarmDayDate);

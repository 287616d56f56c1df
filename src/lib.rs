//! Platform-agnostic drivers for the DS1307, DS3231 and PCF8523 real-time
//! clocks, built on the [`embedded-hal`](https://docs.rs/embedded-hal) I2C
//! traits.
//!
//! All three chips keep the date and time in seven packed BCD registers and
//! expose their status and control state as single bits. The drivers translate
//! between those registers and a structured [`DateTime`], and give each
//! status bit a boolean accessor. No register contents are cached: every call
//! goes to the device.
//!
//! # Capabilities
//!
//! The shared operations live on the [`Rtc`] trait. Alarms exist only on the
//! DS3231 and PCF8523, which implement [`Alarm`]; battery-backed RAM exists
//! only on the DS1307. [`AnyRtc`] wraps any of the three behind one type and
//! reports [`Error::NotSupported`] for a capability the chip lacks, and
//! [`Model`] answers capability queries up front.
//!
//! # Example
//!
//! ```rust,ignore
//! use i2c_rtc::{DateTime, Pcf8523, Rtc};
//!
//! let mut rtc = Pcf8523::new(i2c, i2c_rtc::DEFAULT_ADDRESS)?;
//! if rtc.lost_power()? {
//!     rtc.set_datetime(&DateTime::new(2024, 3, 14).with_time(15, 30, 0))?;
//! }
//! let now = rtc.datetime()?;
//! ```
//!
//! # Features
//!
//! - `async`: async drivers in [`asynch`] on `embedded-hal-async`
//! - `log`: diagnostics through the `log` crate
//! - `defmt`: diagnostics through `defmt`, and `defmt::Format` on public types
#![no_std]

#[macro_use]
mod fmt;

// Generates a getter/setter pair for a single status or control flag.
macro_rules! flag_accessors {
    (async $($(#[$meta:meta])* ($name:ident, $register:expr, $mask:expr)),+ $(,)?) => {
        $(
            paste::paste! {
                $(#[$meta])*
                pub async fn $name(&mut self) -> Result<bool, Error<I2C::Error>> {
                    self.bus.flag($register as u8, $mask).await
                }

                #[doc = concat!("Sets or clears the flag read by [`Self::", stringify!($name), "`].")]
                pub async fn [<set_ $name>](&mut self, value: bool) -> Result<(), Error<I2C::Error>> {
                    self.bus.set_flag($register as u8, $mask, value).await
                }
            }
        )+
    };
    ($($(#[$meta:meta])* ($name:ident, $register:expr, $mask:expr)),+ $(,)?) => {
        $(
            paste::paste! {
                $(#[$meta])*
                pub fn $name(&mut self) -> Result<bool, Error<I2C::Error>> {
                    self.bus.flag($register as u8, $mask)
                }

                #[doc = concat!("Sets or clears the flag read by [`Self::", stringify!($name), "`].")]
                pub fn [<set_ $name>](&mut self, value: bool) -> Result<(), Error<I2C::Error>> {
                    self.bus.set_flag($register as u8, $mask, value)
                }
            }
        )+
    };
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod bcd;
pub mod bus;
pub mod datetime;
mod device;
mod ds1307;
mod ds3231;
pub mod frequency;
mod pcf8523;
pub mod registers;
#[cfg(test)]
mod testing;

pub use alarm::AlarmTime;
pub use bus::RegisterBus;
pub use datetime::{DateTime, DateTimeError, RegisterOrder};
pub use device::AnyRtc;
pub use ds1307::Ds1307;
pub use ds3231::Ds3231;
pub use pcf8523::Pcf8523;

/// Bus address shared by all three chips.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// The supported RTC chips.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Model {
    /// Maxim DS1307
    Ds1307,
    /// Maxim DS3231
    Ds3231,
    /// NXP PCF8523
    Pcf8523,
}

impl Model {
    /// Whether the chip has an alarm the drivers can program.
    pub const fn supports_alarm(self) -> bool {
        !matches!(self, Model::Ds1307)
    }

    /// Whether the chip has general purpose battery-backed RAM.
    pub const fn supports_memory(self) -> bool {
        matches!(self, Model::Ds1307)
    }

    /// The chip's fixed bus address.
    pub const fn default_address(self) -> u8 {
        DEFAULT_ADDRESS
    }

    /// Part number as printed on the package.
    pub const fn name(self) -> &'static str {
        match self {
            Model::Ds1307 => "DS1307",
            Model::Ds3231 => "DS3231",
            Model::Pcf8523 => "PCF8523",
        }
    }
}

/// Errors returned by the drivers.
///
/// `E` is the error type of the underlying I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The I2C bus reported an error
    I2c(E),
    /// The requested square-wave frequency is not available on this chip
    UnsupportedFrequency {
        /// Requested frequency in Hz
        requested: i32,
        /// Frequencies the chip accepts
        supported: &'static [i32],
    },
    /// A RAM access would fall outside the chip's RAM
    MemoryOutOfRange {
        /// Offset of the first byte
        address: u8,
        /// Number of bytes
        len: usize,
    },
    /// A register write longer than [`bus::MAX_BURST`] bytes
    BurstTooLong(usize),
    /// The chip does not have the requested capability
    NotSupported(&'static str),
    /// The chip cannot match this combination of alarm fields
    UnsupportedAlarm(AlarmTime),
    /// A register held a value the driver cannot interpret
    InvalidRegister {
        /// Register address
        register: u8,
        /// Value read
        value: u8,
    },
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::UnsupportedFrequency {
                requested,
                supported,
            } => {
                write!(f, "unsupported frequency {} Hz, expected one of", requested)?;
                for hz in supported.iter() {
                    write!(f, " {}", hz)?;
                }
                Ok(())
            }
            Error::MemoryOutOfRange { address, len } => {
                write!(f, "{} byte(s) at {:#x} out of range", len, address)
            }
            Error::BurstTooLong(len) => write!(f, "register write of {} bytes too long", len),
            Error::NotSupported(what) => write!(f, "{} not available", what),
            Error::UnsupportedAlarm(alarm) => write!(f, "alarm {:?} has no valid mask", alarm),
            Error::InvalidRegister { register, value } => {
                write!(f, "register {:#x} holds unexpected {:#x}", register, value)
            }
        }
    }
}

/// Operations every supported chip provides.
pub trait Rtc {
    /// Error type of the driver.
    type Error;

    /// The chip this driver talks to.
    fn model(&self) -> Model;

    /// Reads the current date and time. `millisecond` is always 0.
    fn datetime(&mut self) -> Result<DateTime, Self::Error>;

    /// Sets the date and time. `millisecond` is ignored.
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Self::Error>;

    /// Reads the square-wave output frequency in Hz (see [`frequency`]).
    fn pin_frequency(&mut self) -> Result<i32, Self::Error>;

    /// Sets the square-wave output frequency in Hz (see [`frequency`]).
    ///
    /// Unsupported values are rejected before any bus traffic.
    fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Self::Error>;
}

/// Chips with a programmable alarm.
pub trait Alarm: Rtc {
    /// Reads the alarm time; disabled fields are `None`.
    fn alarm_time(&mut self) -> Result<AlarmTime, Self::Error>;

    /// Programs the alarm time; `None` fields are excluded from the match.
    ///
    /// Field combinations the chip cannot match fail with
    /// [`Error::UnsupportedAlarm`] before any bus traffic.
    fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), Self::Error>;

    /// Whether the alarm has fired.
    fn alarm(&mut self) -> Result<bool, Self::Error>;

    /// Sets or clears the alarm fired flag.
    fn set_alarm(&mut self, value: bool) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_model_capabilities() {
        assert!(!Model::Ds1307.supports_alarm());
        assert!(Model::Ds3231.supports_alarm());
        assert!(Model::Pcf8523.supports_alarm());
        assert!(Model::Ds1307.supports_memory());
        assert!(!Model::Pcf8523.supports_memory());
        assert_eq!(Model::Ds3231.default_address(), 0x68);
        assert_eq!(Model::Pcf8523.name(), "PCF8523");
    }

    #[test]
    fn test_error_from_bus_error() {
        let e: Error<u32> = 7.into();
        assert_eq!(e, Error::I2c(7));
    }

    #[test]
    fn test_error_display_names_supported_set() {
        let e: Error<()> = Error::UnsupportedFrequency {
            requested: 500,
            supported: &[0, 1, 4000],
        };
        assert_eq!(
            e.to_string(),
            "unsupported frequency 500 Hz, expected one of 0 1 4000"
        );
    }
}

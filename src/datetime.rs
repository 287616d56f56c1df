//! Calendar date/time value and its register encoding.
//!
//! [`DateTime`] is the structured value every driver reads and writes. The
//! chips store it as seven consecutive BCD registers with the year kept as an
//! offset from 2000; [`RegisterOrder`] captures where each chip puts the day
//! of week relative to the day of month.
//!
//! # chrono
//!
//! `DateTime` converts from chrono's `NaiveDateTime` (weekday counted from
//! Sunday) and back. Both directions fail with [`DateTimeError`]: a year
//! outside `0..=65535` has no `DateTime`, and fields that do not form a
//! calendar date have no `NaiveDateTime`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::bcd;

/// A calendar date and time as held by an RTC.
///
/// `millisecond` exists for callers that carry sub-second time around; the
/// chips have no sub-second register, so it is never written and always reads
/// back as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Full year, 2000-2099 on the wire
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Day of week (0-6), origin chosen by the caller
    pub weekday: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Millisecond (0-999)
    pub millisecond: u16,
}

impl DateTime {
    /// Creates a date at midnight with weekday 0.
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            weekday: 0,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    /// Returns a copy with the day of week replaced.
    pub const fn with_weekday(self, weekday: u8) -> Self {
        Self { weekday, ..self }
    }

    /// Returns a copy with the time of day replaced.
    pub const fn with_time(self, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            ..self
        }
    }

    /// Returns a copy with the millisecond replaced.
    pub const fn with_millisecond(self, millisecond: u16) -> Self {
        Self {
            millisecond,
            ..self
        }
    }

    /// Decodes the seven date/time registers, starting at seconds.
    ///
    /// Control bits that share a byte with a time field (clock halt,
    /// oscillator stop, century, 12/24 hour select) are masked off.
    pub fn from_registers(data: &[u8; 7], order: RegisterOrder) -> Self {
        let (weekday, day) = order.weekday_and_day(data);
        let raw = [
            data[0] & 0x7f,
            data[1] & 0x7f,
            data[2] & 0x3f,
            weekday & 0x07,
            day & 0x3f,
            data[5] & 0x1f,
            data[6],
        ];
        if let Some(bad) = raw.iter().find(|b| !bcd::is_valid(**b)) {
            warn!("RTC: date/time registers hold malformed BCD {:#x}", *bad);
        }
        DateTime {
            year: 2000 + u16::from(bcd::decode(raw[6])),
            month: bcd::decode(raw[5]),
            day: bcd::decode(raw[4]),
            weekday: bcd::decode(raw[3]),
            hour: bcd::decode(raw[2]),
            minute: bcd::decode(raw[1]),
            second: bcd::decode(raw[0]),
            millisecond: 0,
        }
    }

    /// Encodes the value as the seven date/time registers, starting at seconds.
    ///
    /// Fields are encoded as given; values outside their BCD range produce
    /// garbage register contents rather than an error.
    pub fn to_registers(&self, order: RegisterOrder) -> [u8; 7] {
        let year = self.year.wrapping_sub(2000) as u8;
        let weekday = bcd::encode(self.weekday);
        let day = bcd::encode(self.day);
        let (third, fourth) = match order {
            RegisterOrder::WeekdayFirst => (weekday, day),
            RegisterOrder::DayFirst => (day, weekday),
        };
        [
            bcd::encode(self.second),
            bcd::encode(self.minute),
            bcd::encode(self.hour),
            third,
            fourth,
            bcd::encode(self.month),
            bcd::encode(year),
        ]
    }
}

/// Placement of the day-of-week and day-of-month registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterOrder {
    /// seconds, minutes, hours, weekday, day, month, year (DS1307, DS3231)
    WeekdayFirst,
    /// seconds, minutes, hours, day, weekday, month, year (PCF8523)
    DayFirst,
}

impl RegisterOrder {
    fn weekday_and_day(self, data: &[u8; 7]) -> (u8, u8) {
        match self {
            RegisterOrder::WeekdayFirst => (data[3], data[4]),
            RegisterOrder::DayFirst => (data[4], data[3]),
        }
    }
}

/// Errors converting between [`DateTime`] and chrono values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// The fields do not form a valid calendar date and time of day
    Invalid,
    /// The chrono year does not fit in [`DateTime::year`]
    YearOutOfRange(i32),
}

impl TryFrom<NaiveDateTime> for DateTime {
    type Error = DateTimeError;

    fn try_from(dt: NaiveDateTime) -> Result<Self, Self::Error> {
        let year =
            u16::try_from(dt.year()).map_err(|_| DateTimeError::YearOutOfRange(dt.year()))?;
        Ok(DateTime {
            year,
            month: dt.month() as u8,
            day: dt.day() as u8,
            weekday: dt.weekday().num_days_from_sunday() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            millisecond: (dt.nanosecond() / 1_000_000).min(999) as u16,
        })
    }
}

impl TryFrom<DateTime> for NaiveDateTime {
    type Error = DateTimeError;

    fn try_from(dt: DateTime) -> Result<Self, Self::Error> {
        NaiveDate::from_ymd_opt(
            i32::from(dt.year),
            u32::from(dt.month),
            u32::from(dt.day),
        )
        .and_then(|d| {
            d.and_hms_milli_opt(
                u32::from(dt.hour),
                u32::from(dt.minute),
                u32::from(dt.second),
                u32::from(dt.millisecond),
            )
        })
        .ok_or(DateTimeError::Invalid)
    }
}

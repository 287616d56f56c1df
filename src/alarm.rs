//! Alarm times and their register encodings.
//!
//! An alarm is a partial time: any of minute, hour, day of month and day of
//! week may be left unset, and unset fields are excluded from the match the
//! hardware performs against the running clock. Matching happens in the chip;
//! this module only packs and unpacks the four alarm registers.
//!
//! # PCF8523
//!
//! Four registers in the order minute, hour, day, weekday. Bit 7 of each is
//! a per-field disable flag. A disabled weekday is written as `0xC0`.
//!
//! # DS3231
//!
//! Alarm 1 registers in the order seconds, minute, hour, day/date. Bit 7 of
//! each is a "don't care" mask and bit 6 of the day/date register selects day
//! of week over day of month. The seconds register is always written as
//! `0x00`, so the alarm fires at the top of the matching minute.
//!
//! The chip only accepts masks that leave a contiguous run of the most
//! significant fields unmatched: minute, then hour, then day may be added,
//! in that order. An hour without a minute, or a day without an hour, has no
//! encoding and is refused by [`AlarmTime::to_ds3231`].

use crate::bcd;
use crate::registers::{AlarmDayDate, AlarmField};

/// Disabled (don't care) alarm field.
const DISABLED: u8 = 0x80;
/// Marker ORed into a disabled PCF8523 weekday field.
const WEEKDAY_MARKER: u8 = 0x40;

/// Alarm time with individually optional fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    /// Minute (0-59)
    pub minute: Option<u8>,
    /// Hour (0-23)
    pub hour: Option<u8>,
    /// Day of month (1-31)
    pub day: Option<u8>,
    /// Day of week (0-6)
    pub weekday: Option<u8>,
}

impl AlarmTime {
    /// Alarm matching the given minute of every hour.
    pub const fn at_minute(minute: u8) -> Self {
        Self {
            minute: Some(minute),
            hour: None,
            day: None,
            weekday: None,
        }
    }

    /// Alarm matching the given time of every day.
    pub const fn at_time(hour: u8, minute: u8) -> Self {
        Self {
            minute: Some(minute),
            hour: Some(hour),
            day: None,
            weekday: None,
        }
    }

    /// Returns a copy that additionally matches the day of month.
    pub const fn on_day(self, day: u8) -> Self {
        Self {
            day: Some(day),
            ..self
        }
    }

    /// Returns a copy that additionally matches the day of week.
    pub const fn on_weekday(self, weekday: u8) -> Self {
        Self {
            weekday: Some(weekday),
            ..self
        }
    }

    /// Encodes the PCF8523 alarm registers (minute, hour, day, weekday).
    pub fn to_pcf8523(&self) -> [u8; 4] {
        [
            encode_field(self.minute, DISABLED),
            encode_field(self.hour, DISABLED),
            encode_field(self.day, DISABLED),
            encode_field(self.weekday, DISABLED | WEEKDAY_MARKER),
        ]
    }

    /// Decodes the PCF8523 alarm registers (minute, hour, day, weekday).
    ///
    /// Each field is reported only when its own disable bit is clear.
    pub fn from_pcf8523(data: &[u8; 4]) -> Self {
        AlarmTime {
            minute: decode_field(data[0], 0x7f),
            hour: decode_field(data[1], 0x3f),
            day: decode_field(data[2], 0x3f),
            weekday: decode_field(data[3], 0x07),
        }
    }

    /// Whether the DS3231 alarm 1 can match exactly these fields.
    pub const fn fits_ds3231(&self) -> bool {
        let has_day = self.day.is_some() || self.weekday.is_some();
        (self.minute.is_some() || self.hour.is_none()) && (self.hour.is_some() || !has_day)
    }

    /// Encodes the DS3231 alarm 1 registers (seconds, minute, hour, day/date).
    ///
    /// When both day and weekday are set only the weekday is written; the
    /// register holds one or the other. Returns `None` when the set of fields
    /// has no valid mask on the chip (see [`AlarmTime::fits_ds3231`]).
    pub fn to_ds3231(&self) -> Option<[u8; 4]> {
        if !self.fits_ds3231() {
            return None;
        }
        let mut day_date = AlarmDayDate::default();
        match (self.weekday, self.day) {
            (Some(weekday), _) => {
                day_date.set_day_select(true);
                day_date.set_value(bcd::encode(weekday));
            }
            (None, Some(day)) => day_date.set_value(bcd::encode(day)),
            (None, None) => day_date.set_masked(true),
        }
        Some([
            0x00,
            encode_field(self.minute, DISABLED),
            encode_field(self.hour, DISABLED),
            day_date.into(),
        ])
    }

    /// Decodes the DS3231 alarm 1 registers (seconds, minute, hour, day/date).
    ///
    /// The seconds register is not represented in [`AlarmTime`]; anything
    /// other than `0x00` there is reported with a warning and dropped.
    pub fn from_ds3231(data: &[u8; 4]) -> Self {
        if data[0] != 0x00 {
            warn!("DS3231: alarm 1 seconds register holds {:#x}, ignored", data[0]);
        }
        let day_date = AlarmDayDate::from(data[3]);
        let (day, weekday) = if day_date.masked() {
            (None, None)
        } else if day_date.day_select() {
            (None, Some(bcd::decode(day_date.value() & 0x0f)))
        } else {
            (Some(bcd::decode(day_date.value())), None)
        };
        AlarmTime {
            minute: decode_field(data[1], 0x7f),
            hour: decode_field(data[2], 0x3f),
            day,
            weekday,
        }
    }
}

fn encode_field(value: Option<u8>, disabled: u8) -> u8 {
    value.map_or(disabled, bcd::encode)
}

fn decode_field(raw: u8, value_mask: u8) -> Option<u8> {
    let field = AlarmField::from(raw);
    if field.disabled() {
        None
    } else {
        Some(bcd::decode(field.value() & value_mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcf8523_minute_only() {
        let alarm = AlarmTime::at_minute(30);
        let data = alarm.to_pcf8523();
        assert_eq!(data, [0x30, 0x80, 0x80, 0xc0]);
        assert_eq!(AlarmTime::from_pcf8523(&data), alarm);
    }

    #[test]
    fn test_pcf8523_all_fields() {
        let alarm = AlarmTime::at_time(23, 59).on_day(31).on_weekday(6);
        let data = alarm.to_pcf8523();
        assert_eq!(data, [0x59, 0x23, 0x31, 0x06]);
        assert_eq!(AlarmTime::from_pcf8523(&data), alarm);
    }

    #[test]
    fn test_pcf8523_fields_decode_independently() {
        // only the hour is disabled
        let alarm = AlarmTime::from_pcf8523(&[0x15, 0x80, 0x01, 0x02]);
        assert_eq!(alarm.minute, Some(15));
        assert_eq!(alarm.hour, None);
        assert_eq!(alarm.day, Some(1));
        assert_eq!(alarm.weekday, Some(2));
    }

    #[test]
    fn test_pcf8523_default_is_fully_disabled() {
        let data = AlarmTime::default().to_pcf8523();
        assert_eq!(data, [0x80, 0x80, 0x80, 0xc0]);
        assert_eq!(AlarmTime::from_pcf8523(&data), AlarmTime::default());
    }

    #[test]
    fn test_ds3231_time_on_weekday() {
        let alarm = AlarmTime::at_time(7, 45).on_weekday(2);
        let data = alarm.to_ds3231().unwrap();
        assert_eq!(data, [0x00, 0x45, 0x07, 0x42]);
        assert_eq!(AlarmTime::from_ds3231(&data), alarm);
    }

    #[test]
    fn test_ds3231_time_on_date() {
        let alarm = AlarmTime::at_time(18, 0).on_day(25);
        let data = alarm.to_ds3231().unwrap();
        assert_eq!(data, [0x00, 0x00, 0x18, 0x25]);
        assert_eq!(AlarmTime::from_ds3231(&data), alarm);
    }

    #[test]
    fn test_ds3231_weekday_wins_over_day() {
        let alarm = AlarmTime::at_time(6, 30).on_day(12).on_weekday(1);
        let data = alarm.to_ds3231().unwrap();
        assert_eq!(data[3], 0x41);
        let back = AlarmTime::from_ds3231(&data);
        assert_eq!(back.day, None);
        assert_eq!(back.weekday, Some(1));
    }

    #[test]
    fn test_ds3231_minute_only() {
        let alarm = AlarmTime::at_minute(5);
        let data = alarm.to_ds3231().unwrap();
        assert_eq!(data, [0x00, 0x05, 0x80, 0x80]);
        assert_eq!(AlarmTime::from_ds3231(&data), alarm);
    }

    #[test]
    fn test_ds3231_every_minute() {
        let alarm = AlarmTime::default();
        assert_eq!(alarm.to_ds3231(), Some([0x00, 0x80, 0x80, 0x80]));
    }

    #[test]
    fn test_ds3231_rejects_hour_without_minute() {
        let alarm = AlarmTime {
            hour: Some(6),
            ..AlarmTime::default()
        };
        assert!(!alarm.fits_ds3231());
        assert_eq!(alarm.to_ds3231(), None);
    }

    #[test]
    fn test_ds3231_rejects_day_without_hour() {
        let day_only = AlarmTime::default().on_day(12);
        assert_eq!(day_only.to_ds3231(), None);
        let minute_and_weekday = AlarmTime::at_minute(30).on_weekday(3);
        assert_eq!(minute_and_weekday.to_ds3231(), None);
        // the same alarms are fine on the PCF8523
        assert_eq!(day_only.to_pcf8523(), [0x80, 0x80, 0x12, 0xc0]);
    }

    #[test]
    fn test_ds3231_nonzero_seconds_still_decodes() {
        // once-per-second pattern written by other code
        let alarm = AlarmTime::from_ds3231(&[0x80, 0x80, 0x80, 0x80]);
        assert_eq!(alarm, AlarmTime::default());
        let alarm = AlarmTime::from_ds3231(&[0x15, 0x30, 0x06, 0x80]);
        assert_eq!(alarm, AlarmTime::at_time(6, 30));
    }
}

use embedded_hal::i2c::I2c;

use crate::alarm::AlarmTime;
use crate::bus::RegisterBus;
use crate::datetime::{DateTime, RegisterOrder};
use crate::frequency;
use crate::registers::{
    Ds3231Register, DS3231_ALARM_FLAGS, DS3231_OSCILLATOR_DISABLE, DS3231_OSCILLATOR_STOP_FLAG,
};
use crate::{Alarm, Error, Model, Rtc};

/// DS3231 real-time clock driver.
pub struct Ds3231<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C> Ds3231<I2C> {
    /// Creates a driver for the device at `address` (normally
    /// [`DEFAULT_ADDRESS`](crate::DEFAULT_ADDRESS)).
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address),
        }
    }

    /// Returns the underlying bus.
    pub fn destroy(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Returns `true` if the oscillator stopped at some point since the time
    /// was last set, meaning the time is not trustworthy.
    pub fn lost_power(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.bus
            .flag(Ds3231Register::Status as u8, DS3231_OSCILLATOR_STOP_FLAG)
    }

    flag_accessors!(
        /// Returns `true` when the oscillator is disabled while on battery.
        (stopped, Ds3231Register::Control, DS3231_OSCILLATOR_DISABLE),
    );
}

impl<I2C: I2c> Rtc for Ds3231<I2C> {
    type Error = Error<I2C::Error>;

    fn model(&self) -> Model {
        Model::Ds3231
    }

    fn datetime(&mut self) -> Result<DateTime, Self::Error> {
        self.bus
            .read_datetime(Ds3231Register::Seconds as u8, RegisterOrder::WeekdayFirst)
    }

    /// Sets the date and time and clears the oscillator-stop flag.
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Self::Error> {
        debug!("DS3231: clearing oscillator stop flag");
        self.bus.set_flag(
            Ds3231Register::Status as u8,
            DS3231_OSCILLATOR_STOP_FLAG,
            false,
        )?;
        self.bus.write_datetime(
            Ds3231Register::Seconds as u8,
            RegisterOrder::WeekdayFirst,
            datetime,
        )
    }

    fn pin_frequency(&mut self) -> Result<i32, Self::Error> {
        self.bus
            .read_frequency(Ds3231Register::Control as u8, &frequency::DS3231)
    }

    fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Self::Error> {
        self.bus
            .write_frequency(Ds3231Register::Control as u8, &frequency::DS3231, hz)
    }
}

impl<I2C: I2c> Alarm for Ds3231<I2C> {
    /// Reads alarm 1.
    fn alarm_time(&mut self) -> Result<AlarmTime, Self::Error> {
        let mut data = [0; 4];
        self.bus
            .read_registers(Ds3231Register::Alarm1Seconds as u8, &mut data)?;
        Ok(AlarmTime::from_ds3231(&data))
    }

    /// Programs alarm 1 to fire at second 0 of the matching minute.
    ///
    /// An hour without a minute, or a day without an hour, is rejected with
    /// [`Error::UnsupportedAlarm`].
    fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), Self::Error> {
        let data = alarm.to_ds3231().ok_or(Error::UnsupportedAlarm(*alarm))?;
        self.bus
            .write_registers(Ds3231Register::Alarm1Seconds as u8, &data)
    }

    /// Returns `true` when both alarm flags are set.
    fn alarm(&mut self) -> Result<bool, Self::Error> {
        self.bus
            .flag(Ds3231Register::Status as u8, DS3231_ALARM_FLAGS)
    }

    /// Sets or clears both alarm flags.
    fn set_alarm(&mut self, value: bool) -> Result<(), Self::Error> {
        self.bus
            .set_flag(Ds3231Register::Status as u8, DS3231_ALARM_FLAGS, value)
    }
}

use embedded_hal::i2c::I2c;

use crate::alarm::AlarmTime;
use crate::bus::RegisterBus;
use crate::datetime::{DateTime, RegisterOrder};
use crate::frequency;
use crate::registers::{
    Pcf8523Register, PCF8523_ALARM_FLAG, PCF8523_BATTERY_LOW, PCF8523_POWER_MANAGEMENT,
    PCF8523_SOFTWARE_RESET, PCF8523_STOP, PCF8523_SWITCHOVER_FLAG,
};
use crate::{Alarm, Error, Model, Rtc};

/// PCF8523 real-time clock driver.
///
/// Creating the driver enables battery switch-over and low battery detection
/// on the device, so [`Pcf8523::new`] talks to the bus and can fail.
pub struct Pcf8523<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C> Pcf8523<I2C> {
    /// Returns the underlying bus.
    pub fn destroy(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> Pcf8523<I2C> {
    /// Creates a driver for the device at `address` (normally
    /// [`DEFAULT_ADDRESS`](crate::DEFAULT_ADDRESS)) and enables battery
    /// switch-over and low battery detection.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut dev = Self {
            bus: RegisterBus::new(i2c, address),
        };
        dev.enable_battery_switchover()?;
        Ok(dev)
    }

    fn enable_battery_switchover(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("PCF8523: enabling battery switch-over and low battery detection");
        self.bus.set_flag(
            Pcf8523Register::Control3 as u8,
            PCF8523_POWER_MANAGEMENT,
            false,
        )
    }

    /// Issues a software reset, then enables battery switch-over and low
    /// battery detection again.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("PCF8523: software reset");
        self.bus.set_flag(
            Pcf8523Register::Control1 as u8,
            PCF8523_SOFTWARE_RESET,
            true,
        )?;
        self.enable_battery_switchover()
    }

    /// Returns `true` when the backup battery voltage is low.
    pub fn battery_low(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.bus
            .flag(Pcf8523Register::Control3 as u8, PCF8523_BATTERY_LOW)
    }

    flag_accessors!(
        /// Returns `true` after a switch-over to battery power.
        (lost_power, Pcf8523Register::Control3, PCF8523_SWITCHOVER_FLAG),
        /// Returns `true` when the clock is stopped.
        (stopped, Pcf8523Register::Control1, PCF8523_STOP),
    );
}

impl<I2C: I2c> Rtc for Pcf8523<I2C> {
    type Error = Error<I2C::Error>;

    fn model(&self) -> Model {
        Model::Pcf8523
    }

    fn datetime(&mut self) -> Result<DateTime, Self::Error> {
        self.bus
            .read_datetime(Pcf8523Register::Seconds as u8, RegisterOrder::DayFirst)
    }

    /// Sets the date and time and clears the switch-over flag.
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Self::Error> {
        self.set_lost_power(false)?;
        self.bus.write_datetime(
            Pcf8523Register::Seconds as u8,
            RegisterOrder::DayFirst,
            datetime,
        )
    }

    fn pin_frequency(&mut self) -> Result<i32, Self::Error> {
        self.bus
            .read_frequency(Pcf8523Register::TimerClockOut as u8, &frequency::PCF8523)
    }

    fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Self::Error> {
        self.bus
            .write_frequency(Pcf8523Register::TimerClockOut as u8, &frequency::PCF8523, hz)
    }
}

impl<I2C: I2c> Alarm for Pcf8523<I2C> {
    fn alarm_time(&mut self) -> Result<AlarmTime, Self::Error> {
        let mut data = [0; 4];
        self.bus
            .read_registers(Pcf8523Register::MinuteAlarm as u8, &mut data)?;
        Ok(AlarmTime::from_pcf8523(&data))
    }

    fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), Self::Error> {
        self.bus
            .write_registers(Pcf8523Register::MinuteAlarm as u8, &alarm.to_pcf8523())
    }

    fn alarm(&mut self) -> Result<bool, Self::Error> {
        self.bus
            .flag(Pcf8523Register::Control2 as u8, PCF8523_ALARM_FLAG)
    }

    fn set_alarm(&mut self, value: bool) -> Result<(), Self::Error> {
        self.bus
            .set_flag(Pcf8523Register::Control2 as u8, PCF8523_ALARM_FLAG, value)
    }
}

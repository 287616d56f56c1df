//! Async drivers.
//!
//! The same drivers as the crate root, on top of the `embedded-hal-async` I2C
//! trait. Register encoding is shared with the blocking drivers; only the bus
//! access is awaited. Only available with the `async` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use i2c_rtc::asynch::Pcf8523;
//!
//! let mut rtc = Pcf8523::new(i2c, i2c_rtc::DEFAULT_ADDRESS).await?;
//! let now = rtc.datetime().await?;
//! ```

use embedded_hal_async::i2c::I2c;

use crate::alarm::AlarmTime;
use crate::bus::{apply_bits, apply_flag, frequency_bits, write_frame, MAX_BURST};
use crate::datetime::{DateTime, RegisterOrder};
use crate::ds1307::check_memory_range;
use crate::frequency::{self, FrequencyTable};
use crate::registers::{
    Ds1307Register, Ds3231Register, Pcf8523Register, DS1307_CLOCK_HALT, DS3231_ALARM_FLAGS,
    DS3231_OSCILLATOR_DISABLE, DS3231_OSCILLATOR_STOP_FLAG, PCF8523_ALARM_FLAG,
    PCF8523_BATTERY_LOW, PCF8523_POWER_MANAGEMENT, PCF8523_SOFTWARE_RESET, PCF8523_STOP,
    PCF8523_SWITCHOVER_FLAG,
};
use crate::Error;

/// Async counterpart of [`crate::RegisterBus`].
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterBus<I2C> {
    /// Binds the bus to a device address.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The device's 7-bit bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns the underlying bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus<I2C> {
    /// Reads one register.
    pub async fn read_register(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        let mut data = [0];
        self.read_registers(register, &mut data).await?;
        Ok(data[0])
    }

    /// Reads consecutive registers starting at `register`.
    pub async fn read_registers(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(self.address, &[register], buffer)
            .await?;
        Ok(())
    }

    /// Writes one register.
    pub async fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_registers(register, &[value]).await
    }

    /// Writes consecutive registers starting at `register` in one transfer.
    pub async fn write_registers(
        &mut self,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        let mut frame = [0; MAX_BURST + 1];
        let len = write_frame(register, data, &mut frame)?;
        debug!("RTC: write {} byte(s) at register {:#x}", data.len(), register);
        self.i2c.write(self.address, &frame[..len]).await?;
        Ok(())
    }

    /// Returns `true` when every bit of `mask` is set in `register`.
    pub async fn flag(&mut self, register: u8, mask: u8) -> Result<bool, Error<I2C::Error>> {
        let data = self.read_register(register).await?;
        Ok(data & mask == mask)
    }

    /// Sets or clears the bits of `mask` in `register`, leaving the rest.
    pub async fn set_flag(
        &mut self,
        register: u8,
        mask: u8,
        value: bool,
    ) -> Result<(), Error<I2C::Error>> {
        let data = self.read_register(register).await?;
        self.write_register(register, apply_flag(data, mask, value))
            .await
    }

    /// Replaces the bits of `mask` in `register` with those of `bits`.
    pub async fn update_bits(
        &mut self,
        register: u8,
        mask: u8,
        bits: u8,
    ) -> Result<(), Error<I2C::Error>> {
        let data = self.read_register(register).await?;
        self.write_register(register, apply_bits(data, mask, bits))
            .await
    }

    /// Reads the seven date/time registers starting at `register`.
    pub async fn read_datetime(
        &mut self,
        register: u8,
        order: RegisterOrder,
    ) -> Result<DateTime, Error<I2C::Error>> {
        let mut data = [0; 7];
        self.read_registers(register, &mut data).await?;
        Ok(DateTime::from_registers(&data, order))
    }

    /// Writes the seven date/time registers starting at `register`.
    pub async fn write_datetime(
        &mut self,
        register: u8,
        order: RegisterOrder,
        datetime: &DateTime,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_registers(register, &datetime.to_registers(order))
            .await
    }

    /// Reads the square-wave frequency selected in `register`.
    pub async fn read_frequency(
        &mut self,
        register: u8,
        table: &FrequencyTable,
    ) -> Result<i32, Error<I2C::Error>> {
        let value = self.read_register(register).await?;
        table
            .decode(value)
            .ok_or(Error::InvalidRegister { register, value })
    }

    /// Selects square-wave frequency `hz` in `register`.
    pub async fn write_frequency(
        &mut self,
        register: u8,
        table: &FrequencyTable,
        hz: i32,
    ) -> Result<(), Error<I2C::Error>> {
        let bits = frequency_bits(table, hz)?;
        self.update_bits(register, table.mask(), bits).await
    }
}

/// DS1307 async driver.
pub struct Ds1307<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C> Ds1307<I2C> {
    /// Creates a driver for the device at `address`.
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

impl<I2C: I2c> Ds1307<I2C> {
    /// Reads the current date and time.
    pub async fn datetime(&mut self) -> Result<DateTime, Error<I2C::Error>> {
        self.bus
            .read_datetime(Ds1307Register::Seconds as u8, RegisterOrder::WeekdayFirst)
            .await
    }

    /// Sets the date and time, which also starts the clock.
    pub async fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Error<I2C::Error>> {
        self.bus
            .write_datetime(
                Ds1307Register::Seconds as u8,
                RegisterOrder::WeekdayFirst,
                datetime,
            )
            .await
    }

    /// Returns `true` unless the clock-halt bit is set.
    pub async fn is_running(&mut self) -> Result<bool, Error<I2C::Error>> {
        let halted = self
            .bus
            .flag(Ds1307Register::Seconds as u8, DS1307_CLOCK_HALT)
            .await?;
        Ok(!halted)
    }

    /// Starts or halts the oscillator.
    pub async fn set_running(&mut self, running: bool) -> Result<(), Error<I2C::Error>> {
        self.bus
            .set_flag(Ds1307Register::Seconds as u8, DS1307_CLOCK_HALT, !running)
            .await
    }

    /// Reads the square-wave output frequency in Hz.
    pub async fn pin_frequency(&mut self) -> Result<i32, Error<I2C::Error>> {
        self.bus
            .read_frequency(Ds1307Register::Control as u8, &frequency::DS1307)
            .await
    }

    /// Sets the square-wave output frequency in Hz.
    pub async fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Error<I2C::Error>> {
        self.bus
            .write_frequency(Ds1307Register::Control as u8, &frequency::DS1307, hz)
            .await
    }

    /// Reads one byte of RAM at offset `address` (0-55).
    pub async fn memory(&mut self, address: u8) -> Result<u8, Error<I2C::Error>> {
        check_memory_range(address, 1)?;
        self.bus
            .read_register(Ds1307Register::Ram as u8 + address)
            .await
    }

    /// Reads `buffer.len()` bytes of RAM starting at offset `address`.
    pub async fn read_memory(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        check_memory_range(address, buffer.len())?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.bus
            .read_registers(Ds1307Register::Ram as u8 + address, buffer)
            .await
    }

    /// Writes `data` to RAM starting at offset `address`.
    pub async fn write_memory(&mut self, address: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        check_memory_range(address, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        self.bus
            .write_registers(Ds1307Register::Ram as u8 + address, data)
            .await
    }
}

/// DS3231 async driver.
pub struct Ds3231<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C> Ds3231<I2C> {
    /// Creates a driver for the device at `address`.
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
    /// Reads the current date and time.
    pub async fn datetime(&mut self) -> Result<DateTime, Error<I2C::Error>> {
        self.bus
            .read_datetime(Ds3231Register::Seconds as u8, RegisterOrder::WeekdayFirst)
            .await
    }

    /// Sets the date and time and clears the oscillator-stop flag.
    pub async fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Error<I2C::Error>> {
        self.bus
            .set_flag(
                Ds3231Register::Status as u8,
                DS3231_OSCILLATOR_STOP_FLAG,
                false,
            )
            .await?;
        self.bus
            .write_datetime(
                Ds3231Register::Seconds as u8,
                RegisterOrder::WeekdayFirst,
                datetime,
            )
            .await
    }

    /// Returns `true` if the oscillator stopped since the time was last set.
    pub async fn lost_power(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.bus
            .flag(Ds3231Register::Status as u8, DS3231_OSCILLATOR_STOP_FLAG)
            .await
    }

    flag_accessors!(async
        /// Returns `true` when both alarm flags are set.
        (alarm, Ds3231Register::Status, DS3231_ALARM_FLAGS),
        /// Returns `true` when the oscillator is disabled while on battery.
        (stopped, Ds3231Register::Control, DS3231_OSCILLATOR_DISABLE),
    );

    /// Reads alarm 1.
    pub async fn alarm_time(&mut self) -> Result<AlarmTime, Error<I2C::Error>> {
        let mut data = [0; 4];
        self.bus
            .read_registers(Ds3231Register::Alarm1Seconds as u8, &mut data)
            .await?;
        Ok(AlarmTime::from_ds3231(&data))
    }

    /// Programs alarm 1 to fire at second 0 of the matching minute.
    pub async fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), Error<I2C::Error>> {
        let data = alarm.to_ds3231().ok_or(Error::UnsupportedAlarm(*alarm))?;
        self.bus
            .write_registers(Ds3231Register::Alarm1Seconds as u8, &data)
            .await
    }

    /// Reads the square-wave output frequency in Hz.
    pub async fn pin_frequency(&mut self) -> Result<i32, Error<I2C::Error>> {
        self.bus
            .read_frequency(Ds3231Register::Control as u8, &frequency::DS3231)
            .await
    }

    /// Sets the square-wave output frequency in Hz.
    pub async fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Error<I2C::Error>> {
        self.bus
            .write_frequency(Ds3231Register::Control as u8, &frequency::DS3231, hz)
            .await
    }
}

/// PCF8523 async driver.
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
    /// Creates a driver for the device at `address` and enables battery
    /// switch-over and low battery detection.
    pub async fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut dev = Self {
            bus: RegisterBus::new(i2c, address),
        };
        dev.enable_battery_switchover().await?;
        Ok(dev)
    }

    async fn enable_battery_switchover(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("PCF8523: enabling battery switch-over and low battery detection");
        self.bus
            .set_flag(
                Pcf8523Register::Control3 as u8,
                PCF8523_POWER_MANAGEMENT,
                false,
            )
            .await
    }

    /// Issues a software reset, then enables battery switch-over and low
    /// battery detection again.
    pub async fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        debug!("PCF8523: software reset");
        self.bus
            .set_flag(
                Pcf8523Register::Control1 as u8,
                PCF8523_SOFTWARE_RESET,
                true,
            )
            .await?;
        self.enable_battery_switchover().await
    }

    /// Reads the current date and time.
    pub async fn datetime(&mut self) -> Result<DateTime, Error<I2C::Error>> {
        self.bus
            .read_datetime(Pcf8523Register::Seconds as u8, RegisterOrder::DayFirst)
            .await
    }

    /// Sets the date and time and clears the switch-over flag.
    pub async fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Error<I2C::Error>> {
        self.set_lost_power(false).await?;
        self.bus
            .write_datetime(
                Pcf8523Register::Seconds as u8,
                RegisterOrder::DayFirst,
                datetime,
            )
            .await
    }

    /// Returns `true` when the backup battery voltage is low.
    pub async fn battery_low(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.bus
            .flag(Pcf8523Register::Control3 as u8, PCF8523_BATTERY_LOW)
            .await
    }

    flag_accessors!(async
        /// Returns `true` after a switch-over to battery power.
        (lost_power, Pcf8523Register::Control3, PCF8523_SWITCHOVER_FLAG),
        /// Returns `true` when the clock is stopped.
        (stopped, Pcf8523Register::Control1, PCF8523_STOP),
        /// Returns `true` when the alarm has fired.
        (alarm, Pcf8523Register::Control2, PCF8523_ALARM_FLAG),
    );

    /// Reads the alarm time; disabled fields are `None`.
    pub async fn alarm_time(&mut self) -> Result<AlarmTime, Error<I2C::Error>> {
        let mut data = [0; 4];
        self.bus
            .read_registers(Pcf8523Register::MinuteAlarm as u8, &mut data)
            .await?;
        Ok(AlarmTime::from_pcf8523(&data))
    }

    /// Programs the alarm time; `None` fields are excluded from the match.
    pub async fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), Error<I2C::Error>> {
        self.bus
            .write_registers(Pcf8523Register::MinuteAlarm as u8, &alarm.to_pcf8523())
            .await
    }

    /// Reads the square-wave output frequency in Hz.
    pub async fn pin_frequency(&mut self) -> Result<i32, Error<I2C::Error>> {
        self.bus
            .read_frequency(Pcf8523Register::TimerClockOut as u8, &frequency::PCF8523)
            .await
    }

    /// Sets the square-wave output frequency in Hz.
    pub async fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Error<I2C::Error>> {
        self.bus
            .write_frequency(Pcf8523Register::TimerClockOut as u8, &frequency::PCF8523, hz)
            .await
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    fn setup_mock(expectations: &[I2cTrans]) -> I2cMock {
        I2cMock::new(expectations)
    }

    #[tokio::test]
    async fn test_async_ds1307_read_datetime() {
        let mock = setup_mock(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![0x00],
            vec![0x00, 0x30, 0x15, 0x04, 0x14, 0x03, 0x24],
        )]);
        let mut dev = Ds1307::new(mock, DEVICE_ADDRESS);

        let dt = dev.datetime().await.unwrap();
        assert_eq!(dt, DateTime::new(2024, 3, 14).with_weekday(4).with_time(15, 30, 0));
        dev.destroy().done();
    }

    #[tokio::test]
    async fn test_async_ds1307_memory_out_of_range() {
        let mock = setup_mock(&[]);
        let mut dev = Ds1307::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.write_memory(55, &[1, 2]).await,
            Err(Error::MemoryOutOfRange { address: 55, len: 2 })
        ));
        dev.destroy().done();
    }

    #[tokio::test]
    async fn test_async_ds3231_set_datetime() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x0f], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0f, 0x00]),
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![0x00, 0x00, 0x30, 0x15, 0x04, 0x14, 0x03, 0x24],
            ),
        ]);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        let dt = DateTime::new(2024, 3, 14).with_weekday(4).with_time(15, 30, 0);
        dev.set_datetime(&dt).await.unwrap();
        dev.destroy().done();
    }

    #[tokio::test]
    async fn test_async_ds3231_pin_frequency() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x0e], vec![0x1c]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0e, 0x10]),
        ]);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        dev.set_pin_frequency(4096).await.unwrap();
        assert!(dev.set_pin_frequency(32).await.is_err());
        dev.destroy().done();
    }

    #[tokio::test]
    async fn test_async_ds3231_rejects_hour_without_minute() {
        let mock = setup_mock(&[]);
        let mut dev = Ds3231::new(mock, DEVICE_ADDRESS);

        let hour_only = AlarmTime {
            hour: Some(6),
            ..AlarmTime::default()
        };
        assert!(matches!(
            dev.set_alarm_time(&hour_only).await,
            Err(Error::UnsupportedAlarm(_))
        ));
        dev.destroy().done();
    }

    #[tokio::test]
    async fn test_async_pcf8523_new_and_reset() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x02], vec![0xe0]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x02, 0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x00], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x00, 0x58]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x02], vec![0xe0]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x02, 0x00]),
        ]);
        let mut dev = Pcf8523::new(mock, DEVICE_ADDRESS).await.unwrap();

        dev.reset().await.unwrap();
        dev.destroy().done();
    }

    #[tokio::test]
    async fn test_async_pcf8523_alarm_time() {
        let mock = setup_mock(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x02], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x02, 0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x0a, 0x30, 0x80, 0x80, 0xc0]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x01], vec![0x08]),
        ]);
        let mut dev = Pcf8523::new(mock, DEVICE_ADDRESS).await.unwrap();

        dev.set_alarm_time(&AlarmTime::at_minute(30)).await.unwrap();
        assert!(dev.alarm().await.unwrap());
        dev.destroy().done();
    }
}

use embedded_hal::i2c::I2c;

use crate::alarm::AlarmTime;
use crate::datetime::DateTime;
use crate::{Alarm, Ds1307, Ds3231, Error, Model, Pcf8523, Rtc};

/// Any of the supported chips, chosen at run time.
///
/// Operations a chip lacks fail with [`Error::NotSupported`] without touching
/// the bus. Use [`Model::supports_alarm`] and [`Model::supports_memory`] to
/// check ahead of time.
pub enum AnyRtc<I2C> {
    /// A DS1307
    Ds1307(Ds1307<I2C>),
    /// A DS3231
    Ds3231(Ds3231<I2C>),
    /// A PCF8523
    Pcf8523(Pcf8523<I2C>),
}

impl<I2C> AnyRtc<I2C> {
    /// Returns the underlying bus.
    pub fn destroy(self) -> I2C {
        match self {
            AnyRtc::Ds1307(dev) => dev.destroy(),
            AnyRtc::Ds3231(dev) => dev.destroy(),
            AnyRtc::Pcf8523(dev) => dev.destroy(),
        }
    }
}

impl<I2C: I2c> AnyRtc<I2C> {
    /// Creates the driver for `model` at `address`.
    ///
    /// For the PCF8523 this performs its start-up register write.
    pub fn new(model: Model, i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        Ok(match model {
            Model::Ds1307 => AnyRtc::Ds1307(Ds1307::new(i2c, address)),
            Model::Ds3231 => AnyRtc::Ds3231(Ds3231::new(i2c, address)),
            Model::Pcf8523 => AnyRtc::Pcf8523(Pcf8523::new(i2c, address)?),
        })
    }

    fn alarm_clock(&mut self) -> Result<&mut dyn Alarm<Error = Error<I2C::Error>>, Error<I2C::Error>> {
        match self {
            AnyRtc::Ds1307(_) => Err(Error::NotSupported("DS1307 alarm")),
            AnyRtc::Ds3231(dev) => Ok(dev),
            AnyRtc::Pcf8523(dev) => Ok(dev),
        }
    }

    fn ds1307(&mut self) -> Result<&mut Ds1307<I2C>, Error<I2C::Error>> {
        match self {
            AnyRtc::Ds1307(dev) => Ok(dev),
            AnyRtc::Ds3231(_) => Err(Error::NotSupported("DS3231 memory")),
            AnyRtc::Pcf8523(_) => Err(Error::NotSupported("PCF8523 memory")),
        }
    }

    /// See [`Alarm::alarm_time`].
    pub fn alarm_time(&mut self) -> Result<AlarmTime, Error<I2C::Error>> {
        self.alarm_clock()?.alarm_time()
    }

    /// See [`Alarm::set_alarm_time`].
    pub fn set_alarm_time(&mut self, alarm: &AlarmTime) -> Result<(), Error<I2C::Error>> {
        self.alarm_clock()?.set_alarm_time(alarm)
    }

    /// See [`Alarm::alarm`].
    pub fn alarm(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.alarm_clock()?.alarm()
    }

    /// See [`Alarm::set_alarm`].
    pub fn set_alarm(&mut self, value: bool) -> Result<(), Error<I2C::Error>> {
        self.alarm_clock()?.set_alarm(value)
    }

    /// See [`Ds1307::memory`].
    pub fn memory(&mut self, address: u8) -> Result<u8, Error<I2C::Error>> {
        self.ds1307()?.memory(address)
    }

    /// See [`Ds1307::read_memory`].
    pub fn read_memory(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.ds1307()?.read_memory(address, buffer)
    }

    /// See [`Ds1307::write_memory`].
    pub fn write_memory(&mut self, address: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        self.ds1307()?.write_memory(address, data)
    }
}

impl<I2C: I2c> Rtc for AnyRtc<I2C> {
    type Error = Error<I2C::Error>;

    fn model(&self) -> Model {
        match self {
            AnyRtc::Ds1307(dev) => dev.model(),
            AnyRtc::Ds3231(dev) => dev.model(),
            AnyRtc::Pcf8523(dev) => dev.model(),
        }
    }

    fn datetime(&mut self) -> Result<DateTime, Self::Error> {
        match self {
            AnyRtc::Ds1307(dev) => dev.datetime(),
            AnyRtc::Ds3231(dev) => dev.datetime(),
            AnyRtc::Pcf8523(dev) => dev.datetime(),
        }
    }

    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Self::Error> {
        match self {
            AnyRtc::Ds1307(dev) => dev.set_datetime(datetime),
            AnyRtc::Ds3231(dev) => dev.set_datetime(datetime),
            AnyRtc::Pcf8523(dev) => dev.set_datetime(datetime),
        }
    }

    fn pin_frequency(&mut self) -> Result<i32, Self::Error> {
        match self {
            AnyRtc::Ds1307(dev) => dev.pin_frequency(),
            AnyRtc::Ds3231(dev) => dev.pin_frequency(),
            AnyRtc::Pcf8523(dev) => dev.pin_frequency(),
        }
    }

    fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Self::Error> {
        match self {
            AnyRtc::Ds1307(dev) => dev.set_pin_frequency(hz),
            AnyRtc::Ds3231(dev) => dev.set_pin_frequency(hz),
            AnyRtc::Pcf8523(dev) => dev.set_pin_frequency(hz),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::testing::RegisterFile;
    use alloc::vec;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x68;

    #[test]
    fn test_ds1307_has_no_alarm() {
        let mock = I2cMock::new(&[]);
        let mut dev = AnyRtc::new(Model::Ds1307, mock, DEVICE_ADDRESS).unwrap();

        assert!(!dev.model().supports_alarm());
        assert!(matches!(dev.alarm_time(), Err(Error::NotSupported(_))));
        assert!(matches!(
            dev.set_alarm_time(&AlarmTime::at_minute(30)),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(dev.alarm(), Err(Error::NotSupported(_))));
        assert!(matches!(dev.set_alarm(false), Err(Error::NotSupported(_))));
        dev.destroy().done();
    }

    #[test]
    fn test_memory_only_on_ds1307() {
        let mock = I2cMock::new(&[]);
        let mut dev = AnyRtc::new(Model::Ds3231, mock, DEVICE_ADDRESS).unwrap();

        assert!(!dev.model().supports_memory());
        assert!(matches!(dev.memory(0), Err(Error::NotSupported(_))));
        assert!(matches!(
            dev.write_memory(0, &[1]),
            Err(Error::NotSupported(_))
        ));
        dev.destroy().done();
    }

    #[test]
    fn test_pcf8523_construction_initializes() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x02], vec![0xe0]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x02, 0x00]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x01], vec![0x08]),
        ]);
        let mut dev = AnyRtc::new(Model::Pcf8523, mock, DEVICE_ADDRESS).unwrap();

        assert_eq!(dev.model(), Model::Pcf8523);
        assert!(dev.alarm().unwrap());
        dev.destroy().done();
    }

    #[test]
    fn test_dispatch_round_trip() {
        for model in [Model::Ds1307, Model::Ds3231, Model::Pcf8523] {
            let mut dev = AnyRtc::new(model, RegisterFile::default(), DEVICE_ADDRESS).unwrap();
            let dt = DateTime::new(2030, 1, 2).with_weekday(3).with_time(4, 5, 6);
            dev.set_datetime(&dt).unwrap();
            assert_eq!(dev.datetime().unwrap(), dt);
            dev.set_pin_frequency(1).unwrap();
            assert_eq!(dev.pin_frequency().unwrap(), 1);
            if model.supports_alarm() {
                let alarm = AlarmTime::at_time(4, 6);
                dev.set_alarm_time(&alarm).unwrap();
                assert_eq!(dev.alarm_time().unwrap(), alarm);
            }
        }
    }
}

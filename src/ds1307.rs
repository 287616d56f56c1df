use embedded_hal::i2c::I2c;

use crate::bus::RegisterBus;
use crate::datetime::{DateTime, RegisterOrder};
use crate::frequency;
use crate::registers::{Ds1307Register, DS1307_CLOCK_HALT, DS1307_RAM_SIZE};
use crate::{Error, Model, Rtc};

/// Checks that `len` bytes at RAM offset `address` fit in the DS1307 RAM.
pub(crate) fn check_memory_range<E>(address: u8, len: usize) -> Result<(), Error<E>> {
    let start = usize::from(address);
    if start >= DS1307_RAM_SIZE || start + len > DS1307_RAM_SIZE {
        return Err(Error::MemoryOutOfRange { address, len });
    }
    Ok(())
}

/// DS1307 real-time clock driver.
///
/// The DS1307 has no alarm. It has 56 bytes of battery-backed RAM and a clock
/// halt bit stored in the top bit of the seconds register.
pub struct Ds1307<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C> Ds1307<I2C> {
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

impl<I2C: I2c> Ds1307<I2C> {
    /// Returns `true` unless the clock-halt bit is set.
    ///
    /// Only reads the seconds register.
    pub fn is_running(&mut self) -> Result<bool, Error<I2C::Error>> {
        let halted = self
            .bus
            .flag(Ds1307Register::Seconds as u8, DS1307_CLOCK_HALT)?;
        Ok(!halted)
    }

    /// Starts or halts the oscillator.
    ///
    /// Writing the date and time also starts the clock.
    pub fn set_running(&mut self, running: bool) -> Result<(), Error<I2C::Error>> {
        self.bus
            .set_flag(Ds1307Register::Seconds as u8, DS1307_CLOCK_HALT, !running)
    }

    /// Reads one byte of RAM at offset `address` (0-55).
    pub fn memory(&mut self, address: u8) -> Result<u8, Error<I2C::Error>> {
        check_memory_range(address, 1)?;
        self.bus
            .read_register(Ds1307Register::Ram as u8 + address)
    }

    /// Reads `buffer.len()` bytes of RAM starting at offset `address`.
    pub fn read_memory(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        check_memory_range(address, buffer.len())?;
        if buffer.is_empty() {
            return Ok(());
        }
        self.bus
            .read_registers(Ds1307Register::Ram as u8 + address, buffer)
    }

    /// Writes `data` to RAM starting at offset `address`.
    ///
    /// Writes that would run past the end of the RAM are rejected before any
    /// bus traffic.
    pub fn write_memory(&mut self, address: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        check_memory_range(address, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        self.bus
            .write_registers(Ds1307Register::Ram as u8 + address, data)
    }
}

impl<I2C: I2c> Rtc for Ds1307<I2C> {
    type Error = Error<I2C::Error>;

    fn model(&self) -> Model {
        Model::Ds1307
    }

    fn datetime(&mut self) -> Result<DateTime, Self::Error> {
        self.bus
            .read_datetime(Ds1307Register::Seconds as u8, RegisterOrder::WeekdayFirst)
    }

    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), Self::Error> {
        self.bus.write_datetime(
            Ds1307Register::Seconds as u8,
            RegisterOrder::WeekdayFirst,
            datetime,
        )
    }

    fn pin_frequency(&mut self) -> Result<i32, Self::Error> {
        self.bus
            .read_frequency(Ds1307Register::Control as u8, &frequency::DS1307)
    }

    fn set_pin_frequency(&mut self, hz: i32) -> Result<(), Self::Error> {
        self.bus
            .write_frequency(Ds1307Register::Control as u8, &frequency::DS1307, hz)
    }
}

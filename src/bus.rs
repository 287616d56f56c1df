//! Register access over I2C.
//!
//! The chips are register files behind a 7-bit I2C address. A read sends the
//! register number then reads back consecutive registers; a write sends the
//! register number followed by the data for consecutive registers. Every
//! accessor here is one bus round trip, or two for read-modify-write, and
//! nothing is cached.
//!
//! Read-modify-write is not atomic on the bus. Callers sharing a device must
//! serialize access themselves.

use embedded_hal::i2c::I2c;

use crate::datetime::{DateTime, RegisterOrder};
use crate::frequency::FrequencyTable;
use crate::Error;

/// Longest run of data bytes accepted by a single register write.
pub const MAX_BURST: usize = 56;

/// Returns `data` with exactly the bits in `mask` set or cleared.
#[inline]
pub(crate) const fn apply_flag(data: u8, mask: u8, value: bool) -> u8 {
    if value {
        data | mask
    } else {
        data & !mask
    }
}

/// Returns `data` with the bits in `mask` replaced by those of `bits`.
#[inline]
pub(crate) const fn apply_bits(data: u8, mask: u8, bits: u8) -> u8 {
    (data & !mask) | (bits & mask)
}

/// Builds the `[register, data...]` frame of a register write.
pub(crate) fn write_frame<E>(
    register: u8,
    data: &[u8],
    frame: &mut [u8; MAX_BURST + 1],
) -> Result<usize, Error<E>> {
    if data.len() > MAX_BURST {
        return Err(Error::BurstTooLong(data.len()));
    }
    frame[0] = register;
    frame[1..=data.len()].copy_from_slice(data);
    Ok(data.len() + 1)
}

/// A device's register file, reached through an I2C bus at a fixed address.
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
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        let mut data = [0];
        self.read_registers(register, &mut data)?;
        Ok(data[0])
    }

    /// Reads consecutive registers starting at `register`.
    pub fn read_registers(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c.write_read(self.address, &[register], buffer)?;
        Ok(())
    }

    /// Writes one register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.write_registers(register, &[value])
    }

    /// Writes consecutive registers starting at `register` in one transfer.
    pub fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        let mut frame = [0; MAX_BURST + 1];
        let len = write_frame(register, data, &mut frame)?;
        debug!("RTC: write {} byte(s) at register {:#x}", data.len(), register);
        self.i2c.write(self.address, &frame[..len])?;
        Ok(())
    }

    /// Returns `true` when every bit of `mask` is set in `register`.
    pub fn flag(&mut self, register: u8, mask: u8) -> Result<bool, Error<I2C::Error>> {
        let data = self.read_register(register)?;
        Ok(data & mask == mask)
    }

    /// Sets or clears the bits of `mask` in `register`, leaving the rest.
    pub fn set_flag(
        &mut self,
        register: u8,
        mask: u8,
        value: bool,
    ) -> Result<(), Error<I2C::Error>> {
        let data = self.read_register(register)?;
        self.write_register(register, apply_flag(data, mask, value))
    }

    /// Replaces the bits of `mask` in `register` with those of `bits`.
    pub fn update_bits(
        &mut self,
        register: u8,
        mask: u8,
        bits: u8,
    ) -> Result<(), Error<I2C::Error>> {
        let data = self.read_register(register)?;
        self.write_register(register, apply_bits(data, mask, bits))
    }
}

// Operations shared by every chip, parameterized by its register map.
impl<I2C: I2c> RegisterBus<I2C> {
    /// Reads the seven date/time registers starting at `register`.
    pub fn read_datetime(
        &mut self,
        register: u8,
        order: RegisterOrder,
    ) -> Result<DateTime, Error<I2C::Error>> {
        let mut data = [0; 7];
        self.read_registers(register, &mut data)?;
        Ok(DateTime::from_registers(&data, order))
    }

    /// Writes the seven date/time registers starting at `register`.
    pub fn write_datetime(
        &mut self,
        register: u8,
        order: RegisterOrder,
        datetime: &DateTime,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_registers(register, &datetime.to_registers(order))
    }

    /// Reads the square-wave frequency selected in `register`.
    pub fn read_frequency(
        &mut self,
        register: u8,
        table: &FrequencyTable,
    ) -> Result<i32, Error<I2C::Error>> {
        let value = self.read_register(register)?;
        table
            .decode(value)
            .ok_or(Error::InvalidRegister { register, value })
    }

    /// Selects square-wave frequency `hz` in `register`.
    pub fn write_frequency(
        &mut self,
        register: u8,
        table: &FrequencyTable,
        hz: i32,
    ) -> Result<(), Error<I2C::Error>> {
        let bits = frequency_bits(table, hz)?;
        self.update_bits(register, table.mask(), bits)
    }
}

/// Looks up `hz`, rejecting frequencies the table does not list.
pub(crate) fn frequency_bits<E>(table: &FrequencyTable, hz: i32) -> Result<u8, Error<E>> {
    table.encode(hz).ok_or(Error::UnsupportedFrequency {
        requested: hz,
        supported: table.supported(),
    })
}

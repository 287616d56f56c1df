//! Simulated device register file for tests.

use core::convert::Infallible;

use embedded_hal::i2c::{ErrorType, I2c, Operation};

/// An I2C target that behaves like an RTC's register file: the first written
/// byte sets the register pointer, further bytes are stored and reads return
/// consecutive registers. The pointer auto-increments and wraps at 256.
pub(crate) struct RegisterFile {
    pub(crate) registers: [u8; 256],
    /// Number of transfers that stored at least one byte.
    pub(crate) writes: usize,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            registers: [0; 256],
            writes: 0,
        }
    }
}

impl ErrorType for RegisterFile {
    type Error = Infallible;
}

impl I2c for RegisterFile {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut pointer: Option<u8> = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let mut stored = false;
                    for byte in bytes.iter() {
                        match pointer {
                            None => pointer = Some(*byte),
                            Some(p) => {
                                self.registers[usize::from(p)] = *byte;
                                pointer = Some(p.wrapping_add(1));
                                stored = true;
                            }
                        }
                    }
                    if stored {
                        self.writes += 1;
                    }
                }
                Operation::Read(buffer) => {
                    let mut p = pointer.unwrap_or(0);
                    for slot in buffer.iter_mut() {
                        *slot = self.registers[usize::from(p)];
                        p = p.wrapping_add(1);
                    }
                    pointer = Some(p);
                }
            }
        }
        Ok(())
    }
}

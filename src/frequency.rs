//! Square-wave output frequency tables.
//!
//! Each chip maps a small set of output frequencies onto a bit field of one
//! control register. A [`FrequencyTable`] holds that mapping in both
//! directions. Frequencies are given in Hz with two sentinels: `0` for a pin
//! that is not oscillating and, on the DS1307, `-1` for a pin held low.
//!
//! Reads report the first matching entry. The DS1307 and PCF8523 tables list
//! the rounded value first (`4000` for 4.096 kHz, `32000` for 32.768 kHz);
//! the DS3231 table lists the exact value first, so what is written reads
//! back unchanged. Writes accept either form.

use crate::registers::{Ds1307Control, Ds3231Control, Pcf8523ClockOut};

/// Pin not oscillating.
pub const OFF: i32 = 0;
/// Pin not oscillating and driven low.
pub const LOW: i32 = -1;

/// Bidirectional mapping between frequencies and register bit patterns.
///
/// `hz[i]` selects `bits[i]`. A bit pattern may appear more than once; the
/// first occurrence names the frequency reported on read.
#[derive(Debug)]
pub struct FrequencyTable {
    hz: &'static [i32],
    bits: &'static [u8],
    mask: u8,
    normalize: fn(u8) -> u8,
}

impl FrequencyTable {
    /// Bits of the register owned by this table.
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    /// Frequencies accepted by [`FrequencyTable::encode`].
    pub const fn supported(&self) -> &'static [i32] {
        self.hz
    }

    /// Returns the register bits for `hz`, or `None` when unsupported.
    pub fn encode(&self, hz: i32) -> Option<u8> {
        let index = self.hz.iter().position(|candidate| *candidate == hz)?;
        self.bits.get(index).copied()
    }

    /// Returns the frequency selected by a raw register value.
    pub fn decode(&self, register: u8) -> Option<i32> {
        let bits = (self.normalize)(register & self.mask);
        let index = self.bits.iter().position(|candidate| *candidate == bits)?;
        self.hz.get(index).copied()
    }
}

/// DS1307 control register: OUT, SQWE and RS1..RS0.
pub static DS1307: FrequencyTable = FrequencyTable {
    hz: &[OFF, LOW, 1, 4000, 8000, 32000, 4096, 8192, 32768],
    bits: &[0x80, 0x00, 0x10, 0x11, 0x12, 0x13, 0x11, 0x12, 0x13],
    mask: 0x93,
    normalize: ds1307_normalize,
};

/// DS3231 control register: INTCN and RS2..RS1.
pub static DS3231: FrequencyTable = FrequencyTable {
    hz: &[OFF, 1, 1024, 4096, 8192, 1000, 4000, 8000],
    bits: &[0x04, 0x00, 0x08, 0x10, 0x18, 0x08, 0x10, 0x18],
    mask: 0x1c,
    normalize: ds3231_normalize,
};

/// PCF8523 timer/CLKOUT register: COF[2:0] in bits 5..3.
pub static PCF8523: FrequencyTable = FrequencyTable {
    hz: &[
        32000, 16000, 8000, 4000, 1000, 32, 1, OFF, 32768, 16384, 8192, 4096, 1024,
    ],
    bits: &[
        0x00, 0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0x00, 0x08, 0x10, 0x18, 0x20,
    ],
    mask: 0x38,
    normalize: pcf8523_normalize,
};

// With SQWE clear the rate bits are don't-care and OUT alone sets the level.
fn ds1307_normalize(bits: u8) -> u8 {
    let control = Ds1307Control::from(bits);
    if control.sqwe() {
        bits & !0x80
    } else {
        let mut idle = Ds1307Control::default();
        idle.set_out(control.out());
        idle.into()
    }
}

// With INTCN set the rate bits are don't-care.
fn ds3231_normalize(bits: u8) -> u8 {
    let control = Ds3231Control::from(bits);
    if control.intcn() {
        let mut off = Ds3231Control::default();
        off.set_intcn(true);
        off.into()
    } else {
        bits
    }
}

fn pcf8523_normalize(bits: u8) -> u8 {
    let mut clock_out = Pcf8523ClockOut::default();
    clock_out.set_cof(Pcf8523ClockOut::from(bits).cof());
    clock_out.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ds1307_encode() {
        assert_eq!(DS1307.encode(4000), Some(0x11));
        assert_eq!(DS1307.encode(4096), Some(0x11));
        assert_eq!(DS1307.encode(1), Some(0x10));
        assert_eq!(DS1307.encode(32768), Some(0x13));
        assert_eq!(DS1307.encode(OFF), Some(0x80));
        assert_eq!(DS1307.encode(LOW), Some(0x00));
        assert_eq!(DS1307.encode(500), None);
    }

    #[test]
    fn test_ds1307_decode() {
        assert_eq!(DS1307.decode(0x11), Some(4000));
        assert_eq!(DS1307.decode(0x13), Some(32000));
        assert_eq!(DS1307.decode(0x80), Some(OFF));
        assert_eq!(DS1307.decode(0x00), Some(LOW));
        // power-on default: rate bits set, square wave disabled
        assert_eq!(DS1307.decode(0x03), Some(LOW));
        assert_eq!(DS1307.decode(0x83), Some(OFF));
        // OUT is ignored while oscillating
        assert_eq!(DS1307.decode(0x91), Some(4000));
    }

    #[test]
    fn test_ds3231_table() {
        assert_eq!(DS3231.encode(OFF), Some(0x04));
        assert_eq!(DS3231.encode(1024), Some(0x08));
        assert_eq!(DS3231.encode(32768), None);
        assert_eq!(DS3231.decode(0x1c), Some(OFF));
        assert_eq!(DS3231.decode(0x08), Some(1024));
        assert_eq!(DS3231.decode(0x18), Some(8192));
        assert_eq!(DS3231.encode(4000), Some(0x10));
        // unrelated control bits are outside the mask
        assert_eq!(DS3231.decode(0x80 | 0x10 | 0x03), Some(4096));
    }

    #[test]
    fn test_pcf8523_table() {
        let expected = [32000, 16000, 8000, 4000, 1000, 32, 1, OFF];
        for (field, hz) in expected.iter().enumerate() {
            let register = (field as u8) << 3;
            assert_eq!(PCF8523.decode(register | 0xc7), Some(*hz));
            assert_eq!(PCF8523.encode(*hz), Some(register));
        }
        assert_eq!(PCF8523.encode(16384), Some(1 << 3));
        assert_eq!(PCF8523.encode(LOW), None);
    }

    #[test]
    fn test_tables_are_parallel() {
        for table in [&DS1307, &DS3231, &PCF8523] {
            assert_eq!(table.hz.len(), table.bits.len());
            for hz in table.supported() {
                let bits = table.encode(*hz).unwrap();
                assert_eq!(bits & !table.mask(), 0);
                // aliases decode to their nominal value, which encodes the same
                let nominal = table.decode(bits).unwrap();
                assert_eq!(table.encode(nominal), Some(bits));
            }
        }
    }
}

// Copyright (c) 2017-2019 Rene van der Meer
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

use super::{RegisterBus, MAX_WRITE_LEN};

// Prepends the register address to the outgoing bytes. Anything beyond
// MAX_WRITE_LEN is ignored.
fn frame(register: u8, bytes: &[u8], buffer: &mut [u8; MAX_WRITE_LEN + 1]) -> usize {
    let len = bytes.len().min(MAX_WRITE_LEN);

    buffer[0] = register;
    buffer[1..=len].copy_from_slice(&bytes[..len]);

    len + 1
}

/// `RegisterBus` adapter for `embedded-hal` v1.0.0 I2C buses.
///
/// Register reads are issued as a single `write_read` transaction. Register
/// writes are issued as a single `write`, with the register address
/// prepended to the outgoing bytes. At most [`MAX_WRITE_LEN`] bytes are
/// written, and any additional data is ignored.
///
/// [`MAX_WRITE_LEN`]: constant.MAX_WRITE_LEN.html
#[cfg(feature = "embedded-hal")]
#[derive(Debug)]
pub struct Hal<I> {
    i2c: I,
}

#[cfg(feature = "embedded-hal")]
impl<I> Hal<I> {
    /// Wraps an `embedded-hal` v1.0.0 I2C bus.
    pub fn new(i2c: I) -> Hal<I> {
        Hal { i2c }
    }

    /// Returns the wrapped bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

#[cfg(feature = "embedded-hal")]
impl<I: embedded_hal::i2c::I2c> RegisterBus for Hal<I> {
    type Error = I::Error;

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(address, &[register], buffer)
    }

    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let len = frame(register, bytes, &mut buffer);

        self.i2c.write(address, &buffer[..len])
    }
}

/// `RegisterBus` adapter for `embedded-hal` v0.2.7 blocking I2C buses.
///
/// Behaves the same as [`Hal`], using the `blocking::i2c::WriteRead` and
/// `blocking::i2c::Write` traits.
///
/// [`Hal`]: struct.Hal.html
#[cfg(feature = "embedded-hal-0")]
#[derive(Debug)]
pub struct Hal0<I> {
    i2c: I,
}

#[cfg(feature = "embedded-hal-0")]
impl<I> Hal0<I> {
    /// Wraps an `embedded-hal` v0.2.7 blocking I2C bus.
    pub fn new(i2c: I) -> Hal0<I> {
        Hal0 { i2c }
    }

    /// Returns the wrapped bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

#[cfg(feature = "embedded-hal-0")]
impl<I, E> RegisterBus for Hal0<I>
where
    I: embedded_hal_0::blocking::i2c::Write<Error = E>
        + embedded_hal_0::blocking::i2c::WriteRead<Error = E>,
{
    type Error = E;

    fn read_block(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(address, &[register], buffer)
    }

    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), E> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let len = frame(register, bytes, &mut buffer);

        self.i2c.write(address, &buffer[..len])
    }
}

#[cfg(all(test, feature = "embedded-hal"))]
mod tests {
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    use super::*;
    use crate::rtc::{DateTime, Ds1307};

    const DEVICE_ADDRESS: u8 = 0x68;

    #[test]
    fn frame_truncates_long_writes() {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let bytes = [0xAAu8; MAX_WRITE_LEN + 8];

        assert_eq!(frame(0x08, &bytes, &mut buffer), MAX_WRITE_LEN + 1);
        assert_eq!(buffer[0], 0x08);
        assert!(buffer[1..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn set_datetime_is_one_write() {
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![0x00, 0x17, 0x47, 0x18, 0x07, 0x19, 0x02, 0x23],
        )]);
        let mut rtc = Ds1307::new(Hal::new(mock));

        rtc.set_datetime(&DateTime::new(2023, 2, 19, 18, 47, 17, 6))
            .unwrap();

        rtc.release().release().done();
    }

    #[test]
    fn datetime_is_one_write_read() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![0x00],
            vec![0x17, 0x47, 0x18, 0x07, 0x19, 0x02, 0x23],
        )]);
        let mut rtc = Ds1307::new(Hal::new(mock));

        assert_eq!(
            rtc.datetime().unwrap(),
            DateTime::new(2023, 2, 19, 18, 47, 17, 6)
        );

        rtc.release().release().done();
    }

    #[test]
    fn oscillator_flag_is_read_modify_write() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x00], vec![0x42]),
            I2cTrans::write(DEVICE_ADDRESS, vec![0x00, 0xC2]),
        ]);
        let mut rtc = Ds1307::new(Hal::new(mock));

        rtc.set_oscillator_disabled(true).unwrap();

        rtc.release().release().done();
    }
}

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

//! Interface for the DS1307 date/time and oscillator registers.
//!
//! ## Registers
//!
//! The date and time are stored in seven consecutive registers, each holding
//! a binary-coded decimal value.
//!
//! | Address | Contents |
//! |---|---|
//! | `0x00` | Seconds (bits 0-6), oscillator disable flag (bit 7) |
//! | `0x01` | Minutes |
//! | `0x02` | Hours, with the 12-hour mode flag (bit 6) and PM flag (bit 5) |
//! | `0x03` | Day of the week, 1 through 7 |
//! | `0x04` | Day of the month |
//! | `0x05` | Month |
//! | `0x06` | Year, 00 through 99 |
//!
//! [`Ds1307`] reads and writes the whole block in a single transfer, so the
//! chip can't roll over between fields.
//!
//! ## Oscillator
//!
//! Setting bit 7 of the seconds register halts the oscillator, which reduces
//! the current drawn from the backup battery while the clock isn't needed.
//! Writing the date and time always clears the flag, which restarts the
//! clock. If the oscillator should stay halted, call
//! [`set_oscillator_disabled`] again afterwards.
//!
//! ## Not supported
//!
//! The control register at `0x07`, the square-wave output and the
//! battery-backed RAM aren't accessed by this driver.
//!
//! [`Ds1307`]: struct.Ds1307.html
//! [`set_oscillator_disabled`]: struct.Ds1307.html#method.set_oscillator_disabled

use std::error;
use std::fmt;
use std::result;

use crate::bus::RegisterBus;

mod codec;
mod datetime;

pub use self::codec::HourDecoding;
pub use self::datetime::{DateTime, Field, HostClockTuple};

/// DS1307 I2C slave address.
pub const DEFAULT_ADDRESS: u8 = 0x68;

// Register addresses
const REG_SECONDS: u8 = 0x00;

/// Errors that can occur when accessing the DS1307.
#[derive(Debug)]
pub enum Error<E> {
    /// Bus error.
    ///
    /// The underlying transfer failed. The bus error is returned unchanged,
    /// and the transfer isn't retried.
    Bus(E),
    /// Invalid input.
    ///
    /// A calendar field is outside the range the DS1307 can store. The
    /// registers aren't modified. See [`Field::range`] for the accepted
    /// values.
    ///
    /// [`Field::range`]: enum.Field.html#method.range
    InvalidInput(Field, u16),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Bus(ref err) => write!(f, "Bus error: {:?}", err),
            Error::InvalidInput(field, value) => write!(f, "Invalid {}: {}", field, value),
        }
    }
}

impl<E: fmt::Debug> error::Error for Error<E> {}

/// Result type returned from methods that can have `rtc::Error`s.
pub type Result<T, E> = result::Result<T, Error<E>>;

/// Provides access to a DS1307 real-time clock.
///
/// `Ds1307` owns the bus it communicates through. Every method fetches fresh
/// values from the chip, and nothing is cached in between calls. Sharing a
/// single device between threads requires external synchronization, for
/// instance by wrapping `Ds1307` in a `Mutex`.
///
/// By default, [`set_datetime`] rejects fields the chip can't store, and
/// hours stored in 12-hour mode are converted using [`HourDecoding::Standard`].
/// Both can be changed with [`set_validation`] and [`set_hour_decoding`].
///
/// [`set_datetime`]: #method.set_datetime
/// [`set_validation`]: #method.set_validation
/// [`set_hour_decoding`]: #method.set_hour_decoding
/// [`HourDecoding::Standard`]: enum.HourDecoding.html#variant.Standard
#[derive(Debug)]
pub struct Ds1307<B> {
    bus: B,
    address: u8,
    validation: bool,
    hour_decoding: HourDecoding,
}

impl<B: RegisterBus> Ds1307<B> {
    /// Constructs a new `Ds1307` at the default slave address `0x68`.
    pub fn new(bus: B) -> Ds1307<B> {
        Ds1307::with_address(bus, DEFAULT_ADDRESS)
    }

    /// Constructs a new `Ds1307` at the specified slave address.
    ///
    /// The DS1307's address is fixed at `0x68`. A different address is only
    /// useful behind an address translator, or for a compatible chip.
    pub fn with_address(bus: B, address: u8) -> Ds1307<B> {
        Ds1307 {
            bus,
            address,
            validation: true,
            hour_decoding: HourDecoding::default(),
        }
    }

    /// Returns the slave address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns `true` if [`set_datetime`] checks the field ranges.
    ///
    /// [`set_datetime`]: #method.set_datetime
    pub fn validation(&self) -> bool {
        self.validation
    }

    /// Enables or disables field range checks in [`set_datetime`].
    ///
    /// With validation disabled, the year is stored modulo 100, so 1999 is
    /// read back as 2099, and any other out-of-range field is stored as an
    /// invalid BCD value that won't read back correctly.
    ///
    /// By default, `validation` is set to `true`.
    ///
    /// [`set_datetime`]: #method.set_datetime
    pub fn set_validation(&mut self, validation: bool) {
        self.validation = validation;
    }

    /// Returns how hours stored in 12-hour mode are decoded.
    pub fn hour_decoding(&self) -> HourDecoding {
        self.hour_decoding
    }

    /// Selects how hours stored in 12-hour mode are decoded.
    ///
    /// By default, `hour_decoding` is set to [`HourDecoding::Standard`].
    ///
    /// [`HourDecoding::Standard`]: enum.HourDecoding.html#variant.Standard
    pub fn set_hour_decoding(&mut self, hour_decoding: HourDecoding) {
        self.hour_decoding = hour_decoding;
    }

    /// Returns a reference to the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Returns a mutable reference to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consumes the `Ds1307`, returning the underlying bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Returns the current date, time and day of the week.
    ///
    /// The hour is always returned in 24-hour format, regardless of the mode
    /// the chip is in. Register contents are trusted, and aren't checked for
    /// valid BCD.
    pub fn datetime(&mut self) -> Result<DateTime, B::Error> {
        let mut block = [0u8; codec::BLOCK_LEN];
        self.read(REG_SECONDS, &mut block)?;

        Ok(codec::decode_block(&block, self.hour_decoding))
    }

    /// Sets the date, time and day of the week, and starts the oscillator.
    ///
    /// All seven registers are written in a single transfer, in 24-hour mode.
    /// `datetime.yearday` is ignored.
    ///
    /// Writing the seconds register clears the oscillator disable flag. Call
    /// [`set_oscillator_disabled`] afterwards to keep the clock halted.
    ///
    /// Returns `Err(`[`Error::InvalidInput`]`)` without accessing the bus if
    /// validation is enabled and a field is out of range.
    ///
    /// [`set_oscillator_disabled`]: #method.set_oscillator_disabled
    /// [`Error::InvalidInput`]: enum.Error.html#variant.InvalidInput
    pub fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), B::Error> {
        if self.validation {
            if let Some((field, value)) = datetime.invalid_field() {
                log::debug!("Rejected {}: {} is out of range", field, value);
                return Err(Error::InvalidInput(field, value));
            }
        }

        let block = codec::encode_block(datetime);

        self.write(REG_SECONDS, &block)
    }

    /// Returns the current date and time as a [`HostClockTuple`], ready to be
    /// passed to a host's RTC-set API.
    ///
    /// [`HostClockTuple`]: type.HostClockTuple.html
    pub fn host_clock_datetime(&mut self) -> Result<HostClockTuple, B::Error> {
        Ok(self.datetime()?.to_host_clock())
    }

    /// Returns `true` if the oscillator is halted.
    pub fn oscillator_disabled(&mut self) -> Result<bool, B::Error> {
        let mut seconds = [0u8; 1];
        self.read(REG_SECONDS, &mut seconds)?;

        Ok(seconds[0] & codec::OSCILLATOR_DISABLE != 0)
    }

    /// Halts or restarts the oscillator.
    ///
    /// The seconds register is read first, so the seconds value sharing the
    /// register with the oscillator disable flag is preserved.
    pub fn set_oscillator_disabled(&mut self, disabled: bool) -> Result<(), B::Error> {
        let mut seconds = [0u8; 1];
        self.read(REG_SECONDS, &mut seconds)?;

        seconds[0] = codec::with_oscillator_disabled(seconds[0], disabled);

        self.write(REG_SECONDS, &seconds)
    }

    fn read(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), B::Error> {
        self.bus
            .read_block(self.address, register, buffer)
            .map_err(Error::Bus)?;

        trace_transfer!("Read", self.address, register, buffer);

        Ok(())
    }

    fn write(&mut self, register: u8, bytes: &[u8]) -> Result<(), B::Error> {
        trace_transfer!("Write", self.address, register, bytes);

        self.bus
            .write_block(self.address, register, bytes)
            .map_err(Error::Bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::sim::{Nack, Registers, Transfer};

    fn example() -> DateTime {
        DateTime::new(2023, 2, 19, 18, 47, 17, 6)
    }

    #[test]
    fn set_datetime_writes_example_block() {
        let mut rtc = Ds1307::new(Registers::new());

        rtc.set_datetime(&example()).unwrap();

        let registers = rtc.release();
        assert_eq!(registers.block(), [0x17, 0x47, 0x18, 0x07, 0x19, 0x02, 0x23]);
        assert_eq!(
            registers.transfers,
            vec![Transfer::Write {
                address: DEFAULT_ADDRESS,
                register: 0x00,
                bytes: vec![0x17, 0x47, 0x18, 0x07, 0x19, 0x02, 0x23],
            }]
        );
    }

    #[test]
    fn datetime_reads_back_what_was_written() {
        let mut rtc = Ds1307::new(Registers::new());

        rtc.set_datetime(&example()).unwrap();

        assert_eq!(rtc.datetime().unwrap(), example());
        assert_eq!(rtc.datetime().unwrap().yearday, None);
        assert_eq!(
            rtc.bus().transfers.last(),
            Some(&Transfer::Read {
                address: DEFAULT_ADDRESS,
                register: 0x00,
                len: 7,
            })
        );
    }

    #[test]
    fn weekday_decoding() {
        let mut rtc = Ds1307::new(Registers::with_block([0, 0, 0, 1, 1, 1, 0]));

        assert_eq!(rtc.datetime().unwrap().weekday, 0);
    }

    #[test]
    fn host_clock_view() {
        let mut rtc = Ds1307::new(Registers::with_block([
            0x17, 0x47, 0x18, 0x07, 0x19, 0x02, 0x23,
        ]));

        let (year, month, day, weekday, hour, minute, second, subseconds) =
            rtc.host_clock_datetime().unwrap();

        assert_eq!((year, month, day), (2023, 2, 19));
        assert_eq!(weekday, None);
        assert_eq!((hour, minute, second), (18, 47, 17));
        assert_eq!(subseconds, None);
        assert_eq!(rtc.bus().transfers.len(), 1);
    }

    #[test]
    fn oscillator_flag_preserves_seconds() {
        let mut rtc = Ds1307::new(Registers::with_block([0x42, 0, 0, 1, 1, 1, 0]));

        assert!(!rtc.oscillator_disabled().unwrap());

        rtc.set_oscillator_disabled(true).unwrap();

        assert!(rtc.oscillator_disabled().unwrap());
        assert_eq!(rtc.bus().memory[0] & 0x7F, 0x42);
        assert_eq!(rtc.datetime().unwrap().second, 42);

        rtc.set_oscillator_disabled(false).unwrap();

        assert!(!rtc.oscillator_disabled().unwrap());
        assert_eq!(rtc.bus().memory[0], 0x42);
    }

    #[test]
    fn set_oscillator_disabled_is_read_then_write() {
        let mut rtc = Ds1307::new(Registers::with_block([0x42, 0, 0, 1, 1, 1, 0]));

        rtc.set_oscillator_disabled(true).unwrap();

        assert_eq!(
            rtc.release().transfers,
            vec![
                Transfer::Read {
                    address: DEFAULT_ADDRESS,
                    register: 0x00,
                    len: 1,
                },
                Transfer::Write {
                    address: DEFAULT_ADDRESS,
                    register: 0x00,
                    bytes: vec![0xC2],
                },
            ]
        );
    }

    #[test]
    fn set_datetime_restarts_oscillator() {
        let mut rtc = Ds1307::new(Registers::new());

        rtc.set_oscillator_disabled(true).unwrap();
        assert!(rtc.oscillator_disabled().unwrap());

        rtc.set_datetime(&example()).unwrap();

        assert!(!rtc.oscillator_disabled().unwrap());
    }

    #[test]
    fn invalid_input_is_rejected_before_bus_access() {
        let mut rtc = Ds1307::new(Registers::new());
        let mut dt = example();
        dt.month = 13;

        match rtc.set_datetime(&dt) {
            Err(Error::InvalidInput(Field::Month, 13)) => (),
            other => panic!("unexpected result: {:?}", other),
        }

        dt.month = 12;
        dt.year = 2100;

        match rtc.set_datetime(&dt) {
            Err(Error::InvalidInput(Field::Year, 2100)) => (),
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(rtc.bus().transfers.is_empty());
    }

    #[test]
    fn disabled_validation_wraps_year() {
        let mut rtc = Ds1307::new(Registers::new());
        rtc.set_validation(false);
        assert!(!rtc.validation());

        rtc.set_datetime(&DateTime::new(2123, 2, 19, 18, 47, 17, 6))
            .unwrap();

        assert_eq!(rtc.bus().memory[6], 0x23);
        assert_eq!(rtc.datetime().unwrap().year, 2023);
    }

    #[test]
    fn twelve_hour_mode_follows_decoding() {
        // 12:30:00 AM
        let mut rtc = Ds1307::new(Registers::with_block([0x00, 0x30, 0x52, 1, 1, 1, 0]));

        assert_eq!(rtc.hour_decoding(), HourDecoding::Standard);
        assert_eq!(rtc.datetime().unwrap().hour, 0);

        rtc.set_hour_decoding(HourDecoding::Legacy);

        assert_eq!(rtc.datetime().unwrap().hour, 12);
    }

    #[test]
    fn bus_errors_are_propagated() {
        let mut registers = Registers::new();
        registers.nack = true;
        let mut rtc = Ds1307::new(registers);

        assert!(matches!(rtc.datetime(), Err(Error::Bus(Nack))));
        assert!(matches!(rtc.set_datetime(&example()), Err(Error::Bus(Nack))));
        assert!(matches!(rtc.oscillator_disabled(), Err(Error::Bus(Nack))));
        assert!(matches!(
            rtc.set_oscillator_disabled(true),
            Err(Error::Bus(Nack))
        ));
        assert!(matches!(rtc.host_clock_datetime(), Err(Error::Bus(Nack))));
    }

    #[test]
    fn custom_address() {
        let mut rtc = Ds1307::with_address(Registers::new(), 0x50);
        assert_eq!(rtc.address(), 0x50);

        rtc.oscillator_disabled().unwrap();

        assert_eq!(
            rtc.release().transfers,
            vec![Transfer::Read {
                address: 0x50,
                register: 0x00,
                len: 1,
            }]
        );
    }

    #[test]
    fn borrowed_bus() {
        let mut registers = Registers::new();

        Ds1307::new(&mut registers).set_datetime(&example()).unwrap();

        assert_eq!(Ds1307::new(&mut registers).datetime().unwrap(), example());
    }

    #[test]
    fn error_display() {
        let invalid: Error<Nack> = Error::InvalidInput(Field::Hour, 24);
        let bus: Error<Nack> = Error::Bus(Nack);

        assert_eq!(invalid.to_string(), "Invalid hour: 24");
        assert_eq!(bus.to_string(), "Bus error: Nack");
    }
}

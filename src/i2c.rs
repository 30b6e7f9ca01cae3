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

//! Linux `i2cdev` bus access.
//!
//! [`I2c`] opens one of the `/dev/i2c-N` character devices and talks to
//! slave devices through `ioctl` requests. It implements [`RegisterBus`], so
//! it can be handed straight to [`Ds1307`].
//!
//! ## I2C buses
//!
//! On a Raspberry Pi, the bus connected to physical pins 3 (SDA) and 5 (SCL)
//! is bus 1, and is disabled by default. You can enable it through
//! `sudo raspi-config`, or by adding `dtparam=i2c_arm=on` to
//! `/boot/config.txt`. Other boards expose their buses under different
//! numbers, which can be selected with [`with_bus`].
//!
//! The DS1307 supports Standard-mode (100 kHz) only. Make sure the bus isn't
//! configured for a faster clock speed.
//!
//! ## Troubleshooting
//!
//! ### Permission denied
//!
//! If [`new`] or [`with_bus`] returns an `io::ErrorKind::PermissionDenied`
//! error, make sure the file permissions for `/dev/i2c-1` are correct, and the
//! current user is a member of the `i2c` group.
//!
//! ### Timed out
//!
//! Transactions return an `io::ErrorKind::TimedOut` error when their duration
//! exceeds the timeout value. You can change the timeout using [`set_timeout`].
//!
//! [`I2c`]: struct.I2c.html
//! [`RegisterBus`]: ../bus/trait.RegisterBus.html
//! [`Ds1307`]: ../rtc/struct.Ds1307.html
//! [`new`]: struct.I2c.html#method.new
//! [`with_bus`]: struct.I2c.html#method.with_bus
//! [`set_timeout`]: struct.I2c.html#method.set_timeout

use std::error;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::os::unix::io::AsRawFd;
use std::result;

use libc::c_ulong;

use crate::bus::RegisterBus;

mod ioctl;

pub use self::ioctl::Capabilities;

const DEFAULT_BUS: u8 = 1;

/// Errors that can occur when accessing the I2C bus.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(io::Error),
    /// Invalid slave address.
    ///
    /// Several 7-bit addresses are reserved, and can't be used as slave
    /// addresses. A list of those reserved addresses can be found [here].
    ///
    /// [here]: https://en.wikipedia.org/wiki/I%C2%B2C#Reserved_addresses_in_7-bit_address_space
    InvalidSlaveAddress(u16),
    /// I2C/SMBus feature not supported.
    ///
    /// The underlying drivers don't support the selected I2C feature or SMBus protocol.
    FeatureNotSupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
            Error::InvalidSlaveAddress(address) => write!(f, "Invalid slave address: {}", address),
            Error::FeatureNotSupported => write!(f, "I2C/SMBus feature not supported"),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Result type returned from methods that can have `i2c::Error`s.
pub type Result<T> = result::Result<T, Error>;

// Filters out reserved, invalid and unsupported 7-bit addresses
fn is_valid_slave_address(slave_address: u16) -> bool {
    !(slave_address < 8 || (slave_address >> 3) == 0b1111 || slave_address > 0x7F)
}

/// Provides access to a Linux I2C bus through the `i2cdev` interface.
///
/// Register transfers use the SMBus I2C block protocol, which limits each
/// transfer to 32 bytes. That's enough to cover the DS1307's time registers
/// several times over.
#[derive(Debug)]
pub struct I2c {
    bus: u8,
    funcs: Capabilities,
    i2cdev: File,
    address: u16,
    // The not_sync field is a workaround to force !Sync. I2c isn't safe for
    // Sync because of ioctl() and the underlying drivers.
    not_sync: PhantomData<*const ()>,
}

impl I2c {
    /// Constructs a new `I2c` on bus 1.
    ///
    /// Bus 1 is bound to physical pins 3 (SDA) and 5 (SCL) on every Raspberry
    /// Pi model except the early Model B Rev 1. Use [`with_bus`] to select a
    /// different bus.
    ///
    /// [`with_bus`]: #method.with_bus
    pub fn new() -> Result<I2c> {
        I2c::with_bus(DEFAULT_BUS)
    }

    /// Constructs a new `I2c` using the specified bus.
    ///
    /// `bus` selects `/dev/i2c-{bus}`. Any 8-bit bus ID could potentially be
    /// configured for bit banging I2C using `i2c-gpio`.
    pub fn with_bus(bus: u8) -> Result<I2c> {
        let i2cdev = OpenOptions::new()
            .read(true)
            .write(true)
            .open(format!("/dev/i2c-{}", bus))?;

        let capabilities = ioctl::funcs(i2cdev.as_raw_fd())?;

        // Disable 10-bit addressing if it's supported
        if capabilities.addr_10bit() {
            ioctl::set_addr_10bit(i2cdev.as_raw_fd(), 0)?;
        }

        // Disable PEC if it's supported
        if capabilities.smbus_pec() {
            ioctl::set_pec(i2cdev.as_raw_fd(), 0)?;
        }

        log::debug!("Opened /dev/i2c-{} ({:?})", bus, capabilities);

        Ok(I2c {
            bus,
            funcs: capabilities,
            i2cdev,
            address: 0,
            not_sync: PhantomData,
        })
    }

    /// Returns information on the functionality supported by the underlying drivers.
    pub fn capabilities(&self) -> Capabilities {
        self.funcs
    }

    /// Returns the I2C bus ID.
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// Returns the currently selected slave address, or 0 if none was set.
    pub fn slave_address(&self) -> u16 {
        self.address
    }

    /// Sets a 7-bit slave address.
    ///
    /// `slave_address` refers to the slave device you're communicating with.
    /// The specified address shouldn't include the R/W bit.
    pub fn set_slave_address(&mut self, slave_address: u16) -> Result<()> {
        if !is_valid_slave_address(slave_address) {
            return Err(Error::InvalidSlaveAddress(slave_address));
        }

        ioctl::set_slave_address(self.i2cdev.as_raw_fd(), c_ulong::from(slave_address))?;

        self.address = slave_address;

        Ok(())
    }

    /// Sets the maximum duration of a transaction in milliseconds (ms).
    ///
    /// Transactions that take longer than `timeout` return an
    /// `io::ErrorKind::TimedOut` error.
    ///
    /// `timeout` has a resolution of 10ms.
    pub fn set_timeout(&self, timeout: u32) -> Result<()> {
        // Contrary to the i2cdev documentation, this seems to
        // be used as a timeout for (part of?) the I2C transaction.
        ioctl::set_timeout(self.i2cdev.as_raw_fd(), c_ulong::from(timeout / 10))?;

        Ok(())
    }

    /// Sends an 8-bit `command`, and then fills a multi-byte `buffer` with
    /// incoming data.
    ///
    /// `block_read` can read a maximum of 32 bytes. A shorter response from
    /// the slave device returns an `io::ErrorKind::UnexpectedEof` error.
    ///
    /// Sequence: START → Address + Write Bit → Command → Repeated START
    /// → Address + Read Bit → Incoming Bytes → STOP
    pub fn block_read(&self, command: u8, buffer: &mut [u8]) -> Result<()> {
        if !self.funcs.i2c_block_read() {
            return Err(Error::FeatureNotSupported);
        }

        let len = ioctl::i2c_block_read(self.i2cdev.as_raw_fd(), command, buffer)?;
        if len < buffer.len() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("received {} of {} bytes", len, buffer.len()),
            )));
        }

        Ok(())
    }

    /// Sends an 8-bit `command` followed by a multi-byte `buffer`.
    ///
    /// `block_write` can write a maximum of 32 bytes. Any additional data contained
    /// in `buffer` is ignored.
    ///
    /// Sequence: START → Address + Write Bit → Command → Outgoing Bytes → STOP
    pub fn block_write(&self, command: u8, buffer: &[u8]) -> Result<()> {
        if !self.funcs.i2c_block_write() {
            return Err(Error::FeatureNotSupported);
        }

        ioctl::i2c_block_write(self.i2cdev.as_raw_fd(), command, buffer)?;

        Ok(())
    }

    // Only issues the ioctl when the target changes
    fn select(&mut self, address: u8) -> Result<()> {
        if self.address != u16::from(address) {
            self.set_slave_address(u16::from(address))?;
        }

        Ok(())
    }
}

impl RegisterBus for I2c {
    type Error = Error;

    fn read_block(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<()> {
        self.select(address)?;
        self.block_read(register, buffer)
    }

    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<()> {
        self.select(address)?;
        self.block_write(register, bytes)
    }
}

// Send is safe for I2c, but we're marked !Send because of the dummy pointer that's
// needed to force !Sync.
unsafe impl Send for I2c {}

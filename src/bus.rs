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

//! Register-level bus access.
//!
//! [`Ds1307`] doesn't care how bytes reach the chip. It only needs to read and
//! write contiguous runs of registers, which is what [`RegisterBus`] describes.
//!
//! Implementations are provided for the Linux `i2cdev` interface ([`I2c`]),
//! and, through the optional `embedded-hal` and `embedded-hal-0` features,
//! for any `embedded-hal` I2C bus by wrapping it in [`Hal`] or [`Hal0`].
//!
//! [`Ds1307`]: ../rtc/struct.Ds1307.html
//! [`RegisterBus`]: trait.RegisterBus.html
//! [`I2c`]: ../i2c/struct.I2c.html
//! [`Hal`]: struct.Hal.html
//! [`Hal0`]: struct.Hal0.html

#[cfg(any(feature = "embedded-hal", feature = "embedded-hal-0"))]
mod hal;

#[cfg(feature = "embedded-hal")]
pub use self::hal::Hal;
#[cfg(feature = "embedded-hal-0")]
pub use self::hal::Hal0;

/// Maximum number of register bytes sent in a single write.
///
/// The DS1307 has 64 registers, so a longer write can't be meaningful.
pub const MAX_WRITE_LEN: usize = 64;

/// Block access to a slave device's registers.
///
/// Both methods block until the transfer completes or fails. A failed transfer
/// is reported through `Self::Error`, and isn't retried.
pub trait RegisterBus {
    /// Error type returned when a transfer fails.
    type Error;

    /// Fills `buffer` with the contents of the consecutive registers starting
    /// at `register` on the slave device at `address`.
    ///
    /// Sequence: START → Address + Write Bit → Register → Repeated START
    /// → Address + Read Bit → Incoming Bytes → STOP
    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Writes `bytes` to the consecutive registers starting at `register` on
    /// the slave device at `address`.
    ///
    /// Sequence: START → Address + Write Bit → Register → Outgoing Bytes → STOP
    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Error = B::Error;

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).read_block(address, register, buffer)
    }

    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write_block(address, register, bytes)
    }
}

/// An in-memory register file standing in for the chip in unit tests.
#[cfg(test)]
pub(crate) mod sim {
    use super::RegisterBus;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Nack;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Transfer {
        Read { address: u8, register: u8, len: usize },
        Write { address: u8, register: u8, bytes: Vec<u8> },
    }

    #[derive(Debug)]
    pub struct Registers {
        pub memory: [u8; 64],
        pub transfers: Vec<Transfer>,
        pub nack: bool,
    }

    impl Registers {
        pub fn new() -> Registers {
            Registers {
                memory: [0u8; 64],
                transfers: Vec::new(),
                nack: false,
            }
        }

        pub fn with_block(block: [u8; 7]) -> Registers {
            let mut registers = Registers::new();
            registers.memory[..7].copy_from_slice(&block);

            registers
        }

        pub fn block(&self) -> [u8; 7] {
            let mut block = [0u8; 7];
            block.copy_from_slice(&self.memory[..7]);

            block
        }
    }

    impl RegisterBus for Registers {
        type Error = Nack;

        fn read_block(
            &mut self,
            address: u8,
            register: u8,
            buffer: &mut [u8],
        ) -> Result<(), Nack> {
            if self.nack {
                return Err(Nack);
            }

            let start = usize::from(register);
            buffer.copy_from_slice(&self.memory[start..start + buffer.len()]);
            self.transfers.push(Transfer::Read {
                address,
                register,
                len: buffer.len(),
            });

            Ok(())
        }

        fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Nack> {
            if self.nack {
                return Err(Nack);
            }

            let start = usize::from(register);
            self.memory[start..start + bytes.len()].copy_from_slice(bytes);
            self.transfers.push(Transfer::Write {
                address,
                register,
                bytes: bytes.to_vec(),
            });

            Ok(())
        }
    }
}

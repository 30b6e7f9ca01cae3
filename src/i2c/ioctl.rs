// Copyright (c) 2017-2018 Rene van der Meer
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

use std::io;
use std::result;

use libc::{c_int, c_ulong, ioctl};

pub type Result<T> = result::Result<T, io::Error>;

// Based on i2c.h, i2c-dev.h and the documentation at https://www.kernel.org/doc/Documentation/i2c

// Capabilities returned by REQ_FUNCS
const FUNC_I2C: c_ulong = 0x01;
const FUNC_10BIT_ADDR: c_ulong = 0x02;
const FUNC_SMBUS_PEC: c_ulong = 0x08;
const FUNC_SMBUS_READ_I2C_BLOCK: c_ulong = 0x0400_0000;
const FUNC_SMBUS_WRITE_I2C_BLOCK: c_ulong = 0x0800_0000;

/// Lists the I2C and SMBus features supported by the underlying drivers.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Capabilities {
    funcs: c_ulong,
}

impl Capabilities {
    fn new(funcs: c_ulong) -> Capabilities {
        Capabilities { funcs }
    }

    /// Indicates whether plain I2C transfers are supported.
    pub fn i2c(&self) -> bool {
        (self.funcs & FUNC_I2C) > 0
    }

    /// Indicates whether 10-bit addressing is supported.
    pub fn addr_10bit(&self) -> bool {
        (self.funcs & FUNC_10BIT_ADDR) > 0
    }

    /// Indicates whether I2C block reads are supported.
    pub fn i2c_block_read(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_I2C_BLOCK) > 0
    }

    /// Indicates whether I2C block writes are supported.
    pub fn i2c_block_write(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_I2C_BLOCK) > 0
    }

    /// Indicates whether SMBus Packet Error Checking is supported.
    pub fn smbus_pec(&self) -> bool {
        (self.funcs & FUNC_SMBUS_PEC) > 0
    }
}

// ioctl() requests supported by i2cdev
const REQ_TIMEOUT: c_ulong = 0x0702; // Timeout in 10ms units
const REQ_SLAVE: c_ulong = 0x0706; // Set slave address
const REQ_TENBIT: c_ulong = 0x0704; // Use 10-bit slave addresses
const REQ_FUNCS: c_ulong = 0x0705; // Read I2C bus capabilities
const REQ_PEC: c_ulong = 0x0708; // SMBus: Use Packet Error Checking
const REQ_SMBUS: c_ulong = 0x0720; // SMBus: Transfer

const SMBUS_BLOCK_MAX: usize = 32; // Maximum bytes per block transfer

// SMBus read or write request
#[derive(Debug, PartialEq, Copy, Clone)]
enum SmbusReadWrite {
    Read = 1,
    Write = 0,
}

// Size/Type identifiers for the data contained in SmbusBuffer
#[derive(Debug, PartialEq, Copy, Clone)]
enum SmbusSize {
    I2cBlockData = 8,
}

// Holds data transferred by REQ_SMBUS requests. For block transfers, the first
// byte contains the length, followed by up to 32 bytes of data, with the final
// byte used as padding.
#[derive(Copy, Clone)]
#[repr(C)]
struct SmbusBuffer {
    data: [u8; SMBUS_BLOCK_MAX + 2],
}

impl SmbusBuffer {
    fn with_len(len: usize) -> SmbusBuffer {
        let mut buffer = SmbusBuffer {
            data: [0u8; SMBUS_BLOCK_MAX + 2],
        };

        buffer.data[0] = len.min(SMBUS_BLOCK_MAX) as u8;

        buffer
    }

    fn with_block(value: &[u8]) -> SmbusBuffer {
        let mut buffer = SmbusBuffer::with_len(value.len());
        let len = usize::from(buffer.data[0]);

        buffer.data[1..=len].copy_from_slice(&value[..len]);

        buffer
    }
}

// Specifies SMBus request parameters
#[repr(C)]
struct SmbusRequest<'a> {
    read_write: u8,
    command: u8,
    size: u32,
    data: &'a mut SmbusBuffer,
}

fn smbus_request(
    fd: c_int,
    read_write: SmbusReadWrite,
    command: u8,
    size: SmbusSize,
    data: &mut SmbusBuffer,
) -> Result<i32> {
    let mut request = SmbusRequest {
        read_write: read_write as u8,
        command,
        size: size as u32,
        data,
    };

    parse_retval!(unsafe { ioctl(fd, REQ_SMBUS, &mut request) })
}

// Returns how many bytes were copied into value
pub fn i2c_block_read(fd: c_int, command: u8, value: &mut [u8]) -> Result<usize> {
    let mut buffer = SmbusBuffer::with_len(value.len());
    smbus_request(
        fd,
        SmbusReadWrite::Read,
        command,
        SmbusSize::I2cBlockData,
        &mut buffer,
    )?;

    let len = usize::from(buffer.data[0]).min(value.len());
    value[..len].copy_from_slice(&buffer.data[1..=len]);

    Ok(len)
}

pub fn i2c_block_write(fd: c_int, command: u8, value: &[u8]) -> Result<i32> {
    let mut buffer = SmbusBuffer::with_block(value);
    smbus_request(
        fd,
        SmbusReadWrite::Write,
        command,
        SmbusSize::I2cBlockData,
        &mut buffer,
    )
}

// All ioctl commands take an unsigned long parameter, except for
// REQ_FUNCS and REQ_SMBUS

pub fn set_slave_address(fd: c_int, value: c_ulong) -> Result<i32> {
    parse_retval!(unsafe { ioctl(fd, REQ_SLAVE, value) })
}

pub fn set_addr_10bit(fd: c_int, value: c_ulong) -> Result<i32> {
    parse_retval!(unsafe { ioctl(fd, REQ_TENBIT, value) })
}

pub fn set_pec(fd: c_int, value: c_ulong) -> Result<i32> {
    parse_retval!(unsafe { ioctl(fd, REQ_PEC, value) })
}

pub fn set_timeout(fd: c_int, value: c_ulong) -> Result<i32> {
    parse_retval!(unsafe { ioctl(fd, REQ_TIMEOUT, value) })
}

pub fn funcs(fd: c_int) -> Result<Capabilities> {
    let mut funcs: c_ulong = 0;

    parse_retval!(unsafe { ioctl(fd, REQ_FUNCS, &mut funcs) })?;

    Ok(Capabilities::new(funcs))
}

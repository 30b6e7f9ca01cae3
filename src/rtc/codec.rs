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

use crate::bcd;

use super::DateTime;

// Register block layout, starting at REG_SECONDS
pub(crate) const BLOCK_LEN: usize = 7;
const SECONDS: usize = 0;
const MINUTES: usize = 1;
const HOURS: usize = 2;
const WEEKDAY: usize = 3;
const DAY: usize = 4;
const MONTH: usize = 5;
const YEAR: usize = 6;

const YEAR_OFFSET: u16 = 2000;

// Seconds register
pub(crate) const OSCILLATOR_DISABLE: u8 = 0b1000_0000;
const SECONDS_MASK: u8 = 0b0111_1111;

// Hours register
const HOUR_12: u8 = 0b0100_0000;
const HOUR_PM: u8 = 0b0010_0000;
const HOUR_24_MASK: u8 = 0b0011_1111;
const HOUR_12_MASK: u8 = 0b0001_1111;

/// How an hours register in 12-hour mode is converted to a 24-hour hour.
///
/// The driver always writes 24-hour mode, so this only matters when something
/// else set the chip to 12-hour mode.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum HourDecoding {
    /// Conventional conversion. 12 AM becomes 0, 12 PM stays 12, and 12 is
    /// added to every other PM hour.
    Standard,
    /// Adds 12 to every PM hour, and leaves AM hours untouched. 12 AM decodes
    /// to 12, and 12 PM decodes to 24.
    ///
    /// Matches the arithmetic used by older DS1307 drivers, for
    /// applications that depend on it.
    Legacy,
}

impl Default for HourDecoding {
    fn default() -> HourDecoding {
        HourDecoding::Standard
    }
}

pub(crate) fn decode_hour(value: u8, decoding: HourDecoding) -> u8 {
    if value & HOUR_12 == 0 {
        return bcd::decode(value & HOUR_24_MASK);
    }

    let hour = bcd::decode(value & HOUR_12_MASK);
    let pm = value & HOUR_PM != 0;

    match decoding {
        HourDecoding::Standard => match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (hour, true) => hour + 12,
            (hour, false) => hour,
        },
        HourDecoding::Legacy => {
            if pm {
                hour + 12
            } else {
                hour
            }
        }
    }
}

pub(crate) fn decode_seconds(value: u8) -> u8 {
    bcd::decode(value & SECONDS_MASK)
}

pub(crate) fn decode_block(block: &[u8; BLOCK_LEN], decoding: HourDecoding) -> DateTime {
    DateTime {
        year: u16::from(bcd::decode(block[YEAR])) + YEAR_OFFSET,
        month: bcd::decode(block[MONTH]),
        day: bcd::decode(block[DAY]),
        hour: decode_hour(block[HOURS], decoding),
        minute: bcd::decode(block[MINUTES]),
        second: decode_seconds(block[SECONDS]),
        // Stored 1-based. Read raw, the same as BCD for 1 through 7
        weekday: block[WEEKDAY].wrapping_sub(1),
        yearday: None,
    }
}

// Always writes 24-hour mode, and clears OSCILLATOR_DISABLE. The year wraps
// modulo 100. Out-of-range fields produce invalid BCD.
pub(crate) fn encode_block(datetime: &DateTime) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];

    block[SECONDS] = bcd::encode(datetime.second);
    block[MINUTES] = bcd::encode(datetime.minute);
    block[HOURS] = bcd::encode(datetime.hour);
    block[WEEKDAY] = bcd::encode(datetime.weekday.wrapping_add(1));
    block[DAY] = bcd::encode(datetime.day);
    block[MONTH] = bcd::encode(datetime.month);
    block[YEAR] = bcd::encode((datetime.year % 100) as u8);

    block
}

// Replaces OSCILLATOR_DISABLE while preserving the seconds bits
pub(crate) fn with_oscillator_disabled(value: u8, disabled: bool) -> u8 {
    (value & !OSCILLATOR_DISABLE) | ((disabled as u8) << 7)
}

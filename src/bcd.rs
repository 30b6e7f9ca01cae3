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

//! Binary-coded decimal conversions.
//!
//! Every DS1307 time register stores a two-digit decimal value, with the tens
//! digit in the high nibble and the ones digit in the low nibble. A single
//! byte therefore covers the values 0 through 99.
//!
//! [`encode`] and [`decode`] are total functions. Their result is only
//! meaningful within the documented range, but out-of-range input never
//! panics. Use [`try_encode`] and [`is_valid`] when the input isn't trusted.
//!
//! [`encode`]: fn.encode.html
//! [`decode`]: fn.decode.html
//! [`try_encode`]: fn.try_encode.html
//! [`is_valid`]: fn.is_valid.html

/// Converts a decimal value to binary-coded decimal.
///
/// `value` should be in the range 0 through 99. Larger values produce a byte
/// that isn't valid BCD, and won't decode back to `value`.
pub const fn encode(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Converts a decimal value to binary-coded decimal, or returns `None` if
/// `value` doesn't fit in two decimal digits.
pub const fn try_encode(value: u8) -> Option<u8> {
    if value < 100 {
        Some(encode(value))
    } else {
        None
    }
}

/// Converts a binary-coded decimal byte to its decimal value.
///
/// If either nibble of `bcd` is larger than 9, the result is unspecified.
pub const fn decode(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Returns `true` if both nibbles of `bcd` hold a decimal digit.
pub const fn is_valid(bcd: u8) -> bool {
    (bcd >> 4) < 10 && (bcd & 0x0F) < 10
}

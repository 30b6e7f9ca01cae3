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

use std::fmt;
use std::ops::RangeInclusive;

/// Date and time in the layout expected by a host's RTC-set API.
///
/// Fields are `(year, month, day, weekday, hour, minute, second, subseconds)`.
/// The weekday and subseconds are always `None`, because the host derives
/// its own weekday and the DS1307 doesn't track fractions of a second.
pub type HostClockTuple = (u16, u8, u8, Option<u8>, u8, u8, u8, Option<u32>);

/// Calendar fields stored by the DS1307.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Weekday,
}

impl Field {
    /// Returns the values the DS1307 can store for this field.
    pub fn range(self) -> RangeInclusive<u16> {
        match self {
            Field::Year => 2000..=2099,
            Field::Month => 1..=12,
            Field::Day => 1..=31,
            Field::Hour => 0..=23,
            Field::Minute | Field::Second => 0..=59,
            Field::Weekday => 0..=6,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Weekday => "weekday",
        };

        f.write_str(name)
    }
}

/// A calendar date and time with a day of the week.
///
/// The hour is always expressed in 24-hour format. `weekday` counts from 0
/// through 6, starting on whichever day the caller picks, as the DS1307 only
/// increments it at midnight.
///
/// The DS1307 doesn't track the day of the year, so `yearday` is always `None`
/// when read from the chip, and ignored when written.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: u8,
    pub yearday: Option<u16>,
}

impl DateTime {
    /// Constructs a new `DateTime` without a day of the year.
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        weekday: u8,
    ) -> DateTime {
        DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday,
            yearday: None,
        }
    }

    /// Returns the first field that can't be stored on the DS1307, along
    /// with its value, or `None` if every field is in range.
    ///
    /// Only the field ranges are checked. February 30th is accepted, just
    /// like it is by the chip.
    pub fn invalid_field(&self) -> Option<(Field, u16)> {
        [
            (Field::Year, self.year),
            (Field::Month, u16::from(self.month)),
            (Field::Day, u16::from(self.day)),
            (Field::Hour, u16::from(self.hour)),
            (Field::Minute, u16::from(self.minute)),
            (Field::Second, u16::from(self.second)),
            (Field::Weekday, u16::from(self.weekday)),
        ]
        .iter()
        .copied()
        .find(|&(field, value)| !field.range().contains(&value))
    }

    /// Returns `true` if every field can be stored on the DS1307.
    pub fn is_valid(&self) -> bool {
        self.invalid_field().is_none()
    }

    /// Rearranges the fields into a [`HostClockTuple`].
    ///
    /// [`HostClockTuple`]: type.HostClockTuple.html
    pub fn to_host_clock(&self) -> HostClockTuple {
        (
            self.year,
            self.month,
            self.day,
            None,
            self.hour,
            self.minute,
            self.second,
            None,
        )
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_clock_shape() {
        let dt = DateTime::new(2023, 2, 19, 18, 47, 17, 6);

        assert_eq!(
            dt.to_host_clock(),
            (2023, 2, 19, None, 18, 47, 17, None)
        );
    }

    #[test]
    fn display() {
        let dt = DateTime::new(2023, 2, 9, 8, 7, 5, 3);

        assert_eq!(dt.to_string(), "2023-02-09 08:07:05");
    }

    #[test]
    fn range_limits_are_valid() {
        assert!(DateTime::new(2000, 1, 1, 0, 0, 0, 0).is_valid());
        assert!(DateTime::new(2099, 12, 31, 23, 59, 59, 6).is_valid());
    }

    #[test]
    fn first_invalid_field_is_reported() {
        let cases = [
            (DateTime::new(1999, 1, 1, 0, 0, 0, 0), (Field::Year, 1999)),
            (DateTime::new(2100, 1, 1, 0, 0, 0, 0), (Field::Year, 2100)),
            (DateTime::new(2023, 0, 1, 0, 0, 0, 0), (Field::Month, 0)),
            (DateTime::new(2023, 13, 1, 0, 0, 0, 0), (Field::Month, 13)),
            (DateTime::new(2023, 1, 0, 0, 0, 0, 0), (Field::Day, 0)),
            (DateTime::new(2023, 1, 32, 0, 0, 0, 0), (Field::Day, 32)),
            (DateTime::new(2023, 1, 1, 24, 0, 0, 0), (Field::Hour, 24)),
            (DateTime::new(2023, 1, 1, 0, 60, 0, 0), (Field::Minute, 60)),
            (DateTime::new(2023, 1, 1, 0, 0, 60, 0), (Field::Second, 60)),
            (DateTime::new(2023, 1, 1, 0, 0, 0, 7), (Field::Weekday, 7)),
        ];

        for (dt, expected) in cases.iter() {
            assert_eq!(dt.invalid_field(), Some(*expected));
        }

        // Year is checked before month
        assert_eq!(
            DateTime::new(1900, 13, 1, 0, 0, 0, 0).invalid_field(),
            Some((Field::Year, 1900))
        );
    }

    #[test]
    fn yearday_is_not_validated() {
        let mut dt = DateTime::new(2023, 2, 19, 18, 47, 17, 6);
        dt.yearday = Some(500);

        assert!(dt.is_valid());
    }
}

//! A driver for the Maxim DS1307 real-time clock.
//!
//! The DS1307 keeps the date and time in seven binary-coded decimal registers
//! starting at address `0x00`. This crate converts between that register
//! layout and a plain calendar representation, and exposes the oscillator
//! disable flag that shares its register with the seconds value.
//!
//! The driver talks to the chip through any type implementing [`RegisterBus`].
//! A Linux `i2cdev` implementation is provided by [`i2c::I2c`]. Adapters for
//! `embedded-hal` v0.2.7 and v1.0.0 buses can be enabled through the optional
//! `embedded-hal-0` and `embedded-hal` features, or both at once through the
//! `hal` feature.
//!
//! Square-wave output, alarms and sub-second precision aren't supported by the
//! DS1307, and the driver doesn't try to emulate them.
//!
//! ```no_run
//! use ds1307::i2c::I2c;
//! use ds1307::{DateTime, Ds1307};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rtc = Ds1307::new(I2c::new()?);
//!
//! rtc.set_datetime(&DateTime::new(2023, 2, 19, 18, 47, 17, 6))?;
//! println!("{}", rtc.datetime()?);
//! # Ok(())
//! # }
//! ```
//!
//! [`RegisterBus`]: bus/trait.RegisterBus.html
//! [`i2c::I2c`]: i2c/struct.I2c.html

// Used by rustdoc to link other crates to ds1307's docs
#![doc(html_root_url = "https://docs.rs/ds1307/0.1.0")]

#[macro_use]
mod macros;

pub mod bcd;
pub mod bus;
pub mod i2c;
pub mod rtc;

pub use crate::bus::RegisterBus;
pub use crate::rtc::{DateTime, Ds1307, Error, Field, HostClockTuple, HourDecoding, Result};

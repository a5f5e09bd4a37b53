//! AM2302 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Aosong AM2302 (DHT22)
//! temperature and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! The sensor talks over a single data wire. The host pulls the line low to
//! request a measurement, then the sensor answers with a fixed handshake and
//! 40 pulse-width encoded bits: 16 bits of humidity, 16 bits of temperature and
//! an 8 bit checksum.
//!
//! # Features
//! - Blocking synchronous API, busy-polling the line once per microsecond
//! - Designed for `no_std` environments
//! - Every failure is reported in the returned [`SensorReading`], never by panicking
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for accurate timing
//!
//! Pin direction is not covered by `embedded-hal`, so the driver asks for a
//! [`FlexPin`]. Open-drain pins can be wrapped in [`OpenDrain`].
//!
//! # Example
//!
//! ```ignore
//! use am2302::{Am2302, OpenDrain};
//!
//! let mut sensor = Am2302::new(OpenDrain::new(pin), delay);
//! sensor.init_bus()?;
//!
//! let reading = sensor.read();
//! if reading.is_ok() {
//!     let celsius = reading.celsius();
//!     let humidity = reading.relative_humidity();
//! }
//! ```
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs failed reads
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod am2302;
pub mod edge;
pub mod error;
pub mod pin;

pub use am2302::{Am2302, Reading, SensorReading};
pub use error::{Field, ReadStatus};
pub use pin::{Direction, FlexPin, OpenDrain};

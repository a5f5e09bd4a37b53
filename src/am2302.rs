use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::edge::{await_level_change, await_level_change_us};
use crate::error::{Field, ReadStatus};
use crate::pin::{Direction, FlexPin};

/// How long the line is held high by [`Am2302::init_bus`].
const INIT_HOLD_US: u32 = 1_000;

/// How long the host holds the line low to request a measurement.
const START_HOLD_US: u32 = 3_000;

/// Maximum time for the sensor to pull the released line low.
const RELEASE_TIMEOUT_US: u32 = 500;

/// Bounds of each of the sensor's two acknowledge pulses (nominally 80us).
const ACK_MIN_US: u32 = 50;
const ACK_MAX_US: u32 = 120;

/// Maximum length of the low gap that opens every data bit.
const BIT_START_MAX_US: u32 = 60;

/// Maximum length of the high pulse carrying a data bit.
const BIT_HIGH_MAX_US: u32 = 80;

/// High pulses at least this long encode a `1`.
const BIT_ONE_MIN_US: u32 = 50;

/// Driver for the AM2302 temperature and humidity sensor.
pub struct Am2302<PIN, D> {
    pin: PIN,
    delay: D,
}

/// Result of one read from the AM2302.
///
/// `humidity` and `temperature` are only meaningful when `status` is
/// [`ReadStatus::Ok`]. On [`ReadStatus::ChecksumMismatch`] they still hold the
/// decoded frame so callers can inspect what arrived. Reads that fail earlier
/// leave them at zero.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorReading<E> {
    /// Relative humidity in tenths of a percent.
    pub humidity: u16,
    /// Temperature in tenths of a degree Celsius.
    pub temperature: i16,
    /// Checksum byte sent by the sensor.
    pub checksum: u8,
    /// Outcome of the read.
    pub status: ReadStatus<E>,
}

/// Checked measurement, scaled to physical units.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl<E> SensorReading<E> {
    fn failed(status: ReadStatus<E>) -> Self {
        SensorReading {
            humidity: 0,
            temperature: 0,
            checksum: 0,
            status,
        }
    }

    /// Returns `true` if the frame was received intact.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Relative humidity in percent.
    pub fn relative_humidity(&self) -> f32 {
        self.humidity as f32 / 10.0
    }

    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        self.temperature as f32 / 10.0
    }

    /// Converts into a [`Reading`], or the failure status.
    pub fn into_result(self) -> Result<Reading, ReadStatus<E>> {
        match self.status {
            ReadStatus::Ok => Ok(Reading {
                temperature: self.celsius(),
                relative_humidity: self.relative_humidity(),
            }),
            status => Err(status),
        }
    }
}

/// The 40 bits sent by the sensor, as received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frame {
    humidity: u16,
    /// Sign-magnitude: bit 15 is the sign.
    temperature: u16,
    checksum: u8,
}

impl Frame {
    /// Sum of the four data bytes, modulo 256.
    fn computed_checksum(&self) -> u8 {
        let [hum_hi, hum_lo] = self.humidity.to_be_bytes();
        let [temp_hi, temp_lo] = self.temperature.to_be_bytes();
        [hum_hi, hum_lo, temp_hi, temp_lo]
            .iter()
            .fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Validates the checksum and decodes the signed temperature.
    fn into_reading<E>(self) -> SensorReading<E> {
        let status = if self.computed_checksum() == self.checksum {
            ReadStatus::Ok
        } else {
            ReadStatus::ChecksumMismatch
        };

        SensorReading {
            humidity: self.humidity,
            temperature: sign_magnitude_to_i16(self.temperature),
            checksum: self.checksum,
            status,
        }
    }
}

/// Converts a sign-magnitude temperature field to a native signed value.
fn sign_magnitude_to_i16(raw: u16) -> i16 {
    let magnitude = (raw & 0x7FFF) as i16;
    if raw & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

impl<PIN, DELAY, E> Am2302<PIN, DELAY>
where
    PIN: FlexPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the AM2302 driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the data line, with an external pull-up.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Am2302 { pin, delay }
    }

    /// Releases the pin and delay provider.
    pub fn release(self) -> (PIN, DELAY) {
        (self.pin, self.delay)
    }

    /// Puts the bus into its idle state.
    ///
    /// Drives the line high for 1 ms. Call once at startup, before the first
    /// [`read`](Self::read).
    pub fn init_bus(&mut self) -> Result<(), E> {
        self.pin.set_direction(Direction::Output)?;
        self.pin.set_high()?;
        self.delay.delay_us(INIT_HOLD_US);
        Ok(())
    }

    /// Reads a temperature and humidity measurement from the sensor.
    ///
    /// This method performs the complete AM2302 communication sequence:
    /// sending the start signal, checking the sensor's acknowledge pulses,
    /// reading 40 bits and validating the checksum.
    ///
    /// The read never fails outright: the outcome is in
    /// [`SensorReading::status`]. Failed reads are not retried. The sensor
    /// needs about 2 seconds between reads.
    pub fn read(&mut self) -> SensorReading<E> {
        let reading = match self.receive() {
            Ok(frame) => frame.into_reading(),
            Err(status) => SensorReading::failed(status),
        };

        #[cfg(feature = "defmt")]
        if !reading.is_ok() {
            defmt::warn!("am2302 read failed: {=str}", reading.status.as_str());
        }

        reading
    }

    /// Runs the handshake and receives the raw frame.
    fn receive(&mut self) -> Result<Frame, ReadStatus<E>> {
        self.start()?;

        let humidity = self.read_word(Field::Humidity)?;
        let temperature = self.read_word(Field::Temperature)?;
        let checksum = self.read_byte(Field::Parity)?;

        Ok(Frame {
            humidity,
            temperature,
            checksum,
        })
    }

    /// Sends the start signal and checks the sensor's response.
    ///
    /// The host holds the line low for 3 ms and releases it. The sensor then
    /// pulls it low for ~80us and high for ~80us before the first data bit.
    fn start(&mut self) -> Result<(), ReadStatus<E>> {
        // MCU sends start request
        self.pin.set_direction(Direction::Output)?;
        self.pin.set_low()?;
        self.delay.delay_us(START_HOLD_US);
        self.pin.set_high()?;
        self.pin.set_direction(Direction::Input)?;

        // Pull-up holds the line high until the sensor answers
        let released = match self.measure(PinState::High, RELEASE_TIMEOUT_US)? {
            Some(us) => us > 0,
            None => return Err(ReadStatus::NoResponseFromSensor),
        };

        // Sensor response: ~80us low
        match self.measure(PinState::Low, ACK_MAX_US)? {
            Some(us) if us >= ACK_MIN_US => {}
            // Line never came up and stays low: nothing is driving it
            None if !released => return Err(ReadStatus::NoResponseFromSensor),
            _ => return Err(ReadStatus::HandshakeTimeout),
        }

        // ~80us high, ending at the first data bit
        if !self.await_change(PinState::High, ACK_MIN_US, ACK_MAX_US)? {
            return Err(ReadStatus::HandshakeTimeout);
        }
        Ok(())
    }

    /// Reads a 16 bit field, most significant bit first.
    fn read_word(&mut self, field: Field) -> Result<u16, ReadStatus<E>> {
        let mut word: u16 = 0;
        for _ in 0..16 {
            word = (word << 1) | u16::from(self.read_bit(field)?);
        }
        Ok(word)
    }

    /// Reads an 8 bit field, most significant bit first.
    fn read_byte(&mut self, field: Field) -> Result<u8, ReadStatus<E>> {
        let mut byte: u8 = 0;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit(field)?);
        }
        Ok(byte)
    }

    /// Reads a single bit from the sensor.
    ///
    /// Every bit opens with a short low gap. The length of the following
    /// high pulse is the bit value: ~26us for `0`, ~70us for `1`.
    fn read_bit(&mut self, field: Field) -> Result<bool, ReadStatus<E>> {
        if !self.await_change(PinState::Low, 0, BIT_START_MAX_US)? {
            return Err(ReadStatus::BitReadTimeout(field));
        }

        match self.measure(PinState::High, BIT_HIGH_MAX_US)? {
            Some(us) => Ok(us >= BIT_ONE_MIN_US),
            None => Err(ReadStatus::BitReadTimeout(field)),
        }
    }

    fn measure(&mut self, level: PinState, max_us: u32) -> Result<Option<u32>, E> {
        await_level_change_us(&mut self.pin, &mut self.delay, level, max_us)
    }

    fn await_change(&mut self, level: PinState, min_us: u32, max_us: u32) -> Result<bool, E> {
        await_level_change(&mut self.pin, &mut self.delay, level, min_us, max_us)
    }
}

use core::fmt;

/// Data field being received when a bit timed out.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// The 16 humidity bits.
    Humidity,
    /// The 16 temperature bits.
    Temperature,
    /// The 8 checksum bits.
    Parity,
}

/// Outcome of a read from the AM2302.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStatus<E> {
    /// The frame was received and its checksum matches.
    Ok,
    /// Error from the GPIO pin while configuring, driving or sampling the line.
    GpioConfigFailed(E),
    /// The sensor never answered the start signal. Check its power supply.
    NoResponseFromSensor,
    /// The sensor's acknowledge pulses were missing or out of range.
    HandshakeTimeout,
    /// A data bit did not arrive in time.
    BitReadTimeout(Field),
    /// Checksum did not match the received data.
    ChecksumMismatch,
}

impl<E> ReadStatus<E> {
    /// Returns `true` for [`ReadStatus::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, ReadStatus::Ok)
    }

    /// Short description of the outcome, without the pin error payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::Ok => "ok",
            ReadStatus::GpioConfigFailed(_) => "gpio error",
            ReadStatus::NoResponseFromSensor => "no response from sensor",
            ReadStatus::HandshakeTimeout => "handshake timed out",
            ReadStatus::BitReadTimeout(Field::Humidity) => "timed out reading humidity bits",
            ReadStatus::BitReadTimeout(Field::Temperature) => {
                "timed out reading temperature bits"
            }
            ReadStatus::BitReadTimeout(Field::Parity) => "timed out reading parity bits",
            ReadStatus::ChecksumMismatch => "checksum mismatch",
        }
    }
}

impl<E> From<E> for ReadStatus<E> {
    fn from(value: E) -> Self {
        Self::GpioConfigFailed(value)
    }
}

impl<E: fmt::Debug> fmt::Display for ReadStatus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadStatus::GpioConfigFailed(err) => write!(f, "gpio error: {err:?}"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for ReadStatus<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_pin_error() {
        let status: ReadStatus<&str> = ReadStatus::GpioConfigFailed("bus fault");
        assert_eq!(status.to_string(), "gpio error: \"bus fault\"");
    }

    #[test]
    fn test_display_names_field() {
        let status: ReadStatus<()> = ReadStatus::BitReadTimeout(Field::Temperature);
        assert_eq!(status.to_string(), "timed out reading temperature bits");
        assert!(!status.is_ok());
        assert!(ReadStatus::<()>::Ok.is_ok());
    }
}

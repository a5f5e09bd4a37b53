//! GPIO contract for the single data wire.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Direction of the data pin.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The host drives the line.
    Output,
    /// The line is released to the pull-up and the sensor.
    Input,
}

/// A pin that can be switched between driving and sampling the data line.
///
/// `embedded-hal` has no notion of pin direction, so HALs with a
/// reconfigurable GPIO implement this trait directly. Pins already set up as
/// open-drain can use [`OpenDrain`].
pub trait FlexPin: InputPin + OutputPin {
    /// Reconfigures the pin as input or output.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
}

impl<T: FlexPin + ?Sized> FlexPin for &mut T {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        T::set_direction(self, direction)
    }
}

/// Adapter for an open-drain pin that can both drive and sample the line.
///
/// Switching to [`Direction::Input`] releases the line by driving it high,
/// which leaves it to the external pull-up. Switching to
/// [`Direction::Output`] does nothing.
pub struct OpenDrain<P> {
    pin: P,
}

impl<P> OpenDrain<P> {
    /// Wraps an open-drain pin.
    pub fn new(pin: P) -> Self {
        OpenDrain { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPin + OutputPin> FlexPin for OpenDrain<P> {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Input => self.pin.set_high(),
            Direction::Output => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTx,
    };

    #[test]
    fn test_input_releases_line() {
        let mut pin = PinMock::new(&[PinTx::set(PinState::High)]);

        let mut open_drain = OpenDrain::new(pin.clone());
        open_drain.set_direction(Direction::Output).unwrap();
        open_drain.set_direction(Direction::Input).unwrap();

        pin.done();
    }

    fn release<P: FlexPin>(mut pin: P) -> Result<bool, P::Error> {
        pin.set_low()?;
        pin.set_direction(Direction::Input)?;
        pin.is_high()
    }

    #[test]
    fn test_borrowed_pin() {
        let mut pin = PinMock::new(&[
            PinTx::set(PinState::Low),
            PinTx::set(PinState::High),
            PinTx::get(PinState::High),
        ]);

        let mut open_drain = OpenDrain::new(pin.clone());
        assert!(release(&mut open_drain).unwrap());

        pin.done();
    }
}

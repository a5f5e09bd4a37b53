//! Edge timing on the data line.
//!
//! The line is sampled exactly once per microsecond, with a 1 µs busy-wait
//! between samples. Every pulse width in the protocol is measured in these
//! samples, and the `max_us` bound of each wait is the only timeout of a read.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, PinState},
};

/// Waits for the line to leave `level` and returns how long it stayed there.
///
/// # Returns
///
/// * `Ok(Some(us))` with the number of microseconds the line was still at `level`
/// * `Ok(None)` if the line was still at `level` after `max_us` microseconds
/// * `Err(E)` if sampling the pin failed
pub fn await_level_change_us<P, D>(
    pin: &mut P,
    delay: &mut D,
    level: PinState,
    max_us: u32,
) -> Result<Option<u32>, P::Error>
where
    P: InputPin,
    D: DelayNs,
{
    let mut elapsed = 0;
    loop {
        if read_level(pin)? != level {
            return Ok(Some(elapsed));
        }
        if elapsed >= max_us {
            return Ok(None);
        }
        delay.delay_us(1);
        elapsed += 1;
    }
}

/// Waits for the line to leave `level` and checks the pulse was at least
/// `min_us` long.
///
/// Returns `Ok(false)` if the pulse was too short or outlasted `max_us`.
pub fn await_level_change<P, D>(
    pin: &mut P,
    delay: &mut D,
    level: PinState,
    min_us: u32,
    max_us: u32,
) -> Result<bool, P::Error>
where
    P: InputPin,
    D: DelayNs,
{
    let elapsed = await_level_change_us(pin, delay, level, max_us)?;
    Ok(matches!(elapsed, Some(us) if us >= min_us))
}

fn read_level<P: InputPin>(pin: &mut P) -> Result<PinState, P::Error> {
    Ok(PinState::from(pin.is_high()?))
}

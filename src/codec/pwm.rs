//! Pulse-width modulation of bit strings.

use super::CodecError;
use super::symbol::is_partial;
use crate::Time;
use crate::signal::{EdgeWriter, Signal};

/// Up to 64 bits, least significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bits {
    /// Number of valid bits
    pub count: usize,
    /// Bit `i` of the string is bit `i` of this word
    pub value: u64,
}

impl Bits {
    pub fn new(count: usize, value: u64) -> Self {
        Self { count, value }
    }

    /// Bit `index`, counting from the least significant.
    pub fn bit(&self, index: usize) -> bool {
        index < 64 && (self.value >> index) & 1 == 1
    }

    fn push(&mut self, bit: bool) -> Result<(), CodecError> {
        if self.count == 64 {
            return Err(CodecError::TooManyBits(self.count + 1));
        }
        if bit {
            self.value |= 1 << self.count;
        }
        self.count += 1;
        Ok(())
    }
}

impl From<(usize, u64)> for Bits {
    fn from((count, value): (usize, u64)) -> Self {
        Self { count, value }
    }
}

/// Pulse widths and slot length of a PWM line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmConfig<T: Time> {
    /// Pulse width of a 0 bit
    pub elapse_0: T,
    /// Pulse width of a 1 bit
    pub elapse_1: T,
    /// Length of one bit slot
    pub period: T,
    /// Level of the pulses; the line idles at the opposite level
    pub active: bool,
}

impl<T: Time> PwmConfig<T> {
    /// Creates a configuration with active-high pulses.
    pub fn new(elapse_0: T, elapse_1: T, period: T) -> Self {
        Self {
            elapse_0,
            elapse_1,
            period,
            active: true,
        }
    }

    /// Sets the pulse level.
    pub fn active(mut self, level: bool) -> Self {
        self.active = level;
        self
    }

    /// Checks that both widths are distinct and fit strictly inside a slot.
    pub fn validate(&self) -> Result<(), CodecError> {
        for (name, width) in [("elapse_0", self.elapse_0), ("elapse_1", self.elapse_1)] {
            if !(width > T::ZERO && width < self.period) {
                return Err(CodecError::InvalidConfig(format!(
                    "{name} = {width} must lie strictly between 0 and the period {}",
                    self.period
                )));
            }
        }
        if self.elapse_0 == self.elapse_1 {
            return Err(CodecError::InvalidConfig(
                "elapse_0 and elapse_1 must differ".into(),
            ));
        }
        Ok(())
    }

    fn width(&self, bit: bool) -> T {
        if bit { self.elapse_1 } else { self.elapse_0 }
    }
}

/// How [`pwm2bin`] classifies pulses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PwmDecode {
    /// Measure each complete pulse and compare its width with the midpoint
    /// of the two nominal widths. Slot timing is ignored.
    Pulses,
    /// Cut the line into slots of one period and match each against the
    /// two ideal slot shapes. A slot whose two normalized scores differ by
    /// less than `threshold` is flagged in the error word.
    Slots { threshold: f64 },
}

/// Result of [`pwm2bin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmDecoded {
    pub bits: Bits,
    /// Bit `i` is set when bit `i` of `bits` was ambiguous
    pub error: u64,
}

/// Encodes `bits` as one pulse per slot, starting at `origin`.
///
/// Each slot opens with a pulse at the active level, `elapse_1` long for a
/// 1 bit and `elapse_0` long for a 0 bit, and idles for the rest of the
/// period. An empty bit string gives the void signal.
///
/// # Errors
///
/// * [`CodecError::TooManyBits`] for more than 64 bits
/// * [`CodecError::InvalidConfig`] if the widths do not fit in a slot
///
/// # Examples
///
/// ```
/// use edgewise::{bin2pwm, Bits, PwmConfig};
///
/// let line = bin2pwm(Bits::new(2, 0b10), &PwmConfig::new(1, 2, 3), 0).unwrap();
/// assert_eq!(line.edges(), &[1, 3, 5]);
/// ```
pub fn bin2pwm<T: Time>(
    bits: impl Into<Bits>,
    config: &PwmConfig<T>,
    origin: T,
) -> Result<Signal<T>, CodecError> {
    let bits = bits.into();
    if bits.count > 64 {
        return Err(CodecError::TooManyBits(bits.count));
    }
    config.validate()?;
    if bits.count == 0 {
        return Ok(Signal::Void);
    }

    let slot = |k: usize| origin + config.period * T::from_f64(k as f64);
    let mut writer = EdgeWriter::new(config.active);
    for k in 0..bits.count {
        let from = slot(k);
        writer.set(from, config.active);
        writer.set(from + config.width(bits.bit(k)), !config.active);
    }
    let end = slot(bits.count);
    Ok(Signal::Present(writer.finish(origin, end, 1.0)))
}

/// Decodes a PWM line back into bits.
///
/// # Errors
///
/// * [`CodecError::TooManyBits`] when the line holds more than 64 bits
/// * [`CodecError::InvalidConfig`] if the widths do not fit in a slot
pub fn pwm2bin<T: Time>(
    signal: &Signal<T>,
    config: &PwmConfig<T>,
    mode: PwmDecode,
) -> Result<PwmDecoded, CodecError> {
    config.validate()?;
    match mode {
        PwmDecode::Pulses => decode_pulses(signal, config),
        PwmDecode::Slots { threshold } => decode_slots(signal, config, threshold),
    }
}

fn decode_pulses<T: Time>(
    signal: &Signal<T>,
    config: &PwmConfig<T>,
) -> Result<PwmDecoded, CodecError> {
    let mut decoded = PwmDecoded::default();
    let Some(w) = signal.waveform() else {
        return Ok(decoded);
    };

    let midpoint = (config.elapse_0.to_f64() + config.elapse_1.to_f64()) / 2.0;
    let one_is_longer = config.elapse_1 > config.elapse_0;
    let mut rise = (w.slevel() == config.active).then_some(w.start());
    let mut level = w.slevel();
    for &edge in w.edges() {
        level = !level;
        if level == config.active {
            rise = Some(edge);
        } else if let Some(from) = rise.take() {
            if edge > from {
                let width = (edge - from).to_f64();
                decoded.bits.push((width > midpoint) == one_is_longer)?;
            }
        }
    }
    Ok(decoded)
}

fn decode_slots<T: Time>(
    signal: &Signal<T>,
    config: &PwmConfig<T>,
    threshold: f64,
) -> Result<PwmDecoded, CodecError> {
    let mut decoded = PwmDecoded::default();
    let Some(start) = signal.start() else {
        return Ok(decoded);
    };
    let models = [
        bin2pwm(Bits::new(1, 0), config, T::ZERO)?,
        bin2pwm(Bits::new(1, 1), config, T::ZERO)?,
    ];

    for window in signal.chop(config.period, start, None)? {
        let (Some(from), Some(elapse)) = (window.start(), window.elapse()) else {
            continue;
        };
        if is_partial(elapse, config.period) {
            continue;
        }
        let [zero, one] = [&models[0], &models[1]].map(|model| {
            window
                .agreement(&model.shifted(from), None, true)
                .unwrap_or(-1.0)
        });
        let index = decoded.bits.count;
        decoded.bits.push(one > zero)?;
        if (one - zero).abs() < threshold {
            decoded.error |= 1 << index;
        }
    }
    Ok(decoded)
}

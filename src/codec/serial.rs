//! Asynchronous serial line (UART) transmitter and receiver.
//!
//! The simulated line follows RS-232 polarity: it idles low (mark), a
//! character opens with a high start bit (space), data bits are sent least
//! significant first with a 1 bit low, and the frame closes with mark stop
//! bits. A receiver therefore looks for rising edges.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use log::{debug, trace};

use super::CodecError;
use crate::Time;
use crate::signal::{EdgeWriter, Signal};

/// Line level of a 1 bit, of the stop bits and of the idle line.
const MARK: bool = false;
/// Line level of a 0 bit and of the start bit.
const SPACE: bool = true;

/// Parity bit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    /// No parity bit
    #[default]
    Off,
    /// Parity bit makes the count of 1 bits even
    Even,
    /// Parity bit makes the count of 1 bits odd
    Odd,
    /// Parity bit is always 1
    Mark,
    /// Parity bit is always 0
    Space,
}

impl Parity {
    /// The parity bit for `value`, or `None` when parity is off.
    fn bit(self, value: u16) -> Option<bool> {
        let odd_ones = value.count_ones() % 2 == 1;
        match self {
            Parity::Off => None,
            Parity::Even => Some(odd_ones),
            Parity::Odd => Some(!odd_ones),
            Parity::Mark => Some(true),
            Parity::Space => Some(false),
        }
    }
}

impl FromStr for Parity {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" | "n" => Ok(Parity::Off),
            "even" | "e" => Ok(Parity::Even),
            "odd" | "o" => Ok(Parity::Odd),
            "mark" | "m" => Ok(Parity::Mark),
            "space" | "s" => Ok(Parity::Space),
            _ => Err(CodecError::UnknownParity(s.to_string())),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parity::Off => "off",
            Parity::Even => "even",
            Parity::Odd => "odd",
            Parity::Mark => "mark",
            Parity::Space => "space",
        };
        write!(f, "{name}")
    }
}

/// Framing and timing of a serial line.
///
/// # Examples
///
/// ```
/// use edgewise::{Parity, SerialConfig};
///
/// // 7-E-2 at 300 baud, times in milliseconds
/// let config = SerialConfig::new(300.0)
///     .char_bits(7)
///     .parity(Parity::Even)
///     .stop_bits(2)
///     .tscale(1000.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.frame_bits(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerialConfig {
    /// Data bits per character, 1 to 16
    pub char_bits: u8,
    pub parity: Parity,
    /// Stop bits per character, at least 1
    pub stop_bits: u8,
    /// Bits per second
    pub baud: f64,
    /// Signal time units per second
    pub tscale: f64,
}

impl Default for SerialConfig {
    /// 8-N-1 at 9600 baud, times in seconds.
    fn default() -> Self {
        Self {
            char_bits: 8,
            parity: Parity::Off,
            stop_bits: 1,
            baud: 9600.0,
            tscale: 1.0,
        }
    }
}

impl SerialConfig {
    /// Creates an 8-N-1 configuration at `baud`.
    pub fn new(baud: f64) -> Self {
        Self {
            baud,
            ..Self::default()
        }
    }

    pub fn char_bits(mut self, char_bits: u8) -> Self {
        self.char_bits = char_bits;
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn stop_bits(mut self, stop_bits: u8) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn tscale(mut self, tscale: f64) -> Self {
        self.tscale = tscale;
        self
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if !(1..=16).contains(&self.char_bits) {
            return Err(CodecError::InvalidConfig(format!(
                "char_bits must be between 1 and 16, got {}",
                self.char_bits
            )));
        }
        if self.stop_bits == 0 {
            return Err(CodecError::InvalidConfig(
                "at least one stop bit is required".into(),
            ));
        }
        if !(self.baud.is_finite() && self.baud > 0.0) {
            return Err(CodecError::InvalidConfig(format!(
                "baud must be positive, got {}",
                self.baud
            )));
        }
        if !(self.tscale.is_finite() && self.tscale > 0.0) {
            return Err(CodecError::InvalidConfig(format!(
                "tscale must be positive, got {}",
                self.tscale
            )));
        }
        Ok(())
    }

    /// Duration of one bit in signal time units.
    pub fn bit_time(&self) -> f64 {
        self.tscale / self.baud
    }

    /// Bits in one character frame, start and stop bits included.
    pub fn frame_bits(&self) -> usize {
        let parity = usize::from(self.parity != Parity::Off);
        1 + usize::from(self.char_bits) + parity + usize::from(self.stop_bits)
    }

    /// Line levels of the frame carrying the low `char_bits` of `value`.
    fn frame(&self, value: u16) -> Vec<bool> {
        let value = value & (u16::MAX >> (16 - self.char_bits));
        let mut levels = Vec::with_capacity(self.frame_bits());
        levels.push(SPACE);
        let bit = |k: u8| (value >> k) & 1 == 1;
        levels.extend((0..self.char_bits).map(|k| line_level(bit(k))));
        levels.extend(self.parity.bit(value).map(line_level));
        levels.extend(std::iter::repeat_n(MARK, usize::from(self.stop_bits)));
        levels
    }
}

fn line_level(bit: bool) -> bool {
    if bit { MARK } else { SPACE }
}

/// Per-character receiver status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct RxStatus(u8);

impl RxStatus {
    /// Parity bit did not match the data bits
    pub const PARITY_ERROR: Self = Self(0x01);
    /// A stop bit was not at the mark level
    pub const STOP_ERROR: Self = Self(0x02);
    /// The signal ended while sampling the start bit
    pub const EOS_START: Self = Self(0x10);
    /// The signal ended while sampling data bits
    pub const EOS_CHAR: Self = Self(0x20);
    /// The signal ended before the parity bit
    pub const EOS_PARITY: Self = Self(0x40);
    /// The signal ended while sampling stop bits
    pub const EOS_STOP: Self = Self(0x80);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    pub fn insert(&mut self, flags: Self) {
        self.0 |= flags.0;
    }

    /// True when the signal ended before the character was complete.
    pub fn is_truncated(self) -> bool {
        self.0 & 0xF0 != 0
    }
}

impl BitOr for RxStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One character recovered by [`serial_rx`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RxChar<T: Time> {
    pub value: u16,
    /// Time of the start bit's rising edge
    pub time: T,
    pub status: RxStatus,
}

/// Simulates a transmitter sending `chars`, each no earlier than its entry
/// in `times`.
///
/// The line starts at the first send time. A character due while the
/// previous frame is still on the line waits until that frame ends. Frame
/// boundaries on an integer time axis are rounded to the nearest tick.
///
/// # Errors
///
/// * [`CodecError::LengthMismatch`] if `chars` and `times` differ in length
/// * [`CodecError::InvalidConfig`] for an invalid configuration, or when a
///   bit is shorter than one step of the time type
///
/// # Examples
///
/// ```
/// use edgewise::{serial_rx, serial_tx, SerialConfig};
///
/// let config = SerialConfig::new(1.0);
/// let line = serial_tx(&[u16::from(b'A')], &[0], &config).unwrap();
/// let received = serial_rx(&line, &config).unwrap();
/// assert_eq!(received[0].value, u16::from(b'A'));
/// assert_eq!(received[0].time, 0);
/// assert!(received[0].status.is_ok());
/// ```
pub fn serial_tx<T: Time>(
    chars: &[u16],
    times: &[T],
    config: &SerialConfig,
) -> Result<Signal<T>, CodecError> {
    config.validate()?;
    check_resolution::<T>(config)?;
    if chars.len() != times.len() {
        return Err(CodecError::LengthMismatch {
            chars: chars.len(),
            times: times.len(),
        });
    }
    let Some(&start) = times.first() else {
        return Ok(Signal::Void);
    };

    let bit_time = config.bit_time();
    let frame_time = config.frame_bits() as f64 * bit_time;
    let mut writer = EdgeWriter::new(MARK);
    let mut free_at = start.to_f64();
    for (&value, &due) in chars.iter().zip(times) {
        let mut at = due.to_f64();
        if at < free_at {
            debug!("serial_tx: {value:#x} due at {due} delayed to {free_at}");
            at = free_at;
        }
        for (k, level) in config.frame(value).into_iter().enumerate() {
            writer.set(T::from_f64(at + k as f64 * bit_time), level);
        }
        free_at = at + frame_time;
    }
    Ok(Signal::Present(writer.finish(
        start,
        T::from_f64(free_at),
        config.tscale,
    )))
}

/// Rejects bit times shorter than one step of the time type.
///
/// On an integer axis a bit must span at least one tick, or rounding would
/// merge neighbouring bits and could collapse a frame to an empty domain.
fn check_resolution<T: Time>(config: &SerialConfig) -> Result<(), CodecError> {
    let bit_time = config.bit_time();
    if T::floor_from_f64(bit_time) > T::ZERO {
        return Ok(());
    }
    Err(CodecError::InvalidConfig(format!(
        "bit time {bit_time} at {} baud is below the time resolution",
        config.baud
    )))
}

/// Simulates a receiver sampling `line` at the center of every bit.
///
/// Each rising edge is a start bit candidate; a candidate whose start bit
/// does not hold the space level at its center is dropped and the scan
/// resumes. Parity and stop bits are checked and reported through
/// [`RxStatus`]. If the line ends inside a frame, the missing data bits
/// read as 1, the stage that ran out is flagged, the character is
/// reported, and reception stops.
///
/// # Errors
///
/// [`CodecError::InvalidConfig`] for an invalid configuration, or when a
/// bit is shorter than one step of the time type.
pub fn serial_rx<T: Time>(
    line: &Signal<T>,
    config: &SerialConfig,
) -> Result<Vec<RxChar<T>>, CodecError> {
    config.validate()?;
    check_resolution::<T>(config)?;
    let Some(w) = line.waveform() else {
        return Ok(Vec::new());
    };

    let bit_time = config.bit_time();
    let edges = w.edges();
    let mut received = Vec::new();
    let mut hint = 0;
    let mut candidate = 0;
    let mut resume = w.start();

    while let Some(index) =
        (candidate..edges.len()).find(|&i| edges[i] >= resume && w.level_after(i) == SPACE)
    {
        candidate = index + 1;
        let time = edges[index];
        let origin = time.to_f64();
        let mut sample = |bit: usize| {
            let at = T::floor_from_f64(origin + (bit as f64 + 0.5) * bit_time);
            let (level, next) = w.level(at.later(time), hint);
            hint = next;
            (level, at)
        };

        let mut status = RxStatus::empty();
        let mut value: u16 = 0;
        let mut ended = false;

        match sample(0).0 {
            None => {
                status.insert(RxStatus::EOS_START);
                ended = true;
            }
            Some(level) if level != SPACE => {
                trace!("serial_rx: glitch at {time}, start bit not held");
                resume = time;
                continue;
            }
            Some(_) => {}
        }

        for k in 0..usize::from(config.char_bits) {
            let bit = if ended { None } else { sample(1 + k).0 };
            match bit {
                Some(level) => value |= u16::from(level == MARK) << k,
                None => {
                    if !ended {
                        status.insert(RxStatus::EOS_CHAR);
                        ended = true;
                    }
                    value |= 1 << k;
                }
            }
        }

        let mut next_bit = 1 + usize::from(config.char_bits);
        if config.parity != Parity::Off {
            if !ended {
                match sample(next_bit).0 {
                    None => {
                        status.insert(RxStatus::EOS_PARITY);
                        ended = true;
                    }
                    Some(level) => {
                        if config.parity.bit(value) != Some(level == MARK) {
                            status.insert(RxStatus::PARITY_ERROR);
                        }
                    }
                }
            }
            next_bit += 1;
        }

        let mut last_sample = resume;
        for _ in 0..config.stop_bits {
            if ended {
                break;
            }
            match sample(next_bit) {
                (None, _) => {
                    status.insert(RxStatus::EOS_STOP);
                    ended = true;
                }
                (Some(level), at) => {
                    if level != MARK {
                        status.insert(RxStatus::STOP_ERROR);
                    }
                    last_sample = at;
                }
            }
            next_bit += 1;
        }

        if status.is_ok() {
            trace!("serial_rx: received {value:#x} at {time}");
        } else {
            let flags = status.bits();
            debug!("serial_rx: {value:#x} at {time}, status {flags:#04x}");
        }
        received.push(RxChar {
            value,
            time,
            status,
        });
        if ended {
            break;
        }
        resume = last_sample;
    }
    Ok(received)
}

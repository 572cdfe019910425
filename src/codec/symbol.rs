//! Symbol modulation by concatenating waveform templates, and matched
//! filter demodulation.

use log::debug;

use super::CodecError;
use crate::Time;
use crate::signal::Signal;

/// Concatenates the templates selected by `codes`, starting at `origin`.
///
/// Each template is moved so that it starts where the previous one ended
/// and then joined on, so consecutive templates must agree on the level at
/// their boundary.
///
/// # Errors
///
/// * [`CodecError::UnknownSymbol`] for a code with no template
/// * [`CodecError::VoidSymbol`] for a void template
/// * [`CodecError::Signal`] when two templates cannot be joined
///
/// # Examples
///
/// ```
/// use edgewise::{code2mod, Signal};
///
/// let zero = Signal::new(0, vec![1, 3], 4, false).unwrap();
/// let one = Signal::new(0, vec![2, 3], 4, false).unwrap();
/// let line = code2mod(&[1, 0], &[zero, one], 10).unwrap();
/// assert_eq!(line.edges(), &[12, 13, 15, 17]);
/// ```
pub fn code2mod<T: Time>(
    codes: &[usize],
    symbols: &[Signal<T>],
    origin: T,
) -> Result<Signal<T>, CodecError> {
    let mut line = Signal::Void;
    let mut at = origin;
    for &code in codes {
        let symbol = symbols.get(code).ok_or(CodecError::UnknownSymbol {
            code,
            count: symbols.len(),
        })?;
        let (Some(start), Some(elapse)) = (symbol.start(), symbol.elapse()) else {
            return Err(CodecError::VoidSymbol(code));
        };
        line.append(symbol.shifted(at - start))?;
        at = at + elapse;
    }
    Ok(line)
}

/// Decodes a signal into symbol codes.
///
/// The signal is cut into windows of one symbol period starting from
/// `origin`; windows shorter than a period are dropped. Without `origin`
/// the windows start at the signal start, not at the templates' own phase:
/// templates are compared by shape only, so where they sit in time does
/// not matter. Each window is compared with every template and decoded as
/// the one with the highest normalized agreement; the lowest code wins a
/// tie. The optional `mask` covers one period and is aligned with each
/// window.
///
/// # Errors
///
/// * [`CodecError::EmptySymbolSet`] when `symbols` is empty
/// * [`CodecError::VoidSymbol`] for a void template
/// * [`CodecError::SymbolPeriodMismatch`] if templates differ in length
pub fn mod2code<T: Time>(
    signal: &Signal<T>,
    symbols: &[Signal<T>],
    mask: Option<&Signal<T>>,
    origin: Option<T>,
) -> Result<Vec<usize>, CodecError> {
    let period = common_period(symbols)?;
    let Some(start) = signal.start() else {
        return Ok(Vec::new());
    };

    let mut codes = Vec::new();
    for window in signal.chop(period, origin.unwrap_or(start), None)? {
        let (Some(from), Some(elapse)) = (window.start(), window.elapse()) else {
            continue;
        };
        if is_partial(elapse, period) {
            continue;
        }
        let aligned_mask = mask.map(|m| m.shifted(from - m.start().unwrap_or(from)));

        let mut best: Option<(usize, f64)> = None;
        for (code, symbol) in symbols.iter().enumerate() {
            let template = symbol.shifted(from - symbol.start().unwrap_or(from));
            let Some(score) = window.agreement(&template, aligned_mask.as_ref(), true) else {
                continue;
            };
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((code, score));
            }
        }
        if let Some((code, score)) = best {
            debug!("mod2code: window {from} is code {code} (score {score:.3})");
            codes.push(code);
        }
    }
    Ok(codes)
}

/// The length shared by all templates.
fn common_period<T: Time>(symbols: &[Signal<T>]) -> Result<T, CodecError> {
    let first = symbols.first().ok_or(CodecError::EmptySymbolSet)?;
    let period = first.elapse().ok_or(CodecError::VoidSymbol(0))?;
    for (index, symbol) in symbols.iter().enumerate().skip(1) {
        let elapse = symbol.elapse().ok_or(CodecError::VoidSymbol(index))?;
        if elapse != period {
            return Err(CodecError::SymbolPeriodMismatch {
                index,
                elapse: elapse.to_f64(),
                period: period.to_f64(),
            });
        }
    }
    Ok(period)
}

/// Whether a chopped window is shorter than a full period.
///
/// Real-valued cut points may land an ulp short of a full period; those
/// windows still count as full.
pub(crate) fn is_partial<T: Time>(elapse: T, period: T) -> bool {
    let period = period.to_f64();
    elapse.to_f64() < period - period * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<Signal<i64>> {
        vec![
            Signal::new(0, vec![1, 3], 4, false).unwrap(),
            Signal::new(0, vec![2, 3], 4, false).unwrap(),
            Signal::new(0, vec![1, 2], 4, false).unwrap(),
        ]
    }

    #[test]
    fn test_code2mod() {
        let line = code2mod(&[0, 2, 1], &symbols(), 0).unwrap();
        assert_eq!(
            line,
            Signal::new(0, vec![1, 3, 5, 6, 10, 11], 12, false).unwrap()
        );
    }

    #[test]
    fn test_code2mod_errors() {
        assert_eq!(
            code2mod(&[0, 3], &symbols(), 0),
            Err(CodecError::UnknownSymbol { code: 3, count: 3 })
        );
        let mismatched = vec![
            Signal::new(0, vec![1], 4, false).unwrap(),
            Signal::new(0, vec![], 4, false).unwrap(),
        ];
        assert!(matches!(
            code2mod(&[0, 1], &mismatched, 0),
            Err(CodecError::Signal(_))
        ));
        assert_eq!(
            code2mod(&[0], &[Signal::<i64>::Void], 0),
            Err(CodecError::VoidSymbol(0))
        );
        assert_eq!(code2mod(&[], &symbols(), 0), Ok(Signal::Void));
    }

    #[test]
    fn test_mod2code_round_trip() {
        let codes = vec![2, 0, 0, 1, 2, 1, 0];
        let line = code2mod(&codes, &symbols(), 5).unwrap();
        assert_eq!(mod2code(&line, &symbols(), None, None).unwrap(), codes);
    }

    #[test]
    fn test_mod2code_drops_partial_window() {
        let codes = vec![1, 2];
        let line = code2mod(&codes, &symbols(), 0).unwrap();
        let truncated = line.older(7);
        assert_eq!(
            mod2code(&truncated, &symbols(), None, None).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn test_mod2code_with_offset_origin() {
        let codes = vec![0, 1, 2];
        let line = code2mod(&codes, &symbols(), 0).unwrap();
        let lead = Signal::new(-2, vec![], 0, false).unwrap();
        let padded = lead.join(&line).unwrap();
        assert_eq!(mod2code(&padded, &symbols(), None, Some(0)).unwrap(), codes);
    }

    #[test]
    fn test_mod2code_windows_follow_signal_start() {
        let late: Vec<Signal<i64>> = symbols().iter().map(|s| s.shifted(3)).collect();
        let codes = vec![1, 0, 2];
        let line = code2mod(&codes, &late, 0).unwrap();
        assert_eq!(line.start(), Some(0));
        assert_eq!(mod2code(&line, &late, None, None).unwrap(), codes);
    }

    #[test]
    fn test_mod2code_mask() {
        // symbols 0 and 2 differ only on [2,3); masking it out makes them tie
        let mask = Signal::new(0, vec![2, 3], 4, true).unwrap();
        let line = code2mod(&[2, 1], &symbols(), 0).unwrap();
        assert_eq!(
            mod2code(&line, &symbols(), Some(&mask), None).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_mod2code_errors() {
        let line = code2mod(&[0], &symbols(), 0).unwrap();
        assert_eq!(
            mod2code(&line, &[], None, None),
            Err(CodecError::EmptySymbolSet)
        );
        let uneven = vec![
            Signal::new(0, vec![], 4, false).unwrap(),
            Signal::new(0, vec![], 5, false).unwrap(),
        ];
        assert!(matches!(
            mod2code(&line, &uneven, None, None),
            Err(CodecError::SymbolPeriodMismatch { index: 1, .. })
        ));
        assert!(mod2code(&Signal::Void, &symbols(), None, None)
            .unwrap()
            .is_empty());
    }
}

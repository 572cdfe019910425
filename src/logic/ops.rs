//! Boolean operators on signals.
//!
//! All binary operators work on the common domain of their operands and
//! walk both edge lists once, so their cost is linear in the total edge
//! count.

use std::ops::{BitAnd, BitOr, BitXor, Not};

use super::intersect::Intersection;
use crate::Time;
use crate::signal::{Signal, Waveform, odd};

/// Two-input combinators understood by [`binary_op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BinaryOp::And => a && b,
            BinaryOp::Or => a || b,
            BinaryOp::Xor => a ^ b,
        }
    }

    /// Whether the output still follows the other input once one input is
    /// held at `fixed`.
    fn passes(self, fixed: bool) -> bool {
        self.apply(fixed, false) != self.apply(fixed, true)
    }
}

/// Combines two signals with `op` over their common domain.
///
/// Returns the void signal when the domains do not overlap. The result
/// takes its time scale from `a`. An operand edge sitting exactly on the
/// common end still sets the result's level at `end`.
pub fn binary_op<T: Time>(a: &Signal<T>, b: &Signal<T>, op: BinaryOp) -> Signal<T> {
    let (Signal::Present(wa), Signal::Present(wb)) = (a, b) else {
        return Signal::Void;
    };
    let Some(x) = Intersection::of(wa, wb) else {
        return Signal::Void;
    };
    let (ea, eb) = (x.a.edges(wa), x.b.edges(wb));
    let slevel = op.apply(x.a.level, x.b.level);
    let end_level = op.apply(level_through(wa, x.end), level_through(wb, x.end));
    let finish = |mut edges: Vec<T>| {
        close_at(&mut edges, slevel, x.end, end_level);
        let waveform = Waveform::from_parts(x.start, edges, x.end, slevel, wa.tscale);
        Signal::Present(waveform)
    };

    if ea.is_empty() && eb.is_empty() {
        return finish(Vec::new());
    }
    if ea.is_empty() {
        let passed: &[T] = if op.passes(x.a.level) { eb } else { &[] };
        return finish(passed.to_vec());
    }
    if eb.is_empty() {
        let passed: &[T] = if op.passes(x.b.level) { ea } else { &[] };
        return finish(passed.to_vec());
    }

    let mut edges = Vec::with_capacity(ea.len() + eb.len());
    let (mut in_a, mut in_b, mut out) = (x.a.level, x.b.level, slevel);
    let (mut i, mut j) = (0, 0);
    while i < ea.len() && j < eb.len() {
        let time = if ea[i] < eb[j] {
            in_a = !in_a;
            i += 1;
            ea[i - 1]
        } else if eb[j] < ea[i] {
            in_b = !in_b;
            j += 1;
            eb[j - 1]
        } else {
            in_a = !in_a;
            in_b = !in_b;
            i += 1;
            j += 1;
            ea[i - 1]
        };
        let next = op.apply(in_a, in_b);
        if next != out {
            edges.push(time);
            out = next;
        }
    }

    // Once one list is exhausted its input is fixed: the other list's
    // edges either all toggle the output or none do.
    if i < ea.len() && op.passes(in_b) {
        edges.extend_from_slice(&ea[i..]);
    }
    if j < eb.len() && op.passes(in_a) {
        edges.extend_from_slice(&eb[j..]);
    }
    finish(edges)
}

/// XOR of two signals by merging both edge lists.
///
/// Every edge of either operand toggles the XOR output, except when both
/// operands toggle at the same instant.
pub fn xor<T: Time>(a: &Signal<T>, b: &Signal<T>) -> Signal<T> {
    let (Signal::Present(wa), Signal::Present(wb)) = (a, b) else {
        return Signal::Void;
    };
    let Some(x) = Intersection::of(wa, wb) else {
        return Signal::Void;
    };
    let (ea, eb) = (x.a.edges(wa), x.b.edges(wb));

    let mut edges = Vec::with_capacity(ea.len() + eb.len());
    let (mut i, mut j) = (0, 0);
    while i < ea.len() && j < eb.len() {
        if ea[i] < eb[j] {
            edges.push(ea[i]);
            i += 1;
        } else if eb[j] < ea[i] {
            edges.push(eb[j]);
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    edges.extend_from_slice(&ea[i..]);
    edges.extend_from_slice(&eb[j..]);

    let slevel = x.a.level ^ x.b.level;
    let end_level = level_through(wa, x.end) ^ level_through(wb, x.end);
    close_at(&mut edges, slevel, x.end, end_level);
    let waveform = Waveform::from_parts(x.start, edges, x.end, slevel, wa.tscale);
    Signal::Present(waveform)
}

/// Level of `w` once every edge at or before `time` has taken effect.
fn level_through<T: Time>(w: &Waveform<T>, time: T) -> bool {
    w.slevel() ^ odd(w.edges().partition_point(|&e| e <= time))
}

/// Adds a toggle at `end` if the swept edges stop short of `end_level`.
fn close_at<T: Time>(edges: &mut Vec<T>, slevel: bool, end: T, end_level: bool) {
    if (slevel ^ odd(edges.len())) != end_level {
        edges.push(end);
    }
}

impl<T: Time> Signal<T> {
    /// Boolean AND over the common domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgewise::Signal;
    ///
    /// let a = Signal::new(0, vec![2, 5], 10, false).unwrap();
    /// let b = Signal::new(0, vec![3, 4], 10, false).unwrap();
    /// assert_eq!(a.and(&b), Signal::new(0, vec![3, 4], 10, false).unwrap());
    /// ```
    pub fn and(&self, other: &Signal<T>) -> Signal<T> {
        binary_op(self, other, BinaryOp::And)
    }

    /// Boolean OR over the common domain.
    pub fn or(&self, other: &Signal<T>) -> Signal<T> {
        binary_op(self, other, BinaryOp::Or)
    }

    /// Boolean XOR over the common domain.
    pub fn xor(&self, other: &Signal<T>) -> Signal<T> {
        xor(self, other)
    }

    /// Inverts the signal in place.
    pub fn invert(&mut self) {
        if let Signal::Present(w) = self {
            w.slevel = !w.slevel;
        }
    }

    /// Returns the inverted signal.
    pub fn inverted(&self) -> Signal<T> {
        let mut inverted = self.clone();
        inverted.invert();
        inverted
    }
}

impl<T: Time> Not for Signal<T> {
    type Output = Signal<T>;

    fn not(mut self) -> Signal<T> {
        self.invert();
        self
    }
}

impl<T: Time> Not for &Signal<T> {
    type Output = Signal<T>;

    fn not(self) -> Signal<T> {
        self.inverted()
    }
}

impl<T: Time> BitAnd for &Signal<T> {
    type Output = Signal<T>;

    fn bitand(self, rhs: Self) -> Signal<T> {
        self.and(rhs)
    }
}

impl<T: Time> BitOr for &Signal<T> {
    type Output = Signal<T>;

    fn bitor(self, rhs: Self) -> Signal<T> {
        self.or(rhs)
    }
}

impl<T: Time> BitXor for &Signal<T> {
    type Output = Signal<T>;

    fn bitxor(self, rhs: Self) -> Signal<T> {
        self.xor(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(start: i64, edges: &[i64], end: i64, slevel: bool) -> Signal<i64> {
        Signal::new(start, edges.to_vec(), end, slevel).unwrap()
    }

    #[test]
    fn test_and_pulses() {
        let a = sig(0, &[2, 5], 10, false);
        let b = sig(0, &[3, 4], 10, false);
        assert_eq!(&a & &b, sig(0, &[3, 4], 10, false));
    }

    #[test]
    fn test_or_pulses() {
        let a = sig(0, &[2, 5], 10, false);
        let b = sig(0, &[4, 7], 10, false);
        assert_eq!(&a | &b, sig(0, &[2, 7], 10, false));
    }

    #[test]
    fn test_simultaneous_edges_emitted_once() {
        let a = sig(0, &[2, 6], 10, false);
        let b = sig(0, &[2, 4], 10, false);
        assert_eq!(a.and(&b), sig(0, &[2, 4], 10, false));
        assert_eq!(a.or(&b), sig(0, &[2, 6], 10, false));
    }

    #[test]
    fn test_restricted_to_common_domain() {
        let a = sig(0, &[2, 5], 10, false);
        let b = sig(3, &[], 8, true);
        assert_eq!(a.and(&b), sig(3, &[5], 8, true));
        assert_eq!(a.or(&b), sig(3, &[], 8, true));
    }

    #[test]
    fn test_constant_operand_blocks() {
        let a = sig(0, &[2, 5, 7], 10, false);
        let low = sig(0, &[], 10, false);
        let high = sig(0, &[], 10, true);
        assert_eq!(a.and(&low), sig(0, &[], 10, false));
        assert_eq!(a.or(&high), sig(0, &[], 10, true));
        assert_eq!(a.and(&high), a);
        assert_eq!(low.or(&a), a);
    }

    #[test]
    fn test_tail_after_exhaustion() {
        let a = sig(0, &[1, 2], 10, false);
        let b = sig(0, &[3, 4, 6, 8], 10, true);
        // b is 1 on [0,3) [4,6) [8,10]; a is 1 on [1,2)
        assert_eq!(a.or(&b), sig(0, &[3, 4, 6, 8], 10, true));
        assert_eq!(a.and(&b), sig(0, &[1, 2], 10, false));
    }

    #[test]
    fn test_xor() {
        let a = sig(0, &[2, 5], 10, false);
        let b = sig(0, &[3, 5, 7], 10, true);
        assert_eq!(a.xor(&b), sig(0, &[2, 3, 7], 10, true));
        assert_eq!(&a ^ &b, binary_op(&a, &b, BinaryOp::Xor));
    }

    #[test]
    fn test_xor_self_is_zero() {
        let a = sig(0, &[1, 4, 6], 10, true);
        assert_eq!(a.xor(&a), sig(0, &[], 10, false));
    }

    #[test]
    fn test_not() {
        let a = sig(0, &[2, 5], 10, false);
        let inverted = !&a;
        assert_eq!(inverted, sig(0, &[2, 5], 10, true));
        assert_eq!(!inverted, a);
        assert_eq!(!Signal::<i64>::Void, Signal::Void);
    }

    #[test]
    fn test_void_and_disjoint() {
        let a = sig(0, &[2], 5, false);
        let b = sig(5, &[6], 9, false);
        assert_eq!(a.and(&b), Signal::Void);
        assert_eq!(a.xor(&b), Signal::Void);
        assert_eq!(a.or(&Signal::Void), Signal::Void);
    }

    #[test]
    fn test_edge_on_common_end_sets_end_level() {
        let a = sig(0, &[2, 10], 10, false);
        assert_eq!(a.and(&a), a);
        assert_eq!(a.or(&a), a);
        assert_eq!(a.xor(&a), sig(0, &[], 10, false));

        let high = sig(0, &[], 12, true);
        let gated = a.and(&high);
        assert_eq!(gated, a);
        assert_eq!(gated.level(10, 0).0, Some(false));

        // b toggles at 10 inside its own domain, which ends later
        let b = sig(0, &[10], 12, true);
        let both = a.and(&b);
        assert_eq!(both, sig(0, &[2, 10], 10, false));
        assert_eq!(xor(&a, &b), binary_op(&a, &b, BinaryOp::Xor));
    }

    #[test]
    fn test_de_morgan() {
        let a = sig(0, &[1, 3, 4, 8], 12, false);
        let b = sig(2, &[3, 6, 9, 11], 14, true);
        assert_eq!(!(&a & &b), &!&a | &!&b);
        assert_eq!(!(&a | &b), &!&a & &!&b);
    }
}

//! Bounded variants of the classic C string primitives.
//!
//! All of these work on slices. Reading past the end of a source slice acts as if a zero byte was
//! found there, so the slice end is an implicit terminator and nothing is ever read out of
//! bounds. Destinations are checked up front and a too short one is reported as an error instead
//! of being written past.

use memchr::memchr;
use tracing::trace;

use crate::error::{Error, InvalidInput};

#[inline]
fn byte_at(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

fn check_destination(dest: &[u8], n: usize) -> Result<(), Error> {
    if dest.len() < n {
        trace!(needed = n, available = dest.len(), "destination too short");
        return Err(InvalidInput::DestinationTooShort {
            needed: n,
            available: dest.len(),
        }
        .into());
    }
    Ok(())
}

fn compare_with<W: Fn(u8) -> i32>(p: &[u8], q: &[u8], mut n: usize, widen: W) -> i32 {
    let mut i = 0;
    while n > 0 && byte_at(p, i) != 0 && byte_at(p, i) == byte_at(q, i) {
        n -= 1;
        i += 1;
    }
    if n == 0 {
        0
    } else {
        widen(byte_at(p, i)) - widen(byte_at(q, i))
    }
}

/// Compares at most `n` bytes of two NUL-terminated sequences, like `strncmp`.
///
/// The scan stops at the first differing byte or at the first zero byte of `p`. Returns 0 if the
/// sequences are equal within the bound, otherwise the difference of the first differing bytes
/// taken as unsigned values. Only the sign is meaningful for ordering.
///
/// # Examples
///
/// ```rust
/// # use pstr::bounded_compare;
/// assert_eq!(0, bounded_compare(b"abc\0", b"abc\0", 10));
/// assert_eq!(0, bounded_compare(b"abcd", b"abcx", 3));
/// assert!(bounded_compare(b"abc", b"abd", 3) < 0);
/// assert!(bounded_compare(b"b", b"a", 1) > 0);
/// ```
pub fn bounded_compare(p: &[u8], q: &[u8], n: usize) -> i32 {
    compare_with(p, q, n, i32::from)
}

/// The same as [bounded_compare], but bytes are taken as signed 8-bit values.
///
/// This reproduces the result of a `strncmp` built on signed `char`. Bytes above `0x7f` then sort
/// before the ASCII range.
///
/// ```rust
/// # use pstr::{bounded_compare, bounded_compare_signed};
/// assert!(bounded_compare(b"\x80", b"\x01", 1) > 0);
/// assert!(bounded_compare_signed(b"\x80", b"\x01", 1) < 0);
/// ```
pub fn bounded_compare_signed(p: &[u8], q: &[u8], n: usize) -> i32 {
    compare_with(p, q, n, |b| i32::from(b as i8))
}

/// Copies at most `n` bytes from `src` to `dest`, like `strncpy`.
///
/// Copying stops after a zero byte has been copied or `n` bytes have been transferred. If the
/// terminator comes first, the rest of `dest[..n]` is zero-filled. Bytes of `dest` past `n` are
/// never touched.
///
/// Note that the result is *not* terminated if `src` has no zero byte within its first `n` bytes.
/// Use [bounded_copy_terminating] when a terminator is required.
///
/// # Errors
///
/// [InvalidInput::DestinationTooShort] if `dest` is shorter than `n`.
///
/// # Examples
///
/// ```rust
/// # use pstr::bounded_copy;
/// let mut dest = [0xff; 6];
/// bounded_copy(&mut dest, b"ab\0", 5).unwrap();
/// assert_eq!(b"ab\0\0\0\xff", &dest);
///
/// // Truncated, no terminator.
/// let mut dest = [0xff; 3];
/// bounded_copy(&mut dest, b"abcdef\0", 3).unwrap();
/// assert_eq!(b"abc", &dest);
/// ```
pub fn bounded_copy<'d>(dest: &'d mut [u8], src: &[u8], n: usize) -> Result<&'d mut [u8], Error> {
    check_destination(dest, n)?;
    let mut i = 0;
    while i < n {
        let b = byte_at(src, i);
        dest[i] = b;
        i += 1;
        if b == 0 {
            break;
        }
    }
    dest[i..n].fill(0);
    Ok(dest)
}

/// Copies at most `n - 1` bytes from `src` to `dest` and always terminates the result.
///
/// Copying stops after a zero byte has been copied or when only one byte of the bound is left,
/// then a zero byte is written at the stop position. Therefore `dest[..n]` always holds a
/// terminator when `n > 0`, and a `src` too long for the bound is silently truncated. Unlike
/// [bounded_copy], the tail past the terminator is not zero-filled.
///
/// With `n == 0` this is a no-op and `dest` is returned untouched, whatever its length.
///
/// # Errors
///
/// [InvalidInput::DestinationTooShort] if `n > 0` and `dest` is shorter than `n`.
///
/// # Examples
///
/// ```rust
/// # use pstr::bounded_copy_terminating;
/// let mut dest = [0xff; 4];
/// bounded_copy_terminating(&mut dest, b"abcdef", 4).unwrap();
/// assert_eq!(b"abc\0", &dest);
///
/// let mut dest = [0xff; 4];
/// bounded_copy_terminating(&mut dest, b"a\0", 4).unwrap();
/// assert_eq!(b"a\0\0\xff", &dest);
/// ```
pub fn bounded_copy_terminating<'d>(
    dest: &'d mut [u8],
    src: &[u8],
    n: usize,
) -> Result<&'d mut [u8], Error> {
    if n == 0 {
        return Ok(dest);
    }
    check_destination(dest, n)?;
    let mut i = 0;
    while i + 1 < n {
        let b = byte_at(src, i);
        dest[i] = b;
        i += 1;
        if b == 0 {
            break;
        }
    }
    dest[i] = 0;
    Ok(dest)
}

/// Counts the bytes before the first zero byte, like `strlen`.
///
/// # Errors
///
/// [InvalidInput::Unterminated] if `s` contains no zero byte at all.
///
/// # Examples
///
/// ```rust
/// # use pstr::length_scan;
/// assert_eq!(5, length_scan(b"Hello\0World\0").unwrap());
/// assert_eq!(0, length_scan(b"\0").unwrap());
/// assert!(length_scan(b"Hello").is_err());
/// ```
pub fn length_scan(s: &[u8]) -> Result<usize, Error> {
    memchr(0, s).ok_or_else(|| {
        trace!(scanned = s.len(), "no terminator found");
        InvalidInput::Unterminated { scanned: s.len() }.into()
    })
}

/// Counts the bytes before the first zero byte, looking at no more than `n` bytes, like `strnlen`.
///
/// If there's no terminator within the bound (or within the slice), the bound is returned
/// (clamped to the slice length).
///
/// ```rust
/// # use pstr::bounded_length_scan;
/// assert_eq!(2, bounded_length_scan(b"ab\0cd", 10));
/// assert_eq!(3, bounded_length_scan(b"abcdef", 3));
/// assert_eq!(6, bounded_length_scan(b"abcdef", 10));
/// ```
pub fn bounded_length_scan(s: &[u8], n: usize) -> usize {
    let s = &s[..n.min(s.len())];
    memchr(0, s).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use proptest::prelude::*;

    use super::*;

    fn no_zeros() -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(1..=u8::MAX, 0..16)
    }

    #[test]
    fn compare_stops_at_terminator() {
        assert_eq!(0, bounded_compare(b"ab\0x", b"ab\0y", 4));
        assert!(bounded_compare(b"ab\0", b"abc\0", 4) < 0);
        assert!(bounded_compare(b"abc\0", b"ab\0", 4) > 0);
    }

    #[test]
    fn compare_zero_bound() {
        assert_eq!(0, bounded_compare(b"a", b"b", 0));
        assert_eq!(0, bounded_compare_signed(b"a", b"b", 0));
    }

    #[test]
    fn compare_slice_end_is_terminator() {
        assert_eq!(0, bounded_compare(b"abc", b"abc\0", 10));
        assert_eq!(0, bounded_compare(b"", b"", 10));
        assert_eq!(-i32::from(b'c'), bounded_compare(b"ab", b"abc", 10));
    }

    #[test]
    fn compare_signedness() {
        assert_eq!(0x80 - 0x01, bounded_compare(b"\x80", b"\x01", 1));
        assert_eq!(-0x80 - 0x01, bounded_compare_signed(b"\x80", b"\x01", 1));
        assert_eq!(
            bounded_compare(b"abc", b"abd", 3),
            bounded_compare_signed(b"abc", b"abd", 3)
        );
    }

    #[test]
    fn copy_short_destination() {
        let mut dest = [0; 2];
        let err = bounded_copy(&mut dest, b"abc", 3).unwrap_err();
        assert_eq!(
            Error::InvalidInput(InvalidInput::DestinationTooShort {
                needed: 3,
                available: 2
            }),
            err
        );
        assert!(bounded_copy_terminating(&mut dest, b"abc", 3).is_err());
        assert_eq!([0; 2], dest);
    }

    #[test]
    fn copy_truncates_without_terminator() {
        let mut dest = [0xff; 4];
        bounded_copy(&mut dest, b"abcdef", 3).unwrap();
        assert_eq!(b"abc\xff", &dest);
        assert!(!dest[..3].contains(&0));
    }

    #[test]
    fn copy_zero_fills_after_terminator() {
        let mut dest = [0xff; 8];
        bounded_copy(&mut dest, b"hi", 6).unwrap();
        assert_eq!(b"hi\0\0\0\0\xff\xff", &dest);
    }

    #[test]
    fn copy_terminating_single_byte() {
        let mut dest = [0xff; 2];
        bounded_copy_terminating(&mut dest, b"abc", 1).unwrap();
        assert_eq!(b"\0\xff", &dest);
    }

    #[test]
    fn copy_terminating_zero_bound_ignores_length() {
        let mut dest: [u8; 0] = [];
        assert!(bounded_copy_terminating(&mut dest, b"abc", 0).is_ok());
    }

    #[test]
    fn length_scan_reports_scanned() {
        assert_eq!(
            Error::InvalidInput(InvalidInput::Unterminated { scanned: 3 }),
            length_scan(b"abc").unwrap_err()
        );
        assert!(length_scan(b"").is_err());
    }

    proptest! {
        #[test]
        fn compare_matches_slice_order(p in no_zeros(), q in no_zeros()) {
            let n = p.len().max(q.len()) + 1;
            let res = bounded_compare(&p, &q, n);
            prop_assert_eq!(p.cmp(&q), res.cmp(&0));
            prop_assert_eq!(0, bounded_compare(&p, &p, n));
        }

        #[test]
        fn copy_terminating_always_terminates(
            src: Vec<u8>,
            n in 1..32usize,
            fill: u8
        ) {
            let mut dest = vec![fill; n];
            bounded_copy_terminating(&mut dest, &src, n).unwrap();
            prop_assert!(dest.contains(&0));
            let copied = bounded_length_scan(&dest, n);
            prop_assert_eq!(&src[..copied], &dest[..copied]);
        }

        #[test]
        fn copy_terminating_zero_bound_untouched(src: Vec<u8>, dest: Vec<u8>) {
            let mut copy = dest.clone();
            bounded_copy_terminating(&mut copy, &src, 0).unwrap();
            prop_assert_eq!(dest, copy);
        }

        #[test]
        fn copy_prefix(src in no_zeros(), n in 0..32usize) {
            let mut dest = vec![0xff; n];
            bounded_copy(&mut dest, &src, n).unwrap();
            let copied = src.len().min(n);
            prop_assert_eq!(&src[..copied], &dest[..copied]);
            prop_assert!(dest[copied..].iter().all(|b| *b == 0));
        }

        #[test]
        fn length_scans_agree(s: Vec<u8>) {
            let expected = s.iter().position(|b| *b == 0);
            prop_assert_eq!(expected, length_scan(&s).ok());
            prop_assert_eq!(expected.unwrap_or(s.len()), bounded_length_scan(&s, usize::MAX));
        }

        #[test]
        fn length_scan_of_pieces(pieces in proptest::collection::vec(no_zeros(), 1..5)) {
            let joined = pieces.iter().map(|p| p.as_slice()).collect_vec().join(&0);
            prop_assert_eq!(pieces[0].len(), bounded_length_scan(&joined, joined.len()));
        }
    }
}

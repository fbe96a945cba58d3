#![doc(test(attr(deny(warnings))))]
#![warn(missing_docs)]

//! Length-prefixed owned byte strings and bounded C-string primitives.
//!
//! The centerpiece is [ByteString], an immutable owned byte string that knows its length and
//! keeps a zero byte right past its payload. It can therefore hold arbitrary binary data
//! (including zero bytes), while still being cheap to hand to code expecting a NUL-terminated
//! string.
//!
//! The crate also provides bounded versions of the classic C string routines, working on slices:
//!
//! * [bounded_compare] (and [bounded_compare_signed]), like `strncmp`.
//! * [bounded_copy], like `strncpy`, including its lack of a terminator on truncation.
//! * [bounded_copy_terminating], which always terminates the destination.
//! * [length_scan] and [bounded_length_scan], like `strlen` and `strnlen`.
//!
//! None of them reads or writes out of bounds. Invalid input and failed allocations are reported
//! through [Error] rather than panicking.
//!
//! # Examples
//!
//! ```rust
//! # use pstr::ByteString;
//! let a = ByteString::from_nul_terminated(b"abc\0")?;
//! let b = ByteString::try_from("def")?;
//! let c = a.concat(&b)?;
//!
//! assert_eq!(6, c.len());
//! assert_eq!("abcdef", c);
//! assert_eq!(Some(c"abcdef"), c.as_c_str());
//!
//! // Operands are left intact.
//! assert_eq!("abc", a);
//! assert_eq!("def", b);
//! # Ok::<(), pstr::Error>(())
//! ```
//!
//! # Features
//!
//! * `std` (default): Use the standard library in dependencies.
//! * `serde`: Implements `Serialize` and `Deserialize` for [ByteString], as a byte string.
//!
//! # Logging
//!
//! Rejected input and failed allocations are reported as [tracing] events on the `trace` and
//! `debug` levels. Nothing is emitted unless the application installs a subscriber.

mod bounded;
mod byte_string;
mod error;
#[cfg(feature = "serde")]
mod serde_impl;

pub use bounded::{
    bounded_compare, bounded_compare_signed, bounded_copy, bounded_copy_terminating,
    bounded_length_scan, length_scan,
};
pub use byte_string::ByteString;
pub use error::{Error, InvalidInput};

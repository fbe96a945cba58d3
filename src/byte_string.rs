use std::borrow::Borrow;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::ffi::{c_char, CStr};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use bytes::{Buf, Bytes};
use tracing::{debug, trace};

use crate::bounded::{bounded_copy_terminating, length_scan};
use crate::error::{Error, InvalidInput};

/// An owned, length-prefixed byte string.
///
/// The payload is an arbitrary sequence of bytes (zero bytes included) of known length. The
/// backing buffer always holds one extra zero byte right after the payload, so the content can be
/// handed out as a NUL-terminated string at no cost (see [as_bytes_with_nul][Self::as_bytes_with_nul]
/// and [as_ptr][Self::as_ptr]).
///
/// The value can't be modified once created. Operations that produce a different string, like
/// [concat][Self::concat], allocate a new one and leave their operands alone. Every allocation is
/// fallible and reports [Error::OutOfMemory] instead of aborting.
///
/// # Examples
///
/// ```rust
/// # use pstr::ByteString;
/// let hello = ByteString::from_nul_terminated(b"Hello \0").unwrap();
/// let gopher = ByteString::from_nul_terminated(b"Gopher\0").unwrap();
/// let greeting = hello.concat(&gopher).unwrap();
///
/// assert_eq!(6, hello.len());
/// assert_eq!(6, gopher.len());
/// assert_eq!(12, greeting.len());
/// assert_eq!(b"Hello Gopher\0", greeting.as_bytes_with_nul());
///
/// greeting.destroy();
/// ```
#[derive(Clone)]
pub struct ByteString {
    // Payload followed by exactly one zero byte, so never empty.
    data: Vec<u8>,
}

fn allocate(len: usize) -> Result<Vec<u8>, Error> {
    let oom = |requested: usize| {
        debug!(requested, "byte string allocation failed");
        Error::OutOfMemory { requested }
    };
    let size = len.checked_add(1).ok_or_else(|| oom(usize::MAX))?;
    let mut data = Vec::new();
    data.try_reserve_exact(size).map_err(|_| oom(size))?;
    data.resize(size, 0);
    Ok(data)
}

impl ByteString {
    /// Creates a string of `len` zero bytes.
    ///
    /// # Errors
    ///
    /// [Error::OutOfMemory] if the buffer can't be allocated.
    ///
    /// ```rust
    /// # use pstr::ByteString;
    /// let s = ByteString::with_length(3).unwrap();
    /// assert_eq!(3, s.len());
    /// assert_eq!(b"\0\0\0", s.as_bytes());
    /// ```
    pub fn with_length(len: usize) -> Result<Self, Error> {
        allocate(len).map(|data| Self { data })
    }

    /// Creates a string out of a NUL-terminated buffer.
    ///
    /// The payload is everything before the first zero byte of `src`, anything after it is
    /// ignored.
    ///
    /// # Errors
    ///
    /// * [InvalidInput::Unterminated] if `src` contains no zero byte.
    /// * [Error::OutOfMemory] if the buffer can't be allocated.
    pub fn from_nul_terminated(src: &[u8]) -> Result<Self, Error> {
        let len = length_scan(src)?;
        let mut me = Self::with_length(len)?;
        bounded_copy_terminating(&mut me.data, src, len + 1)?;
        Ok(me)
    }

    /// Creates a string out of a C string.
    pub fn from_c_str(src: &CStr) -> Result<Self, Error> {
        Self::from_nul_terminated(src.to_bytes_with_nul())
    }

    /// Creates a string out of a raw NUL-terminated C string.
    ///
    /// # Errors
    ///
    /// * [InvalidInput::Null] if `ptr` is null.
    /// * [Error::OutOfMemory] if the buffer can't be allocated.
    ///
    /// # Safety
    ///
    /// If not null, `ptr` must satisfy the requirements of [CStr::from_ptr]: it must point to a
    /// zero-terminated sequence of bytes valid for reads for the whole duration of the call.
    ///
    /// ```rust
    /// # use std::ptr;
    /// # use pstr::{ByteString, Error, InvalidInput};
    /// let err = unsafe { ByteString::from_ptr(ptr::null()) }.unwrap_err();
    /// assert_eq!(Error::InvalidInput(InvalidInput::Null), err);
    ///
    /// let s = unsafe { ByteString::from_ptr(c"abc".as_ptr()) }.unwrap();
    /// assert_eq!("abc", s);
    /// ```
    pub unsafe fn from_ptr(ptr: *const c_char) -> Result<Self, Error> {
        if ptr.is_null() {
            trace!("null pointer passed as a string");
            return Err(InvalidInput::Null.into());
        }
        Self::from_c_str(CStr::from_ptr(ptr))
    }

    /// Creates a string holding exactly the given bytes.
    ///
    /// Unlike [from_nul_terminated][Self::from_nul_terminated], the length is explicit and zero
    /// bytes inside `src` are kept.
    ///
    /// ```rust
    /// # use pstr::ByteString;
    /// let s = ByteString::from_bytes(b"a\0b").unwrap();
    /// assert_eq!(3, s.len());
    /// assert_eq!(b"a\0b\0", s.as_bytes_with_nul());
    /// ```
    pub fn from_bytes(src: &[u8]) -> Result<Self, Error> {
        let mut me = Self::with_length(src.len())?;
        me.data[..src.len()].copy_from_slice(src);
        Ok(me)
    }

    /// Creates a string out of all the remaining bytes of a [Buf].
    ///
    /// The buffer is consumed in the process, which allows gathering non-continuous buffers.
    ///
    /// ```rust
    /// # use bytes::{Buf, Bytes};
    /// # use pstr::ByteString;
    /// let buf = Bytes::from_static(b"Hello ").chain(Bytes::from_static(b"World"));
    /// let s = ByteString::from_buf(buf).unwrap();
    /// assert_eq!("Hello World", s);
    /// ```
    pub fn from_buf<B: Buf>(mut buf: B) -> Result<Self, Error> {
        let mut me = Self::with_length(buf.remaining())?;
        let len = me.len();
        buf.copy_to_slice(&mut me.data[..len]);
        Ok(me)
    }

    /// Number of payload bytes, not counting the terminator.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    /// Is the payload empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// The payload together with the trailing zero byte.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// The content as a C string.
    ///
    /// Returns `None` if the payload contains a zero byte, as the C string would end there.
    ///
    /// ```rust
    /// # use pstr::ByteString;
    /// assert_eq!(Some(c"abc"), ByteString::from_bytes(b"abc").unwrap().as_c_str());
    /// assert_eq!(None, ByteString::from_bytes(b"a\0c").unwrap().as_c_str());
    /// ```
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(&self.data).ok()
    }

    /// Pointer to the NUL-terminated buffer, for passing to C.
    ///
    /// The pointer is valid for reads of `len() + 1` bytes for as long as `self` lives.
    pub fn as_ptr(&self) -> *const c_char {
        self.data.as_ptr().cast()
    }

    /// Concatenates two strings into a new one.
    ///
    /// The result holds the payload of `self` followed by the payload of `other`, byte for byte.
    /// Neither operand is modified.
    ///
    /// # Errors
    ///
    /// [Error::OutOfMemory] if the buffer can't be allocated.
    pub fn concat(&self, other: &ByteString) -> Result<Self, Error> {
        Self::concat_all([self, other])
    }

    /// Concatenates any number of strings into a new one, with a single allocation.
    ///
    /// ```rust
    /// # use pstr::ByteString;
    /// let parts = ["a", "bc", "", "def"]
    ///     .iter()
    ///     .map(|p| ByteString::try_from(*p))
    ///     .collect::<Result<Vec<_>, _>>()
    ///     .unwrap();
    /// let s = ByteString::concat_all(&parts).unwrap();
    /// assert_eq!("abcdef", s);
    /// ```
    pub fn concat_all<'a, I>(parts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a ByteString>,
        I::IntoIter: Clone,
    {
        let parts = parts.into_iter();
        let len = parts
            .clone()
            .try_fold(0usize, |acc, part| acc.checked_add(part.len()))
            .ok_or_else(|| {
                debug!("concatenated length overflows");
                Error::OutOfMemory {
                    requested: usize::MAX,
                }
            })?;
        let mut me = Self::with_length(len)?;
        let mut pos = 0;
        for part in parts {
            let end = pos + part.len();
            me.data[pos..end].copy_from_slice(part.as_bytes());
            pos = end;
        }
        Ok(me)
    }

    /// Releases the string.
    ///
    /// This is the same as dropping it. The value is consumed, so it can't be used afterwards.
    pub fn destroy(self) {}

    /// Turns the string into [Bytes] holding the payload, without copying.
    pub fn into_bytes(self) -> Bytes {
        let mut data = Bytes::from(self.data);
        data.truncate(data.len() - 1);
        data
    }

    /// Turns the string into a vector holding the payload, without copying.
    pub fn into_vec(self) -> Vec<u8> {
        let mut data = self.data;
        data.pop();
        data
    }
}

impl Default for ByteString {
    fn default() -> Self {
        Self { data: vec![0] }
    }
}

impl Deref for ByteString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Borrow<[u8]> for ByteString {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Debug for ByteString {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        write!(fmt, "b\"{}\"", self.as_bytes().escape_ascii())
    }
}

impl Hash for ByteString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ByteString {}

impl PartialOrd for ByteString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for ByteString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

macro_rules! c {
    ($ty: ty) => {
        impl<'a> PartialEq<$ty> for ByteString {
            fn eq(&self, other: &$ty) -> bool {
                self.as_bytes() == AsRef::<[u8]>::as_ref(other)
            }
        }

        impl<'a> PartialEq<ByteString> for $ty {
            fn eq(&self, other: &ByteString) -> bool {
                AsRef::<[u8]>::as_ref(self) == other.as_bytes()
            }
        }
    };
}

c!([u8]);
c!(&'a [u8]);
c!(Vec<u8>);
c!(Bytes);
c!(str);
c!(&'a str);

impl<'a> TryFrom<&'a [u8]> for ByteString {
    type Error = Error;

    fn try_from(src: &'a [u8]) -> Result<Self, Error> {
        Self::from_bytes(src)
    }
}

impl<'a> TryFrom<&'a str> for ByteString {
    type Error = Error;

    fn try_from(src: &'a str) -> Result<Self, Error> {
        Self::from_bytes(src.as_bytes())
    }
}

impl<'a> TryFrom<&'a CStr> for ByteString {
    type Error = Error;

    fn try_from(src: &'a CStr) -> Result<Self, Error> {
        Self::from_c_str(src)
    }
}

impl TryFrom<Vec<u8>> for ByteString {
    type Error = Error;

    /// Reuses the vector as the backing buffer if it has spare capacity for the terminator.
    fn try_from(mut data: Vec<u8>) -> Result<Self, Error> {
        data.try_reserve_exact(1).map_err(|_| {
            debug!(len = data.len(), "byte string allocation failed");
            Error::OutOfMemory {
                requested: data.len().saturating_add(1),
            }
        })?;
        data.push(0);
        Ok(Self { data })
    }
}

impl From<ByteString> for Bytes {
    fn from(s: ByteString) -> Self {
        s.into_bytes()
    }
}

impl From<ByteString> for Vec<u8> {
    fn from(s: ByteString) -> Self {
        s.into_vec()
    }
}

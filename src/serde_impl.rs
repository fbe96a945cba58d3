use std::fmt::{Formatter, Result as FmtResult};

use serde::de::{Deserialize, Deserializer, Error as DeError, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::ByteString;

impl Serialize for ByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

struct ByteStringVisitor;

impl<'de> Visitor<'de> for ByteStringVisitor {
    type Value = ByteString;

    fn expecting(&self, fmt: &mut Formatter) -> FmtResult {
        fmt.write_str("a byte string")
    }

    fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<ByteString, E> {
        ByteString::from_bytes(v).map_err(E::custom)
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<ByteString, E> {
        self.visit_bytes(v.as_bytes())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ByteString, A::Error> {
        let mut data = Vec::new();
        if let Some(hint) = seq.size_hint() {
            data.try_reserve(hint).map_err(A::Error::custom)?;
        }
        while let Some(b) = seq.next_element::<u8>()? {
            data.push(b);
        }
        ByteString::try_from(data).map_err(A::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ByteString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_byte_buf(ByteStringVisitor)
    }
}

//! Test primitive that refuses to valuate marked content

use crate::digest::{ChildEntry, Primitive};
use std::borrow::Cow;
use std::io::{self, Read};

/// Content prefix whose leaf valuation fails
pub(crate) const UNREADABLE_MARKER: &[u8] = b"<unreadable>";

/// Wraps a primitive; reading a stream that starts with
/// [`UNREADABLE_MARKER`] fails the way a denied read does
pub(crate) struct RefusesMarker<P>(pub P);

impl<P: Primitive> Primitive for RefusesMarker<P> {
    type Value = P::Value;

    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn value_tag(&self) -> &'static str {
        self.0.value_tag()
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<Self::Value> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        if content.starts_with(UNREADABLE_MARKER) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read refused"));
        }
        Ok(self.0.digest_bytes(&content))
    }

    fn digest_bytes(&self, bytes: &[u8]) -> Self::Value {
        self.0.digest_bytes(bytes)
    }

    fn value_bytes<'a>(&self, value: &'a Self::Value) -> Cow<'a, [u8]> {
        self.0.value_bytes(value)
    }

    fn render(&self, value: &Self::Value) -> String {
        self.0.render(value)
    }

    fn combine(&self, children: &mut [ChildEntry<Self::Value>]) -> Self::Value {
        self.0.combine(children)
    }
}

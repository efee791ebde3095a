// Copyright 2024 Branchval Contributors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON documents: a `JsonDoc`-kinded envelope wrapping zero or one inner
//! JSON values.
//!
//! The encoding is bit-exact and stable:
//!
//! ```text
//! [kind: JsonDoc tag]
//! [count: varint, 0 or 1]
//! [if count == 1: one inner value in canonical kind-tagged form]
//! ```
//!
//! The empty document (count 0) is distinct from a document containing the
//! JSON null literal. A `Null` kind appearing where a document is expected
//! decodes as the empty document.

use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::envelope::Address;
use crate::envelope::Kind;
use crate::envelope::ValueReader;
use crate::envelope::ValueWriter;
use crate::error::Error;
use crate::error::Result;
use crate::value::JsonValue;

// Canonical bytes of the empty document: JsonDoc tag, count 0.
pub(crate) const EMPTY_DOC_BYTES: [u8; 2] = [Kind::JsonDoc.tag(), 0x00];

/// A JSON document wrapped around a raw, immutable slice of envelope bytes.
///
/// It does not own the underlying data, so a document can be inspected and
/// compared without copying it out of an enclosing blob. Use
/// [`to_owned`](RawJsonDoc::to_owned) to cut the document loose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawJsonDoc<'a> {
    pub(crate) data: &'a [u8],
}

impl<'a> RawJsonDoc<'a> {
    /// Wraps a byte slice assumed to hold one encoded document. Malformed
    /// bytes surface as errors from the accessors, never at construction.
    pub fn new(data: &'a [u8]) -> Self {
        RawJsonDoc { data }
    }

    /// The exact envelope bytes of this document.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    fn count(&self) -> Result<u64> {
        let mut r = ValueReader::new(self.data);
        let kind = r.read_kind()?;
        if kind != Kind::JsonDoc {
            return Err(Error::UnexpectedKind {
                expected: "JsonDoc",
                found: kind,
            });
        }
        let count = r.read_count()?;
        if count > 1 {
            return Err(Error::BadEnvelope(format!(
                "json document count {count}, expected 0 or 1"
            )));
        }
        Ok(count)
    }

    /// Whether the document holds no inner value.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    /// The MySQL length of a JSON document, which is 1 irrespective of the
    /// inner value's shape.
    pub fn len(&self) -> u64 {
        1
    }

    /// Decodes the single inner value. The empty document decodes to
    /// [`JsonValue::Null`].
    pub fn inner(&self) -> Result<JsonValue<'a>> {
        let mut r = ValueReader::new(self.data);
        let kind = r.read_kind()?;
        if kind != Kind::JsonDoc {
            return Err(Error::UnexpectedKind {
                expected: "JsonDoc",
                found: kind,
            });
        }
        match r.read_count()? {
            0 => Ok(JsonValue::Null),
            1 => JsonValue::read_from(&mut r),
            n => Err(Error::BadEnvelope(format!(
                "json document count {n}, expected 0 or 1"
            ))),
        }
    }

    /// Compares two documents by their inner values under the MySQL
    /// precedence ladder.
    pub fn compare(&self, other: &RawJsonDoc<'_>) -> Result<Ordering> {
        let left = self.inner()?;
        let right = other.inner()?;
        Ok(left.cmp(&right))
    }

    /// Produces a document whose byte buffer is independent of any other,
    /// so callers can drop a reference to a large enclosing blob without
    /// copying that blob.
    pub fn to_owned(&self) -> OwnedJsonDoc {
        OwnedJsonDoc {
            data: self.data.to_vec(),
        }
    }

    /// Appends this document's bytes verbatim to an envelope under
    /// construction.
    pub fn write_to(&self, w: &mut ValueWriter) {
        w.write_raw(self.data);
    }
}

impl Display for RawJsonDoc<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner() {
            Ok(v) => write!(f, "JSON({v})"),
            Err(_) => write!(f, "JSON(<invalid>)"),
        }
    }
}

/// A JSON document that owns its envelope bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedJsonDoc {
    pub(crate) data: Vec<u8>,
}

impl OwnedJsonDoc {
    /// Encodes `inner` as the sole element of a new document. A document
    /// containing the JSON null literal is populated, not empty.
    pub fn new(inner: &JsonValue<'_>) -> OwnedJsonDoc {
        let mut w = ValueWriter::new();
        w.write_kind(Kind::JsonDoc);
        w.write_count(1);
        inner.write_to(&mut w);
        OwnedJsonDoc {
            data: w.into_bytes(),
        }
    }

    /// The canonical zero-element document.
    pub fn empty() -> OwnedJsonDoc {
        OwnedJsonDoc {
            data: EMPTY_DOC_BYTES.to_vec(),
        }
    }

    /// Wraps pre-encoded document bytes. Malformed bytes surface as errors
    /// from the accessors.
    pub fn from_bytes(data: Vec<u8>) -> OwnedJsonDoc {
        OwnedJsonDoc { data }
    }

    /// A borrowed view of the document.
    pub fn as_raw(&self) -> RawJsonDoc<'_> {
        RawJsonDoc::new(self.data.as_slice())
    }

    /// Consumes the document, returning its envelope bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Whether the document holds no inner value.
    pub fn is_empty(&self) -> Result<bool> {
        self.as_raw().is_empty()
    }

    /// The MySQL length of a JSON document, which is 1 irrespective of the
    /// inner value's shape.
    pub fn len(&self) -> u64 {
        self.as_raw().len()
    }

    /// Decodes the single inner value. The empty document decodes to
    /// [`JsonValue::Null`].
    pub fn inner(&self) -> Result<JsonValue<'_>> {
        self.as_raw().inner()
    }

    /// Compares two documents by their inner values.
    pub fn compare(&self, other: &OwnedJsonDoc) -> Result<Ordering> {
        self.as_raw().compare(&other.as_raw())
    }
}

impl Display for OwnedJsonDoc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

impl AsRef<[u8]> for OwnedJsonDoc {
    fn as_ref(&self) -> &[u8] {
        self.data.as_ref()
    }
}

/// Reads one document off the cursor, returning a view over the exact byte
/// range it occupies.
///
/// A `Null` kind where a document is expected is accepted as the empty
/// document; any other non-`JsonDoc` kind is [`Error::UnexpectedKind`].
pub fn read_json_doc<'a>(r: &mut ValueReader<'a>) -> Result<RawJsonDoc<'a>> {
    let kind = r.peek_kind()?;
    if kind == Kind::Null {
        r.skip_kind()?;
        return Ok(RawJsonDoc::new(&EMPTY_DOC_BYTES));
    }
    if kind != Kind::JsonDoc {
        return Err(Error::UnexpectedKind {
            expected: "JsonDoc or Null",
            found: kind,
        });
    }

    let start = r.pos();
    skip_json_doc(r)?;
    Ok(RawJsonDoc::new(r.slice_from(start)))
}

/// Advances the cursor past one document without materializing it.
pub fn skip_json_doc(r: &mut ValueReader<'_>) -> Result<()> {
    let kind = r.read_kind()?;
    if kind == Kind::Null {
        return Ok(());
    }
    if kind != Kind::JsonDoc {
        return Err(Error::UnexpectedKind {
            expected: "JsonDoc or Null",
            found: kind,
        });
    }
    let count = r.read_count()?;
    if count > 1 {
        return Err(Error::BadEnvelope(format!(
            "json document count {count}, expected 0 or 1"
        )));
    }
    for _ in 0..count {
        r.skip_value()?;
    }
    Ok(())
}

/// Advances the cursor past one document, reporting the address of every
/// reference found in the inner value.
pub fn walk_json_doc(r: &mut ValueReader<'_>, cb: &mut dyn FnMut(Address)) -> Result<()> {
    let kind = r.read_kind()?;
    if kind == Kind::Null {
        return Ok(());
    }
    if kind != Kind::JsonDoc {
        return Err(Error::UnexpectedKind {
            expected: "JsonDoc or Null",
            found: kind,
        });
    }
    let count = r.read_count()?;
    if count > 1 {
        return Err(Error::BadEnvelope(format!(
            "json document count {count}, expected 0 or 1"
        )));
    }
    for _ in 0..count {
        r.walk_value(cb)?;
    }
    Ok(())
}

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

use crate::error::Error;
use crate::error::Result;

// Kind tags as encoded in the envelope. Tags are written as single-byte
// varints, so every value must stay below 0x80.
pub(crate) const NULL_TAG: u8 = 0;
pub(crate) const BOOL_TAG: u8 = 1;
pub(crate) const FLOAT_TAG: u8 = 2;
pub(crate) const STRING_TAG: u8 = 3;
pub(crate) const BLOB_TAG: u8 = 4;
pub(crate) const LIST_TAG: u8 = 5;
pub(crate) const MAP_TAG: u8 = 6;
pub(crate) const REF_TAG: u8 = 7;
pub(crate) const JSON_DOC_TAG: u8 = 8;

/// The type of a value record in the envelope.
///
/// A kind tag precedes every value. Containers (`List`, `Map`, `JsonDoc`)
/// are followed by a varint count of their elements; `Ref` is followed by a
/// fixed-width content address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The null value.
    Null,
    /// A boolean, one payload byte.
    Bool,
    /// An IEEE-754 double, eight big-endian payload bytes.
    Float,
    /// A UTF-8 string, count-prefixed.
    String,
    /// An opaque byte string, count-prefixed.
    Blob,
    /// An ordered sequence of values, count-prefixed.
    List,
    /// A key/value mapping, count-prefixed by entry count.
    Map,
    /// A content address pointing at another value in the heap.
    Ref,
    /// A JSON document wrapping zero or one inner values.
    JsonDoc,
}

impl Kind {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Kind::Null => NULL_TAG,
            Kind::Bool => BOOL_TAG,
            Kind::Float => FLOAT_TAG,
            Kind::String => STRING_TAG,
            Kind::Blob => BLOB_TAG,
            Kind::List => LIST_TAG,
            Kind::Map => MAP_TAG,
            Kind::Ref => REF_TAG,
            Kind::JsonDoc => JSON_DOC_TAG,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Result<Kind> {
        match tag {
            NULL_TAG => Ok(Kind::Null),
            BOOL_TAG => Ok(Kind::Bool),
            FLOAT_TAG => Ok(Kind::Float),
            STRING_TAG => Ok(Kind::String),
            BLOB_TAG => Ok(Kind::Blob),
            LIST_TAG => Ok(Kind::List),
            MAP_TAG => Ok(Kind::Map),
            REF_TAG => Ok(Kind::Ref),
            JSON_DOC_TAG => Ok(Kind::JsonDoc),
            _ => Err(Error::BadEnvelope(format!("unknown kind tag {tag:#04x}"))),
        }
    }

    /// Whether a value of this kind may appear inside a JSON document.
    pub fn is_json(self) -> bool {
        matches!(
            self,
            Kind::Null | Kind::Bool | Kind::Float | Kind::String | Kind::List | Kind::Map
        )
    }
}

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

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::compare::compare_values;
use crate::envelope::Kind;
use crate::envelope::ValueReader;
use crate::envelope::ValueWriter;
use crate::error::Error;
use crate::error::Result;

pub type Object<'a> = BTreeMap<String, JsonValue<'a>>;

/// A JSON value decoded out of (or about to be encoded into) the value
/// envelope.
///
/// Strings borrow from the underlying buffer where possible; conversions
/// and [`into_static`](JsonValue::into_static) produce owned variants.
#[derive(Clone, Default)]
pub enum JsonValue<'a> {
    /// The JSON null literal.
    #[default]
    Null,
    /// A JSON boolean.
    Bool(bool),
    /// A JSON number. Numbers are IEEE-754 doubles end to end.
    Number(f64),
    /// A JSON string.
    String(Cow<'a, str>),
    /// A JSON array of values.
    Array(Vec<JsonValue<'a>>),
    /// A JSON object. Keys are unique; iteration order is sorted.
    Object(Object<'a>),
}

impl Eq for JsonValue<'_> {}

impl PartialEq for JsonValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for JsonValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for JsonValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_values(self, other)
    }
}

impl Debug for JsonValue<'_> {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match *self {
            JsonValue::Null => formatter.debug_tuple("Null").finish(),
            JsonValue::Bool(v) => formatter.debug_tuple("Bool").field(&v).finish(),
            JsonValue::Number(v) => formatter.debug_tuple("Number").field(&v).finish(),
            JsonValue::String(ref v) => formatter.debug_tuple("String").field(v).finish(),
            JsonValue::Array(ref v) => {
                formatter.write_str("Array(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
            JsonValue::Object(ref v) => {
                formatter.write_str("Object(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
        }
    }
}

impl Display for JsonValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonValue::Null => write!(f, "null"),
            JsonValue::Bool(v) => {
                if *v {
                    write!(f, "true")
                } else {
                    write!(f, "false")
                }
            }
            JsonValue::Number(v) => write!(f, "{}", v),
            JsonValue::String(v) => write!(f, "{:?}", v),
            JsonValue::Array(vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            JsonValue::Object(vs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{k}\":{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl<'a> JsonValue<'a> {
    pub fn is_scalar(&self) -> bool {
        !self.is_array() && !self.is_object()
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_v))
    }

    pub fn as_object(&self) -> Option<&Object<'a>> {
        match self {
            JsonValue::Object(ref obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_v))
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue<'a>>> {
        match self {
            JsonValue::Array(ref array) => Some(array),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.as_str().is_some()
    }

    pub fn as_str(&self) -> Option<&Cow<'_, str>> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, JsonValue::Bool(_v))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn as_null(&self) -> Option<()> {
        match self {
            JsonValue::Null => Some(()),
            _ => None,
        }
    }

    /// The envelope kind this value encodes as.
    pub fn kind(&self) -> Kind {
        match self {
            JsonValue::Null => Kind::Null,
            JsonValue::Bool(_) => Kind::Bool,
            JsonValue::Number(_) => Kind::Float,
            JsonValue::String(_) => Kind::String,
            JsonValue::Array(_) => Kind::List,
            JsonValue::Object(_) => Kind::Map,
        }
    }

    pub fn array_length(&self) -> Option<usize> {
        match self {
            JsonValue::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    pub fn object_keys(&self) -> Option<JsonValue<'a>> {
        match self {
            JsonValue::Object(obj) => {
                let mut keys = Vec::with_capacity(obj.len());
                for k in obj.keys() {
                    keys.push(k.clone().into());
                }
                Some(JsonValue::Array(keys))
            }
            _ => None,
        }
    }

    /// Detaches the value from any borrowed buffer.
    pub fn into_static(self) -> JsonValue<'static> {
        match self {
            JsonValue::Null => JsonValue::Null,
            JsonValue::Bool(v) => JsonValue::Bool(v),
            JsonValue::Number(v) => JsonValue::Number(v),
            JsonValue::String(s) => JsonValue::String(Cow::Owned(s.into_owned())),
            JsonValue::Array(arr) => {
                JsonValue::Array(arr.into_iter().map(JsonValue::into_static).collect())
            }
            JsonValue::Object(obj) => {
                JsonValue::Object(obj.into_iter().map(|(k, v)| (k, v.into_static())).collect())
            }
        }
    }

    /// Serializes the value into the envelope in canonical kind-tagged form.
    pub fn write_to(&self, w: &mut ValueWriter) {
        match self {
            JsonValue::Null => w.write_kind(Kind::Null),
            JsonValue::Bool(v) => {
                w.write_kind(Kind::Bool);
                w.write_bool(*v);
            }
            JsonValue::Number(v) => {
                w.write_kind(Kind::Float);
                w.write_f64(*v);
            }
            JsonValue::String(s) => {
                w.write_kind(Kind::String);
                w.write_string(s);
            }
            JsonValue::Array(arr) => {
                w.write_kind(Kind::List);
                w.write_count(arr.len() as u64);
                for v in arr {
                    v.write_to(w);
                }
            }
            JsonValue::Object(obj) => {
                w.write_kind(Kind::Map);
                w.write_count(obj.len() as u64);
                for (k, v) in obj {
                    w.write_kind(Kind::String);
                    w.write_string(k);
                    v.write_to(w);
                }
            }
        }
    }

    /// Serializes the value into a fresh envelope buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut w = ValueWriter::new();
        self.write_to(&mut w);
        w.into_bytes()
    }

    /// Decodes one JSON value from the cursor.
    ///
    /// A kind outside the JSON set is [`Error::NonJsonKind`]; an object key
    /// that is not a string is [`Error::UnexpectedKind`].
    pub fn read_from(r: &mut ValueReader<'a>) -> Result<JsonValue<'a>> {
        let kind = r.read_kind()?;
        match kind {
            Kind::Null => Ok(JsonValue::Null),
            Kind::Bool => Ok(JsonValue::Bool(r.read_bool()?)),
            Kind::Float => Ok(JsonValue::Number(r.read_f64()?)),
            Kind::String => Ok(JsonValue::String(Cow::Borrowed(r.read_string()?))),
            Kind::List => {
                let count = r.read_count()?;
                let mut arr = Vec::with_capacity(count.min(1024) as usize);
                for _ in 0..count {
                    arr.push(JsonValue::read_from(r)?);
                }
                Ok(JsonValue::Array(arr))
            }
            Kind::Map => {
                let count = r.read_count()?;
                let mut obj = Object::new();
                for _ in 0..count {
                    let key_kind = r.read_kind()?;
                    if key_kind != Kind::String {
                        return Err(Error::UnexpectedKind {
                            expected: "String object key",
                            found: key_kind,
                        });
                    }
                    let key = r.read_string()?;
                    let val = JsonValue::read_from(r)?;
                    if obj.insert(key.to_string(), val).is_some() {
                        return Err(Error::BadEnvelope(format!("duplicate object key {key:?}")));
                    }
                }
                Ok(JsonValue::Object(obj))
            }
            Kind::Blob | Kind::Ref | Kind::JsonDoc => Err(Error::NonJsonKind(kind)),
        }
    }

    /// Decodes one JSON value from an envelope buffer.
    pub fn from_slice(buf: &'a [u8]) -> Result<JsonValue<'a>> {
        let mut r = ValueReader::new(buf);
        JsonValue::read_from(&mut r)
    }
}

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

use core::iter::FromIterator;
use std::borrow::Cow;

use ordered_float::OrderedFloat;
use serde_json::Number as SerdeNumber;
use serde_json::Value as SerdeValue;

use crate::value::JsonValue;
use crate::value::Object;

macro_rules! from_signed_integer {
    ($($ty:ident)*) => {
        $(
            impl<'a> From<$ty> for JsonValue<'a> {
                fn from(n: $ty) -> Self {
                    JsonValue::Number(n as f64)
                }
            }
        )*
    };
}

macro_rules! from_unsigned_integer {
    ($($ty:ident)*) => {
        $(
            impl<'a> From<$ty> for JsonValue<'a> {
                fn from(n: $ty) -> Self {
                    JsonValue::Number(n as f64)
                }
            }
        )*
    };
}

macro_rules! from_float {
    ($($ty:ident)*) => {
        $(
            impl<'a> From<$ty> for JsonValue<'a> {
                fn from(n: $ty) -> Self {
                    JsonValue::Number(n as f64)
                }
            }
        )*
    };
}

from_signed_integer! {
    i8 i16 i32 i64 isize
}

from_unsigned_integer! {
    u8 u16 u32 u64 usize
}

from_float! {
    f32 f64
}

impl From<OrderedFloat<f32>> for JsonValue<'_> {
    fn from(f: OrderedFloat<f32>) -> Self {
        JsonValue::Number(f.0 as f64)
    }
}

impl From<OrderedFloat<f64>> for JsonValue<'_> {
    fn from(f: OrderedFloat<f64>) -> Self {
        JsonValue::Number(f.0)
    }
}

impl From<bool> for JsonValue<'_> {
    fn from(f: bool) -> Self {
        JsonValue::Bool(f)
    }
}

impl From<String> for JsonValue<'_> {
    fn from(f: String) -> Self {
        JsonValue::String(f.into())
    }
}

impl<'a> From<&'a str> for JsonValue<'a> {
    fn from(f: &'a str) -> Self {
        JsonValue::String(Cow::from(f))
    }
}

impl<'a> From<Cow<'a, str>> for JsonValue<'a> {
    fn from(f: Cow<'a, str>) -> Self {
        JsonValue::String(f)
    }
}

impl<'a> From<Object<'a>> for JsonValue<'a> {
    fn from(o: Object<'a>) -> Self {
        JsonValue::Object(o)
    }
}

impl<'a, T: Into<JsonValue<'a>>> From<Vec<T>> for JsonValue<'a> {
    fn from(f: Vec<T>) -> Self {
        JsonValue::Array(f.into_iter().map(Into::into).collect())
    }
}

impl<'a, T: Clone + Into<JsonValue<'a>>> From<&'a [T]> for JsonValue<'a> {
    fn from(f: &'a [T]) -> Self {
        JsonValue::Array(f.iter().cloned().map(Into::into).collect())
    }
}

impl<'a, T: Into<JsonValue<'a>>> FromIterator<T> for JsonValue<'a> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        JsonValue::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a, K: Into<String>, V: Into<JsonValue<'a>>> FromIterator<(K, V)> for JsonValue<'a> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        JsonValue::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<()> for JsonValue<'_> {
    fn from((): ()) -> Self {
        JsonValue::Null
    }
}

impl From<&SerdeValue> for JsonValue<'_> {
    fn from(value: &SerdeValue) -> Self {
        match value {
            SerdeValue::Null => JsonValue::Null,
            SerdeValue::Bool(v) => JsonValue::Bool(*v),
            SerdeValue::Number(v) => {
                // Numbers are IEEE-754 doubles end to end; integers outside
                // the exact f64 range convert lossily.
                match v.as_f64() {
                    Some(n) => JsonValue::Number(n),
                    None => JsonValue::Null,
                }
            }
            SerdeValue::String(v) => JsonValue::String(v.clone().into()),
            SerdeValue::Array(arr) => {
                let mut vals: Vec<JsonValue> = Vec::with_capacity(arr.len());
                for val in arr {
                    vals.push(val.into());
                }
                JsonValue::Array(vals)
            }
            SerdeValue::Object(obj) => {
                let mut map = Object::new();
                for (k, v) in obj.iter() {
                    let val: JsonValue = v.into();
                    map.insert(k.to_string(), val);
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<SerdeValue> for JsonValue<'_> {
    fn from(value: SerdeValue) -> Self {
        (&value).into()
    }
}

impl<'a> From<JsonValue<'a>> for SerdeValue {
    fn from(value: JsonValue<'a>) -> Self {
        match value {
            JsonValue::Null => SerdeValue::Null,
            JsonValue::Bool(v) => SerdeValue::Bool(v),
            JsonValue::Number(n) => match SerdeNumber::from_f64(n) {
                Some(n) => SerdeValue::Number(n),
                // serde_json has no representation for NaN or infinities.
                None => SerdeValue::Null,
            },
            JsonValue::String(s) => SerdeValue::String(s.into_owned()),
            JsonValue::Array(arr) => {
                SerdeValue::Array(arr.into_iter().map(Into::into).collect())
            }
            JsonValue::Object(obj) => SerdeValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, SerdeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

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

//! A total ordering over JSON values mirroring MySQL's comparison
//! precedence.
//!
//! Values of different types order by type level alone; values of the same
//! type fall through to a within-type comparison. The ladder, lowest first:
//!
//! ```text
//! null < number < string < boolean < array < object
//! ```
//!
//! The boolean literals rank above both scalars, below the containers.
//! MySQL leaves the relative rank of numbers and strings to the
//! implementation; this crate fixes number < string and never promotes
//! between the two. Within a type:
//!
//! - booleans: false < true
//! - numbers: IEEE-754 total order, NaN equal to itself
//! - strings: byte-wise lexicographic
//! - arrays: position by position, a proper prefix is lesser
//! - objects: sorted-key (key, value) sequence, shorter key set is lesser
//!   on a shared prefix

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::value::JsonValue;

// JSON value compare level, higher sorts greater.
pub(crate) const OBJECT_LEVEL: u8 = 6;
pub(crate) const ARRAY_LEVEL: u8 = 5;
pub(crate) const BOOL_LEVEL: u8 = 4;
pub(crate) const STRING_LEVEL: u8 = 3;
pub(crate) const NUMBER_LEVEL: u8 = 2;
pub(crate) const NULL_LEVEL: u8 = 1;

pub(crate) fn compare_level(value: &JsonValue<'_>) -> u8 {
    match value {
        JsonValue::Null => NULL_LEVEL,
        JsonValue::Bool(_) => BOOL_LEVEL,
        JsonValue::Number(_) => NUMBER_LEVEL,
        JsonValue::String(_) => STRING_LEVEL,
        JsonValue::Array(_) => ARRAY_LEVEL,
        JsonValue::Object(_) => OBJECT_LEVEL,
    }
}

/// Compares two JSON values under the MySQL precedence ladder.
///
/// Total and deterministic for every pair of values: antisymmetric and
/// transitive, with NaN numbers comparing equal to themselves.
pub fn compare_values(left: &JsonValue<'_>, right: &JsonValue<'_>) -> Ordering {
    let level_ord = compare_level(left).cmp(&compare_level(right));
    if level_ord != Ordering::Equal {
        return level_ord;
    }

    match (left, right) {
        (JsonValue::Null, JsonValue::Null) => Ordering::Equal,
        (JsonValue::Bool(v1), JsonValue::Bool(v2)) => v1.cmp(v2),
        (JsonValue::Number(v1), JsonValue::Number(v2)) => {
            OrderedFloat(*v1).cmp(&OrderedFloat(*v2))
        }
        (JsonValue::String(v1), JsonValue::String(v2)) => v1.as_bytes().cmp(v2.as_bytes()),
        (JsonValue::Array(arr1), JsonValue::Array(arr2)) => {
            for (v1, v2) in arr1.iter().zip(arr2.iter()) {
                let ord = compare_values(v1, v2);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            arr1.len().cmp(&arr2.len())
        }
        (JsonValue::Object(obj1), JsonValue::Object(obj2)) => {
            for ((k1, v1), (k2, v2)) in obj1.iter().zip(obj2.iter()) {
                let ord = k1.cmp(k2);
                if ord != Ordering::Equal {
                    return ord;
                }
                let ord = compare_values(v1, v2);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            obj1.len().cmp(&obj2.len())
        }
        // Levels are distinct per variant, so mixed pairs were already
        // resolved above.
        (_, _) => unreachable!("mixed-type pairs are ordered by compare level"),
    }
}

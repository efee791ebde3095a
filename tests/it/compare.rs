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

use std::cmp::Ordering;

use branchval::compare_values;
use branchval::JsonValue;
use rand::distr::Alphanumeric;
use rand::distr::SampleString;
use rand::rng;
use rand::Rng;

fn val(v: serde_json::Value) -> JsonValue<'static> {
    v.into()
}

#[test]
fn test_precedence_ladder() {
    let null = JsonValue::Null;
    let boolean = JsonValue::Bool(true);
    let number = JsonValue::Number(7.0);
    let string = JsonValue::from("abc");
    let array = val(serde_json::json!([1]));
    let object = val(serde_json::json!({"k": 1}));

    assert_eq!(compare_values(&null, &number), Ordering::Less);
    // Numbers rank below strings; neither side is ever promoted.
    assert_eq!(compare_values(&number, &string), Ordering::Less);
    // The boolean literals rank above both scalars.
    assert_eq!(compare_values(&string, &boolean), Ordering::Less);
    assert_eq!(compare_values(&boolean, &array), Ordering::Less);
    assert_eq!(compare_values(&array, &object), Ordering::Less);

    assert_eq!(compare_values(&null, &boolean), Ordering::Less);
    assert_eq!(compare_values(&boolean, &number), Ordering::Greater);
    assert_eq!(compare_values(&boolean, &string), Ordering::Greater);
    assert_eq!(compare_values(&array, &array), Ordering::Equal);
    assert_eq!(
        compare_values(&JsonValue::Bool(true), &JsonValue::Bool(false)),
        Ordering::Greater
    );
}

#[test]
fn test_null_ordering() {
    assert_eq!(
        compare_values(&JsonValue::Null, &JsonValue::Null),
        Ordering::Equal
    );
    assert_eq!(
        compare_values(&JsonValue::Null, &JsonValue::Bool(false)),
        Ordering::Less
    );
    assert_eq!(
        compare_values(&val(serde_json::json!({})), &JsonValue::Null),
        Ordering::Greater
    );
}

#[test]
fn test_within_type_ordering() {
    assert_eq!(
        compare_values(&JsonValue::Bool(false), &JsonValue::Bool(true)),
        Ordering::Less
    );
    assert_eq!(
        compare_values(&JsonValue::Number(1.5), &JsonValue::Number(2.5)),
        Ordering::Less
    );
    assert_eq!(
        compare_values(&JsonValue::from("abc"), &JsonValue::from("abd")),
        Ordering::Less
    );
    assert_eq!(
        compare_values(&JsonValue::from("abc"), &JsonValue::from("abc")),
        Ordering::Equal
    );
}

#[test]
fn test_array_ordering() {
    assert_eq!(
        compare_values(&val(serde_json::json!([1, 2])), &val(serde_json::json!([1, 3]))),
        Ordering::Less
    );
    // A proper prefix is lesser.
    assert_eq!(
        compare_values(&val(serde_json::json!([1])), &val(serde_json::json!([1, 0]))),
        Ordering::Less
    );
    assert_eq!(
        compare_values(
            &val(serde_json::json!([1, 2, 3])),
            &val(serde_json::json!([1, 2, 3]))
        ),
        Ordering::Equal
    );
    // The first differing position decides, not length.
    assert_eq!(
        compare_values(&val(serde_json::json!([2])), &val(serde_json::json!([1, 9, 9]))),
        Ordering::Greater
    );
}

#[test]
fn test_object_ordering() {
    assert_eq!(
        compare_values(
            &val(serde_json::json!({"a": 1, "b": 2})),
            &val(serde_json::json!({"b": 2, "a": 1}))
        ),
        Ordering::Equal
    );
    // Sorted-key (key, value) sequence comparison.
    assert_eq!(
        compare_values(
            &val(serde_json::json!({"a": 1})),
            &val(serde_json::json!({"b": 1}))
        ),
        Ordering::Less
    );
    assert_eq!(
        compare_values(
            &val(serde_json::json!({"a": 1})),
            &val(serde_json::json!({"a": 2}))
        ),
        Ordering::Less
    );
    assert_eq!(
        compare_values(
            &val(serde_json::json!({"a": 1})),
            &val(serde_json::json!({"a": 1, "b": 2}))
        ),
        Ordering::Less
    );
}

#[test]
fn test_nan_is_equal_to_itself() {
    let nan = JsonValue::Number(f64::NAN);
    assert_eq!(compare_values(&nan, &nan), Ordering::Equal);

    let arr1 = JsonValue::Array(vec![JsonValue::Number(f64::NAN)]);
    let arr2 = JsonValue::Array(vec![JsonValue::Number(f64::NAN)]);
    assert_eq!(compare_values(&arr1, &arr2), Ordering::Equal);

    // NaN orders deterministically against other numbers.
    let one = JsonValue::Number(1.0);
    let ord = compare_values(&nan, &one);
    assert_eq!(ord, compare_values(&one, &nan).reverse());
}

#[test]
fn test_sort_mixed_values() {
    let mut values = vec![
        val(serde_json::json!({"k": 1})),
        JsonValue::from("abc"),
        JsonValue::Null,
        val(serde_json::json!([1])),
        JsonValue::Number(7.0),
        JsonValue::Bool(true),
    ];
    values.sort();
    let kinds: Vec<&str> = values
        .iter()
        .map(|v| match v {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "bool",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["null", "number", "string", "bool", "array", "object"]
    );
}

fn rand_scalar() -> JsonValue<'static> {
    let mut rng = rng();
    match rng.random_range(0..=3) {
        0 => JsonValue::Bool(rng.random_bool(0.5)),
        1 => JsonValue::String(Alphanumeric.sample_string(&mut rng, 5).into()),
        2 => JsonValue::Number(rng.random_range(-4000.0..1.3e5)),
        _ => JsonValue::Null,
    }
}

fn rand_json(depth: usize) -> JsonValue<'static> {
    let mut rng = rng();
    if depth == 0 {
        return rand_scalar();
    }
    match rng.random_range(0..=2) {
        0 => {
            let len = rng.random_range(0..=4);
            JsonValue::Array((0..len).map(|_| rand_json(depth - 1)).collect())
        }
        1 => {
            let len = rng.random_range(0..=4);
            (0..len)
                .map(|_| {
                    let k = Alphanumeric.sample_string(&mut rng, 3);
                    (k, rand_json(depth - 1))
                })
                .collect()
        }
        _ => rand_scalar(),
    }
}

#[test]
fn test_compare_is_antisymmetric() {
    for _ in 0..500 {
        let a = rand_json(2);
        let b = rand_json(2);
        assert_eq!(
            compare_values(&a, &b),
            compare_values(&b, &a).reverse(),
            "antisymmetry violated for {a} vs {b}"
        );
        assert_eq!(compare_values(&a, &a), Ordering::Equal);
    }
}

#[test]
fn test_compare_is_transitive() {
    for _ in 0..500 {
        let mut triple = [rand_json(2), rand_json(2), rand_json(2)];
        triple.sort();
        let [a, b, c] = triple;
        assert_ne!(compare_values(&a, &b), Ordering::Greater);
        assert_ne!(compare_values(&b, &c), Ordering::Greater);
        assert_ne!(
            compare_values(&a, &c),
            Ordering::Greater,
            "transitivity violated for {a}, {b}, {c}"
        );
    }
}

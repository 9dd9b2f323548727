//! Sort-and-unique over numeric sequences.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Distinct values of `values` in ascending order.
///
/// Values that compare equal collapse to the first one seen. Incomparable
/// values (NaN) sort as equal to their neighbours and are never merged.
pub fn dedup_sort<T: PartialOrd + Clone>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted.dedup_by(|later, earlier| later == earlier);
    sorted
}

/// A JSON number ordered by numeric value that serializes back in its
/// original form, so integers stay integers.
///
/// Integers and floats are compared exactly against each other, never
/// through a lossy cast, so the order is total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonNumber(pub serde_json::Number);

#[derive(Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl JsonNumber {
    fn numeric(&self) -> Numeric {
        if let Some(i) = self.0.as_i64() {
            Numeric::Int(i128::from(i))
        } else if let Some(u) = self.0.as_u64() {
            Numeric::Int(i128::from(u))
        } else {
            // serde_json never yields NaN or infinities.
            Numeric::Float(self.0.as_f64().unwrap_or_default())
        }
    }
}

/// Exact comparison of an integer against a finite float.
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    // 2^127, the first float past the i128 range.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

    let floor = float.floor();
    if floor >= LIMIT {
        return Ordering::Less;
    }
    if floor < -LIMIT {
        return Ordering::Greater;
    }
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ordering => ordering,
    }
}

impl Ord for JsonNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Numeric::Int(a), Numeric::Int(b)) => a.cmp(&b),
            (Numeric::Float(a), Numeric::Float(b)) => a.total_cmp(&b),
            (Numeric::Int(a), Numeric::Float(b)) => cmp_int_float(a, b),
            (Numeric::Float(a), Numeric::Int(b)) => cmp_int_float(b, a).reverse(),
        }
    }
}

impl PartialOrd for JsonNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for JsonNumber {}

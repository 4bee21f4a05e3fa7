// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Serde helpers for floats that may be NaN or infinite.
//!
//! JSON numbers cannot express those values and `serde_json` would write them as
//! `null`. They are written as the strings `"NaN"`, `"Infinity"` and `"-Infinity"`
//! instead; finite values stay plain numbers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

pub(crate) trait Float: Copy + PartialEq + Serialize + DeserializeOwned {
    fn is_nan(self) -> bool;
    fn special_name(self) -> Option<&'static str>;
    fn from_special_name(name: &str) -> Option<Self>;
}

macro_rules! impl_float {
    ($float:ty) => {
        impl Float for $float {
            fn is_nan(self) -> bool {
                <$float>::is_nan(self)
            }

            fn special_name(self) -> Option<&'static str> {
                if self.is_nan() {
                    Some(NAN)
                } else if self == <$float>::INFINITY {
                    Some(INFINITY)
                } else if self == <$float>::NEG_INFINITY {
                    Some(NEG_INFINITY)
                } else {
                    None
                }
            }

            fn from_special_name(name: &str) -> Option<Self> {
                match name {
                    NAN => Some(<$float>::NAN),
                    INFINITY => Some(<$float>::INFINITY),
                    NEG_INFINITY => Some(<$float>::NEG_INFINITY),
                    _ => None,
                }
            }
        }
    };
}

impl_float!(f32);
impl_float!(f64);

#[derive(Serialize)]
#[serde(untagged)]
enum FloatOut<T> {
    Number(T),
    Special(&'static str),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FloatIn<T> {
    Number(T),
    Special(String),
}

fn to_out<T: Float>(value: T) -> FloatOut<T> {
    match value.special_name() {
        Some(name) => FloatOut::Special(name),
        None => FloatOut::Number(value),
    }
}

fn from_in<T: Float, E: serde::de::Error>(value: FloatIn<T>) -> Result<T, E> {
    match value {
        FloatIn::Number(number) => Ok(number),
        FloatIn::Special(name) => T::from_special_name(&name).ok_or_else(|| {
            E::custom(format!(
                "invalid float '{}', expected a number, \"{}\", \"{}\" or \"{}\"",
                name, NAN, INFINITY, NEG_INFINITY
            ))
        }),
    }
}

/// For a single float field: `#[serde(with = "non_finite::scalar")]`.
pub(crate) mod scalar {
    use super::*;

    pub(crate) fn serialize<T: Float, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        to_out(*value).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, T: Float, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<T, D::Error> {
        from_in(FloatIn::<T>::deserialize(deserializer)?)
    }
}

/// For a float vector field: `#[serde(with = "non_finite::seq")]`.
pub(crate) mod seq {
    use super::*;

    pub(crate) fn serialize<T: Float, S: Serializer>(
        values: &[T],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|value| to_out(*value)))
    }

    pub(crate) fn deserialize<'de, T: Float, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<T>, D::Error> {
        Vec::<FloatIn<T>>::deserialize(deserializer)?
            .into_iter()
            .map(from_in)
            .collect()
    }
}

/// Value equality for float slices where NaNs in the same position are equal.
pub(crate) fn slices_equal<T: Float>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Values {
        #[serde(with = "seq")]
        values: Vec<f32>,
        #[serde(with = "scalar")]
        single: f64,
    }

    #[test]
    fn test_non_finite_values_are_named() {
        let values = Values {
            values: vec![1.5, f32::NAN, f32::INFINITY, f32::NEG_INFINITY],
            single: f64::NEG_INFINITY,
        };
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"{"values":[1.5,"NaN","Infinity","-Infinity"],"single":"-Infinity"}"#
        );

        let restored: Values = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.values[0], 1.5);
        assert!(restored.values[1].is_nan());
        assert_eq!(restored.values[2], f32::INFINITY);
        assert_eq!(restored.values[3], f32::NEG_INFINITY);
        assert_eq!(restored.single, f64::NEG_INFINITY);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let result = serde_json::from_str::<Values>(r#"{"values":["inf"],"single":1.0}"#);
        assert!(result.unwrap_err().to_string().contains("invalid float 'inf'"));
    }

    #[test]
    fn test_slices_equal() {
        assert!(slices_equal(&[1.0f32, f32::NAN], &[1.0, f32::NAN]));
        assert!(!slices_equal(&[1.0f32, f32::NAN], &[f32::NAN, 1.0]));
        assert!(!slices_equal(&[1.0f32], &[1.0, 2.0]));
    }
}

//! [`ArgType`] implementations for standard library and ecosystem types.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde_json::Value;

use super::{DeclaredType, Primitive};
use crate::coerce::CoercionError;

/// Types that can appear as record fields.
///
/// `#[derive(Record)]` calls [`ArgType::declared_type`] for every field, so a
/// field's Rust type decides how its argument is parsed. Implement this trait
/// (or use `#[derive(ArgEnum)]` for enums) to support additional types.
pub trait ArgType {
    /// Describe the type to the resolver.
    fn declared_type() -> DeclaredType;
}

macro_rules! integer_arg_types {
    ($($ty:ty => $bits:literal, $signed:literal;)*) => {
        $(
            impl ArgType for $ty {
                fn declared_type() -> DeclaredType {
                    DeclaredType::Primitive(Primitive::Integer {
                        bits: $bits,
                        signed: $signed,
                    })
                }
            }
        )*
    };
}

integer_arg_types! {
    i8 => 8, true;
    i16 => 16, true;
    i32 => 32, true;
    i64 => 64, true;
    isize => 64, true;
    u8 => 8, false;
    u16 => 16, false;
    u32 => 32, false;
    u64 => 64, false;
    usize => 64, false;
}

impl ArgType for f32 {
    fn declared_type() -> DeclaredType {
        DeclaredType::Primitive(Primitive::Float { bits: 32 })
    }
}

impl ArgType for f64 {
    fn declared_type() -> DeclaredType {
        DeclaredType::float()
    }
}

impl ArgType for String {
    fn declared_type() -> DeclaredType {
        DeclaredType::str()
    }
}

impl ArgType for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::Boolean
    }
}

impl ArgType for char {
    fn declared_type() -> DeclaredType {
        DeclaredType::custom("char", |input| {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::String(c.to_string())),
                _ => Err(CoercionError::new(format!(
                    "expected a single character, found '{input}'"
                ))),
            }
        })
    }
}

impl ArgType for PathBuf {
    fn declared_type() -> DeclaredType {
        DeclaredType::path()
    }
}

impl ArgType for Utf8PathBuf {
    fn declared_type() -> DeclaredType {
        DeclaredType::path()
    }
}

impl ArgType for Value {
    fn declared_type() -> DeclaredType {
        DeclaredType::Any
    }
}

impl<T: ArgType> ArgType for Option<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::optional(T::declared_type())
    }
}

impl<T: ArgType> ArgType for Box<T> {
    fn declared_type() -> DeclaredType {
        T::declared_type()
    }
}

impl<T: ArgType> ArgType for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::list(T::declared_type())
    }
}

impl<T: ArgType> ArgType for VecDeque<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::list(T::declared_type())
    }
}

impl<T: ArgType> ArgType for BTreeSet<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::set(T::declared_type())
    }
}

impl<T: ArgType, S> ArgType for HashSet<T, S> {
    fn declared_type() -> DeclaredType {
        DeclaredType::set(T::declared_type())
    }
}

impl<T: ArgType, const N: usize> ArgType for [T; N] {
    fn declared_type() -> DeclaredType {
        DeclaredType::tuple(std::iter::repeat_n(T::declared_type(), N))
    }
}

macro_rules! tuple_arg_types {
    ($(($($name:ident),+))*) => {
        $(
            impl<$($name: ArgType),+> ArgType for ($($name,)+) {
                fn declared_type() -> DeclaredType {
                    DeclaredType::tuple([$($name::declared_type()),+])
                }
            }
        )*
    };
}

tuple_arg_types! {
    (A)
    (A, B)
    (A, B, C)
    (A, B, C, D)
    (A, B, C, D, E)
    (A, B, C, D, E, F)
}

//! Typed wrappers over compiled functions.
//!
//! [`TypedFn<A, R>`] checks once, at construction, that a [`CompiledFn`]
//! takes the parameter types of the tuple `A` and returns `R`. Calls then
//! convert between Rust values and [`Value`]s without further checks on the
//! caller's side.

use std::convert::identity;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use mold_ir::{Type, Value};
use smallvec::SmallVec;

use crate::compiled::CompiledFn;
use crate::error::Error;

/// A Rust type that can be passed as an argument.
pub trait IntoValue {
    fn ty() -> Type;
    fn into_value(self) -> Value;
}

/// A Rust type that can be returned from a compiled function.
pub trait FromValue: Sized {
    fn ty() -> Type;
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($rust:ty, $ty:expr, $variant:ident, $into:expr, $get:ident, $from:expr) => {
        impl IntoValue for $rust {
            fn ty() -> Type {
                $ty
            }

            fn into_value(self) -> Value {
                Value::$variant($into(self))
            }
        }

        impl FromValue for $rust {
            fn ty() -> Type {
                $ty
            }

            fn from_value(value: Value) -> Option<Self> {
                value.$get().map($from)
            }
        }
    };
}

impl_scalar!(i64, Type::Int, Int, identity, as_int, identity);
impl_scalar!(f64, Type::Float, Float, identity, as_float, identity);
impl_scalar!(bool, Type::Bool, Bool, identity, as_bool, identity);
impl_scalar!(String, Type::Str, Str, Arc::<str>::from, as_str, str::to_string);

impl IntoValue for () {
    fn ty() -> Type {
        Type::Unit
    }

    fn into_value(self) -> Value {
        Value::Unit
    }
}

impl FromValue for () {
    fn ty() -> Type {
        Type::Unit
    }

    fn from_value(value: Value) -> Option<Self> {
        matches!(value, Value::Unit).then_some(())
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }

    fn into_value(self) -> Value {
        Value::list(T::ty(), self.into_iter().map(T::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }

    fn from_value(value: Value) -> Option<Self> {
        let list = value.as_list()?;
        list.items().iter().cloned().map(T::from_value).collect()
    }
}

/// A tuple of arguments.
pub trait Args {
    fn types() -> Vec<Type>;
    fn into_values(self) -> SmallVec<[Value; 4]>;
}

macro_rules! impl_args {
    ($($name:ident),*) => {
        impl<$($name: IntoValue),*> Args for ($($name,)*) {
            fn types() -> Vec<Type> {
                vec![$($name::ty()),*]
            }

            #[allow(non_snake_case, reason = "bindings are named after their type parameters")]
            fn into_values(self) -> SmallVec<[Value; 4]> {
                let ($($name,)*) = self;
                smallvec::smallvec![$($name.into_value()),*]
            }
        }
    };
}

impl_args!();
impl_args!(A);
impl_args!(A, B);
impl_args!(A, B, C);
impl_args!(A, B, C, D);

/// A [`CompiledFn`] with a checked Rust signature.
pub struct TypedFn<A, R> {
    inner: CompiledFn,
    _signature: PhantomData<fn(A) -> R>,
}

impl<A: Args, R: FromValue> TypedFn<A, R> {
    /// Wrap `inner`, checking its parameter and return types against
    /// `A` and `R`.
    pub fn new(inner: CompiledFn) -> Result<Self, Error> {
        let params = A::types();
        let ret = R::ty();
        if inner.param_types() != params.as_slice() || *inner.return_type() != ret {
            return Err(Error::SignatureMismatch {
                expected: signature(&params, &ret),
                found: signature(inner.param_types(), inner.return_type()),
            });
        }
        Ok(TypedFn {
            inner,
            _signature: PhantomData,
        })
    }

    pub fn call(&self, args: A) -> Result<R, Error> {
        let value = self.inner.call(&args.into_values())?;
        let found = value.ty();
        R::from_value(value).ok_or_else(|| Error::SignatureMismatch {
            expected: R::ty().to_string(),
            found: found.to_string(),
        })
    }

    /// Turn into a plain closure.
    pub fn into_fn(self) -> impl Fn(A) -> Result<R, Error> {
        move |args| self.call(args)
    }

    /// The untyped handle.
    pub fn inner(&self) -> &CompiledFn {
        &self.inner
    }
}

impl<A, R> Clone for TypedFn<A, R> {
    fn clone(&self) -> Self {
        TypedFn {
            inner: self.inner.clone(),
            _signature: PhantomData,
        }
    }
}

impl<A, R> fmt::Debug for TypedFn<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedFn").field(&self.inner).finish()
    }
}

/// `(int, str) -> bool`
fn signature(params: &[Type], ret: &Type) -> String {
    let params: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("({}) -> {ret}", params.join(", "))
}

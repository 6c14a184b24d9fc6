// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Overwrite-if-present, else-preserve deep merge.
//!
//! A partial configuration (`src`) is folded into an existing one (`dst`):
//!
//! - leaves present in `src` overwrite `dst`
//! - leaves absent from `src` (`None`, JSON `null`) keep the `dst` value
//! - nested sections merge field by field, unless `dst` has no such section,
//!   in which case the `src` section is adopted wholesale
//! - sequences are atomic: a non-empty `src` sequence replaces, an empty one
//!   leaves `dst` untouched
//!
//! Free-form JSON can disagree on shape (an object on one side, a scalar on
//! the other). That is reported as [`MergeError::ShapeMismatch`] rather than
//! resolved silently.

use std::fmt;

use serde_json::{Map, Value};

/// Coarse shape of a configuration value, used in merge diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
	Object,
	Array,
	Scalar,
}

impl Shape {
	pub fn of(value: &Value) -> Self {
		match value {
			Value::Object(_) => Shape::Object,
			Value::Array(_) => Shape::Array,
			_ => Shape::Scalar,
		}
	}
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Shape::Object => write!(f, "object"),
			Shape::Array => write!(f, "array"),
			Shape::Scalar => write!(f, "scalar"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
	#[error("incompatible shapes at `{path}`: stored value is {stored}, update is {update}")]
	ShapeMismatch {
		path: String,
		stored: Shape,
		update: Shape,
	},
}

impl MergeError {
	fn mismatch(stored: &Value, update: &Value) -> Self {
		MergeError::ShapeMismatch {
			path: String::new(),
			stored: Shape::of(stored),
			update: Shape::of(update),
		}
	}

	/// Prefix the error path with the enclosing field name.
	pub fn within(self, field: &str) -> Self {
		match self {
			MergeError::ShapeMismatch {
				path,
				stored,
				update,
			} => MergeError::ShapeMismatch {
				path: if path.is_empty() {
					field.to_string()
				} else {
					format!("{field}.{path}")
				},
				stored,
				update,
			},
		}
	}

	/// Dotted path of the field that failed to merge.
	pub fn path(&self) -> &str {
		match self {
			MergeError::ShapeMismatch { path, .. } => path,
		}
	}
}

/// A value that can absorb a partial update of the same schema.
pub trait Merge {
	/// Fold `other` into `self`.
	///
	/// On error `self` may be partially updated; use [`merged`] when the
	/// original must survive a failed merge.
	fn merge(&mut self, other: Self) -> Result<(), MergeError>;
}

/// Merge `src` into a copy of `dst`, leaving both inputs untouched.
pub fn merged<C>(dst: &C, src: &C) -> Result<C, MergeError>
where
	C: Merge + Clone,
{
	let mut result = dst.clone();
	result.merge(src.clone())?;
	Ok(result)
}

/// Implement [`Merge`] for a configuration section by merging each field.
///
/// The source is destructured, so adding a field to the struct without
/// listing it here fails to compile.
///
/// Fields after `flatten` are serialized inline with their parent, so their
/// errors are reported without the field name in the path.
///
/// ```ignore
/// impl_merge!(CookieConfig { key, duration_secs });
/// impl_merge!(InstanceConfig { site_url, mailer; flatten additional });
/// ```
#[macro_export]
macro_rules! impl_merge {
	($ty:ty { $($field:ident),* $(,)? }) => {
		$crate::impl_merge!($ty { $($field),* ; flatten });
	};
	($ty:ty { $($field:ident),* ; flatten $($flat:ident),* $(,)? }) => {
		impl $crate::merge::Merge for $ty {
			fn merge(&mut self, other: Self) -> Result<(), $crate::merge::MergeError> {
				let Self { $($field,)* $($flat,)* } = other;
				$(
					$crate::merge::Merge::merge(&mut self.$field, $field)
						.map_err(|e| e.within(stringify!($field)))?;
				)*
				$(
					$crate::merge::Merge::merge(&mut self.$flat, $flat)?;
				)*
				Ok(())
			}
		}
	};
}

macro_rules! impl_leaf_merge {
	($($ty:ty),* $(,)?) => {
		$(
			impl Merge for $ty {
				fn merge(&mut self, other: Self) -> Result<(), MergeError> {
					*self = other;
					Ok(())
				}
			}
		)*
	};
}

impl_leaf_merge!(String, bool, u16, u32, u64, i32, i64);

impl<T: Merge> Merge for Option<T> {
	fn merge(&mut self, other: Self) -> Result<(), MergeError> {
		let Some(other) = other else {
			return Ok(());
		};
		match self {
			Some(current) => current.merge(other),
			None => {
				*self = Some(other);
				Ok(())
			}
		}
	}
}

impl<T> Merge for Vec<T> {
	fn merge(&mut self, other: Self) -> Result<(), MergeError> {
		if !other.is_empty() {
			*self = other;
		}
		Ok(())
	}
}

impl Merge for Value {
	fn merge(&mut self, other: Self) -> Result<(), MergeError> {
		match (self, other) {
			(_, Value::Null) => Ok(()),
			(current @ Value::Null, other) => {
				*current = other;
				Ok(())
			}
			(Value::Object(current), Value::Object(other)) => current.merge(other),
			(Value::Array(current), Value::Array(other)) => {
				if !other.is_empty() {
					*current = other;
				}
				Ok(())
			}
			(current, other) => {
				if Shape::of(current) == Shape::Scalar && Shape::of(&other) == Shape::Scalar {
					*current = other;
					Ok(())
				} else {
					Err(MergeError::mismatch(current, &other))
				}
			}
		}
	}
}

fn merge_entry(
	current: &mut Map<String, Value>,
	key: String,
	value: Value,
) -> Result<(), MergeError> {
	match current.get_mut(&key) {
		Some(existing) => existing.merge(value).map_err(|e| e.within(&key)),
		None => {
			if !value.is_null() {
				current.insert(key, value);
			}
			Ok(())
		}
	}
}

impl Merge for Map<String, Value> {
	fn merge(&mut self, other: Self) -> Result<(), MergeError> {
		for (key, value) in other {
			merge_entry(self, key, value)?;
		}
		Ok(())
	}
}

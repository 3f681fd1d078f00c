//! Error taxonomy for schema construction and dump execution
//!
//! Every failure is deterministic given the same input, so nothing here is
//! retried. A failed dump never surfaces a partial document.

use thiserror::Error;

/// Result alias used throughout the dump path.
pub type DumpResult<T> = Result<T, DumpError>;

/// Errors raised while dumping an object through a schema.
///
/// All variants carry the context a caller needs for diagnostics: the field
/// name, the offending value, or the participating schemas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DumpError {
	/// A declared field's source attribute is absent on the object.
	#[error("object being dumped has no value for field `{field}`")]
	MissingAttribute { field: String },

	/// A field's value failed validation or formatting.
	#[error("field `{field}` rejected value `{value}`: {reason}")]
	Format {
		field: String,
		value: String,
		reason: String,
	},

	/// The same (schema, object) pair was entered twice on one traversal
	/// path. `path` lists schema names from the dump root to the repeated
	/// entry.
	#[error("cyclic reference detected on schema `{schema}` (path: {})", .path.join(" -> "))]
	CyclicReference { schema: String, path: Vec<String> },

	/// A nested field was resolved through a [`SchemaRef`](crate::SchemaRef)
	/// that was never bound.
	#[error("schema reference `{schema}` was used before being bound")]
	UnboundSchema { schema: String },

	/// Nesting went deeper than the engine's configured ceiling.
	#[error("dump exceeded the maximum nesting depth of {max_depth}")]
	DepthExceeded { max_depth: usize },
}

impl DumpError {
	pub(crate) fn missing_attribute(field: impl Into<String>) -> Self {
		DumpError::MissingAttribute {
			field: field.into(),
		}
	}

	pub(crate) fn format(
		field: impl Into<String>,
		value: impl Into<String>,
		reason: impl Into<String>,
	) -> Self {
		DumpError::Format {
			field: field.into(),
			value: value.into(),
			reason: reason.into(),
		}
	}

	/// The field name this error is attached to, if any.
	pub fn field(&self) -> Option<&str> {
		match self {
			DumpError::MissingAttribute { field } | DumpError::Format { field, .. } => {
				Some(field)
			}
			_ => None,
		}
	}
}

/// Errors raised while declaring schemas, before any dump runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
	/// Field names must be unique within one schema.
	#[error("schema `{schema}` declares field `{field}` more than once")]
	DuplicateField { schema: String, field: String },

	/// A [`SchemaRef`](crate::SchemaRef) can be bound exactly once.
	#[error("schema reference `{schema}` is already bound")]
	AlreadyBound { schema: String },
}

//! Late-bound schema references for nested and mutually referential schemas
//!
//! Nested fields hold a [`SchemaRef`] rather than the schema itself, and
//! the reference is only resolved while dumping. This allows a schema pair
//! to be declared in either order, or to reference each other, without
//! fighting initialization order: declare the handles first, bind each
//! schema once it is built.
//!
//! Declaring nesting in both directions of a relationship is legal at
//! construction time, but dumping through such a pair trips the traversal
//! guard (see [`DumpError::CyclicReference`]); a terminating design nests
//! in one direction only.

use crate::engine::Dumper;
use crate::error::{DumpError, DumpResult, SchemaError};
use crate::schema::Schema;
use crate::value::Document;
use once_cell::sync::OnceCell;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

struct RefInner<T> {
	name: String,
	cell: OnceCell<Schema<T>>,
}

/// A cheaply cloneable, late-bound handle to a [`Schema`].
///
/// # Examples
///
/// Mutually referential declarations:
///
/// ```
/// use std::sync::Arc;
/// use grappelli::{Field, Schema, SchemaRef};
///
/// struct Author {
/// 	name: String,
/// }
/// struct Book {
/// 	title: String,
/// 	author: Arc<Author>,
/// }
///
/// let author_schema: SchemaRef<Author> = SchemaRef::declare("Author");
/// let book_schema: SchemaRef<Book> = SchemaRef::declare("Book");
///
/// book_schema
/// 	.bind(
/// 		Schema::builder("Book")
/// 			.field(Field::string("title", |b: &Book| Some(b.title.clone())))
/// 			.field(Field::nested("author", author_schema.clone(), |b: &Book| {
/// 				Some(b.author.clone())
/// 			}))
/// 			.build()
/// 			.unwrap(),
/// 	)
/// 	.unwrap();
/// author_schema
/// 	.bind(
/// 		Schema::builder("Author")
/// 			.field(Field::string("name", |a: &Author| Some(a.name.clone())))
/// 			.build()
/// 			.unwrap(),
/// 	)
/// 	.unwrap();
///
/// let book = Book {
/// 	title: "As I Lay Dying".into(),
/// 	author: Arc::new(Author { name: "William Faulkner".into() }),
/// };
/// assert_eq!(book_schema.dump(&book).unwrap()["author"]["name"], "William Faulkner");
/// ```
pub struct SchemaRef<T> {
	inner: Arc<RefInner<T>>,
}

impl<T> SchemaRef<T> {
	/// Declare a named reference with no schema bound yet.
	pub fn declare(name: impl Into<String>) -> Self {
		Self {
			inner: Arc::new(RefInner {
				name: name.into(),
				cell: OnceCell::new(),
			}),
		}
	}

	/// The name given at declaration, used in diagnostics.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// Bind the schema. A reference can be bound exactly once; every clone
	/// of the handle observes the binding.
	pub fn bind(&self, schema: Schema<T>) -> Result<(), SchemaError> {
		self.inner
			.cell
			.set(schema)
			.map_err(|_| SchemaError::AlreadyBound {
				schema: self.inner.name.clone(),
			})
	}

	pub fn is_bound(&self) -> bool {
		self.inner.cell.get().is_some()
	}

	pub fn get(&self) -> Option<&Schema<T>> {
		self.inner.cell.get()
	}

	/// The bound schema, or [`DumpError::UnboundSchema`]; resolution is
	/// deferred to dump time by design.
	pub(crate) fn resolve(&self) -> DumpResult<&Schema<T>> {
		self.get().ok_or_else(|| DumpError::UnboundSchema {
			schema: self.inner.name.clone(),
		})
	}

	/// Dump one object through the bound schema.
	pub fn dump(&self, object: &T) -> DumpResult<Document> {
		Dumper::new().dump(self.resolve()?, object)
	}

	/// Dump a sequence of objects through the bound schema, preserving
	/// input order. Fail-fast like [`Schema::dump_many`].
	pub fn dump_many<I>(&self, objects: I) -> DumpResult<Vec<Document>>
	where
		I: IntoIterator,
		I::Item: Borrow<T>,
	{
		Dumper::new().dump_many(self.resolve()?, objects)
	}
}

impl<T> Clone for SchemaRef<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

/// Wrap an already-built schema, for the common forward-only case.
impl<T> From<Schema<T>> for SchemaRef<T> {
	fn from(schema: Schema<T>) -> Self {
		let reference = SchemaRef::declare(schema.name());
		let _ = reference.inner.cell.set(schema);
		reference
	}
}

impl<T> fmt::Debug for SchemaRef<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SchemaRef")
			.field("name", &self.inner.name)
			.field("bound", &self.is_bound())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::Field;

	struct Patient {
		name: String,
	}

	fn patient_schema() -> Schema<Patient> {
		Schema::builder("Patient")
			.field(Field::string("name", |p: &Patient| Some(p.name.clone())))
			.build()
			.unwrap()
	}

	#[test]
	fn test_dump_through_unbound_reference_fails() {
		let reference: SchemaRef<Patient> = SchemaRef::declare("Patient");
		let error = reference
			.dump(&Patient {
				name: "Kalani".to_string(),
			})
			.unwrap_err();
		assert_eq!(
			error,
			DumpError::UnboundSchema {
				schema: "Patient".to_string()
			}
		);
	}

	#[test]
	fn test_bind_then_dump() {
		let reference: SchemaRef<Patient> = SchemaRef::declare("Patient");
		reference.bind(patient_schema()).unwrap();
		assert!(reference.is_bound());

		let document = reference
			.dump(&Patient {
				name: "Kalani".to_string(),
			})
			.unwrap();
		assert_eq!(document["name"], "Kalani");
	}

	#[test]
	fn test_rebinding_is_rejected() {
		let reference: SchemaRef<Patient> = SchemaRef::declare("Patient");
		reference.bind(patient_schema()).unwrap();

		let error = reference.bind(patient_schema()).unwrap_err();
		assert_eq!(
			error,
			SchemaError::AlreadyBound {
				schema: "Patient".to_string()
			}
		);
	}

	#[test]
	fn test_clones_observe_the_binding() {
		let reference: SchemaRef<Patient> = SchemaRef::declare("Patient");
		let clone = reference.clone();
		reference.bind(patient_schema()).unwrap();
		assert!(clone.is_bound());
	}

	#[test]
	fn test_from_schema_is_bound_immediately() {
		let reference = SchemaRef::from(patient_schema());
		assert_eq!(reference.name(), "Patient");
		assert!(reference.is_bound());
	}
}

//! Schemas: ordered field declarations for one object type
//!
//! A [`Schema`] is declared once at configuration time and reused for any
//! number of dumps. Field order in the output document is exactly the
//! declaration order, and field names are unique within one schema; the
//! builder rejects duplicates.

use crate::context::DumpContext;
use crate::engine::Dumper;
use crate::error::{DumpResult, SchemaError};
use crate::fields::Field;
use crate::value::Document;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// An ordered declaration of how one object type becomes a document.
///
/// # Examples
///
/// ```
/// use grappelli::{Field, Schema};
///
/// struct Author {
/// 	name: String,
/// 	email: String,
/// }
///
/// let schema = Schema::builder("Author")
/// 	.field(Field::string("name", |a: &Author| Some(a.name.clone())))
/// 	.field(Field::email("email", |a: &Author| Some(a.email.clone())))
/// 	.build()
/// 	.unwrap();
///
/// let author = Author {
/// 	name: "William Faulkner".into(),
/// 	email: "will@email.com".into(),
/// };
/// let document = schema.dump(&author).unwrap();
/// assert_eq!(document.keys().collect::<Vec<_>>(), ["name", "email"]);
/// ```
pub struct Schema<T> {
	name: String,
	fields: Vec<Field<T>>,
}

impl<T> Schema<T> {
	/// Start declaring a schema with the given name.
	///
	/// The name appears in cycle diagnostics and schema errors.
	pub fn builder(name: impl Into<String>) -> SchemaBuilder<T> {
		SchemaBuilder {
			name: name.into(),
			fields: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared field names, in declaration order.
	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(Field::name)
	}

	pub fn field_count(&self) -> usize {
		self.fields.len()
	}

	/// Dump one object into a document.
	///
	/// Fields are resolved in declaration order; the first failing field
	/// aborts the call with its error, and no partial document is returned.
	pub fn dump(&self, object: &T) -> DumpResult<Document> {
		Dumper::new().dump(self, object)
	}

	/// Dump a sequence of objects, preserving input order.
	///
	/// Fail-fast: the first object that fails aborts the call. Accepts any
	/// iterable of owned, referenced, or `Arc`-shared objects.
	pub fn dump_many<I>(&self, objects: I) -> DumpResult<Vec<Document>>
	where
		I: IntoIterator,
		I::Item: Borrow<T>,
	{
		Dumper::new().dump_many(self, objects)
	}

	/// Dump one object inside an already-established traversal context.
	///
	/// This is the nesting entry point: the (schema, object) pair is pushed
	/// onto the context's active path for the duration of the call.
	pub(crate) fn dump_with(&self, object: &T, context: &mut DumpContext) -> DumpResult<Document> {
		let schema_id = self as *const Self as usize;
		let object_id = object as *const T as usize;
		context.enter(schema_id, object_id, &self.name)?;
		let outcome = self.dump_fields(object, context);
		context.leave(schema_id, object_id);
		outcome
	}

	fn dump_fields(&self, object: &T, context: &mut DumpContext) -> DumpResult<Document> {
		let mut document = Document::with_capacity(self.fields.len());
		for field in &self.fields {
			let value = field.resolve(object, context)?;
			document.insert(field.name(), value);
		}
		Ok(document)
	}
}

impl<T> fmt::Debug for Schema<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Schema")
			.field("name", &self.name)
			.field("fields", &self.field_names().collect::<Vec<_>>())
			.finish()
	}
}

/// Builder returned by [`Schema::builder`].
pub struct SchemaBuilder<T> {
	name: String,
	fields: Vec<Field<T>>,
}

impl<T> SchemaBuilder<T> {
	/// Append a field declaration. Output order follows call order.
	pub fn field(mut self, field: Field<T>) -> Self {
		self.fields.push(field);
		self
	}

	/// Finish the declaration, enforcing unique field names.
	pub fn build(self) -> Result<Schema<T>, SchemaError> {
		let mut seen = HashSet::new();
		for field in &self.fields {
			if !seen.insert(field.name()) {
				return Err(SchemaError::DuplicateField {
					schema: self.name.clone(),
					field: field.name().to_string(),
				});
			}
		}
		Ok(Schema {
			name: self.name,
			fields: self.fields,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DumpError;

	struct Specialty {
		code: String,
		description: String,
	}

	fn schema() -> Schema<Specialty> {
		Schema::builder("Specialty")
			.field(Field::string("code", |s: &Specialty| Some(s.code.clone())))
			.field(Field::string("description", |s: &Specialty| {
				Some(s.description.clone())
			}))
			.build()
			.unwrap()
	}

	fn family_medicine() -> Specialty {
		Specialty {
			code: "fm".to_string(),
			description: "Family Medicine".to_string(),
		}
	}

	#[test]
	fn test_dump_keys_follow_declaration_order() {
		let document = schema().dump(&family_medicine()).unwrap();
		assert_eq!(document.keys().collect::<Vec<_>>(), ["code", "description"]);
		assert_eq!(document["code"], "fm");
		assert_eq!(document["description"], "Family Medicine");
	}

	#[test]
	fn test_dump_many_equals_individual_dumps() {
		let schema = schema();
		let pediatrics = Specialty {
			code: "ped".to_string(),
			description: "Pediatrics".to_string(),
		};
		let one = schema.dump(&family_medicine()).unwrap();
		let two = schema.dump(&pediatrics).unwrap();

		let many = schema
			.dump_many([&family_medicine(), &pediatrics])
			.unwrap();
		assert_eq!(many, vec![one, two]);
	}

	#[test]
	fn test_dump_many_is_fail_fast() {
		let schema = Schema::builder("Specialty")
			.field(Field::string("code", |s: &Specialty| {
				if s.code.is_empty() {
					None
				} else {
					Some(s.code.clone())
				}
			}))
			.build()
			.unwrap();

		let broken = Specialty {
			code: String::new(),
			description: String::new(),
		};
		let error = schema
			.dump_many([&family_medicine(), &broken])
			.unwrap_err();
		assert_eq!(
			error,
			DumpError::MissingAttribute {
				field: "code".to_string()
			}
		);
	}

	#[test]
	fn test_duplicate_field_rejected_at_build() {
		let result = Schema::builder("Specialty")
			.field(Field::string("code", |s: &Specialty| Some(s.code.clone())))
			.field(Field::string("code", |s: &Specialty| Some(s.code.clone())))
			.build();
		assert_eq!(
			result.unwrap_err(),
			SchemaError::DuplicateField {
				schema: "Specialty".to_string(),
				field: "code".to_string(),
			}
		);
	}

	#[test]
	fn test_schema_introspection() {
		let schema = schema();
		assert_eq!(schema.name(), "Specialty");
		assert_eq!(schema.field_count(), 2);
		assert_eq!(
			schema.field_names().collect::<Vec<_>>(),
			["code", "description"]
		);
	}
}

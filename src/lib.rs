//! Declarative schema-based serialization of object graphs
//!
//! Grappelli maps in-memory domain objects, including nested and mutually
//! referential graphs, into plain, insertion-ordered key-value documents
//! ready for a JSON encoder. Inspired by declarative serialization layers
//! like marshmallow and Django REST Framework serializers.
//!
//! - **Declare once, dump many**: a [`Schema`] is an immutable, reusable,
//!   ordered set of [`Field`] declarations for one object type.
//! - **Composition**: nested fields delegate to another schema through a
//!   late-bound [`SchemaRef`], so forward and circular declarations work.
//! - **Derived collections**: a [`Registry`] is an explicit, caller-owned
//!   index for "all objects whose back-reference matches me" lookups.
//! - **Bounded traversal**: object graphs may be cyclic, documents are
//!   finite trees: re-entering a (schema, object) pair on one traversal
//!   path fails with [`DumpError::CyclicReference`] instead of recursing
//!   forever.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use grappelli::{Field, Registry, Schema, SchemaRef};
//!
//! struct Author {
//! 	name: String,
//! 	email: String,
//! }
//! struct Book {
//! 	isbn: String,
//! 	title: String,
//! 	author: Arc<Author>,
//! }
//!
//! let author_schema = SchemaRef::from(
//! 	Schema::builder("Author")
//! 		.field(Field::string("name", |a: &Author| Some(a.name.clone())))
//! 		.field(Field::email("email", |a: &Author| Some(a.email.clone())))
//! 		.build()
//! 		.unwrap(),
//! );
//!
//! let book_schema = Schema::builder("Book")
//! 	.field(Field::string("isbn", |b: &Book| Some(b.isbn.clone())))
//! 	.field(Field::string("title", |b: &Book| Some(b.title.clone())))
//! 	.field(Field::nested("author", author_schema, |b: &Book| {
//! 		Some(b.author.clone())
//! 	}))
//! 	.build()
//! 	.unwrap();
//!
//! let books: Registry<Book> = Registry::new();
//! let faulkner = Arc::new(Author {
//! 	name: "William Faulkner".into(),
//! 	email: "will@email.com".into(),
//! });
//! books.insert(Book {
//! 	isbn: "067973225X".into(),
//! 	title: "As I Lay Dying".into(),
//! 	author: faulkner.clone(),
//! });
//!
//! let documents = book_schema.dump_many(books.all()).unwrap();
//! assert_eq!(documents[0]["title"], "As I Lay Dying");
//! assert_eq!(documents[0]["author"]["name"], "William Faulkner");
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod fields;
pub mod nested;
pub mod registry;
pub mod schema;
pub mod value;

pub use context::DumpContext;
pub use engine::{DEFAULT_MAX_DEPTH, Dumper};
pub use error::{DumpError, DumpResult, SchemaError};
pub use fields::{DATE_FORMAT, DATETIME_FORMAT, Field, FieldKind, FormatFailure};
pub use nested::SchemaRef;
pub use registry::Registry;
pub use schema::{Schema, SchemaBuilder};
pub use value::{Document, Value};

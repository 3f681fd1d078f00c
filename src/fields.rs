//! Field descriptors: the named extraction and formatting rules of a schema
//!
//! A [`Field`] describes how one attribute of a source object becomes one
//! entry of the output document. Three kinds exist:
//!
//! - **plain** fields read an attribute and convert it to a [`Value`]
//!   ([`string`](Field::string), [`integer`](Field::integer), ...);
//! - **formatted** fields additionally validate or normalize the raw value
//!   ([`email`](Field::email), [`datetime`](Field::datetime), ...);
//! - **nested** fields delegate to another schema through a [`SchemaRef`]
//!   ([`nested`](Field::nested), [`nested_many`](Field::nested_many)).
//!
//! Extractors are plain closures over the source object, so any structured
//! type works; no trait implementation on the domain side is required.
//! Extraction is read-only; an extractor returning `None` means the object
//! lacks the attribute and the dump fails with
//! [`DumpError::MissingAttribute`].

use crate::context::DumpContext;
use crate::error::{DumpError, DumpResult};
use crate::nested::SchemaRef;
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Canonical, locale-independent rendering for datetime fields.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Canonical rendering for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input formats accepted by [`Field::datetime_str`], tried in order.
const DATETIME_INPUT_FORMATS: &[&str] = &[
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %H:%M",
];

static EMAIL_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// The kind of a [`Field`], for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	Plain,
	Formatted,
	Nested,
}

/// A formatted field's rejection of a raw value.
///
/// Carried back to the schema, which attaches the field name and surfaces
/// it as [`DumpError::Format`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormatFailure {
	pub value: String,
	pub reason: String,
}

impl FormatFailure {
	pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			reason: reason.into(),
		}
	}
}

type ExtractFn<T> = Box<dyn Fn(&T) -> Option<Value> + Send + Sync>;
type FormatFn<T> = Box<dyn Fn(&T) -> Option<Result<Value, FormatFailure>> + Send + Sync>;
type NestedFn<T> = Box<dyn Fn(&T, &mut DumpContext) -> DumpResult<Value> + Send + Sync>;

enum Resolver<T> {
	Plain(ExtractFn<T>),
	Formatted(FormatFn<T>),
	Nested(NestedFn<T>),
}

/// One named extraction rule within a schema.
///
/// Immutable once constructed and owned by its schema. Construction goes
/// through the typed constructors below.
pub struct Field<T> {
	name: String,
	resolver: Resolver<T>,
}

impl<T> Field<T> {
	/// A plain string field.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::{Field, Schema};
	///
	/// struct Author {
	/// 	name: String,
	/// }
	///
	/// let schema = Schema::builder("Author")
	/// 	.field(Field::string("name", |a: &Author| Some(a.name.clone())))
	/// 	.build()
	/// 	.unwrap();
	///
	/// let document = schema
	/// 	.dump(&Author { name: "Colson Whitehead".into() })
	/// 	.unwrap();
	/// assert_eq!(document["name"], "Colson Whitehead");
	/// ```
	pub fn string<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<String> + Send + Sync + 'static,
	{
		Self::plain(name, move |object| extract(object).map(Value::String))
	}

	/// A plain integer field.
	pub fn integer<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<i64> + Send + Sync + 'static,
	{
		Self::plain(name, move |object| extract(object).map(Value::Integer))
	}

	/// A plain float field.
	pub fn float<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<f64> + Send + Sync + 'static,
	{
		Self::plain(name, move |object| extract(object).map(Value::Float))
	}

	/// A plain boolean field.
	pub fn boolean<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<bool> + Send + Sync + 'static,
	{
		Self::plain(name, move |object| extract(object).map(Value::Boolean))
	}

	/// A plain field producing any [`Value`], for cases the typed
	/// constructors do not cover.
	pub fn value<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
	{
		Self::plain(name, extract)
	}

	/// An email field: the extracted address is trimmed and validated.
	///
	/// An address that does not look like `local@domain.tld` fails the dump
	/// with [`DumpError::Format`] naming the field and the offending value.
	pub fn email<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<String> + Send + Sync + 'static,
	{
		Self::formatted(name, move |object| {
			extract(object).map(|raw| {
				let address = raw.trim();
				if EMAIL_PATTERN.is_match(address) {
					Ok(Value::String(address.to_string()))
				} else {
					Err(FormatFailure::new(raw, "not a valid email address"))
				}
			})
		})
	}

	/// A datetime field rendered as the canonical ISO-8601 string
	/// `YYYY-MM-DDTHH:MM:SS`, independent of platform locale.
	///
	/// # Examples
	///
	/// ```
	/// use chrono::NaiveDate;
	/// use grappelli::{Field, Schema};
	///
	/// struct Appointment {
	/// 	at: chrono::NaiveDateTime,
	/// }
	///
	/// let schema = Schema::builder("Appointment")
	/// 	.field(Field::datetime("at", |a: &Appointment| Some(a.at)))
	/// 	.build()
	/// 	.unwrap();
	///
	/// let at = NaiveDate::from_ymd_opt(2023, 2, 28)
	/// 	.unwrap()
	/// 	.and_hms_opt(18, 50, 0)
	/// 	.unwrap();
	/// let document = schema.dump(&Appointment { at }).unwrap();
	/// assert_eq!(document["at"], "2023-02-28T18:50:00");
	/// ```
	pub fn datetime<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<NaiveDateTime> + Send + Sync + 'static,
	{
		Self::formatted(name, move |object| {
			extract(object)
				.map(|datetime| Ok(Value::String(datetime.format(DATETIME_FORMAT).to_string())))
		})
	}

	/// A date field rendered as `YYYY-MM-DD`.
	pub fn date<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<NaiveDate> + Send + Sync + 'static,
	{
		Self::formatted(name, move |object| {
			extract(object).map(|date| Ok(Value::String(date.format(DATE_FORMAT).to_string())))
		})
	}

	/// A datetime field whose source attribute is itself a string.
	///
	/// The input is parsed against a fixed list of accepted formats and
	/// re-rendered canonically; input matching none of them fails with
	/// [`DumpError::Format`].
	pub fn datetime_str<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<String> + Send + Sync + 'static,
	{
		Self::formatted(name, move |object| {
			extract(object).map(|raw| {
				let trimmed = raw.trim();
				DATETIME_INPUT_FORMATS
					.iter()
					.find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
					.map(|datetime| Value::String(datetime.format(DATETIME_FORMAT).to_string()))
					.ok_or_else(|| {
						FormatFailure::new(raw, "does not match any accepted date/time format")
					})
			})
		})
	}

	/// A formatted field with caller-supplied validation/normalization.
	///
	/// The closure returns `None` when the attribute is missing,
	/// `Some(Err(_))` when the raw value is rejected, and `Some(Ok(_))`
	/// with the normalized value otherwise.
	pub fn formatted<F>(name: impl Into<String>, format: F) -> Self
	where
		F: Fn(&T) -> Option<Result<Value, FormatFailure>> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			resolver: Resolver::Formatted(Box::new(format)),
		}
	}

	/// A singular nested field: the related object is dumped through
	/// `target` and embedded as one nested document.
	///
	/// The extractor may read a stored reference or compute the related
	/// object; either way the relation is shared via [`Arc`], mirroring a
	/// reference-holding object graph.
	///
	/// # Examples
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
	/// let author_schema = SchemaRef::from(
	/// 	Schema::builder("Author")
	/// 		.field(Field::string("name", |a: &Author| Some(a.name.clone())))
	/// 		.build()
	/// 		.unwrap(),
	/// );
	///
	/// let book_schema = Schema::builder("Book")
	/// 	.field(Field::string("title", |b: &Book| Some(b.title.clone())))
	/// 	.field(Field::nested("author", author_schema, |b: &Book| {
	/// 		Some(b.author.clone())
	/// 	}))
	/// 	.build()
	/// 	.unwrap();
	///
	/// let book = Book {
	/// 	title: "The Underground Railroad".into(),
	/// 	author: Arc::new(Author { name: "Colson Whitehead".into() }),
	/// };
	/// let document = book_schema.dump(&book).unwrap();
	/// assert_eq!(document["author"]["name"], "Colson Whitehead");
	/// ```
	pub fn nested<U, F>(name: impl Into<String>, target: SchemaRef<U>, extract: F) -> Self
	where
		U: 'static,
		F: Fn(&T) -> Option<Arc<U>> + Send + Sync + 'static,
	{
		let name = name.into();
		let field_name = name.clone();
		let resolver = move |object: &T, context: &mut DumpContext| -> DumpResult<Value> {
			let related = extract(object)
				.ok_or_else(|| DumpError::missing_attribute(field_name.clone()))?;
			let schema = target.resolve()?;
			schema
				.dump_with(related.as_ref(), context)
				.map(Value::Object)
		};
		Self {
			name,
			resolver: Resolver::Nested(Box::new(resolver)),
		}
	}

	/// A plural nested field: each related object is dumped through
	/// `target` and the results form an ordered sequence of documents.
	///
	/// The extractor's output order is preserved, so a derived lookup
	/// against a [`Registry`](crate::Registry) keeps registration order.
	pub fn nested_many<U, F>(name: impl Into<String>, target: SchemaRef<U>, extract: F) -> Self
	where
		U: 'static,
		F: Fn(&T) -> Option<Vec<Arc<U>>> + Send + Sync + 'static,
	{
		let name = name.into();
		let field_name = name.clone();
		let resolver = move |object: &T, context: &mut DumpContext| -> DumpResult<Value> {
			let related = extract(object)
				.ok_or_else(|| DumpError::missing_attribute(field_name.clone()))?;
			let schema = target.resolve()?;
			let mut documents = Vec::with_capacity(related.len());
			for item in &related {
				documents.push(Value::Object(schema.dump_with(item.as_ref(), context)?));
			}
			Ok(Value::Array(documents))
		};
		Self {
			name,
			resolver: Resolver::Nested(Box::new(resolver)),
		}
	}

	fn plain<F>(name: impl Into<String>, extract: F) -> Self
	where
		F: Fn(&T) -> Option<Value> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			resolver: Resolver::Plain(Box::new(extract)),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> FieldKind {
		match self.resolver {
			Resolver::Plain(_) => FieldKind::Plain,
			Resolver::Formatted(_) => FieldKind::Formatted,
			Resolver::Nested(_) => FieldKind::Nested,
		}
	}

	/// Produce this field's value for one source object.
	pub(crate) fn resolve(&self, object: &T, context: &mut DumpContext) -> DumpResult<Value> {
		match &self.resolver {
			Resolver::Plain(extract) => {
				extract(object).ok_or_else(|| DumpError::missing_attribute(self.name.as_str()))
			}
			Resolver::Formatted(format) => match format(object) {
				None => Err(DumpError::missing_attribute(self.name.as_str())),
				Some(Ok(value)) => Ok(value),
				Some(Err(failure)) => Err(DumpError::format(
					self.name.as_str(),
					failure.value,
					failure.reason,
				)),
			},
			Resolver::Nested(resolve) => resolve(object, context),
		}
	}
}

impl<T> fmt::Debug for Field<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("kind", &self.kind())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Patient {
		name: String,
		email: String,
		nickname: Option<String>,
		born: NaiveDateTime,
	}

	fn lua() -> Patient {
		Patient {
			name: "Lua".to_string(),
			email: "lua@email.com".to_string(),
			nickname: None,
			born: NaiveDate::from_ymd_opt(2001, 5, 31)
				.unwrap()
				.and_hms_opt(0, 0, 0)
				.unwrap(),
		}
	}

	fn resolve(field: &Field<Patient>, patient: &Patient) -> DumpResult<Value> {
		let mut context = DumpContext::new(8);
		field.resolve(patient, &mut context)
	}

	#[test]
	fn test_string_field_reads_attribute() {
		let field = Field::string("name", |p: &Patient| Some(p.name.clone()));
		assert_eq!(resolve(&field, &lua()).unwrap(), "Lua");
		assert_eq!(field.kind(), FieldKind::Plain);
	}

	#[test]
	fn test_missing_attribute_names_field() {
		let field = Field::string("nickname", |p: &Patient| p.nickname.clone());
		assert_eq!(
			resolve(&field, &lua()).unwrap_err(),
			DumpError::MissingAttribute {
				field: "nickname".to_string()
			}
		);
	}

	#[test]
	fn test_email_field_accepts_and_trims() {
		let field = Field::email("email", |p: &Patient| Some(format!("  {}  ", p.email)));
		assert_eq!(resolve(&field, &lua()).unwrap(), "lua@email.com");
		assert_eq!(field.kind(), FieldKind::Formatted);
	}

	#[test]
	fn test_email_field_rejects_malformed_address() {
		let field = Field::email("email", |_: &Patient| Some("no-at-sign".to_string()));
		let error = resolve(&field, &lua()).unwrap_err();
		assert_eq!(
			error,
			DumpError::Format {
				field: "email".to_string(),
				value: "no-at-sign".to_string(),
				reason: "not a valid email address".to_string(),
			}
		);
	}

	#[test]
	fn test_datetime_field_renders_canonically() {
		let field = Field::datetime("born", |p: &Patient| Some(p.born));
		assert_eq!(resolve(&field, &lua()).unwrap(), "2001-05-31T00:00:00");
	}

	#[test]
	fn test_datetime_str_normalizes_space_separator() {
		let field = Field::datetime_str("at", |_: &Patient| {
			Some("2023-02-28 18:50:00".to_string())
		});
		assert_eq!(resolve(&field, &lua()).unwrap(), "2023-02-28T18:50:00");
	}

	#[test]
	fn test_datetime_str_rejects_unparsable_input() {
		let field = Field::datetime_str("at", |_: &Patient| Some("tomorrow-ish".to_string()));
		let error = resolve(&field, &lua()).unwrap_err();
		assert!(matches!(error, DumpError::Format { ref field, .. } if field == "at"));
	}

	#[test]
	fn test_integer_and_boolean_fields() {
		let age = Field::integer("age", |_: &Patient| Some(24));
		let active = Field::boolean("active", |_: &Patient| Some(true));
		assert_eq!(resolve(&age, &lua()).unwrap(), 24);
		assert_eq!(resolve(&active, &lua()).unwrap(), true);
	}
}

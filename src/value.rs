//! Plain value trees produced by a dump
//!
//! A dump turns a domain object into a [`Document`]: an insertion-ordered
//! mapping from field name to [`Value`]. Documents are ephemeral output,
//! created per dump call and handed to the caller; they never share mutable
//! state with the source object.

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// A single plain value inside a [`Document`].
///
/// Timestamps are carried as canonical ISO-8601 strings, so the whole tree
/// is made of JSON-compatible leaves plus nested documents and sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Boolean(bool),
	Integer(i64),
	Float(f64),
	String(String),
	Array(Vec<Value>),
	Object(Document),
}

static NULL: Value = Value::Null;

impl Value {
	/// Convert into a `serde_json::Value`.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli::Value;
	///
	/// let value = Value::Array(vec![Value::Integer(1), Value::String("two".into())]);
	/// assert_eq!(value.to_json(), serde_json::json!([1, "two"]));
	/// ```
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Null => serde_json::Value::Null,
			Value::Boolean(value) => (*value).into(),
			Value::Integer(value) => (*value).into(),
			Value::Float(value) => serde_json::Number::from_f64(*value)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::String(value) => value.clone().into(),
			Value::Array(items) => {
				serde_json::Value::Array(items.iter().map(Value::to_json).collect())
			}
			Value::Object(document) => document.to_json(),
		}
	}

	/// Returns the nested document if this value is an object.
	pub fn as_document(&self) -> Option<&Document> {
		match self {
			Value::Object(document) => Some(document),
			_ => None,
		}
	}

	/// Returns the items if this value is a sequence.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Value::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Returns the string slice if this value is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(value) => Some(value),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Null => serializer.serialize_unit(),
			Value::Boolean(value) => serializer.serialize_bool(*value),
			Value::Integer(value) => serializer.serialize_i64(*value),
			Value::Float(value) => serializer.serialize_f64(*value),
			Value::String(value) => serializer.serialize_str(value),
			Value::Array(items) => serializer.collect_seq(items),
			Value::Object(document) => document.serialize(serializer),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Integer(value.into())
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Integer(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::Array(items)
	}
}

impl From<Document> for Value {
	fn from(document: Document) -> Self {
		Value::Object(document)
	}
}

impl PartialEq<str> for Value {
	fn eq(&self, other: &str) -> bool {
		matches!(self, Value::String(value) if value == other)
	}
}

impl PartialEq<&str> for Value {
	fn eq(&self, other: &&str) -> bool {
		self == *other
	}
}

impl PartialEq<String> for Value {
	fn eq(&self, other: &String) -> bool {
		self == other.as_str()
	}
}

impl PartialEq<i64> for Value {
	fn eq(&self, other: &i64) -> bool {
		matches!(self, Value::Integer(value) if value == other)
	}
}

impl PartialEq<f64> for Value {
	fn eq(&self, other: &f64) -> bool {
		matches!(self, Value::Float(value) if value == other)
	}
}

impl PartialEq<bool> for Value {
	fn eq(&self, other: &bool) -> bool {
		matches!(self, Value::Boolean(value) if value == other)
	}
}

/// Indexing into an object value, `serde_json`-style: missing keys and
/// non-object values yield [`Value::Null`] instead of panicking.
impl Index<&str> for Value {
	type Output = Value;

	fn index(&self, key: &str) -> &Value {
		match self {
			Value::Object(document) => &document[key],
			_ => &NULL,
		}
	}
}

/// The ordered key-value output of a dump.
///
/// Field order is exactly the declaration order of the schema that produced
/// the document, and serialization preserves it.
///
/// # Examples
///
/// ```
/// use grappelli::{Document, Value};
///
/// let mut document = Document::new();
/// document.insert("name", "Dr. Bones");
/// document.insert("admitting", true);
///
/// assert_eq!(document.keys().collect::<Vec<_>>(), ["name", "admitting"]);
/// assert_eq!(document["name"], "Dr. Bones");
/// assert!(document["missing"].is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
	entries: IndexMap<String, Value>,
}

impl Document {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: IndexMap::with_capacity(capacity),
		}
	}

	/// Insert a field at the end of the document, replacing any previous
	/// value under the same name without disturbing its position.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.entries.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Field names in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(name, value)| (name.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Convert into a `serde_json::Value` object.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.entries
				.iter()
				.map(|(name, value)| (name.clone(), value.to_json()))
				.collect(),
		)
	}
}

impl Serialize for Document {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.entries.iter())
	}
}

impl Index<&str> for Document {
	type Output = Value;

	fn index(&self, key: &str) -> &Value {
		self.entries.get(key).unwrap_or(&NULL)
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
		f.write_str(&json)
	}
}

impl IntoIterator for Document {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

//! Dump engine: top-level entry points that own the traversal context
//!
//! Every dump starts here. The engine establishes a fresh [`DumpContext`]
//! per dumped object, so traversal state never leaks between calls, and
//! carries the configuration that applies to a whole dump rather than to
//! one schema, currently the nesting depth ceiling.

use crate::context::DumpContext;
use crate::error::DumpResult;
use crate::schema::Schema;
use crate::value::Document;
use std::borrow::Borrow;

/// Depth ceiling applied by [`Dumper::new`]. Deep enough for any sane
/// document shape while keeping a runaway recursion bounded.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The dump engine.
///
/// [`Schema::dump`] and [`SchemaRef::dump`](crate::SchemaRef::dump) are
/// shorthands for a default-configured `Dumper`; construct one explicitly
/// to change the depth ceiling.
///
/// # Examples
///
/// ```
/// use grappelli::{Dumper, Field, Schema};
///
/// struct Specialty {
/// 	code: String,
/// }
///
/// let schema = Schema::builder("Specialty")
/// 	.field(Field::string("code", |s: &Specialty| Some(s.code.clone())))
/// 	.build()
/// 	.unwrap();
///
/// let dumper = Dumper::new().with_max_depth(4);
/// let document = dumper.dump(&schema, &Specialty { code: "er".into() }).unwrap();
/// assert_eq!(document["code"], "er");
/// ```
#[derive(Debug, Clone)]
pub struct Dumper {
	max_depth: usize,
}

impl Dumper {
	pub fn new() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Replace the nesting depth ceiling.
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Dump one object through `schema` into a fresh document.
	pub fn dump<T>(&self, schema: &Schema<T>, object: &T) -> DumpResult<Document> {
		tracing::debug!(schema = schema.name(), "dumping object");
		let mut context = DumpContext::new(self.max_depth);
		schema.dump_with(object, &mut context)
	}

	/// Dump a sequence of objects in input order, fail-fast.
	///
	/// Each object gets its own traversal context: one object's path never
	/// influences cycle detection for the next.
	pub fn dump_many<T, I>(&self, schema: &Schema<T>, objects: I) -> DumpResult<Vec<Document>>
	where
		I: IntoIterator,
		I::Item: Borrow<T>,
	{
		objects
			.into_iter()
			.map(|object| self.dump(schema, object.borrow()))
			.collect()
	}
}

impl Default for Dumper {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DumpError;
	use crate::fields::Field;
	use crate::nested::SchemaRef;
	use std::sync::Arc;

	struct Node {
		label: String,
		child: Option<Arc<Node>>,
	}

	fn node_schema() -> SchemaRef<Node> {
		let reference: SchemaRef<Node> = SchemaRef::declare("Node");
		reference
			.bind(
				Schema::builder("Node")
					.field(Field::string("label", |n: &Node| Some(n.label.clone())))
					.field(Field::nested_many("children", reference.clone(), |n: &Node| {
						Some(n.child.iter().cloned().collect())
					}))
					.build()
					.unwrap(),
			)
			.unwrap();
		reference
	}

	fn chain(length: usize) -> Node {
		let mut node = Node {
			label: format!("node-{length}"),
			child: None,
		};
		for index in (0..length).rev() {
			node = Node {
				label: format!("node-{index}"),
				child: Some(Arc::new(node)),
			};
		}
		node
	}

	#[test]
	fn test_depth_ceiling_is_enforced() {
		let reference = node_schema();
		let schema = reference.get().unwrap();
		let dumper = Dumper::new().with_max_depth(3);

		let error = dumper.dump(schema, &chain(10)).unwrap_err();
		assert_eq!(error, DumpError::DepthExceeded { max_depth: 3 });
	}

	#[test]
	fn test_default_depth_allows_modest_nesting() {
		let reference = node_schema();
		let schema = reference.get().unwrap();

		let document = Dumper::new().dump(schema, &chain(5)).unwrap();
		assert_eq!(document["label"], "node-0");
	}

	#[test]
	fn test_contexts_are_independent_across_dump_many() {
		let reference = node_schema();
		let schema = reference.get().unwrap();
		let dumper = Dumper::new();

		let shared = Arc::new(chain(1));
		let objects = vec![shared.clone(), shared];
		let documents = dumper.dump_many(schema, objects).unwrap();
		assert_eq!(documents.len(), 2);
		assert_eq!(documents[0], documents[1]);
	}
}

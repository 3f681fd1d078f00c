//! Explicitly-owned object stores for derived lookups
//!
//! A derived collection ("all books by this author") needs somewhere to
//! look the related objects up. Rather than implicit process-wide state,
//! that place is a [`Registry`] the caller constructs, owns, and hands to
//! the extractor closure, so each test or subsystem gets its own isolated
//! index with an explicit lifetime.
//!
//! Objects are stored behind [`Arc`] in registration order; `find_all`
//! preserves that order, which is what makes derived-collection output
//! deterministic.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// An insertion-ordered store of shared objects.
///
/// # Examples
///
/// ```
/// use grappelli::Registry;
///
/// struct Book {
/// 	title: String,
/// 	year: i64,
/// }
///
/// let books: Registry<Book> = Registry::new();
/// books.insert(Book { title: "As I Lay Dying".into(), year: 1930 });
/// books.insert(Book { title: "The Underground Railroad".into(), year: 2016 });
///
/// let modern = books.find_all(|b| b.year > 2000);
/// assert_eq!(modern.len(), 1);
/// assert_eq!(modern[0].title, "The Underground Railroad");
/// ```
pub struct Registry<T> {
	items: RwLock<Vec<Arc<T>>>,
}

impl<T> Registry<T> {
	pub fn new() -> Self {
		Self {
			items: RwLock::new(Vec::new()),
		}
	}

	/// Store an object, returning the shared handle under which it was
	/// registered.
	pub fn insert(&self, item: T) -> Arc<T> {
		let item = Arc::new(item);
		self.items.write().push(Arc::clone(&item));
		item
	}

	/// All registered objects, in registration order.
	pub fn all(&self) -> Vec<Arc<T>> {
		self.items.read().clone()
	}

	/// The first registered object matching the predicate.
	pub fn find<P>(&self, predicate: P) -> Option<Arc<T>>
	where
		P: Fn(&T) -> bool,
	{
		self.items
			.read()
			.iter()
			.find(|item| predicate(item))
			.cloned()
	}

	/// Every registered object matching the predicate, in registration
	/// order.
	pub fn find_all<P>(&self, predicate: P) -> Vec<Arc<T>>
	where
		P: Fn(&T) -> bool,
	{
		self.items
			.read()
			.iter()
			.filter(|item| predicate(item))
			.cloned()
			.collect()
	}

	pub fn len(&self) -> usize {
		self.items.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.read().is_empty()
	}
}

impl<T> Default for Registry<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for Registry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry").field("len", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Book {
		title: String,
		author: Arc<String>,
	}

	#[test]
	fn test_all_preserves_registration_order() {
		let registry = Registry::new();
		registry.insert("first".to_string());
		registry.insert("second".to_string());
		registry.insert("third".to_string());

		let all = registry.all();
		let titles: Vec<_> = all.iter().map(|s| s.as_str()).collect();
		assert_eq!(titles, ["first", "second", "third"]);
	}

	#[test]
	fn test_find_all_by_back_reference_identity() {
		let faulkner = Arc::new("William Faulkner".to_string());
		let whitehead = Arc::new("Colson Whitehead".to_string());

		let books = Registry::new();
		books.insert(Book {
			title: "As I Lay Dying".to_string(),
			author: faulkner.clone(),
		});
		books.insert(Book {
			title: "The Underground Railroad".to_string(),
			author: whitehead.clone(),
		});
		books.insert(Book {
			title: "The Sound and the Fury".to_string(),
			author: faulkner.clone(),
		});

		let by_faulkner = books.find_all(|b| Arc::ptr_eq(&b.author, &faulkner));
		let titles: Vec<_> = by_faulkner.iter().map(|b| b.title.as_str()).collect();
		assert_eq!(titles, ["As I Lay Dying", "The Sound and the Fury"]);
	}

	#[test]
	fn test_find_returns_first_match() {
		let registry = Registry::new();
		registry.insert(1_i64);
		registry.insert(2_i64);
		registry.insert(3_i64);

		assert_eq!(registry.find(|n| *n > 1).map(|n| *n), Some(2));
		assert!(registry.find(|n| *n > 5).is_none());
	}

	#[test]
	fn test_len_and_is_empty() {
		let registry: Registry<i64> = Registry::new();
		assert!(registry.is_empty());
		registry.insert(1);
		assert_eq!(registry.len(), 1);
	}
}

//! Type-keyed storage attached to a request.
//!
//! Middleware uses it to hand values (such as the verified admin session)
//! to downstream handlers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Type-safe extension storage
#[derive(Clone, Default)]
pub struct Extensions {
	map: Arc<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Extensions {
	/// Create an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a value, replacing any previous value of the same type
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// extensions.insert(7_i64);
	/// assert_eq!(extensions.get::<i64>(), Some(7));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&self, value: T) {
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.insert(TypeId::of::<T>(), Box::new(value));
	}

	/// Get a cloned value
	pub fn get<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	/// Whether a value of type `T` is present
	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.contains_key(&TypeId::of::<T>())
	}
}

impl std::fmt::Debug for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let len = self.map.lock().map(|m| m.len()).unwrap_or_default();
		f.debug_struct("Extensions").field("len", &len).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Clone, Debug, PartialEq)]
	struct Marker(&'static str);

	#[rstest]
	fn test_insert_replaces_same_type() {
		let extensions = Extensions::new();
		extensions.insert(Marker("first"));
		extensions.insert(Marker("second"));

		assert_eq!(extensions.get::<Marker>(), Some(Marker("second")));
		assert!(!extensions.contains::<String>());
	}

	#[rstest]
	fn test_clones_share_storage() {
		let extensions = Extensions::new();
		let clone = extensions.clone();
		clone.insert(1_u8);

		assert!(extensions.contains::<u8>());
	}
}

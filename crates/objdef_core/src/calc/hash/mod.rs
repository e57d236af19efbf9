use crate::calc::eval::number_value;
use crate::calc::{AssignResult, FieldExtPlace, Flatvector, PlaceSegment, Value};

mod eval;

/// Why a typed lookup in a [`ValueHash`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindError {
	/// No entry with that key.
	Missing,
	/// The entry holds a different type.
	WrongType,
}

/// Ordered map from optional names to values.
///
/// Keys and values are parallel and index aligned. Named keys are unique;
/// pushing a key that exists replaces its value in place. Unnamed entries
/// hold positional parameters and never collide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueHash {
	keys: Vec<Option<String>>,
	values: Vec<Value>,
	sorted: bool,
}

impl ValueHash {
	/// Empty map keeping insertion order.
	pub fn new() -> Self {
		Self::default()
	}

	/// Empty map keeping named keys in ascending order.
	pub fn sorted() -> Self {
		Self {
			sorted: true,
			..Self::default()
		}
	}

	/// Whether pushes keep keys ordered.
	pub fn is_sorted(&self) -> bool {
		self.sorted
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// True when empty.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Set `key` to `value`. Returns the entry's index.
	pub fn push(&mut self, key: &str, value: Value) -> usize {
		self.push_at(Some(key), value, None)
	}

	/// Append an unnamed entry.
	pub fn push_unnamed(&mut self, value: Value) -> usize {
		self.push_at(None, value, None)
	}

	/// Set `key` to `value`, inserting new keys at `pos` when given.
	///
	/// An existing key keeps its position. In sorted mode `pos` is ignored and
	/// new named keys go before the first key not less than them.
	pub fn push_at(&mut self, key: Option<&str>, value: Value, pos: Option<usize>) -> usize {
		if let Some(index) = key.and_then(|key| self.find_index(key)) {
			self.values[index] = value;
			return index;
		}

		let index = match (key, self.sorted) {
			(Some(key), true) => self.keys.iter().position(|item| item.as_deref().is_some_and(|item| item >= key)).unwrap_or(self.keys.len()),
			_ => pos.filter(|pos| *pos <= self.keys.len()).unwrap_or(self.keys.len()),
		};
		self.keys.insert(index, key.map(str::to_owned));
		self.values.insert(index, value);
		index
	}

	/// Key of entry `index`; `None` for unnamed entries and out of range.
	pub fn key(&self, index: usize) -> Option<&str> {
		self.keys.get(index).and_then(|key| key.as_deref())
	}

	/// Value of entry `index`.
	pub fn value(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Mutable value of entry `index`.
	pub fn value_mut(&mut self, index: usize) -> Option<&mut Value> {
		self.values.get_mut(index)
	}

	/// Index of `key`.
	pub fn find_index(&self, key: &str) -> Option<usize> {
		self.keys.iter().position(|item| item.as_deref() == Some(key))
	}

	/// Value stored under `key`.
	pub fn find(&self, key: &str) -> Option<&Value> {
		self.find_index(key).map(|index| &self.values[index])
	}

	/// Mutable value stored under `key`.
	pub fn find_mut(&mut self, key: &str) -> Option<&mut Value> {
		self.find_index(key).map(|index| &mut self.values[index])
	}

	/// Replace the value of entry `index`. Returns false when out of range.
	pub fn set(&mut self, index: usize, value: Value) -> bool {
		match self.values.get_mut(index) {
			Some(slot) => {
				*slot = value;
				true
			}
			None => false,
		}
	}

	/// Rename entry `index`. Returns false when out of range or `key` names another entry.
	pub fn rename_key(&mut self, index: usize, key: &str) -> bool {
		if index >= self.keys.len() || self.find_index(key).is_some_and(|other| other != index) {
			return false;
		}
		self.keys[index] = Some(key.to_owned());
		true
	}

	/// Remove entry `index`, returning its key and value.
	pub fn remove(&mut self, index: usize) -> Option<(Option<String>, Value)> {
		if index >= self.keys.len() {
			return None;
		}
		Some((self.keys.remove(index), self.values.remove(index)))
	}

	/// Exchange entries `a` and `b`. Returns false when either is out of range.
	pub fn swap(&mut self, a: usize, b: usize) -> bool {
		if a >= self.keys.len() || b >= self.keys.len() {
			return false;
		}
		self.keys.swap(a, b);
		self.values.swap(a, b);
		true
	}

	/// Move entry `from` so it ends up at `to`. Returns false when either is out of range.
	pub fn slide(&mut self, from: usize, to: usize) -> bool {
		if from >= self.keys.len() || to >= self.keys.len() {
			return false;
		}
		let key = self.keys.remove(from);
		let value = self.values.remove(from);
		self.keys.insert(to, key);
		self.values.insert(to, value);
		true
	}

	/// Remove every entry.
	pub fn flush(&mut self) {
		self.keys.clear();
		self.values.clear();
	}

	/// Keys in order, `None` for unnamed entries.
	pub fn keys(&self) -> impl Iterator<Item = Option<&str>> {
		self.keys.iter().map(|key| key.as_deref())
	}

	/// Values in order.
	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// Entries in order.
	pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &Value)> {
		self.keys().zip(self.values.iter())
	}

	/// Integer stored under `key`.
	pub fn find_int(&self, key: &str) -> Result<i64, FindError> {
		match self.find(key) {
			Some(Value::Int(i)) => Ok(*i),
			Some(_) => Err(FindError::WrongType),
			None => Err(FindError::Missing),
		}
	}

	/// Real stored under `key`.
	pub fn find_double(&self, key: &str) -> Result<f64, FindError> {
		match self.find(key) {
			Some(Value::Real(d)) => Ok(*d),
			Some(_) => Err(FindError::WrongType),
			None => Err(FindError::Missing),
		}
	}

	/// Integer or real stored under `key`, as a float.
	pub fn find_int_or_double(&self, key: &str) -> Result<f64, FindError> {
		match self.find(key) {
			Some(value @ (Value::Int(_) | Value::Real(_))) => number_value(value).map(|(d, _)| d).ok_or(FindError::WrongType),
			Some(_) => Err(FindError::WrongType),
			None => Err(FindError::Missing),
		}
	}

	/// String stored under `key`.
	pub fn find_string(&self, key: &str) -> Result<&str, FindError> {
		match self.find(key) {
			Some(Value::String(text)) => Ok(text),
			Some(_) => Err(FindError::WrongType),
			None => Err(FindError::Missing),
		}
	}

	/// Boolean stored under `key`.
	pub fn find_boolean(&self, key: &str) -> Result<bool, FindError> {
		match self.find(key) {
			Some(Value::Boolean(b)) => Ok(*b),
			Some(_) => Err(FindError::WrongType),
			None => Err(FindError::Missing),
		}
	}

	/// Flatvector stored under `key`.
	pub fn find_flatvector(&self, key: &str) -> Result<Flatvector, FindError> {
		match self.find(key) {
			Some(Value::Flatvector(v)) => Ok(*v),
			Some(_) => Err(FindError::WrongType),
			None => Err(FindError::Missing),
		}
	}

	/// Store `value` at `ext`; the first segment names or indexes an entry.
	pub fn assign(&mut self, ext: &FieldExtPlace, value: &Value) -> AssignResult {
		let index = match ext.segment(0) {
			Some(PlaceSegment::Name(name)) => self.find_index(name),
			Some(PlaceSegment::Index(index)) => Some(*index).filter(|index| *index < self.len()),
			None => None,
		};
		match index {
			Some(index) => self.values[index].assign(&ext.tail(), value),
			None => AssignResult::UnknownPath,
		}
	}

	/// `{ key: value, ... }`, or `{:}` when empty.
	pub fn render(&self) -> String {
		if self.is_empty() {
			return "{:}".to_owned();
		}
		let items: Vec<String> = self
			.iter()
			.map(|(key, value)| match key {
				Some(key) => format!("{key}: {}", value.render()),
				None => value.render(),
			})
			.collect();
		format!("{{ {} }}", items.join(", "))
	}
}

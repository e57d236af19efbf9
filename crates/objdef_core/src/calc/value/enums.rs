use std::fmt;
use std::rc::Rc;

use crate::calc::DefRef;

/// One value of an enum descriptor, stored as the index of the chosen enum value.
#[derive(Clone)]
pub struct EnumValue {
	def: DefRef,
	index: usize,
}

impl EnumValue {
	/// Value at position `index` of `def`'s enum values.
	pub fn new(def: DefRef, index: usize) -> Self {
		Self { def, index }
	}

	/// Value whose enum id is `id`.
	pub fn from_id(def: DefRef, id: i64) -> Option<Self> {
		let mut value = Self::new(def, 0);
		value.set_from_id(id).then_some(value)
	}

	/// Enum descriptor.
	pub fn def(&self) -> &DefRef {
		&self.def
	}

	/// Position among the enum values.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Stable id of the chosen value.
	pub fn enum_id(&self) -> Option<i64> {
		self.def.get_enum_info(self.index).map(|(_, id)| id)
	}

	/// Name of the chosen value.
	pub fn name(&self) -> Option<&str> {
		self.def.get_enum_field(self.index).map(|field| field.name.as_str())
	}

	/// Display label of the chosen value.
	pub fn enum_label(&self) -> Option<&str> {
		self.def.get_enum_field(self.index).and_then(|field| field.label.as_deref())
	}

	/// Select the value with id `id`. Returns false and keeps the current value when there is none.
	pub fn set_from_id(&mut self, id: i64) -> bool {
		let found = (0..self.def.get_num_enum_fields()).find(|index| self.def.get_enum_info(*index).is_some_and(|(_, item)| item == id));
		if let Some(index) = found {
			self.index = index;
		}
		found.is_some()
	}

	/// Select the value called `name`.
	pub fn set_from_name(&mut self, name: &str) -> bool {
		let found = (0..self.def.get_num_enum_fields()).find(|index| self.def.get_enum_field(*index).is_some_and(|field| field.name == name));
		if let Some(index) = found {
			self.index = index;
		}
		found.is_some()
	}
}

impl PartialEq for EnumValue {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.def, &other.def) && self.enum_id() == other.enum_id()
	}
}

impl fmt::Debug for EnumValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EnumValue")
			.field("def", &self.def.name)
			.field("index", &self.index)
			.finish()
	}
}

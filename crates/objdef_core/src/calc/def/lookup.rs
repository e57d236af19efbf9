use std::ops::BitOr;

use crate::calc::{DefRef, ObjectDef, ValueType};

/// Restricts which kinds of children [`ObjectDef::find_def`] accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefFilter(u8);

impl DefFilter {
	/// Accept any child.
	pub const ANY: DefFilter = DefFilter(0);
	/// Accept functions.
	pub const FUNCTION: DefFilter = DefFilter(1);
	/// Accept classes.
	pub const CLASS: DefFilter = DefFilter(2);
	/// Accept variables.
	pub const VARIABLE: DefFilter = DefFilter(4);

	fn accepts(self, def: &ObjectDef) -> bool {
		if self.0 == 0 {
			return true;
		}
		(self.0 & Self::FUNCTION.0 != 0 && def.format == ValueType::Function)
			|| (self.0 & Self::CLASS.0 != 0 && def.format == ValueType::Class)
			|| (self.0 & Self::VARIABLE.0 != 0 && def.format == ValueType::Variable)
	}
}

impl BitOr for DefFilter {
	type Output = DefFilter;

	fn bitor(self, rhs: DefFilter) -> DefFilter {
		DefFilter(self.0 | rhs.0)
	}
}

impl ObjectDef {
	/// Number of top-level fields, counting inherited ones.
	///
	/// Own children count one each. A descriptor with no children counts as
	/// one field when it extends nothing and zero otherwise. An enum is one
	/// scalar unless it extends another enum.
	pub fn get_num_fields(&self) -> usize {
		let own = if self.format == ValueType::Enum {
			usize::from(self.extends().is_empty())
		} else if !self.fields().is_empty() {
			self.fields().len()
		} else {
			usize::from(self.extends().is_empty())
		};
		own + self.extends().iter().map(|parent| parent.get_num_fields()).sum::<usize>()
	}

	/// Own enum values plus those of extended enums.
	pub fn get_num_enum_fields(&self) -> usize {
		if self.format != ValueType::Enum && self.format != ValueType::EnumValue {
			return 0;
		}
		self.fields().len() + self.extends().iter().map(|parent| parent.get_num_enum_fields()).sum::<usize>()
	}

	/// Map flattened field `index` to the descriptor owning that slot and the index local to it.
	///
	/// Slots of `extends` parents come first, in declaration order, then own
	/// children. A leaf, or an enum extending nothing, is its own single slot.
	pub fn find_actual_def(&self, index: usize) -> Option<(&ObjectDef, usize)> {
		if index == 0 && (self.is_leaf() || (self.format == ValueType::Enum && self.extends().is_empty())) {
			return Some((self, 0));
		}

		let mut offset = 0;
		for parent in self.extends() {
			let count = parent.get_num_fields();
			if index < offset + count {
				return parent.find_actual_def(index - offset);
			}
			offset += count;
		}

		let local = index - offset;
		if self.format == ValueType::Enum || local >= self.fields().len() {
			log::trace!("find_actual_def: {index} out of range on {}", self.name);
			return None;
		}
		Some((self, local))
	}

	/// First flattened index owned by `owner`, searching this descriptor and its parents.
	pub fn field_offset(&self, owner: &ObjectDef) -> Option<usize> {
		let mut offset = 0;
		for parent in self.extends() {
			if let Some(found) = parent.field_offset(owner) {
				return Some(offset + found);
			}
			offset += parent.get_num_fields();
		}
		std::ptr::eq(self, owner).then_some(offset)
	}

	/// Descriptor of flattened field `index`.
	///
	/// For single-slot descriptors this is the owner itself.
	pub fn get_field(&self, index: usize) -> Option<&ObjectDef> {
		let (owner, local) = self.find_actual_def(index)?;
		if owner.format == ValueType::Enum || owner.fields().is_empty() {
			return Some(owner);
		}
		owner.fields().get(local).map(|field| &**field)
	}

	/// Enum value `index`, own values first, then those of extended enums.
	pub fn get_enum_field(&self, index: usize) -> Option<&ObjectDef> {
		if let Some(field) = self.fields().get(index) {
			return Some(field);
		}
		let mut index = index - self.fields().len();
		for parent in self.extends() {
			let count = parent.get_num_enum_fields();
			if index < count {
				return parent.get_enum_field(index);
			}
			index -= count;
		}
		None
	}

	/// Resolve the first segment of a dotted path to a flattened field index.
	///
	/// Returns the index and the rest of the path after one `.`. A purely
	/// numeric segment is returned as is, without bounds checking, since the
	/// element count of sets and arrays lives in the value.
	pub fn find_field<'a>(&self, path: &'a str) -> Option<(usize, &'a str)> {
		let len = path.bytes().take_while(|byte| byte.is_ascii_alphanumeric() || *byte == b'_').count();
		if len == 0 {
			return None;
		}
		let token = &path[..len];
		let rest = path[len..].strip_prefix('.').unwrap_or(&path[len..]);

		if token.bytes().all(|byte| byte.is_ascii_digit()) {
			return token.parse().ok().map(|index| (index, rest));
		}

		let index = self.find_named_field(token)?;
		log::trace!("find_field: {token} -> {index} on {}", self.name);
		Some((index, rest))
	}

	fn find_named_field(&self, name: &str) -> Option<usize> {
		let mut offset = 0;
		for parent in self.extends() {
			if let Some(index) = parent.find_named_field(name) {
				return Some(offset + index);
			}
			offset += parent.get_num_fields();
		}
		self.fields().iter().position(|field| field.name == name).map(|index| offset + index)
	}

	/// Flattened index of the field called `name`.
	pub fn find_field_index(&self, name: &str) -> Option<usize> {
		match self.find_field(name) {
			Some((index, "")) => Some(index),
			_ => None,
		}
	}

	/// Find a child declaration by name, own children first, then each parent in order.
	pub fn find_def(&self, name: &str, filter: DefFilter) -> Option<&DefRef> {
		if let Some(found) = self.fields().iter().find(|field| field.name == name && filter.accepts(field)) {
			return Some(found);
		}
		self.extends().iter().find_map(|parent| parent.find_def(name, filter))
	}

	/// Find an operator declaration by its text.
	pub fn find_operator(&self, op: &str) -> Option<&DefRef> {
		if let Some(found) = self.fields().iter().find(|field| field.format == ValueType::Operator && field.name == op) {
			return Some(found);
		}
		self.extends().iter().find_map(|parent| parent.find_operator(op))
	}
}

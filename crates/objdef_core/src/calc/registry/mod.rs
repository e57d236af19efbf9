use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::calc::{DefRef, ValueType};

mod builtins;

pub use builtins::BUILTIN_NAMES;

thread_local! {
	static DEFS: RefCell<HashMap<String, DefRef>> = RefCell::new(HashMap::new());
	static NEXT_CLASS_ID: Cell<u32> = const { Cell::new(1) };
}

/// Descriptor registered under `name`, building builtin descriptors on first use.
///
/// Every call for the same name returns the same shared descriptor.
pub fn lookup(name: &str) -> Option<DefRef> {
	if let Some(def) = DEFS.with_borrow(|defs| defs.get(name).cloned()) {
		return Some(def);
	}

	let def = match builtins::make(name)? {
		Ok(def) => Rc::new(def),
		Err(err) => {
			log::warn!("cannot build builtin descriptor {name}: {err}");
			return None;
		}
	};
	log::debug!("built builtin descriptor {name} ({} fields)", def.fields().len());
	DEFS.with_borrow_mut(|defs| defs.insert(name.to_owned(), Rc::clone(&def)));
	Some(def)
}

/// Make `def` findable by name. Returns the descriptor it displaced.
pub fn register(def: DefRef) -> Option<DefRef> {
	log::debug!("registering descriptor {}", def.name);
	DEFS.with_borrow_mut(|defs| defs.insert(def.name.clone(), def))
}

/// Register every class and enum declared anywhere under `def`. Returns how many were registered.
pub fn register_tree(def: &DefRef) -> usize {
	let mut count = 0;
	for field in def.fields() {
		if matches!(field.format, ValueType::Class | ValueType::Enum) {
			register(Rc::clone(field));
			count += 1;
		}
		count += register_tree(field);
	}
	count
}

/// Whether `name` is one of the builtin descriptors.
pub fn is_builtin(name: &str) -> bool {
	BUILTIN_NAMES.contains(&name)
}

/// Allocate a fresh type id for a user class.
pub fn next_class_id() -> ValueType {
	NEXT_CLASS_ID.with(|next| {
		let id = next.get();
		next.set(id + 1);
		ValueType::User(id)
	})
}

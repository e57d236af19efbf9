use std::fmt::Write as _;
use std::rc::Rc;

use crate::calc::{Attribute, DefError, DefRef, DefFilter, DefFlags, ObjectDef, Result, ValueType, escape, registry};

/// Output form of [`ObjectDef::dump`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumpMode {
	/// Indented attribute text that [`ObjectDef::from_attribute`] reads back.
	#[default]
	Attribute,
	/// Class definition script.
	Script,
	/// One-line human summary.
	Summary,
	/// Constructor-call source text.
	Codegen,
}

/// Options for descriptor dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
	/// Output form.
	pub mode: DumpMode,
	/// Leading spaces for the outermost level.
	pub indent: usize,
	/// Deepest nesting written; `None` for unlimited.
	pub max_depth: Option<usize>,
	/// Whether function and operator children are written.
	pub include_functions: bool,
}

impl Default for DumpOptions {
	fn default() -> Self {
		Self::attribute()
	}
}

impl DumpOptions {
	/// Attribute text, everything included.
	pub fn attribute() -> Self {
		Self {
			mode: DumpMode::Attribute,
			indent: 0,
			max_depth: None,
			include_functions: true,
		}
	}

	/// Script declarations.
	pub fn script() -> Self {
		Self {
			mode: DumpMode::Script,
			..Self::attribute()
		}
	}

	/// Summary line of the top descriptor only.
	pub fn summary() -> Self {
		Self {
			mode: DumpMode::Summary,
			max_depth: Some(0),
			..Self::attribute()
		}
	}

	/// Constructor calls.
	pub fn codegen() -> Self {
		Self {
			mode: DumpMode::Codegen,
			..Self::attribute()
		}
	}

	fn descend(&self, depth: usize) -> bool {
		self.max_depth.is_none_or(|max| depth < max)
	}

	fn keeps(&self, def: &ObjectDef) -> bool {
		self.include_functions || !matches!(def.format, ValueType::Function | ValueType::Operator)
	}
}

impl ObjectDef {
	/// Type name written before a child's name in attribute and script text.
	pub fn type_name(&self) -> &str {
		match self.format {
			ValueType::Fields | ValueType::User(_) => self.format_str.as_deref().unwrap_or("fields"),
			other => other.name(),
		}
	}

	/// Write this descriptor in the selected form.
	pub fn dump(&self, options: &DumpOptions) -> String {
		let mut out = String::new();
		match options.mode {
			DumpMode::Attribute => out = self.dump_attributes(options).dump(options.indent),
			DumpMode::Script => self.dump_script(&mut out, options.indent, 0, options),
			DumpMode::Summary => {
				let _ = writeln!(out, "{}{}", " ".repeat(options.indent), self.summary());
			}
			DumpMode::Codegen => self.dump_codegen(&mut out, options.indent, 0, options),
		}
		out
	}

	/// Attribute tree describing this descriptor; its children are the top-level lines.
	pub fn dump_attributes(&self, options: &DumpOptions) -> Attribute {
		let mut att = Attribute::default();
		self.fill_attributes(&mut att, 0, options);
		att
	}

	fn fill_attributes(&self, att: &mut Attribute, depth: usize, options: &DumpOptions) {
		att.push("name", Some(&self.name));
		if let Some(label) = &self.label {
			att.push("Name", Some(label));
		}
		if let Some(description) = &self.description {
			att.push("description", Some(description));
		}
		if let Some(range) = &self.range {
			att.push("range", Some(range));
		}
		if let Some(text) = &self.default_text {
			att.push("defaultvalue", Some(text));
		}
		if !self.flags.is_empty() {
			att.push("flags", Some(&self.flags.bits().to_string()));
		}
		if self.format != ValueType::None {
			att.push("format", Some(self.format.name()));
		}
		if let Some(hint) = &self.ui_hint {
			att.push("uihint", Some(hint));
		}
		if !self.extends().is_empty() {
			let names: Vec<&str> = self.extends().iter().map(|parent| parent.name.as_str()).collect();
			att.push("extends", Some(&names.join(",")));
		}

		if !options.descend(depth) {
			return;
		}
		for field in self.fields().iter().filter(|field| options.keeps(field)) {
			let child = att.push(field.type_name(), Some(&field.name));
			field.fill_attributes(child, depth + 1, options);
		}
	}

	/// `<typename> <name>(VALUE_X field, ...)`.
	pub fn summary(&self) -> String {
		let mut out = format!("{} {}", self.type_name(), self.name);
		if !self.fields().is_empty() {
			let params: Vec<String> = self.fields().iter().map(|field| format!("{} {}", field.format.code_name(), field.name)).collect();
			let _ = write!(out, "({})", params.join(", "));
		}
		out
	}

	fn script_notes(&self) -> String {
		let mut notes = Vec::new();
		if let Some(label) = &self.label {
			notes.push(format!("Name:\"{}\"", escape(label, '"')));
		}
		if let Some(description) = &self.description {
			notes.push(format!("doc:\"{}\"", escape(description, '"')));
		}
		if notes.is_empty() { String::new() } else { format!(" {}", notes.join(", ")) }
	}

	fn dump_script(&self, out: &mut String, indent: usize, depth: usize, options: &DumpOptions) {
		let pad = " ".repeat(indent);
		let notes = self.script_notes();
		match self.format {
			ValueType::Namespace | ValueType::Class => {
				let keyword = if self.format == ValueType::Namespace { "namespace" } else { "class" };
				let mut head = format!("{keyword} {}", self.name);
				if !self.extends().is_empty() {
					let names: Vec<&str> = self.extends().iter().map(|parent| parent.name.as_str()).collect();
					let _ = write!(head, " extends {}", names.join(", "));
				}
				let _ = writeln!(out, "{pad}{head}{notes} {{");
				if options.descend(depth) {
					for field in self.fields().iter().filter(|field| options.keeps(field)) {
						field.dump_script(out, indent + 2, depth + 1, options);
					}
				}
				let _ = writeln!(out, "{pad}}}");
			}
			ValueType::Enum => {
				let names: Vec<&str> = self.fields().iter().map(|field| field.name.as_str()).collect();
				let _ = writeln!(out, "{pad}enum {}{notes} {{ {} }}", self.name, names.join(", "));
			}
			ValueType::Function => {
				let params: Vec<String> = self.fields().iter().map(|field| format!("{} {}", field.type_name(), field.name)).collect();
				let _ = writeln!(out, "{pad}function {}({}){notes};", self.name, params.join(", "));
			}
			ValueType::Operator => {
				let dir = self.operator_direction().map_or('>', |dir| dir.as_char());
				let priority = self.operator_priority().unwrap_or(0);
				let _ = writeln!(out, "{pad}operator {} dir:'{dir}', priority:{priority}{notes};", self.name);
			}
			ValueType::Variable => {
				let mut line = format!("var {} {}", self.fields_format.name(), self.name);
				if let Some(value) = &self.default_value {
					let _ = write!(line, " = {value}");
				}
				let _ = writeln!(out, "{pad}{line}{notes};");
			}
			_ => {
				let mut line = format!("{} {}", self.type_name(), self.name);
				if let Some(text) = &self.default_text {
					let _ = write!(line, " = {text}");
				}
				let _ = writeln!(out, "{pad}{line}{notes};");
			}
		}
	}

	fn dump_codegen(&self, out: &mut String, indent: usize, depth: usize, options: &DumpOptions) {
		let pad = " ".repeat(indent);
		let quoted = |text: &Option<String>| text.as_deref().map_or_else(|| "NULL".to_owned(), |text| format!("\"{}\"", escape(text, '"')));

		let _ = write!(out, "{pad}ObjectDef *{}Def = new ObjectDef(", self.name);
		if self.extends().is_empty() {
			out.push_str("NULL, ");
		} else {
			let names: Vec<&str> = self.extends().iter().map(|parent| parent.name.as_str()).collect();
			let _ = write!(out, "\"{}\", ", names.join(", "));
		}
		let _ = writeln!(
			out,
			"\"{}\", {}, {}, \"{}\",NULL,NULL);\n",
			self.name,
			quoted(&self.label),
			quoted(&self.description),
			self.format.name()
		);

		if !options.descend(depth) {
			return;
		}
		for field in self.fields().iter().filter(|field| options.keeps(field)) {
			if field.format.is_complex_decl() {
				field.dump_codegen(out, indent + 2, depth + 1, options);
				let _ = writeln!(out, "{pad}{}Def->push({}Def, 1)\n", self.name, field.name);
			} else if field.format == ValueType::EnumValue {
				let _ = writeln!(
					out,
					"{pad}{}Def->pushEnumValue(\"{}\", {}, {});",
					self.name,
					field.name,
					quoted(&field.label),
					quoted(&field.description)
				);
			} else {
				let _ = writeln!(
					out,
					"{pad}{}Def->push(\"{}\", {}, {},\n{pad}   \"{}\", NULL, NULL,\n{pad}   0, NULL  );",
					self.name,
					field.name,
					quoted(&field.label),
					quoted(&field.description),
					field.type_name()
				);
			}
		}
	}

	/// Build a descriptor from attribute text written by [`ObjectDef::dump_attributes`].
	pub fn from_attribute(att: &Attribute, scope: Option<&ObjectDef>) -> Result<ObjectDef> {
		let mut def = ObjectDef::new(String::new(), None, None, ValueType::None);
		def.load_attributes(att, scope)?;
		Ok(def)
	}

	/// Read descriptor settings and children from `att`.
	///
	/// `extends` names are resolved in `scope` first, then among builtin
	/// descriptors. Any attribute name that is not a setting is a type name
	/// declaring a child, whose value is the child's name. Settings never
	/// have nested lines, so `flags` or `none` with nested lines is a child.
	pub fn load_attributes(&mut self, att: &Attribute, scope: Option<&ObjectDef>) -> Result<()> {
		let mut flags = None;
		for item in &att.children {
			let value = item.value.as_deref();
			match item.name.as_str() {
				"name" => self.name = value.unwrap_or_default().to_owned(),
				"Name" => self.label = value.map(str::to_owned),
				"description" => self.description = value.map(str::to_owned),
				"range" => self.range = value.map(str::to_owned),
				"defaultvalue" => self.default_text = value.map(str::to_owned),
				"uihint" => self.ui_hint = value.map(str::to_owned),
				"format" => self.format = ValueType::from_name(value.unwrap_or_default()),
				"flags" if item.children.is_empty() => {
					let bits = value.unwrap_or_default().trim().parse::<u32>().map_err(|_| DefError::UnknownAttributeValue { name: item.name.clone() })?;
					flags = Some(DefFlags::from_bits(bits));
				}
				"extends" => {
					for name in value.unwrap_or_default().split(',').map(str::trim).filter(|name| !name.is_empty()) {
						let parent = scope
							.and_then(|scope| scope.find_def(name, DefFilter::ANY).cloned())
							.or_else(|| registry::lookup(name));
						let Some(parent) = parent else {
							log::warn!("{}: cannot resolve extends target {name}", self.name);
							return Err(DefError::UnknownExtends { name: name.to_owned() });
						};
						self.extend(parent);
					}
				}
				"none" if item.children.is_empty() => {}
				type_name => {
					let child = self.load_child(type_name, item, scope)?;
					self.push_def(child)?;
				}
			}
		}
		if self.format == ValueType::Class && !matches!(self.fields_format, ValueType::User(_)) {
			self.fields_format = registry::next_class_id();
			self.format_str.get_or_insert_with(|| self.name.clone());
		}
		if let Some(flags) = flags {
			self.flags = flags;
		}
		Ok(())
	}

	/// Read a descriptor file holding one top-level descriptor.
	pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<DefRef> {
		let root = Attribute::read_file(path)?;
		ObjectDef::from_attribute(&root, None).map(Rc::new)
	}

	fn load_child(&self, type_name: &str, item: &Attribute, scope: Option<&ObjectDef>) -> Result<ObjectDef> {
		let format = ValueType::from_name(type_name);
		let mut child = ObjectDef::new(item.value.as_deref().unwrap_or_default(), None, None, format);
		if format == ValueType::Fields {
			child.format_str = Some(type_name.to_owned());
			let class = self
				.find_def(type_name, DefFilter::CLASS)
				.or_else(|| scope.and_then(|scope| scope.find_def(type_name, DefFilter::CLASS)))
				.cloned()
				.or_else(|| registry::lookup(type_name));
			match class {
				Some(class) => child.fields_format = class.fields_format,
				None => log::warn!("{}: unknown type {type_name} for field {}", self.name, child.name),
			}
		}
		child.load_attributes(item, Some(self))?;
		Ok(child)
	}
}

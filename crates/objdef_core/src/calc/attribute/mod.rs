use std::fmt::Write as _;

use crate::calc::{DefError, Result};

/// One node of indented attribute text.
///
/// Each line is `name value`; lines indented deeper than their predecessor
/// become its children. A value of `\` starts a block whose more-indented
/// lines form a multi-line value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
	/// Attribute name, the first token of the line.
	pub name: String,
	/// Rest of the line, if any.
	pub value: Option<String>,
	/// Nested attributes.
	pub children: Vec<Attribute>,
}

#[derive(Debug)]
struct Line {
	number: usize,
	indent: usize,
	name: String,
	value: Option<String>,
}

impl Attribute {
	/// Create an attribute with no children.
	pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
		Self {
			name: name.into(),
			value: value.map(str::to_owned),
			children: Vec::new(),
		}
	}

	/// Append a child and return it for further nesting.
	pub fn push(&mut self, name: impl Into<String>, value: Option<&str>) -> &mut Attribute {
		self.children.push(Attribute::new(name, value));
		let last = self.children.len() - 1;
		&mut self.children[last]
	}

	/// Append a prebuilt child.
	pub fn push_attribute(&mut self, att: Attribute) {
		self.children.push(att);
	}

	/// First child with the given name.
	pub fn find(&self, name: &str) -> Option<&Attribute> {
		self.children.iter().find(|item| item.name == name)
	}

	/// Value text of the first child with the given name.
	pub fn find_value(&self, name: &str) -> Option<&str> {
		self.find(name).and_then(|item| item.value.as_deref())
	}

	/// Value as a string slice.
	pub fn value_str(&self) -> Option<&str> {
		self.value.as_deref()
	}

	/// Parse attribute text into an unnamed root holding the top-level entries.
	pub fn parse(text: &str) -> Result<Attribute> {
		let lines = tokenize(text)?;
		let mut pos = 0_usize;
		let children = parse_block(&lines, &mut pos, None)?;
		Ok(Attribute {
			name: String::new(),
			value: None,
			children,
		})
	}

	/// Read and parse an attribute file.
	pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<Attribute> {
		let text = std::fs::read_to_string(path)?;
		Self::parse(&text)
	}

	/// Render the children of this node at the given indentation.
	pub fn dump(&self, indent: usize) -> String {
		let mut out = String::new();
		for item in &self.children {
			item.dump_node(&mut out, indent);
		}
		out
	}

	fn dump_node(&self, out: &mut String, indent: usize) {
		let pad = " ".repeat(indent);
		match self.value.as_deref() {
			None => {
				let _ = writeln!(out, "{pad}{}", self.name);
			}
			Some(value) if value.contains('\n') => {
				let _ = writeln!(out, "{pad}{} \\", self.name);
				for line in value.lines() {
					let _ = writeln!(out, "{pad}  {line}");
				}
			}
			Some(value) if needs_quotes(value) => {
				let _ = writeln!(out, "{pad}{} \"{}\"", self.name, escape(value, '"'));
			}
			Some(value) => {
				let _ = writeln!(out, "{pad}{} {value}", self.name);
			}
		}
		for item in &self.children {
			item.dump_node(out, indent + 2);
		}
	}
}

/// Escape quote, backslash, newline and tab characters.
pub fn escape(input: &str, quote: char) -> String {
	let mut out = String::with_capacity(input.len());
	for ch in input.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\t' => out.push_str("\\t"),
			c if c == quote => {
				out.push('\\');
				out.push(c);
			}
			c => out.push(c),
		}
	}
	out
}

/// Reverse [`escape`].
pub fn unescape(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	let mut chars = input.chars();
	while let Some(ch) = chars.next() {
		if ch != '\\' {
			out.push(ch);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('t') => out.push('\t'),
			Some(other) => out.push(other),
			None => out.push('\\'),
		}
	}
	out
}

fn needs_quotes(value: &str) -> bool {
	value.is_empty() || value == "\\" || value.starts_with('"') || value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace)
}

fn tokenize(text: &str) -> Result<Vec<Line>> {
	let raw: Vec<&str> = text.lines().collect();
	let mut out = Vec::new();
	let mut idx = 0_usize;

	while idx < raw.len() {
		let line = raw[idx];
		let number = idx + 1;
		idx += 1;

		let trimmed = line.trim_start();
		if trimmed.is_empty() || trimmed.starts_with('#') {
			continue;
		}
		let indent = line.len() - trimmed.len();
		if line[..indent].contains('\t') {
			return Err(DefError::AttributeSyntax {
				line: number,
				reason: "tab in indentation",
			});
		}

		let (name, rest) = match trimmed.find(char::is_whitespace) {
			Some(split) => (&trimmed[..split], trimmed[split..].trim()),
			None => (trimmed, ""),
		};

		let value = if rest == "\\" {
			let mut block = Vec::new();
			let mut block_indent = None;
			while idx < raw.len() {
				let next = raw[idx];
				let next_trimmed = next.trim_start();
				let next_indent = next.len() - next_trimmed.len();
				if !next_trimmed.is_empty() && next_indent <= indent {
					break;
				}
				let strip = *block_indent.get_or_insert(next_indent);
				block.push(next.get(strip.min(next_indent)..).unwrap_or(""));
				idx += 1;
			}
			Some(block.join("\n"))
		} else if rest.is_empty() {
			None
		} else if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
			Some(unescape(&rest[1..rest.len() - 1]))
		} else {
			Some(rest.to_owned())
		};

		out.push(Line {
			number,
			indent,
			name: name.to_owned(),
			value,
		});
	}

	Ok(out)
}

fn parse_block(lines: &[Line], pos: &mut usize, parent_indent: Option<usize>) -> Result<Vec<Attribute>> {
	let mut out: Vec<Attribute> = Vec::new();
	let Some(first) = lines.get(*pos) else {
		return Ok(out);
	};
	if parent_indent.is_some_and(|parent| first.indent <= parent) {
		return Ok(out);
	}
	let block_indent = first.indent;

	while let Some(line) = lines.get(*pos) {
		if line.indent < block_indent {
			if parent_indent.is_some_and(|parent| line.indent > parent) || parent_indent.is_none() {
				return Err(DefError::AttributeSyntax {
					line: line.number,
					reason: "inconsistent indentation",
				});
			}
			break;
		}
		if line.indent > block_indent {
			let Some(last) = out.last_mut() else {
				return Err(DefError::AttributeSyntax {
					line: line.number,
					reason: "unexpected indentation",
				});
			};
			last.children = parse_block(lines, pos, Some(block_indent))?;
			continue;
		}

		out.push(Attribute {
			name: line.name.clone(),
			value: line.value.clone(),
			children: Vec::new(),
		});
		*pos += 1;
	}

	Ok(out)
}

#[cfg(test)]
mod tests;

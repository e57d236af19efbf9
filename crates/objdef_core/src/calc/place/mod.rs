use std::fmt;

use crate::calc::{DefError, Result};

/// Numeric location of a nested field, such as `3.2.7`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPlace {
	indices: Vec<usize>,
}

impl FieldPlace {
	/// Empty place.
	pub fn new() -> Self {
		Self::default()
	}

	/// Place from an explicit index list.
	pub fn from_indices(indices: &[usize]) -> Self {
		Self { indices: indices.to_vec() }
	}

	/// Number of segments.
	pub fn len(&self) -> usize {
		self.indices.len()
	}

	/// True when there are no segments.
	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Segment `i`, or `None` past the end.
	pub fn e(&self, i: usize) -> Option<usize> {
		self.indices.get(i).copied()
	}

	/// Append one segment.
	pub fn push(&mut self, index: usize) {
		self.indices.push(index);
	}

	/// Remove and return the last segment.
	pub fn pop(&mut self) -> Option<usize> {
		self.indices.pop()
	}

	/// All segments in order.
	pub fn indices(&self) -> &[usize] {
		&self.indices
	}
}

impl fmt::Display for FieldPlace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, item) in self.indices.iter().enumerate() {
			if idx > 0 {
				f.write_str(".")?;
			}
			write!(f, "{item}")?;
		}
		Ok(())
	}
}

/// One segment of a [`FieldExtPlace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceSegment {
	/// Zero-based element index.
	Index(usize),
	/// Named field.
	Name(String),
}

impl fmt::Display for PlaceSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PlaceSegment::Index(index) => write!(f, "{index}"),
			PlaceSegment::Name(name) => f.write_str(name),
		}
	}
}

/// Dotted location mixing names and indices, such as `blah.2.7`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldExtPlace {
	segments: Vec<PlaceSegment>,
}

impl FieldExtPlace {
	/// Empty place.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse `text`, returning the place and the unconsumed remainder.
	pub fn parse(text: &str) -> (Self, &str) {
		let mut place = Self::new();
		let (_, rest) = place.set(text);
		(place, rest)
	}

	/// Append segments parsed from a dotted path.
	///
	/// Tokens are runs of ASCII alphanumerics and `_`. A token made only of
	/// digits becomes an index, anything else a name. One `.` after each
	/// token is consumed. Parsing stops at the first character that cannot
	/// start a token. Returns the number of segments added and the rest.
	pub fn set<'a>(&mut self, text: &'a str) -> (usize, &'a str) {
		let bytes = text.as_bytes();
		let mut idx = 0_usize;
		let mut added = 0_usize;

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
				idx += 1;
			}
			if idx == start {
				break;
			}

			let token = &text[start..idx];
			let segment = if token.bytes().all(|byte| byte.is_ascii_digit()) {
				match token.parse::<usize>() {
					Ok(index) => PlaceSegment::Index(index),
					Err(_) => PlaceSegment::Name(token.to_owned()),
				}
			} else {
				PlaceSegment::Name(token.to_owned())
			};
			self.segments.push(segment);
			added += 1;

			if idx < bytes.len() && bytes[idx] == b'.' {
				idx += 1;
			}
		}

		(added, &text[idx..])
	}

	/// Number of segments.
	pub fn len(&self) -> usize {
		self.segments.len()
	}

	/// True when there are no segments.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Segment `i`.
	pub fn segment(&self, i: usize) -> Option<&PlaceSegment> {
		self.segments.get(i)
	}

	/// All segments in order.
	pub fn segments(&self) -> &[PlaceSegment] {
		&self.segments
	}

	/// Name of segment `i`, when it is a name.
	pub fn name_at(&self, i: usize) -> Option<&str> {
		match self.segments.get(i) {
			Some(PlaceSegment::Name(name)) => Some(name),
			_ => None,
		}
	}

	/// Index of segment `i`, when it is an index.
	pub fn index_at(&self, i: usize) -> Option<usize> {
		match self.segments.get(i) {
			Some(PlaceSegment::Index(index)) => Some(*index),
			_ => None,
		}
	}

	/// Text of segment `i`, rendering indices as decimal.
	pub fn e(&self, i: usize) -> Option<String> {
		self.segments.get(i).map(ToString::to_string)
	}

	/// Append a named segment.
	pub fn push_name(&mut self, name: impl Into<String>) {
		self.segments.push(PlaceSegment::Name(name.into()));
	}

	/// Append an index segment.
	pub fn push_index(&mut self, index: usize) {
		self.segments.push(PlaceSegment::Index(index));
	}

	/// Remove and return the last segment.
	pub fn pop(&mut self) -> Option<PlaceSegment> {
		self.segments.pop()
	}

	/// Remove segment `i`. Returns `None` when out of range.
	pub fn remove(&mut self, i: usize) -> Option<PlaceSegment> {
		(i < self.segments.len()).then(|| self.segments.remove(i))
	}

	/// Place without its first segment.
	pub fn tail(&self) -> FieldExtPlace {
		Self {
			segments: self.segments.iter().skip(1).cloned().collect(),
		}
	}
}

impl fmt::Display for FieldExtPlace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, item) in self.segments.iter().enumerate() {
			if idx > 0 {
				f.write_str(".")?;
			}
			write!(f, "{item}")?;
		}
		Ok(())
	}
}

/// Classification of a queried path against a [`FieldMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMatch {
	/// No stored path shares a leading segment with the query.
	None,
	/// A stored path equals the query.
	Exact,
	/// A stored path extends the query, so the query names a parent of a changed field.
	Superset,
	/// A stored path is a prefix of the query, so the query lies inside a changed field.
	Subset,
}

/// Set of numeric field paths, recording which fields an edit touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask {
	places: Vec<FieldPlace>,
}

impl FieldMask {
	/// Empty mask.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a comma separated list of dotted numeric paths, like `34.2.6,3.4`.
	pub fn parse(list: &str) -> Result<Self> {
		let mut mask = Self::new();
		if list.is_empty() {
			return Ok(mask);
		}
		for item in list.split(',') {
			mask.places.push(FieldPlace::from_indices(&Self::chartoint(item)?));
		}
		Ok(mask)
	}

	/// Strictly parse `digit+ ('.' digit+)*`. Anything else fails outright.
	pub fn chartoint(ext: &str) -> Result<Vec<usize>> {
		let invalid = || DefError::InvalidFieldPath { path: ext.to_owned() };
		if ext.is_empty() {
			return Err(invalid());
		}
		ext.split('.')
			.map(|part| {
				if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
					return Err(invalid());
				}
				part.parse::<usize>().map_err(|_| invalid())
			})
			.collect()
	}

	/// Number of stored paths.
	pub fn len(&self) -> usize {
		self.places.len()
	}

	/// True when no path is stored.
	pub fn is_empty(&self) -> bool {
		self.places.is_empty()
	}

	/// Stored path `i`.
	pub fn place(&self, i: usize) -> Option<&FieldPlace> {
		self.places.get(i)
	}

	/// Component `depth` of stored path `field`.
	pub fn value(&self, field: usize, depth: usize) -> Option<usize> {
		self.places.get(field).and_then(|place| place.e(depth))
	}

	/// Store a path.
	pub fn push(&mut self, place: FieldPlace) {
		self.places.push(place);
	}

	/// Store a path given as indices.
	pub fn push_indices(&mut self, indices: &[usize]) {
		self.places.push(FieldPlace::from_indices(indices));
	}

	/// Whether any stored path is exactly the single index `index`.
	pub fn contains_top(&self, index: usize) -> bool {
		self.places.iter().any(|place| place.indices() == [index])
	}

	/// Classify `ext` against every stored path.
	///
	/// Returns the best classification and how many leading segments match:
	/// the query length for exact and superset matches, the matched prefix
	/// length for subset matches, and zero for no match. A query that is not
	/// a strict numeric path never matches.
	pub fn has(&self, ext: &str) -> (MaskMatch, usize) {
		let Ok(query) = Self::chartoint(ext) else {
			return (MaskMatch::None, 0);
		};

		let mut superset: Option<usize> = None;
		let mut subset: Option<usize> = None;

		for place in &self.places {
			let stored = place.indices();
			let matched = stored.iter().zip(&query).take_while(|(a, b)| a == b).count();
			if matched == 0 {
				continue;
			}
			if matched == query.len() && matched == stored.len() {
				return (MaskMatch::Exact, query.len());
			}
			if matched == query.len() {
				let extra = stored.len() - matched;
				if superset.is_none_or(|best| extra < best) {
					superset = Some(extra);
				}
			} else if matched == stored.len() && subset.is_none_or(|best| matched > best) {
				subset = Some(matched);
			}
		}

		if superset.is_some() {
			return (MaskMatch::Superset, query.len());
		}
		if let Some(matched) = subset {
			return (MaskMatch::Subset, matched);
		}
		(MaskMatch::None, 0)
	}
}

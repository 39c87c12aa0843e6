use std::fmt;

/// A variable type read from an xml interchange file, rendered into the
/// textual IEC 61131-3 form stored in [`Variable::type_name`](crate::Variable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
	/// Elementary or user-defined type referenced by name.
	Named(String),
	Pointer(Box<TypeExpr>),
	Array {
		dimensions: Vec<Dimension>,
		element: Box<TypeExpr>,
	},
	/// `STRING` or `WSTRING`, optionally with a declared length.
	String { wide: bool, length: Option<String> },
}

/// Inclusive bounds of one array dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
	pub lower: String,
	pub upper: String,
}

impl Dimension {
	pub fn new(lower: impl Into<String>, upper: impl Into<String>) -> Self {
		Self {
			lower: lower.into(),
			upper: upper.into(),
		}
	}
}

impl TypeExpr {
	pub fn named(name: impl Into<String>) -> Self {
		Self::Named(name.into())
	}
}

impl fmt::Display for Dimension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{}", self.lower, self.upper)
	}
}

impl fmt::Display for TypeExpr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Named(name) => f.write_str(name),
			Self::Pointer(target) => write!(f, "POINTER TO {target}"),
			Self::Array {
				dimensions,
				element,
			} => {
				f.write_str("ARRAY[")?;
				for (index, dimension) in dimensions.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{dimension}")?;
				}
				write!(f, "] OF {element}")
			}
			Self::String { wide, length } => {
				f.write_str(if *wide { "WSTRING" } else { "STRING" })?;
				if let Some(length) = length {
					write!(f, "[{length}]")?;
				}
				Ok(())
			}
		}
	}
}

/// An initial value read from an xml interchange file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initializer {
	Simple(String),
	Array(Vec<ArrayItem>),
	/// Structure values are not extracted.
	Struct,
}

/// One element of an array initializer, optionally repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayItem {
	pub repetition: Option<String>,
	pub value: Initializer,
}

impl Initializer {
	/// Render the textual form: simple values as-is, arrays as `[a, b]` with
	/// repeated elements as `n(v)`.
	///
	/// Fails with the shape that cannot be rendered.
	pub fn render(&self) -> Result<String, &'static str> {
		match self {
			Self::Simple(value) => Ok(value.clone()),
			Self::Array(items) => {
				let rendered = items
					.iter()
					.map(|item| {
						let value = item.value.render().map_err(|_| "struct value in array")?;
						Ok(match &item.repetition {
							Some(count) => format!("{count}({value})"),
							None => value,
						})
					})
					.collect::<Result<Vec<_>, &'static str>>()?;
				Ok(format!("[{}]", rendered.join(", ")))
			}
			Self::Struct => Err("struct value"),
		}
	}
}

//! Type descriptors
//!
//! Structural handles for (possibly generic) types of the host type graph,
//! plus the parser for the `Name<Arg, Other>[]` notation used in documents.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Name of the pseudo type returned by methods without a result
pub const VOID_TYPE_NAME: &str = "void";

/// Identity of a type, including its generic bindings.
///
/// Two descriptors are equal iff they denote the same type with the same
/// bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDescriptor {
    /// A named type with zero or more type arguments
    Named {
        name: String,
        args: Vec<TypeDescriptor>,
    },
    /// An array of the element type
    Array(Box<TypeDescriptor>),
    /// An unbound type variable
    Variable(String),
}

impl TypeDescriptor {
    /// A named type without type arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A named type with the given type arguments
    pub fn generic(name: impl Into<String>, args: Vec<TypeDescriptor>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    /// An array of the given element type
    pub fn array_of(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// An unbound type variable
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// The pseudo type of methods without result
    pub fn void() -> Self {
        Self::named(VOID_TYPE_NAME)
    }

    /// Base name (without arguments); arrays report their element's name
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name, .. } | Self::Variable(name) => name,
            Self::Array(element) => element.name(),
        }
    }

    /// Type arguments of a named type
    pub fn type_args(&self) -> &[TypeDescriptor] {
        match self {
            Self::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether this is the `void` pseudo type
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Named { name, args } if name == VOID_TYPE_NAME && args.is_empty())
    }

    /// Whether this descriptor still contains an unbound variable
    pub fn has_variables(&self) -> bool {
        match self {
            Self::Variable(_) => true,
            Self::Array(element) => element.has_variables(),
            Self::Named { args, .. } => args.iter().any(TypeDescriptor::has_variables),
        }
    }

    /// Replace variables (and bare names matching a parameter) by their bindings
    pub fn substitute(&self, bindings: &[(String, TypeDescriptor)]) -> TypeDescriptor {
        let lookup = |name: &str| {
            bindings
                .iter()
                .find(|(param, _)| param == name)
                .map(|(_, bound)| bound.clone())
        };
        match self {
            Self::Variable(name) => lookup(name).unwrap_or_else(|| self.clone()),
            Self::Named { name, args } if args.is_empty() => {
                lookup(name).unwrap_or_else(|| self.clone())
            }
            Self::Named { name, args } => Self::Named {
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(bindings)).collect(),
            },
            Self::Array(element) => Self::array_of(element.substitute(bindings)),
        }
    }

    /// Short description without package qualifiers, e.g. `Page<Item>`
    pub fn simple_description(&self) -> String {
        match self {
            Self::Named { name, args } => {
                let simple = name.rsplit('.').next().unwrap_or(name);
                if args.is_empty() {
                    simple.to_string()
                } else {
                    let args: Vec<String> = args.iter().map(Self::simple_description).collect();
                    format!("{simple}<{}>", args.join(", "))
                }
            }
            Self::Array(element) => format!("{}[]", element.simple_description()),
            Self::Variable(name) => name.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Variable(name) => f.write_str(name),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = TypeParser { input: s, pos: 0 };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos < s.len() {
            return Err(parser.error(format!("unexpected '{}'", &s[parser.pos..])));
        }
        Ok(parsed)
    }
}

// ============================================================================
// Parser
// ============================================================================

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::type_parse(self.input, message)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: &str) -> bool {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '$' | '.') {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected type name, found '{c}'")),
                None => self.error("unexpected end of input"),
            });
        }
        let name = self.input[start..self.pos].to_string();

        let mut args = Vec::new();
        if self.eat("<") {
            loop {
                args.push(self.parse_type()?);
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                return Err(match self.peek() {
                    Some(c) => self.error(format!("expected ',' or '>', found '{c}'")),
                    None => self.error("unexpected end of input"),
                });
            }
        }

        let mut parsed = TypeDescriptor::Named { name, args };
        while self.eat("[]") {
            parsed = TypeDescriptor::array_of(parsed);
        }
        Ok(parsed)
    }
}

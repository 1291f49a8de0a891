use std::fmt;

/// Semantic type names. Annotations may name every variant except `Any`,
/// which only appears as the inferred type of a variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Str,
    Bool,
    Void,
    Any,
}

impl TypeName {
    /// Looks up a type name usable in an annotation.
    pub fn from_annotation(text: &str) -> Option<Self> {
        match text {
            "int" => Some(TypeName::Int),
            "float" => Some(TypeName::Float),
            "str" => Some(TypeName::Str),
            "bool" => Some(TypeName::Bool),
            "void" => Some(TypeName::Void),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Str => "str",
            TypeName::Bool => "bool",
            TypeName::Void => "void",
            TypeName::Any => "any",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    /// Stored for a declaration without an initializer.
    Void,
}

impl Value {
    pub fn type_name(&self) -> TypeName {
        match self {
            Value::Int(_) => TypeName::Int,
            Value::Float(_) => TypeName::Float,
            Value::Str(_) => TypeName::Str,
            Value::Bool(_) => TypeName::Bool,
            Value::Void => TypeName::Void,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                // Always show at least one decimal place for floats
                if n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Void => write!(f, "undefined"),
        }
    }
}

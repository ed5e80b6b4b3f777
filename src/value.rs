use std::fmt;
use std::rc::Rc;

use crate::callable::{Callable, Function, NativeFunction};
use crate::class::{Class, Instance};

/// A run‑time value.
///
/// Scalars are stored inline; callables and instances are reference‑counted
/// so that copies of a value alias the same object.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
    Function(Rc<Function<'a>>),
    NativeFunction(Rc<NativeFunction<'a>>),
    Class(Rc<Class<'a>>),
    Instance(Rc<Instance<'a>>),
}

impl<'a> Value<'a> {
    /// Everything is truthy except `nil` and `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The callable capability of this value, if it has one.
    pub fn as_callable(&self) -> Option<&dyn Callable<'a>> {
        match self {
            Value::Function(function) => Some(function.as_ref()),
            Value::NativeFunction(native) => Some(native.as_ref()),
            Value::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::Function(_) | Value::NativeFunction(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }
}

impl<'a> PartialEq for Value<'a> {
    /// `nil` equals only `nil`; objects compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Minimal decimal form of a number: `3.0` → `3`, `2.5` → `2.5`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Canonical double text: shortest round-trip digits with at least one
/// fractional digit, in plain decimal for magnitudes in `[1e-3, 1e7)` (and
/// for zero) and as `d.dddEx` otherwise.  `0.5` → `0.5`, `1e-4` → `1.0E-4`,
/// `1e7` → `1.0E7`.
///
/// This is the text the division guard inspects.
pub fn format_double(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        // `{:?}` never switches to exponent form inside this range
        return format!("{:?}", n);
    }

    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));

    if mantissa.contains('.') {
        format!("{}E{}", mantissa, exponent)
    } else {
        format!("{}.0E{}", mantissa, exponent)
    }
}

impl<'a> fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),

            Value::String(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),

            Value::Function(function) => write!(f, "<fn {}>", function.name()),

            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name()),

            Value::Class(class) => write!(f, "{}", class.name),

            Value::Instance(instance) => write!(f, "{} instance", instance.class().name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "-0");
    }

    #[test]
    fn format_double_decimal_range() {
        assert_eq!(format_double(0.0), "0.0");
        assert_eq!(format_double(-0.0), "-0.0");
        assert_eq!(format_double(0.5), "0.5");
        assert_eq!(format_double(0.001), "0.001");
        assert_eq!(format_double(100.0), "100.0");
        assert_eq!(format_double(9999999.0), "9999999.0");
    }

    #[test]
    fn format_double_exponent_range() {
        assert_eq!(format_double(0.0001), "1.0E-4");
        assert_eq!(format_double(-0.00025), "-2.5E-4");
        assert_eq!(format_double(1e7), "1.0E7");
        assert_eq!(format_double(1.5e300), "1.5E300");
    }

    #[test]
    fn format_double_non_finite() {
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::INFINITY), "Infinity");
        assert_eq!(format_double(f64::NEG_INFINITY), "-Infinity");
    }
}

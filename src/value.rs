use crate::callable::Function;
use crate::class::Class;
use crate::dict::SharedDict;
use crate::handle::Handle;
use crate::instance::Instance;
use crate::shared_list::SharedList;
use std::fmt;

/// A runtime value. Cloning a List, Dict, Object or FileHandle clones the
/// handle, not the contents: every copy sees the same storage.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(SharedList<Value>),
    Dict(SharedDict),
    Function(Function),
    Class(Class),
    Object(Instance),
    FileHandle(Handle),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(_) => write!(f, "[List]"),
            Value::Dict(_) => write!(f, "[Dict]"),
            Value::Function(_) => write!(f, "[Function]"),
            Value::Class(_) => write!(f, "[Class]"),
            Value::Object(_) => write!(f, "[Object]"),
            Value::FileHandle(handle) => write!(f, "[File Handle: {:p}]", handle.as_ptr()),
        }
    }
}

/// Null, false and 0 are false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        _ => true,
    }
}

/// Formats a number the way C's `%g` does: six significant digits, trailing
/// zeros removed, scientific notation outside `1e-4 ..= 1e6`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return String::from(if n.is_sign_negative() { "-nan" } else { "nan" });
    }
    if n.is_infinite() {
        return String::from(if n > 0.0 { "inf" } else { "-inf" });
    }
    if n == 0.0 {
        return String::from(if n.is_sign_negative() { "-0" } else { "0" });
    }
    // Rounding to six digits decides the exponent, so 999999.7 becomes 1e+06.
    let scientific = format!("{:.5e}", n);
    let (mantissa, exponent) = match scientific.find('e') {
        Some(pos) => (
            &scientific[..pos],
            scientific[pos + 1..].parse::<i32>().unwrap_or(0),
        ),
        None => (scientific.as_str(), 0),
    };
    if exponent < -4 || exponent >= 6 {
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (5 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, n))
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Converts the longest numeric prefix of `text`, like `strtod`. Text with
/// no numeric prefix is 0.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return 0.0;
    }
    text[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod value_tests {
    use crate::shared_list::SharedList;
    use crate::value::{format_number, is_truthy, parse_number, Value};

    #[test]
    fn numbers_format_like_percent_g() {
        let cases = [
            (3.0, "3"),
            (0.5, "0.5"),
            (-2.25, "-2.25"),
            (1e6, "1e+06"),
            (123456.0, "123456"),
            (1234567.0, "1.23457e+06"),
            (0.0001, "0.0001"),
            (0.00001, "1e-05"),
            (3.14159265, "3.14159"),
            (100.0, "100"),
            (1.0 / 3.0, "0.333333"),
            (999999.7, "1e+06"),
            (0.0, "0"),
        ];
        for (n, expected) in cases.iter() {
            assert_eq!(format_number(*n), *expected, "formatting {}", n);
        }
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn number_literals_use_their_longest_prefix() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number("1.5"), 1.5);
        assert_eq!(parse_number("1.2.3"), 1.2);
        assert_eq!(parse_number("7."), 7.0);
        assert_eq!(parse_number("-3x"), -3.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::Bool(false)));
        assert!(!is_truthy(&Value::Number(0.0)));
        assert!(is_truthy(&Value::Number(-1.0)));
        assert!(is_truthy(&Value::Str(String::new())));
        assert!(is_truthy(&Value::List(SharedList::new())));
    }

    #[test]
    fn display_tags() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("hi".to_string()).to_string(), "hi");
        assert_eq!(Value::List(SharedList::new()).to_string(), "[List]");
    }
}

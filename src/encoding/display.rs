//! Display implementation for Value as CQL literals.

use core::fmt::{self, Write};

use super::Value;

/// Writes a comma separated sequence.
fn write_joined<I, F>(f: &mut fmt::Formatter<'_>, items: I, mut write_item: F) -> fmt::Result
where
    I: IntoIterator,
    F: FnMut(&mut fmt::Formatter<'_>, I::Item) -> fmt::Result,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

/// Writes a float so that it always reads back as a floating point literal.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64, rendered: &str) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        })
    } else if rendered.contains(['.', 'e', 'E']) {
        f.write_str(rendered)
    } else {
        write!(f, "{rendered}.0")
    }
}

impl fmt::Display for Value {
    /// Format a Value as a CQL literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Unset => f.write_str("UNSET"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::TinyInt(v) => write!(f, "{v}"),
            Value::SmallInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::BigInt(v) | Value::Counter(v) => write!(f, "{v}"),
            Value::Float(v) => write_float(f, f64::from(*v), &v.to_string()),
            Value::Double(v) => write_float(f, *v, &v.to_string()),
            Value::Text(s) => {
                // Escape single quotes by doubling them
                f.write_char('\'')?;
                for c in s.chars() {
                    if c == '\'' {
                        f.write_str("''")?;
                    } else {
                        f.write_char(c)?;
                    }
                }
                f.write_char('\'')
            }
            Value::Blob(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::Uuid(v) | Value::TimeUuid(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "'{v}'"),
            Value::Time(v) => write!(f, "{}", v.0),
            Value::Timestamp(v) => write!(f, "{}", v.0),
            Value::Inet(addr) => write!(f, "'{addr}'"),
            Value::List(items) => {
                f.write_char('[')?;
                write_joined(f, items, |f, item| write!(f, "{item}"))?;
                f.write_char(']')
            }
            Value::Set(items) => {
                f.write_char('{')?;
                write_joined(f, items, |f, item| write!(f, "{item}"))?;
                f.write_char('}')
            }
            Value::Map(entries) => {
                f.write_char('{')?;
                write_joined(f, entries, |f, (key, value)| write!(f, "{key}: {value}"))?;
                f.write_char('}')
            }
            Value::Tuple(items) => {
                f.write_char('(')?;
                write_joined(f, items, |f, item| write!(f, "{item}"))?;
                f.write_char(')')
            }
            Value::Udt { fields, .. } => {
                f.write_char('{')?;
                write_joined(f, fields, |f, (name, value)| write!(f, "{name}: {value}"))?;
                f.write_char('}')
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CqlDate;

    #[test]
    fn test_text_quotes_are_doubled() {
        assert_eq!(Value::from("it's").to_string(), "'it''s'");
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(Value::Double(1.0).to_string(), "1.0");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(f32::NAN).to_string(), "NaN");
        assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_date_is_quoted_iso() {
        let epoch = Value::Date(CqlDate::from_days_since_epoch(0));
        assert_eq!(epoch.to_string(), "'1970-01-01'");
    }

    #[test]
    fn test_blob_is_hex() {
        assert_eq!(Value::Blob(vec![0x00, 0xab]).to_string(), "0x00ab");
    }

    #[test]
    fn test_collections() {
        let list = Value::list([Value::Int(1), Value::Int(2)]);
        assert_eq!(list.to_string(), "[1, 2]");
        let map = Value::map([(Value::from("k"), Value::Boolean(true))]);
        assert_eq!(map.to_string(), "{'k': true}");
        let tuple = Value::Tuple(vec![Value::Int(1), Value::Null]);
        assert_eq!(tuple.to_string(), "(1, NULL)");
        let udt = Value::udt("person", [("name", Value::from("Ada"))]);
        assert_eq!(udt.to_string(), "{name: 'Ada'}");
    }
}

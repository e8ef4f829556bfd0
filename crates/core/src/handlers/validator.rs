// Format validation for common data types

use super::{json_schema_enum, json_schema_object, json_schema_string, named_enum};
use super::required_str;
use crate::error::HandlerError;
use crate::types::{Arguments, ToolDefinition};
use serde_json::{json, Value};

named_enum! {
    /// Data types the validator understands
    DataType {
        Email => "email",
        Cpf => "cpf",
        Phone => "phone",
        Url => "url",
    }
}

impl DataType {
    /// Whether `value` matches the fixed format for this type
    pub fn matches(&self, value: &str) -> bool {
        match self {
            DataType::Email => is_email(value),
            DataType::Cpf => is_cpf(value),
            DataType::Phone => is_phone(value),
            DataType::Url => is_url(value),
        }
    }
}

pub(super) fn definition() -> ToolDefinition {
    let types: Vec<&str> = DataType::ALL.iter().map(DataType::as_str).collect();

    ToolDefinition::new(
        "data_validator",
        "Validator for common data formats",
        json_schema_object(
            json!({
                "data_type": json_schema_enum(&types, "Kind of data to validate"),
                "value": json_schema_string("Value to validate")
            }),
            vec!["data_type", "value"],
        ),
    )
    .with_capabilities(["validation", "data", "format"])
    .with_metadata("category", "validation")
    .with_metadata("version", "2.0")
}

pub(super) fn execute(args: &Arguments) -> Result<Value, HandlerError> {
    let type_name = required_str(args, "data_type")?;
    let value = required_str(args, "value")?;

    let data_type: DataType = type_name
        .parse()
        .map_err(|_| HandlerError::InvalidDataType(type_name.to_string()))?;

    let valid = data_type.matches(value);
    let message = if valid {
        "Valid value".to_string()
    } else {
        format!("Invalid value for type {}", data_type)
    };

    Ok(json!({
        "valid": valid,
        "data_type": data_type.as_str(),
        "value": value,
        "message": message
    }))
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

/// `name.tld`: letters, digits, dots and hyphens, ending in a dot and at
/// least two letters
fn is_domain(s: &str) -> bool {
    let Some((head, tld)) = s.rsplit_once('.') else {
        return false;
    };
    !head.is_empty()
        && head.chars().all(is_domain_char)
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '.' | '-'))
        && is_domain(domain)
}

/// `ddd.ddd.ddd-dd` or eleven bare digits
fn is_cpf(value: &str) -> bool {
    if all_digits(value, 11) {
        return true;
    }
    let Some((body, check)) = value.split_once('-') else {
        return false;
    };
    let groups: Vec<&str> = body.split('.').collect();
    groups.len() == 3 && groups.iter().all(|g| all_digits(g, 3)) && all_digits(check, 2)
}

/// Optional two-digit area code (optionally parenthesized, optionally
/// followed by one whitespace), then 4-5 digits, an optional hyphen, and
/// four digits
fn is_phone(value: &str) -> bool {
    let mut rest = value.strip_prefix('(').unwrap_or(value);

    let Some(area) = rest.get(..2) else {
        return false;
    };
    if !all_digits(area, 2) {
        return false;
    }
    rest = &rest[2..];
    rest = rest.strip_prefix(')').unwrap_or(rest);
    if let Some(c) = rest.chars().next() {
        if c.is_ascii_whitespace() || c == '\u{0B}' {
            rest = &rest[c.len_utf8()..];
        }
    }

    match rest.split_once('-') {
        Some((prefix, line)) => {
            (all_digits(prefix, 4) || all_digits(prefix, 5)) && all_digits(line, 4)
        }
        None => all_digits(rest, 8) || all_digits(rest, 9),
    }
}

/// Characters a single-line path may not contain
const LINE_TERMINATORS: [char; 5] = ['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'];

/// `http(s)://domain.tld` with an optional single-line path
fn is_url(value: &str) -> bool {
    let Some(rest) = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    else {
        return false;
    };
    let (host, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    is_domain(host) && !path.contains(LINE_TERMINATORS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: Value) -> Result<Value, HandlerError> {
        execute(value.as_object().unwrap())
    }

    #[test]
    fn test_invalid_email_result() {
        let result = run(json!({"data_type": "email", "value": "not-an-email"})).unwrap();
        assert_eq!(result["valid"], false);
        assert_eq!(result["data_type"], "email");
        assert_eq!(result["value"], "not-an-email");
        assert_eq!(result["message"], "Invalid value for type email");
    }

    #[test]
    fn test_valid_email_result() {
        let result = run(json!({"data_type": "email", "value": "ana.silva+mcp@example.com.br"})).unwrap();
        assert_eq!(result["valid"], true);
        assert_eq!(result["message"], "Valid value");
    }

    #[test]
    fn test_email_patterns() {
        assert!(is_email("a@b.co"));
        assert!(is_email("user_name-1@sub-domain.example.org"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("a@b@c.com"));
        assert!(!is_email("a@example.c"));
        assert!(!is_email("a@example.c0m"));
        assert!(!is_email("a b@example.com"));
        assert!(!is_email("a@.com"));
    }

    #[test]
    fn test_cpf_patterns() {
        assert!(is_cpf("123.456.789-09"));
        assert!(is_cpf("12345678909"));
        assert!(!is_cpf("123.456.789.09"));
        assert!(!is_cpf("1234567890"));
        assert!(!is_cpf("123.456.78-909"));
        assert!(!is_cpf("abc.def.ghi-jk"));
    }

    #[test]
    fn test_phone_patterns() {
        assert!(is_phone("(11) 91234-5678"));
        assert!(is_phone("(11)1234-5678"));
        assert!(is_phone("11 912345678"));
        assert!(is_phone("1112345678"));
        assert!(is_phone("(11 1234-5678"));
        assert!(!is_phone("(11) 123-5678"));
        assert!(!is_phone("(11) 91234-567"));
        assert!(!is_phone("(11)  91234-5678"));
        assert!(!is_phone("1"));
        assert!(!is_phone("(ab) 91234-5678"));
    }

    #[test]
    fn test_url_patterns() {
        assert!(is_url("https://example.com"));
        assert!(is_url("http://sub.example.org/path?q=1"));
        assert!(!is_url("ftp://example.com"));
        assert!(!is_url("https://localhost"));
        assert!(!is_url("https://example.com/a\nb"));
        assert!(!is_url("https://example.com/a\u{85}b"));
        assert!(!is_url("https://example.com/a\u{2028}b"));
        assert!(!is_url("https://example.com/a\u{2029}b"));
        assert!(is_url("https://example.com/caf\u{e9}\tmenu"));
        assert!(!is_url("https:///path"));
    }

    #[test]
    fn test_invalid_data_type() {
        assert_eq!(
            run(json!({"data_type": "iban", "value": "x"})),
            Err(HandlerError::InvalidDataType("iban".to_string()))
        );
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            run(json!({"data_type": "email"})),
            Err(HandlerError::MissingArgument("value"))
        );
    }
}

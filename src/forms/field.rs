//! Field definitions and client-side validation rules.

use crate::models::dates::{parse_date, parse_datetime};
use crate::models::money::parse_cents;

/// A client-side check. Rules are advisory: the backend may still reject
/// a value that passes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    /// Exactly `n` ASCII digits.
    Digits(usize),
    Email,
    Date,
    DateTime,
    /// `^\d+(\.\d{1,2})?$` and at least `min_cents`.
    Decimal { min_cents: i64 },
    /// A whole number of at least the given value.
    MinInt(i64),
}

impl Rule {
    /// Checks a trimmed, non-empty value (except for `Required`).
    fn check(&self, label: &str, value: &str) -> Option<String> {
        match self {
            Rule::Required => value
                .is_empty()
                .then(|| format!("{label} is required")),
            Rule::MinLen(min) => (value.chars().count() < *min)
                .then(|| format!("{label} must have at least {min} characters")),
            Rule::MaxLen(max) => (value.chars().count() > *max)
                .then(|| format!("{label} cannot exceed {max} characters")),
            Rule::Digits(count) => {
                let ok = value.len() == *count && value.bytes().all(|b| b.is_ascii_digit());
                (!ok).then(|| format!("{label} must have exactly {count} digits"))
            }
            Rule::Email => (!is_email(value)).then(|| "Enter a valid email address".to_string()),
            Rule::Date => parse_date(value)
                .filter(|_| value.len() == 10)
                .is_none()
                .then(|| format!("{label} must be a date (YYYY-MM-DD)")),
            Rule::DateTime => parse_datetime(value)
                .is_none()
                .then(|| format!("{label} must be a date and time (YYYY-MM-DD HH:MM)")),
            Rule::Decimal { min_cents } => match parse_cents(value) {
                Some(cents) if !value.starts_with('-') => (cents < *min_cents).then(|| {
                    format!(
                        "{label} must be at least {}.{:02}",
                        min_cents / 100,
                        min_cents % 100
                    )
                }),
                _ => Some(format!("{label} must be a number with up to 2 decimals")),
            },
            Rule::MinInt(min) => match value.parse::<i64>() {
                Ok(n) if n >= *min => None,
                Ok(_) => Some(format!("{label} must be at least {min}")),
                Err(_) => Some(format!("{label} must be a whole number")),
            },
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain.split('.').all(|part| !part.is_empty())
}

/// First failing rule for `value`, if any. Empty optional values pass.
pub fn validate(label: &str, value: &str, rules: &[Rule]) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return rules
            .contains(&Rule::Required)
            .then(|| format!("{label} is required"));
    }
    rules.iter().find_map(|rule| rule.check(label, value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How keystrokes are applied to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Only digits are accepted, up to the given count.
    Digits(usize),
    /// Digits and a single dot, at most two decimals.
    Decimal,
    Choice(Vec<ChoiceOption>),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    pub default: String,
}

impl FieldSpec {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            rules: Vec::new(),
            default: String::new(),
        }
    }

    pub fn digits(key: &'static str, label: &'static str, count: usize) -> Self {
        Self {
            kind: FieldKind::Digits(count),
            ..Self::text(key, label)
        }
        .rules([Rule::Required, Rule::Digits(count)])
    }

    pub fn decimal(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Decimal,
            ..Self::text(key, label)
        }
    }

    pub fn choice(key: &'static str, label: &'static str, options: Vec<ChoiceOption>) -> Self {
        Self {
            kind: FieldKind::Choice(options),
            ..Self::text(key, label)
        }
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            FieldKind::Choice(options) => options,
            _ => &[],
        }
    }

    /// Applies input masking to a typed character. Returns `None` when the
    /// keystroke is dropped.
    pub fn accept(&self, current: &str, c: char) -> Option<char> {
        match self.kind {
            FieldKind::Text => Some(c),
            FieldKind::Digits(max) => {
                (c.is_ascii_digit() && current.len() < max).then_some(c)
            }
            FieldKind::Decimal => match c {
                '0'..='9' => match current.split_once('.') {
                    Some((_, decimals)) if decimals.len() >= 2 => None,
                    _ => Some(c),
                },
                '.' | ',' if !current.contains('.') && !current.is_empty() => Some('.'),
                _ => None,
            },
            FieldKind::Choice(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_is_checked_first() {
        let rules = [Rule::Required, Rule::MinLen(2)];
        assert_eq!(validate("Name", "   ", &rules).as_deref(), Some("Name is required"));
        assert_eq!(
            validate("Name", "A", &rules).as_deref(),
            Some("Name must have at least 2 characters")
        );
        assert_eq!(validate("Name", "Ana", &rules), None);
    }

    #[test]
    fn optional_empty_values_skip_other_rules() {
        assert_eq!(validate("Notes", "", &[Rule::MinLen(5)]), None);
    }

    #[test]
    fn ten_digit_phone() {
        let rules = [Rule::Required, Rule::Digits(10)];
        assert_eq!(
            validate("Telephone", "12345", &rules).as_deref(),
            Some("Telephone must have exactly 10 digits")
        );
        assert!(validate("Telephone", "30012345ab", &rules).is_some());
        assert_eq!(validate("Telephone", "3001234567", &rules), None);
    }

    #[test]
    fn decimal_amounts() {
        let rules = [Rule::Required, Rule::Decimal { min_cents: 1 }];
        assert_eq!(validate("Amount", "150.00", &rules), None);
        assert_eq!(validate("Amount", "150", &rules), None);
        assert_eq!(
            validate("Amount", "0", &rules).as_deref(),
            Some("Amount must be at least 0.01")
        );
        assert!(validate("Amount", "1.234", &rules).is_some());
        assert!(validate("Amount", "-5", &rules).is_some());
        assert!(validate("Amount", "12,50", &rules).is_some());
    }

    #[test]
    fn dates_emails_and_integers() {
        assert_eq!(validate("Birth date", "1990-04-12", &[Rule::Date]), None);
        assert!(validate("Birth date", "12/04/1990", &[Rule::Date]).is_some());
        assert_eq!(validate("Date", "2025-03-01 09:30", &[Rule::DateTime]), None);
        assert!(validate("Date", "2025-03-01", &[Rule::DateTime]).is_some());
        assert_eq!(validate("Email", "ana@clinic.co", &[Rule::Email]), None);
        assert!(validate("Email", "ana@", &[Rule::Email]).is_some());
        assert!(validate("Email", "ana clinic.co", &[Rule::Email]).is_some());
        assert_eq!(
            validate("Amount", "0", &[Rule::MinInt(1)]).as_deref(),
            Some("Amount must be at least 1")
        );
        assert!(validate("Amount", "two", &[Rule::MinInt(1)]).is_some());
    }

    #[test]
    fn masking_drops_keystrokes() {
        let phone = FieldSpec::digits("telephone", "Telephone", 10);
        assert_eq!(phone.accept("300", '4'), Some('4'));
        assert_eq!(phone.accept("300", 'x'), None);
        assert_eq!(phone.accept("3001234567", '8'), None);

        let amount = FieldSpec::decimal("amount", "Amount");
        assert_eq!(amount.accept("150", ','), Some('.'));
        assert_eq!(amount.accept("150.5", '.'), None);
        assert_eq!(amount.accept("150.55", '1'), None);
        assert_eq!(amount.accept("", '.'), None);
    }
}

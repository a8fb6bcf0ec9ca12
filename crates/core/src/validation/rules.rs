//! Field rules for Brazilian customer data.
//!
//! All functions are pure predicates or parsers; callers decide which field
//! name a failure is reported under.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::Email;

/// Length bounds for person names and company names.
pub const NAME_LEN: (usize, usize) = (5, 100);
/// Length bounds for passwords.
pub const PASSWORD_LEN: (usize, usize) = (8, 100);
/// Length bounds for service descriptions.
pub const DESCRIPTION_LEN: (usize, usize) = (5, 255);

// Column widths of the free-text fields.
pub const ADDRESS_TYPE_MAX: usize = 50;
pub const STREET_MAX: usize = 255;
pub const NUMBER_MAX: usize = 20;
pub const COMPLEMENT_MAX: usize = 255;
pub const STATE_MAX: usize = 50;
pub const CITY_MAX: usize = 100;
pub const TYPE_PRODUCT_MAX: usize = 100;
/// Longest accepted phone, separators included.
pub const PHONE_MAX: usize = 20;
/// Decimal places kept for monetary amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Optional area code, optional leading 9, then 4+4 digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0?[0-9]{2})?\s*?([0-9])\s*?([0-9]{4})\s*[-]?\s*([0-9]{4})$")
        .expect("Invalid regex")
});

static CPF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{3}\.?[0-9]{3}\.?[0-9]{3}-?[0-9]{2})$").expect("Invalid regex")
});

static CNPJ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2}\.?[0-9]{3}\.?[0-9]{3}/?[0-9]{4}-?[0-9]{2})$").expect("Invalid regex")
});

static CEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{5})-?([0-9]{3})$").expect("Invalid regex"));

/// `YYYY-MM-DD`; any of `- /.` as separator.
static BIRTH_DATE_YMD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:19|20)[0-9]{2})[- /.](0[1-9]|1[012])[- /.](0[1-9]|[12][0-9]|3[01])$")
        .expect("Invalid regex")
});

/// `DD-MM-YYYY`; any of `- /.` as separator.
static BIRTH_DATE_DMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])[- /.](0[1-9]|1[012])[- /.]((?:19|20)[0-9]{2})$")
        .expect("Invalid regex")
});

/// Character count of `value` lies within `bounds` (inclusive).
#[must_use]
pub fn length_between(value: &str, bounds: (usize, usize)) -> bool {
    let len = value.chars().count();
    len >= bounds.0 && len <= bounds.1
}

/// At most `max` characters.
#[must_use]
pub fn at_most(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Empty or whitespace only.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    Email::parse(value).is_ok()
}

#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    at_most(value, PHONE_MAX) && PHONE_RE.is_match(value)
}

/// Format check only; check digits are not verified.
#[must_use]
pub fn is_valid_cpf(value: &str) -> bool {
    CPF_RE.is_match(value)
}

/// Format check only; check digits are not verified.
#[must_use]
pub fn is_valid_cnpj(value: &str) -> bool {
    CNPJ_RE.is_match(value)
}

/// Strip separators from a phone, CPF or CNPJ.
#[must_use]
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[must_use]
pub fn is_valid_cep(value: &str) -> bool {
    CEP_RE.is_match(value)
}

/// Parse a birth date written as `YYYY-MM-DD` or `DD-MM-YYYY`.
///
/// Returns `None` when the text matches neither layout or names a day that
/// does not exist (e.g. `2001-02-30`).
#[must_use]
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let (year, month, day) = if let Some(caps) = BIRTH_DATE_YMD_RE.captures(value) {
        (caps.get(1)?, caps.get(2)?, caps.get(3)?)
    } else {
        let caps = BIRTH_DATE_DMY_RE.captures(value)?;
        (caps.get(3)?, caps.get(2)?, caps.get(1)?)
    };

    NaiveDate::from_ymd_opt(
        year.as_str().parse().ok()?,
        month.as_str().parse().ok()?,
        day.as_str().parse().ok()?,
    )
}

/// Largest storable amount: ten integer digits and two decimals.
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, AMOUNT_SCALE)
}

/// Monetary amounts may be zero but never negative, carry at most two
/// decimals and fit [`max_amount`].
#[must_use]
pub fn is_valid_amount(value: Decimal) -> bool {
    let non_negative = !value.is_sign_negative() || value.is_zero();
    non_negative && value.normalize().scale() <= AMOUNT_SCALE && value <= max_amount()
}

//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a user.", "user_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(ProductId, "Unique identifier for a product.", "product_id");

non_empty_string_newtype!(
    CategoryName,
    "Category display name enforcing non-empty values.",
    "name"
);
non_empty_string_newtype!(
    ProductTitle,
    "Product title enforcing non-empty values.",
    "title"
);
non_empty_string_newtype!(
    ProductDescription,
    "Product description enforcing non-empty values.",
    "description"
);

non_negative_i32_newtype!(StockCount, "Number of items in stock.", "stock");

/// External Telegram identity number. Always positive; Telegram ids exceed
/// the `i32` range, hence the wider backing type.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TelegramId(i64);

impl TelegramId {
    /// Creates a new identity ensuring it is greater than zero.
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveId("tg_id"))
        }
    }

    /// Returns the raw `i64` value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for TelegramId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for TelegramId {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TelegramId> for i64 {
    fn from(value: TelegramId) -> Self {
        value.0
    }
}

/// Canonical URL-safe identifier derived from display text.
///
/// The canonical alphabet is `[a-z0-9-]` with no leading, trailing or
/// doubled hyphens. [`Slug::slugify`] is total and idempotent; [`Slug::new`]
/// accepts only already-canonical input and is used when reading persisted
/// rows back into the domain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    const FALLBACK: &'static str = "item";

    /// Derive a canonical slug from free text. Lower-cases the input and
    /// collapses every run of non-alphanumeric characters into a single
    /// hyphen; an input with no usable characters falls back to `"item"`,
    /// so the result is always non-empty.
    pub fn slugify(text: &str) -> Self {
        let mut slug = String::with_capacity(text.len());
        let mut pending_hyphen = false;
        for ch in text.trim().chars() {
            let ch = ch.to_ascii_lowercase();
            if ch.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            } else {
                pending_hyphen = true;
            }
        }
        if slug.is_empty() {
            slug.push_str(Self::FALLBACK);
        }
        Self(slug)
    }

    /// Accepts an already-canonical slug, rejecting anything `slugify`
    /// would have rendered differently.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        let canonical = Self::slugify(&value);
        if canonical.0 == value {
            Ok(canonical)
        } else {
            Err(TypeConstraintError::InvalidValue(format!(
                "slug is not in canonical form: {value}"
            )))
        }
    }

    /// Borrow the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned slug.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Slug {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Slug> for &str {
    fn eq(&self, other: &Slug) -> bool {
        *self == other.as_str()
    }
}

/// Non-negative monetary amount with exact decimal semantics.
///
/// Values are normalized to two fraction digits and persisted as integer
/// minor units, so money never travels through binary floating point.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    const SCALE: u32 = 2;

    /// Constructs a non-negative price rounded to two fraction digits.
    pub fn new(value: Decimal) -> Result<Self, TypeConstraintError> {
        if value.is_sign_negative() {
            return Err(TypeConstraintError::NegativeNumber("price"));
        }
        let cents = (value.round_dp(Self::SCALE) * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or_else(|| TypeConstraintError::InvalidValue("price out of range".to_string()))?;
        Ok(Self(Decimal::new(cents, Self::SCALE)))
    }

    /// A zero price.
    pub fn zero() -> Self {
        Self(Decimal::new(0, Self::SCALE))
    }

    /// Reconstructs a price from persisted integer minor units.
    pub fn from_minor_units(cents: i64) -> Self {
        Self(Decimal::new(cents, Self::SCALE))
    }

    /// Returns the amount in integer minor units (cents).
    pub fn minor_units(self) -> i64 {
        self.0.mantissa() as i64
    }

    /// Returns the exact decimal value.
    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = TypeConstraintError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// ISO-4217-style currency code: exactly three ASCII letters, upper-cased.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Constructs an upper-cased three-letter currency code.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let code = value.into().trim().to_ascii_uppercase();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(TypeConstraintError::InvalidValue(format!(
                "currency must be 3 letters: {code}"
            )))
        }
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned code.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("RUB".to_string())
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rejects_non_positive_ids() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("product_id"));
        assert!(TelegramId::new(-5).is_err());
    }

    #[test]
    fn trims_non_empty_strings() {
        let value = ProductTitle::new("  Nice Shoes  ").unwrap();
        assert_eq!(value.as_str(), "Nice Shoes");
        assert!(ProductTitle::new("   ").is_err());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(Slug::slugify("Nice Shoes"), "nice-shoes");
        assert_eq!(Slug::slugify("  Rock'n'Roll  Boots "), "rock-n-roll-boots");
        assert_eq!(Slug::slugify("--a--b--"), "a-b");
    }

    #[test]
    fn slugify_falls_back_on_empty_input() {
        assert_eq!(Slug::slugify(""), "item");
        assert_eq!(Slug::slugify("!!!"), "item");
    }

    #[test]
    fn slugify_is_idempotent() {
        for input in ["Nice Shoes", "Čaj зелёный", "a!b", "x", "  "] {
            let once = Slug::slugify(input);
            let twice = Slug::slugify(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn slugify_output_stays_in_alphabet() {
        let slug = Slug::slugify(" Weird -- input ## 42 ");
        assert!(
            slug.as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        );
        assert!(!slug.as_str().starts_with('-'));
        assert!(!slug.as_str().ends_with('-'));
        assert!(!slug.as_str().contains("--"));
    }

    #[test]
    fn slug_new_accepts_only_canonical_input() {
        assert!(Slug::new("nice-shoes").is_ok());
        assert!(Slug::new("Nice Shoes").is_err());
        assert!(Slug::new("").is_err());
    }

    #[test]
    fn price_allows_zero_and_rejects_negative() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap().minor_units(), 0);
        assert_eq!(
            Price::new(Decimal::from_str("-0.01").unwrap()).unwrap_err(),
            TypeConstraintError::NegativeNumber("price")
        );
    }

    #[test]
    fn price_round_trips_through_minor_units() {
        let price = Price::new(Decimal::from_str("123.45").unwrap()).unwrap();
        assert_eq!(price.minor_units(), 12345);
        assert_eq!(Price::from_minor_units(12345), price);
        assert_eq!(price.to_string(), "123.45");
    }

    #[test]
    fn price_normalizes_to_two_fraction_digits() {
        let price = Price::new(Decimal::from_str("10.005").unwrap()).unwrap();
        assert_eq!(price.minor_units(), 1000);
        assert_eq!(Price::new(Decimal::from_str("7").unwrap()).unwrap().to_string(), "7.00");
    }

    #[test]
    fn currency_codes_are_uppercased_and_three_letters() {
        assert_eq!(CurrencyCode::new(" rub ").unwrap().as_str(), "RUB");
        assert!(CurrencyCode::new("RU").is_err());
        assert!(CurrencyCode::new("RUB1").is_err());
        assert!(CurrencyCode::new("R5B").is_err());
    }
}

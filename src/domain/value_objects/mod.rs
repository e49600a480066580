//! Value Objects for the storefront catalog

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// URL-safe lowercase identifier derived from a display name
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Lower-cases and trims `name`, turns whitespace runs into `-`, drops
    /// everything that is not `[a-z0-9_-]`, then collapses repeated hyphens.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let lowered = name.to_lowercase();
        let mut hyphenated = String::with_capacity(lowered.len());
        let mut in_space = false;
        for c in lowered.trim().chars() {
            if c.is_whitespace() {
                if !in_space {
                    hyphenated.push('-');
                }
                in_space = true;
                continue;
            }
            in_space = false;
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                hyphenated.push(c);
            }
        }

        let mut value = String::with_capacity(hyphenated.len());
        for c in hyphenated.chars() {
            if c == '-' && value.ends_with('-') {
                continue;
            }
            value.push(c);
        }

        if value.is_empty() || value == "-" {
            return Err(SlugError::Empty);
        }
        Ok(Self(value))
    }

    /// Wraps an already-formed slug supplied by a client.
    pub fn parse(value: &str) -> Result<Self, SlugError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
            return Err(SlugError::InvalidCharacters);
        }
        Ok(Self(value.to_string()))
    }

    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    Empty,
    InvalidCharacters,
}
impl std::error::Error for SlugError {}
impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Name must contain at least one letter or digit"),
            Self::InvalidCharacters => write!(f, "Slug may only contain lowercase letters, digits, '-' and '_'"),
        }
    }
}

/// Money value object. Stored at full precision, displayed in whole units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Floors to whole units; every monetary figure shown to the admin goes through here.
    pub fn whole(&self) -> i64 {
        self.0.floor().to_i64().unwrap_or(0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_name() {
        assert_eq!(Slug::from_name("Smart Home Electronics").unwrap().as_str(), "smart-home-electronics");
        assert_eq!(Slug::from_name("  Books & Media  ").unwrap().as_str(), "books-media");
        assert_eq!(Slug::from_name("Kids' -- Toys").unwrap().as_str(), "kids-toys");
        assert_eq!(Slug::from_name("snake_case stays").unwrap().as_str(), "snake_case-stays");
    }

    #[test]
    fn test_slug_rejects_symbol_only_names() {
        assert_eq!(Slug::from_name("!!!"), Err(SlugError::Empty));
        assert_eq!(Slug::from_name("   "), Err(SlugError::Empty));
    }

    #[test]
    fn test_slug_parse_and_suffix() {
        let slug = Slug::parse("iphone-15-pro").unwrap();
        assert_eq!(slug.with_suffix("0a1f").as_str(), "iphone-15-pro-0a1f");
        assert_eq!(Slug::parse("Not A Slug"), Err(SlugError::InvalidCharacters));
    }

    #[test]
    fn test_money_whole_floors() {
        assert_eq!(Money::new(Decimal::new(99999, 2)).whole(), 999);
        assert_eq!(Money::new(Decimal::new(-150, 2)).whole(), -2);
        let total: Money = [Decimal::new(1050, 2), Decimal::new(1050, 2)].into_iter().map(Money::new).sum();
        assert_eq!(total.whole(), 21);
    }
}

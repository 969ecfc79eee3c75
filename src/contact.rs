use crate::errors::{ContactError, Field, Reason};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[0-9]{4} [A-Z]{2}\z").expect("postal code pattern is valid"));

/// A Dutch postal code: four digits, a single space and two capital letters,
/// e.g. `1234 AB`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ContactError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ContactError::new(Field::PostalCode, Reason::Empty));
        }

        if !POSTAL_CODE.is_match(&value) {
            return Err(ContactError::new(
                Field::PostalCode,
                Reason::InvalidFormat(value),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PostalCode {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ContactRecord is a validated entry of the address book, either the
/// sender of the letters or one of their recipients.
///
/// Records can only be obtained through [`ContactRecord::new`], so every
/// instance holds non-empty values and a well-formed postal code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactRecord {
    name: String,
    address: String,
    postal_code: PostalCode,
    city: String,
}

impl ContactRecord {
    /// Validates and builds a record.
    ///
    /// Surrounding whitespace is stripped from the name, address and city.
    /// The postal code is matched exactly as given. Fields are checked in
    /// column order and the first invalid one is reported.
    pub fn new(
        name: &str,
        address: &str,
        postal_code: &str,
        city: &str,
    ) -> Result<Self, ContactError> {
        let name = required(Field::Name, name)?;
        let address = required(Field::Address, address)?;
        let postal_code = PostalCode::new(postal_code)?;
        let city = required(Field::City, city)?;

        Ok(Self {
            name,
            address,
            postal_code,
            city,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn postal_code(&self) -> &PostalCode {
        &self.postal_code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// The last address line as printed on an envelope: `1234 AB Utrecht`.
    pub fn locality(&self) -> String {
        format!("{} {}", self.postal_code, self.city)
    }
}

fn required(field: Field, value: &str) -> Result<String, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ContactError::new(field, Reason::Empty));
    }

    Ok(value.to_string())
}

use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::io;

/// The fields of a contact row, in the order they appear in the CSV file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Address,
    PostalCode,
    City,
}

/// Why a field was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    /// The field was absent or contained only whitespace.
    Empty,

    /// The field did not match the expected format. Holds the offending
    /// value.
    InvalidFormat(String),
}

#[derive(Debug, PartialEq)]
pub struct ContactError {
    pub field: Field,
    pub reason: Reason,
}

impl ContactError {
    pub fn new(field: Field, reason: Reason) -> Self {
        Self { field, reason }
    }
}

#[derive(Debug, PartialEq)]
pub struct ValidationError {
    pub row_index: usize,
    pub field: Field,
    pub reason: Reason,
}

impl ValidationError {
    pub fn new(row_index: usize, err: ContactError) -> Self {
        Self {
            row_index,
            field: err.field,
            reason: err.reason,
        }
    }
}

#[derive(Debug)]
pub enum AddressBookError {
    MissingSender,
    MalformedRow { row_index: usize, fields: usize },
    Validation(ValidationError),
    Csv(csv::Error),
    Io(io::Error),
}

#[derive(Debug)]
pub enum LetterError {
    Io(io::Error),
    Render(lopdf::Error),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Address => write!(f, "address"),
            Field::PostalCode => write!(f, "postal_code"),
            Field::City => write!(f, "city"),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Empty => write!(f, "a value is required, but none was provided"),
            Reason::InvalidFormat(value) => write!(
                f,
                "'{}' does not match the expected format (4 digits, a space and 2 capitals, e.g. 1234 AB)",
                value
            ),
        }
    }
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} has an invalid {}: {}",
            self.row_index, self.field, self.reason
        )
    }
}

impl fmt::Display for AddressBookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AddressBookError::MissingSender => write!(
                f,
                "the address book MUST contain at least one row with the sender's details"
            ),
            AddressBookError::MalformedRow { row_index, fields } => write!(
                f,
                "row {} has {} fields, expected 4 (name, address, postal_code, city)",
                row_index, fields
            ),
            AddressBookError::Validation(err) => write!(f, "{}", err),
            AddressBookError::Csv(err) => write!(f, "failed to read csv record: {}", err),
            AddressBookError::Io(err) => write!(f, "failed to read address book: {}", err),
        }
    }
}

impl fmt::Display for LetterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LetterError::Io(err) => write!(f, "failed to write letter: {}", err),
            LetterError::Render(err) => write!(f, "failed to render letter: {}", err),
        }
    }
}

impl From<ValidationError> for AddressBookError {
    fn from(err: ValidationError) -> Self {
        AddressBookError::Validation(err)
    }
}

impl From<csv::Error> for AddressBookError {
    fn from(err: csv::Error) -> Self {
        AddressBookError::Csv(err)
    }
}

impl From<io::Error> for AddressBookError {
    fn from(err: io::Error) -> Self {
        AddressBookError::Io(err)
    }
}

impl From<io::Error> for LetterError {
    fn from(err: io::Error) -> Self {
        LetterError::Io(err)
    }
}

impl From<lopdf::Error> for LetterError {
    fn from(err: lopdf::Error) -> Self {
        LetterError::Render(err)
    }
}

impl Error for ContactError {}
impl Error for ValidationError {}
impl Error for AddressBookError {}
impl Error for LetterError {}

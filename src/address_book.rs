use crate::contact::ContactRecord;
use crate::errors::{AddressBookError, ValidationError};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The number of columns every address book row must have.
const FIELDS_PER_ROW: usize = 4;

/// A raw address book row, as read from the CSV file before validation.
#[derive(Debug, Deserialize)]
struct ContactRow {
    name: String,
    address: String,
    postal_code: String,
    city: String,
}

/// An AddressBook holds the sender of the data access requests together with
/// the contacts the requests are sent to.
///
/// The CSV input has no header row. The first row describes the sender, all
/// following rows are recipients, kept in file order.
#[derive(Debug)]
pub struct AddressBook {
    sender: ContactRecord,
    recipients: Vec<ContactRecord>,
}

impl AddressBook {
    /// Parses comma separated address book data.
    pub fn parse(csv_text: &str) -> Result<Self, AddressBookError> {
        Self::parse_with_delimiter(csv_text, b',')
    }

    /// Parses address book data separated by `delimiter`.
    ///
    /// Every row is validated before this returns; the first malformed row or
    /// invalid field aborts parsing.
    pub fn parse_with_delimiter(csv_text: &str, delimiter: u8) -> Result<Self, AddressBookError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(csv_text.as_bytes());

        let mut contacts = Vec::new();
        for (row_index, record) in reader.records().enumerate() {
            let record = record?;

            // Rows are deserialized by position, so a row with a missing or
            // surplus column would silently shift fields. Reject those first.
            if record.len() != FIELDS_PER_ROW {
                return Err(AddressBookError::MalformedRow {
                    row_index,
                    fields: record.len(),
                });
            }

            let row: ContactRow = record.deserialize(None)?;
            let contact = ContactRecord::new(&row.name, &row.address, &row.postal_code, &row.city)
                .map_err(|err| ValidationError::new(row_index, err))?;

            debug!("parsed row {}: {:?}", row_index, contact);
            contacts.push(contact);
        }

        let mut contacts = contacts.into_iter();
        let sender = contacts.next().ok_or(AddressBookError::MissingSender)?;

        Ok(Self {
            sender,
            recipients: contacts.collect(),
        })
    }

    /// Reads and parses the address book stored at `path`.
    ///
    /// Files that are not valid UTF-8 are assumed to be Windows-1252, the
    /// encoding most spreadsheet applications export to on Dutch systems.
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, AddressBookError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "{} is not valid UTF-8, decoding it as Windows-1252",
                    path.display()
                );
                encoding_rs::WINDOWS_1252
                    .decode(err.as_bytes())
                    .0
                    .into_owned()
            }
        };

        Self::parse_with_delimiter(&text, delimiter)
    }

    /// The owner of the address book, on whose behalf all letters are written.
    pub fn sender(&self) -> &ContactRecord {
        &self.sender
    }

    /// Iterates the recipients in file order. Every call starts from the
    /// first recipient again.
    pub fn recipients(&self) -> impl Iterator<Item = &ContactRecord> + '_ {
        self.recipients.iter()
    }

    /// The number of recipients.
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

//! Generates personal data access requests ("inzageverzoeken") as PDF letters
//! for every contact in a CSV address book.

pub mod address_book;
pub mod args;
pub mod contact;
pub mod errors;
pub mod letter;
pub mod locale;
pub mod pdf;

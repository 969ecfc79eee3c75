use crate::address_book::AddressBook;
use crate::contact::ContactRecord;
use crate::errors::LetterError;
use crate::locale;
use crate::pdf;
use chrono::NaiveDate;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Vertical space between the address blocks and the dateline, in points.
const BLOCK_SPACING: i64 = 40;

/// Vertical space between the remaining sections, in points.
const SECTION_SPACING: i64 = 20;

/// A single element of a letter's layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// A single line of text, only broken up if it is wider than the page.
    Line(String),

    /// Running text, wrapped to the width of the page.
    Paragraph(String),

    /// Blank vertical space of the given height in points.
    Space(i64),
}

/// A Letter is a fully assembled data access request, ready to be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Letter {
    file_name: String,
    title: String,
    blocks: Vec<Block>,
}

impl Letter {
    /// The name of the file the letter is written to, e.g.
    /// `bedrijf_bv_20240115.pdf`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The text of the letter, one entry per line or paragraph.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Line(text) | Block::Paragraph(text) => Some(text.as_str()),
            Block::Space(_) => None,
        })
    }
}

/// Derives the output file name for a letter to `recipient` dated `as_of`.
///
/// The name is lowercased with whitespace, path separators and other
/// characters that are not allowed in file names replaced by `_`, so the
/// letter always lands directly inside the output directory. Leading dots
/// are replaced as well.
///
/// Two recipients with the same name share a file name on the same day, so
/// the later letter replaces the earlier one.
pub fn file_name(recipient: &ContactRecord, as_of: NaiveDate) -> String {
    let mut stem: String = recipient
        .name()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();

    let dots = stem.len() - stem.trim_start_matches('.').len();
    stem.replace_range(..dots, &"_".repeat(dots));

    format!("{}_{}.pdf", stem, as_of.format("%Y%m%d"))
}

/// A LetterGenerator assembles data access requests and writes them as PDF
/// files into its output directory.
pub struct LetterGenerator {
    output_dir: PathBuf,
}

impl LetterGenerator {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Assembles the letter `sender` sends to `recipient`, dated `as_of`.
    pub fn generate(
        sender: &ContactRecord,
        recipient: &ContactRecord,
        as_of: NaiveDate,
    ) -> Letter {
        let locale = locale::current();

        let mut blocks = Vec::new();
        push_address(&mut blocks, sender);
        blocks.push(Block::Space(BLOCK_SPACING));
        push_address(&mut blocks, recipient);
        blocks.push(Block::Space(BLOCK_SPACING));

        blocks.push(Block::Line(format!(
            "{}, {}",
            sender.city(),
            locale.format_date(as_of)
        )));
        blocks.push(Block::Space(SECTION_SPACING));
        blocks.push(Block::Paragraph(locale.subject.to_string()));
        blocks.push(Block::Space(SECTION_SPACING));
        blocks.push(Block::Line(locale.greeting.to_string()));

        for paragraph in locale.paragraphs {
            blocks.push(Block::Space(SECTION_SPACING));
            blocks.push(Block::Paragraph(paragraph.to_string()));
        }

        blocks.push(Block::Space(SECTION_SPACING));
        blocks.push(Block::Line(locale.closing.to_string()));
        blocks.push(Block::Space(SECTION_SPACING));
        blocks.push(Block::Line(sender.name().to_string()));

        Letter {
            file_name: file_name(recipient, as_of),
            title: locale.subject.to_string(),
            blocks,
        }
    }

    /// Renders `letter` and writes it into the output directory, creating the
    /// directory first if needed. An existing file with the same name is
    /// replaced.
    ///
    /// Returns the path of the written file.
    pub fn write(&self, letter: &Letter) -> Result<PathBuf, LetterError> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(letter.file_name());
        pdf::save(letter, &path)?;

        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Generates and writes a letter for every recipient in the address book,
    /// in file order. The first failure stops the run; letters written
    /// before it stay on disk.
    ///
    /// The output directory is created even if there are no recipients.
    pub fn generate_all(
        &self,
        address_book: &AddressBook,
        as_of: NaiveDate,
    ) -> Result<Vec<PathBuf>, LetterError> {
        fs::create_dir_all(&self.output_dir)?;
        let sender = address_book.sender();

        let mut written = Vec::with_capacity(address_book.len());
        for recipient in address_book.recipients() {
            debug!("generating letter for {}", recipient.name());
            let letter = Self::generate(sender, recipient, as_of);
            written.push(self.write(&letter)?);
        }

        Ok(written)
    }
}

fn push_address(blocks: &mut Vec<Block>, contact: &ContactRecord) {
    blocks.push(Block::Line(contact.name().to_string()));
    blocks.push(Block::Line(contact.address().to_string()));
    blocks.push(Block::Line(contact.locality()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> ContactRecord {
        ContactRecord::new("Jan Jansen", "Dorpsstraat 1", "1234 AB", "Utrecht").unwrap()
    }

    fn recipient() -> ContactRecord {
        ContactRecord::new("Bedrijf BV", "Kantoorweg 2", "5678 CD", "Amsterdam").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn should_derive_file_name_from_recipient_and_date() {
        assert_eq!(file_name(&recipient(), date()), "bedrijf_bv_20240115.pdf");
        assert_eq!(file_name(&sender(), date()), "jan_jansen_20240115.pdf");
    }

    #[test]
    fn should_replace_characters_not_allowed_in_file_names() {
        let name = |name: &str| {
            let contact =
                ContactRecord::new(name, "Kantoorweg 2", "5678 CD", "Amsterdam").unwrap();
            file_name(&contact, date())
        };

        assert_eq!(name("Bedrijf A/S"), "bedrijf_a_s_20240115.pdf");
        assert_eq!(name("../../escaped"), "___.._escaped_20240115.pdf");
        assert_eq!(name(".hidden"), "_hidden_20240115.pdf");
        assert_eq!(name("C:\\Bedrijf*"), "c__bedrijf__20240115.pdf");
        assert_eq!(name("Café  Één"), "café__één_20240115.pdf");
    }

    #[test]
    fn should_keep_letters_inside_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let generator = LetterGenerator::new(&out);

        let book = AddressBook::parse(
            "Jan Jansen,Dorpsstraat 1,1234 AB,Utrecht\n\
             Bedrijf A/S,Kantoorweg 2,5678 CD,Amsterdam\n\
             ../../escaped,Kantoorweg 3,5678 CD,Amsterdam\n",
        )
        .unwrap();

        // Both names contain path separators; the letters must still be
        // written as plain files directly inside the output directory.
        let written = generator.generate_all(&book, date()).unwrap();
        assert_eq!(written.len(), 2);
        for path in &written {
            assert_eq!(path.parent(), Some(out.as_path()));
            assert!(path.is_file());
        }

        let entries = fs::read_dir(&out).unwrap().count();
        assert_eq!(entries, 2);
        let siblings = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(siblings, 1);
    }

    #[test]
    fn should_assemble_sections_in_order() {
        let letter = LetterGenerator::generate(&sender(), &recipient(), date());
        let locale = locale::current();

        let mut expected = vec![
            Block::Line("Jan Jansen".to_string()),
            Block::Line("Dorpsstraat 1".to_string()),
            Block::Line("1234 AB Utrecht".to_string()),
            Block::Space(40),
            Block::Line("Bedrijf BV".to_string()),
            Block::Line("Kantoorweg 2".to_string()),
            Block::Line("5678 CD Amsterdam".to_string()),
            Block::Space(40),
            Block::Line("Utrecht, 15 januari 2024".to_string()),
            Block::Space(20),
            Block::Paragraph(locale.subject.to_string()),
            Block::Space(20),
            Block::Line("Geachte heer, mevrouw,".to_string()),
        ];
        for paragraph in locale.paragraphs {
            expected.push(Block::Space(20));
            expected.push(Block::Paragraph(paragraph.to_string()));
        }
        expected.extend([
            Block::Space(20),
            Block::Line("Hoogachtend,".to_string()),
            Block::Space(20),
            Block::Line("Jan Jansen".to_string()),
        ]);

        assert_eq!(letter.blocks(), expected.as_slice());
        assert_eq!(letter.file_name(), "bedrijf_bv_20240115.pdf");
        assert_eq!(letter.title(), locale.subject);
    }

    #[test]
    fn should_contain_both_addresses_and_request_text() {
        let letter = LetterGenerator::generate(&sender(), &recipient(), date());
        let text: Vec<&str> = letter.lines().collect();

        for line in [
            "Dorpsstraat 1",
            "1234 AB Utrecht",
            "Kantoorweg 2",
            "5678 CD Amsterdam",
        ] {
            assert!(text.contains(&line), "missing {:?}", line);
        }
        for paragraph in locale::current().paragraphs {
            assert!(text.contains(&paragraph));
        }
        assert_eq!(text.last(), Some(&"Jan Jansen"));
    }

    #[test]
    fn should_write_one_file_per_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let generator = LetterGenerator::new(&out);

        let book = AddressBook::parse(
            "Jan Jansen,Dorpsstraat 1,1234 AB,Utrecht\n\
             Bedrijf BV,Kantoorweg 2,5678 CD,Amsterdam\n",
        )
        .unwrap();

        // The output directory does not exist yet and should be created.
        let written = generator.generate_all(&book, date()).unwrap();
        assert_eq!(written, vec![out.join("bedrijf_bv_20240115.pdf")]);

        let entries: Vec<_> = fs::read_dir(&out).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let bytes = fs::read(&written[0]).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn should_write_nothing_for_sender_only_address_book() {
        let dir = tempfile::tempdir().unwrap();
        let generator = LetterGenerator::new(dir.path().join("out"));

        let book = AddressBook::parse("Jan Jansen,Dorpsstraat 1,1234 AB,Utrecht\n").unwrap();
        let written = generator.generate_all(&book, date()).unwrap();

        assert!(written.is_empty());
        let entries: Vec<_> = fs::read_dir(generator.output_dir()).unwrap().collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn should_overwrite_letters_written_on_the_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let generator = LetterGenerator::new(dir.path());

        // Write a letter, then a letter from another sender to the same
        // recipient, and verify the second one replaced the first file.
        let first = LetterGenerator::generate(&sender(), &recipient(), date());
        let path = generator.write(&first).unwrap();
        let first_len = fs::metadata(&path).unwrap().len();

        let other_sender = ContactRecord::new(
            "Pieternella van der Berghe-Oosterhuis",
            "Lange Laan 100",
            "4321 ZX",
            "Groningen",
        )
        .unwrap();
        let second = LetterGenerator::generate(&other_sender, &recipient(), date());
        assert_eq!(generator.write(&second).unwrap(), path);

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_ne!(fs::metadata(&path).unwrap().len(), first_len);
    }

    #[test]
    fn should_fail_when_output_dir_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let generator = LetterGenerator::new(file.path());

        let letter = LetterGenerator::generate(&sender(), &recipient(), date());
        assert!(matches!(
            generator.write(&letter).unwrap_err(),
            LetterError::Io(_)
        ));
    }
}

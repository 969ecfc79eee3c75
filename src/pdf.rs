//! PDF rendering of letters.
//!
//! Letters are laid out on US Letter pages using the standard Helvetica font,
//! so the resulting files need no embedded fonts.

use crate::errors::LetterError;
use crate::letter::{Block, Letter};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 36;

const FONT_SIZE: i64 = 12;
const LEADING: i64 = 14;

/// Baseline of the first line on a page.
const TOP: i64 = PAGE_HEIGHT - MARGIN - FONT_SIZE;

/// Width available to text, in thousandths of the font size.
const TEXT_WIDTH: u32 = ((PAGE_WIDTH - 2 * MARGIN) * 1000 / FONT_SIZE) as u32;

/// A line of text placed on a page, `y` being the baseline.
#[derive(Debug, PartialEq)]
struct PlacedLine {
    y: i64,
    text: String,
}

/// Builds the PDF document for `letter`.
pub fn render(letter: &Letter) -> Result<Document, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in layout(letter.blocks()) {
        let content = page_content(&page).encode()?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode(letter.title())),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}

/// Renders `letter` and writes it to `path`, replacing any existing file.
pub fn save(letter: &Letter, path: &Path) -> Result<(), LetterError> {
    let mut doc = render(letter)?;

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save_to(&mut writer)?;
    writer.flush()?;

    Ok(())
}

fn page_content(lines: &[PlacedLine]) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        operations.push(Operation::new("Td", vec![MARGIN.into(), line.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

/// Places the blocks of a letter on pages, top to bottom. Lines and
/// paragraphs are wrapped to the text width and a new page is started whenever the next
/// line would cross the bottom margin.
fn layout(blocks: &[Block]) -> Vec<Vec<PlacedLine>> {
    let mut pages = vec![Vec::new()];
    let mut y = TOP;

    for block in blocks {
        match block {
            Block::Line(text) | Block::Paragraph(text) => {
                for line in wrap(text, TEXT_WIDTH) {
                    place(&mut pages, &mut y, line);
                }
            }
            Block::Space(height) => y -= height,
        }
    }

    pages
}

fn place(pages: &mut Vec<Vec<PlacedLine>>, y: &mut i64, text: String) {
    if *y < MARGIN {
        pages.push(Vec::new());
        *y = TOP;
    }
    if let Some(page) = pages.last_mut() {
        page.push(PlacedLine { y: *y, text });
    }
    *y -= LEADING;
}

/// Greedily breaks `text` into lines no wider than `max_width`. Words longer
/// than a whole line are split between characters.
fn wrap(text: &str, max_width: u32) -> Vec<String> {
    let space = glyph_width(' ');

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0;

    for word in text.split_whitespace() {
        let word_width = text_width(word);

        if !line.is_empty() && width + space + word_width <= max_width {
            line.push(' ');
            line.push_str(word);
            width += space + word_width;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            width = 0;
        }

        if word_width <= max_width {
            line.push_str(word);
            width = word_width;
            continue;
        }

        for c in word.chars() {
            let c_width = glyph_width(c);
            if !line.is_empty() && width + c_width > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0;
            }
            line.push(c);
            width += c_width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

fn text_width(text: &str) -> u32 {
    text.chars().map(glyph_width).sum()
}

/// Advance width of `c` in Helvetica, in thousandths of the font size.
/// Characters outside ASCII are approximated by the width of a lowercase
/// letter.
fn glyph_width(c: char) -> u32 {
    match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' | 'I' | 'f' | 't' => 278,
        'i' | 'j' | 'l' => 222,
        '\'' => 191,
        '|' => 260,
        '"' => 355,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '{' | '}' => 334,
        '*' => 389,
        '^' => 469,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        '+' | '<' | '=' | '>' | '~' => 584,
        'F' | 'T' | 'Z' => 611,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' | '&' => 667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722,
        'G' | 'O' | 'Q' => 778,
        'M' | 'm' => 833,
        '%' => 889,
        'W' => 944,
        '@' => 1015,
        _ => 556,
    }
}

/// Encodes text for the WinAnsi encoded standard font. Characters the
/// encoding cannot represent are printed as `?`.
fn encode(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut buf = [0; 4];

    for c in text.chars() {
        let (encoded, _, unmappable) =
            encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if unmappable {
            bytes.push(b'?');
        } else {
            bytes.extend_from_slice(&encoded);
        }
    }

    bytes
}

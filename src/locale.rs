//! The language all letters are written in.
//!
//! Letters are addressed to Dutch organizations and cite Dutch law, so the
//! locale is fixed. It is built once on first use and shared read-only for
//! the rest of the process.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;

pub struct Locale {
    /// Locale used for month names in the dateline.
    pub calendar: chrono::Locale,

    /// strftime pattern of the dateline date.
    pub date_format: &'static str,

    pub subject: &'static str,
    pub greeting: &'static str,
    pub paragraphs: [&'static str; 3],
    pub closing: &'static str,
}

impl Locale {
    /// Formats `date` the way it appears in the dateline, e.g.
    /// `15 januari 2024`.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
        midnight
            .format_localized(self.date_format, self.calendar)
            .to_string()
    }
}

static DUTCH: Lazy<Locale> = Lazy::new(|| Locale {
    calendar: chrono::Locale::nl_NL,
    date_format: "%d %B %Y",
    subject: "Betreft: inzageverzoek op grond van de Wet bescherming \
              persoonsgegevens (Wbp)",
    greeting: "Geachte heer, mevrouw,",
    paragraphs: [
        "Hierbij verzoek ik u na te gaan of u persoonsgegevens van mij \
         verwerkt. Als u persoonsgegevens van mij verwerkt, wil ik hier graag \
         inzage in hebben. Ik verwacht een volledig en begrijpelijk overzicht \
         met daarin opgenomen de gegevens en de categorieën van gegevens \
         waartoe zij behoren, met welke doelen u mijn gegevens verwerkt en de \
         beschikbare informatie over de herkomst van mijn gegevens. Ook wil \
         ik weten wie de ontvangers zijn of wat de categorieën van ontvangers \
         zijn. Bovendien verzoek ik u hierbij expliciet om mij mede te delen \
         welke logica aan de verwerkingen ten grondslag ligt. Tot slot \
         verzoek ik u om het nummer van de melding van de verwerking bij de \
         Autoriteit Persoonsgegevens.",
        "Dit verzoek heeft een wettelijke grondslag in artikel 35 van \
         de Wet bescherming persoonsgegevens (Wbp). Wellicht ten overvloede \
         vermeld ik dat in lid 1 van het wetsartikel een termijn van vier \
         weken wordt genoemd waarin u aan dit verzoek moet voldoen.",
        "Ik heb een kopie van mijn identiteitsbewijs als bijlage \
         opgenomen zodat u mijn identiteit kunt vaststellen.",
    ],
    closing: "Hoogachtend,",
});

/// The locale letters are rendered in.
pub fn current() -> &'static Locale {
    &DUTCH
}

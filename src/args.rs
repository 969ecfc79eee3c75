use chrono::{Local, NaiveDate};
use clap::{App, Arg};
use std::ffi::OsString;
use std::path::PathBuf;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Args {
    pub csv_file: String,
    pub output_dir: PathBuf,
    pub delimiter: u8,
    pub date: NaiveDate,
}

impl Args {
    pub fn parse() -> Self {
        Self::from_args(std::env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = App::new("inzage")
            .version("0.1.0")
            .about("Generates personal data access requests for every contact in an address book")
            .arg(Arg::with_name("csv_file")
                .takes_value(true).required(true)
                .help("path of CSV file to read from; the first row holds the sender's details"))
            .arg(Arg::with_name("output_dir")
                .long("output-dir").short("o").takes_value(true).default_value("out")
                .help("directory the PDF letters are written to"))
            .arg(Arg::with_name("delimiter")
                .long("delimiter").short("d").takes_value(true).default_value(",")
                .validator(|v| parse_delimiter(&v).map(|_| ()))
                .help("field delimiter of the CSV file"))
            .arg(Arg::with_name("date")
                .long("date").takes_value(true)
                .validator(|v| parse_date(&v).map(|_| ()))
                .help("date printed on the letters as YYYY-MM-DD [default: today]"))
            .get_matches_from(args);

        Self {
            csv_file: matches.value_of("csv_file").unwrap_or_default().to_string(),
            output_dir: PathBuf::from(matches.value_of("output_dir").unwrap_or("out")),
            delimiter: matches
                .value_of("delimiter")
                .and_then(|v| parse_delimiter(v).ok())
                .unwrap_or(b','),
            date: matches
                .value_of("date")
                .and_then(|v| parse_date(v).ok())
                .unwrap_or_else(|| Local::now().date_naive()),
        }
    }
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!(
            "delimiter must be a single ASCII character, got '{}'",
            value
        )),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|err| format!("invalid date '{}', expected YYYY-MM-DD: {}", value, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_apply_defaults() {
        let args = Args::from_args(["inzage", "contacts.csv"]);

        assert_eq!(args.csv_file, "contacts.csv");
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.delimiter, b',');
    }

    #[test]
    fn should_parse_all_options() {
        let args = Args::from_args([
            "inzage",
            "contacts.csv",
            "--output-dir",
            "letters",
            "--delimiter",
            ";",
            "--date",
            "2024-01-15",
        ]);

        assert_eq!(args.output_dir, PathBuf::from("letters"));
        assert_eq!(args.delimiter, b';');
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn should_reject_invalid_option_values() {
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_date("15-01-2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}

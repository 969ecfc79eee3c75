use inzage::address_book::AddressBook;
use inzage::args::Args;
use inzage::letter::LetterGenerator;
use log::{error, info};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let address_book = match AddressBook::from_path(&args.csv_file, args.delimiter) {
        Ok(address_book) => address_book,
        Err(err) => {
            error!("failed to process input file: {}", err);
            process::exit(1);
        }
    };
    info!(
        "read address book of {} with {} recipient(s)",
        address_book.sender().name(),
        address_book.len()
    );

    let generator = LetterGenerator::new(&args.output_dir);
    match generator.generate_all(&address_book, args.date) {
        Ok(written) => info!(
            "wrote {} letter(s) to {}",
            written.len(),
            generator.output_dir().display()
        ),
        Err(err) => {
            error!("failed to generate letters: {}", err);
            process::exit(1);
        }
    }

    println!("done");
}

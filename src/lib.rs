//! Scrapes a book from the DBNL into one text file per printed page plus CSV tables
//! of its parts, chapters and pages.
//!
//! The pages of the printed book are marked in the HTML with page break divs (`[12]`),
//! everything between two of them belongs to one page. A page can start in one chapter
//! document and end in the next, so the open page is carried from document to document.

mod macros;
pub mod config;
mod error;
pub mod page;
pub mod parse;
pub mod process;
mod request;
pub mod toc;
pub mod write;

pub use config::Config;
pub use error::{Error, Result};

const DBNL_URL: &str = "http://www.dbnl.org";
const BASE_URL: &str = "http://www.dbnl.org/tekst/mand001schi01_01/";
const BOOK_TITLE: &str = "Het schilder-boeck";
/// If set to 0 every document in the table of contents is scraped.
const MAX_DOCUMENTS: usize = 10;
const OUT_FOLDER: &str = "data";

const PARTS_FILE: &str = "parts.csv";
const CHAPTERS_FILE: &str = "chapters.csv";
const PAGES_FILE: &str = "pages.csv";

use std::path::PathBuf;

use clap::Parser;

use crate::{BASE_URL, BOOK_TITLE, DBNL_URL, MAX_DOCUMENTS, OUT_FOLDER};

/// Scrapes the pages of a DBNL book into per-page text files and CSV tables.
#[derive(Debug, Clone, Parser)]
#[command(name = "dbnl-scrap")]
pub struct Config {
    /// Root of the site, prepended to the links to the original page scans.
    #[arg(long, default_value = DBNL_URL)]
    pub site_url: String,

    /// The book's index page, document links in the table of contents are relative to it.
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Title written into the parts table.
    #[arg(long, default_value = BOOK_TITLE)]
    pub title: String,

    /// Max documents to scrape. 0 scrapes the whole book.
    #[arg(short = 'n', long, default_value_t = MAX_DOCUMENTS)]
    pub limit: usize,

    /// Folder the page files and tables are written to.
    #[arg(short, long, default_value = OUT_FOLDER)]
    pub out: PathBuf,
}

impl Config {
    pub fn limit(&self) -> usize {
        match self.limit {
            0 => usize::MAX,
            n => n,
        }
    }
}

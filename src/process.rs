use chrono::Local;
use reqwest::Client;
use tokio::task::spawn_blocking;

use crate::config::Config;
use crate::page::{Book, PageMarker};
use crate::parse::{extract_pages, Extraction};
use crate::request::{request_html, spawn_request};
use crate::toc::{SectionKind, Toc, TocEntry};
use crate::write::{append_page_file, chapters_csv, pages_csv, parts_csv, write_csv};
use crate::{info_time, warn_time, Result, CHAPTERS_FILE, PAGES_FILE, PARTS_FILE};

pub async fn process_site(config: &Config) -> Result<()> {
    let start_time = Local::now();
    let client = reqwest::Client::new();

    info_time!("Started scraping {}", config.base_url);
    let index = request_html(&client, &config.base_url).await?;
    let toc = Toc::parse(&index, &config.base_url)?.limited(config.limit());
    info_time!(
        "Found {} parts and {} documents to process",
        toc.parts.len(),
        toc.entries.len()
    );

    let book = process_documents(&client, &toc.entries, config).await?;
    info_time!(start_time, "Finished PROCESSING {} pages.", book.len());

    write_tables(config, &toc, &book).await?;
    info_time!(start_time, "Full scrape of {}", config.base_url);

    Ok(())
}

/// Scrapes the documents one after the other, carrying the open page from each document
/// into the next. The page files are appended to as soon as a document is parsed.
async fn process_documents(client: &Client, entries: &[TocEntry], config: &Config) -> Result<Book> {
    let mut book = Book::default();
    let mut current: Option<PageMarker> = None;

    // Spawn an initial document request
    let mut next_request = entries.first().map(|e| spawn_request(client, &e.url));

    for (idx, entry) in entries.iter().enumerate() {
        let Some(request) = next_request.take() else {
            break;
        };
        // Download the next document while this one is parsed.
        next_request = entries.get(idx + 1).map(|e| spawn_request(client, &e.url));

        let start_doc_time = Local::now();
        let folder = config.out.join(&entry.folder);
        tokio::fs::create_dir_all(&folder).await?;

        let html = request.await??;
        // Parsing is CPU bound, the book goes to the blocking thread and comes back.
        let (folded, extraction) = spawn_blocking({
            let entry = entry.clone();
            let carried = current.take();
            move || {
                let mut book = book;
                let extraction = fold_document(&mut book, carried, &entry, &html);
                (book, extraction)
            }
        })
        .await?;
        book = folded;
        let extraction = extraction?;

        for (marker, lines) in extraction.pages.iter() {
            append_page_file(&folder, &marker.id, lines).await?;
        }
        current = extraction.current;

        info_time!(start_doc_time, "Processed {}", entry.url);
    }
    Ok(book)
}

/// One step of the fold over the book's documents: extracts the pages of `html` starting
/// from the carried page and merges them into the book.
/// A part never continues the page the previous part ended on.
fn fold_document(
    book: &mut Book,
    carried: Option<PageMarker>,
    entry: &TocEntry,
    html: &str,
) -> Result<Extraction> {
    let current = match entry.kind {
        SectionKind::Part => None,
        SectionKind::Chapter | SectionKind::Continuation => carried,
    };

    let extraction = extract_pages(html, current)?;
    if extraction.dropped_lines > 0 {
        warn_time!(
            "Dropped {} lines from {} that came before the first page break",
            extraction.dropped_lines,
            entry.url
        );
    }
    book.merge(extraction.pages.clone(), &entry.label);
    Ok(extraction)
}

async fn write_tables(config: &Config, toc: &Toc, book: &Book) -> Result<()> {
    let local_now = Local::now();
    tokio::fs::create_dir_all(&config.out).await?;

    write_csv(
        &config.out.join(PARTS_FILE),
        &parts_csv(&config.title, &toc.parts)?,
    )
    .await?;
    write_csv(&config.out.join(CHAPTERS_FILE), &chapters_csv(&toc.chapters)?).await?;
    write_csv(
        &config.out.join(PAGES_FILE),
        &pages_csv(&config.site_url, book.pages())?,
    )
    .await?;

    info_time!(local_now, "Wrote the tables to {}", config.out.display());
    Ok(())
}

use std::io;
use std::path::Path;

use csv::{Terminator, Writer, WriterBuilder};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::page::{ContentLine, Page, PageId};
use crate::{Error, Result};

/// The UTF-8 BOM, so spreadsheet programs pick the right encoding.
const BOM: &[u8] = "\u{FEFF}".as_bytes();
const LINE_BREAK: &str = "<br>";

/// Appends the lines of a page to `{folder}/{id}.txt`, one stripped line per row.
/// Lines that are only whitespace are left out.
pub async fn append_page_file(folder: &Path, id: &PageId, lines: &[ContentLine]) -> Result<()> {
    let text: String = lines
        .iter()
        .filter_map(ContentLine::stripped)
        .map(|line| format!("{line}\n"))
        .collect();

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(folder.join(format!("{id}.txt")))
        .await?;
    file.write_all(text.as_bytes()).await?;
    Ok(())
}

/// `book;nr;title`, one row per part.
pub fn parts_csv(book_title: &str, parts: &[String]) -> Result<Vec<u8>> {
    let mut wtr = csv_writer();
    wtr.write_record(["book", "nr", "title"])?;
    for (nr, part) in parts.iter().enumerate() {
        wtr.write_record([book_title, (nr + 1).to_string().as_str(), part.as_str()])?;
    }
    finish(wtr)
}

/// `part;nr;title`. Every part with chapters starts with an introduction row numbered 0
/// that carries the part's own title, followed by its chapters numbered from 1.
/// Parts without chapters are left out.
pub fn chapters_csv(chapters: &[(String, Vec<String>)]) -> Result<Vec<u8>> {
    let mut wtr = csv_writer();
    wtr.write_record(["part", "nr", "title"])?;
    for (part, titles) in chapters.iter().filter(|(_, titles)| !titles.is_empty()) {
        wtr.write_record([part.as_str(), "0", part.as_str()])?;
        for (nr, title) in titles.iter().enumerate() {
            wtr.write_record([part.as_str(), (nr + 1).to_string().as_str(), title.as_str()])?;
        }
    }
    finish(wtr)
}

/// `chapter;title;pagenumber;original;body`, pages ordered by the link to their scan.
/// The body is the stripped lines joined with `<br>`, newlines inside a line become `<br>` too.
pub fn pages_csv(site_url: &str, pages: &[Page]) -> Result<Vec<u8>> {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by(|a, b| a.link.cmp(&b.link));

    let mut wtr = csv_writer();
    wtr.write_record(["chapter", "title", "pagenumber", "original", "body"])?;
    for (nr, page) in sorted.into_iter().enumerate() {
        let body = page
            .lines
            .iter()
            .map(|line| line.text.trim().replace('\n', LINE_BREAK))
            .collect::<Vec<_>>()
            .join(LINE_BREAK);
        let original = format!("{site_url}{}", page.link.as_deref().unwrap_or_default());

        wtr.write_record([
            page.chapter.as_str(),
            format!("{}|{}", nr + 1, page.id).as_str(),
            page.id.as_str(),
            original.as_str(),
            body.as_str(),
        ])?;
    }
    finish(wtr)
}

pub async fn write_csv(path: &Path, contents: &[u8]) -> Result<()> {
    tokio::fs::write(path, contents).await?;
    Ok(())
}

fn csv_writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .delimiter(b';')
        .terminator(Terminator::CRLF)
        .from_writer(BOM.to_vec())
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| Error::Io(io::Error::new(e.error().kind(), e.error().to_string())))
}

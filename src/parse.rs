use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::page::{ContentLine, LineKind, PageId, PageLines, PageMarker};
use crate::{Error, Result};

/// Page break markers look like `[12]`, `[12*]` or `[xii.]`.
static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[(.*?)\]").unwrap());

const PAGE_BREAK_CLASS: &str = "pb";
const POEM_CLASSES: [&str; 2] = ["poem", "poem-small-margins"];
const VERSE_HEADING_CLASS: &str = "poem-head";
const VERSE_LINE_CLASS: &str = "line";

/// What a single document contributed to the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Lines per page, only pages that actually received content.
    pub pages: PageLines,
    /// The page that was open when the document ended. Seeds the next document.
    pub current: Option<PageMarker>,
    /// Lines that were thrown away because no page break had been seen yet.
    pub dropped_lines: usize,
}

/// Walks the `contentholder` divs of a document and assigns their content to pages.
///
/// `current` is the page that was open at the end of the previous document, content found
/// before the first page break of this document belongs to it. If there is no such page the
/// content has nowhere to go and is only counted in [`Extraction::dropped_lines`].
///
/// Fails with [`Error::MarkerParse`] on a page break whose text holds no page number,
/// guessing would shift the numbering of every page after it.
pub fn extract_pages(html: &str, current: Option<PageMarker>) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let holder_selector = create_selector("div.contentholder")?;
    let link_selector = create_selector("a[href]")?;

    let mut extraction = Extraction {
        current,
        ..Default::default()
    };

    for holder in doc.select(&holder_selector) {
        let Some(first_child) = child_elements(holder).next() else {
            continue;
        };

        if is_page_break(first_child) {
            let text: String = first_child.text().collect();
            let link = first_child
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            extraction.current = Some(PageMarker {
                id: parse_marker(&text)?,
                link,
            });
            continue;
        }

        let lines = extract_body(holder);
        match &extraction.current {
            Some(marker) => extraction.pages.append(marker, lines),
            None => extraction.dropped_lines += lines.len(),
        }
    }

    Ok(extraction)
}

/// Parses and normalizes the page number out of a page break's text.
pub fn parse_marker(text: &str) -> Result<PageId> {
    let raw = PAGE_NUMBER
        .captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| Error::MarkerParse { text: text.into() })?;

    // The id names the page's file, it can't be empty or reach outside the folder.
    let id = PageId::normalize(raw.as_str());
    if id.as_str().trim().is_empty() || id.as_str().contains(['/', '\\', '\0']) {
        return Err(Error::MarkerParse { text: text.into() });
    }
    Ok(id)
}

/// Collects the headings, paragraphs and poems that are direct children of a content holder.
fn extract_body(holder: ElementRef) -> Vec<ContentLine> {
    let mut lines = Vec::new();
    for child in child_elements(holder) {
        match child.value().name() {
            "h1" => lines.push(content_line(child, LineKind::Heading(1))),
            "h2" => lines.push(content_line(child, LineKind::Heading(2))),
            "h3" => lines.push(content_line(child, LineKind::Heading(3))),
            "h4" => lines.push(content_line(child, LineKind::Heading(4))),
            "p" => lines.push(content_line(child, LineKind::Paragraph)),
            "div" if first_class(child).is_some_and(|c| POEM_CLASSES.contains(&c)) => {
                lines.extend(extract_verse(child))
            }
            _ => {}
        }
    }
    lines
}

/// Pulls the heading and the lines out of a poem, in document order.
/// Stanza wrappers and anything else in between are skipped.
pub fn extract_verse(poem: ElementRef) -> Vec<ContentLine> {
    child_elements(poem)
        .filter(|child| child.value().name() == "div")
        .filter_map(|child| match first_class(child) {
            Some(VERSE_HEADING_CLASS) => Some(content_line(child, LineKind::VerseHeading)),
            Some(VERSE_LINE_CLASS) => Some(content_line(child, LineKind::VerseLine)),
            _ => None,
        })
        .collect()
}

fn content_line(el: ElementRef, kind: LineKind) -> ContentLine {
    ContentLine {
        kind,
        text: el.text().collect(),
        inner_html: el.inner_html(),
    }
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

fn is_page_break(el: ElementRef) -> bool {
    el.value().name() == "div" && classes(el).any(|c| c == PAGE_BREAK_CLASS)
}

// Read straight from the attribute, the parsed class set doesn't keep source order.
fn classes<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    el.value().attr("class").unwrap_or_default().split_whitespace()
}

fn first_class<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    classes(el).next()
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Normalized page number taken from a `[..]` page break marker.
/// Stays an opaque string, `12x` and `12` are different pages and nothing sorts them numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(String);

impl PageId {
    /// Applies the marker normalization: `*` becomes `x`, periods are dropped.
    pub fn normalize(raw: &str) -> Self {
        PageId(raw.replace('*', "x").replace('.', ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The page that content is currently attributed to, along with the link to the
/// scan of the original page if the marker carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMarker {
    pub id: PageId,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `h1` to `h4`.
    Heading(u8),
    Paragraph,
    VerseHeading,
    VerseLine,
}

/// A single unit of body text.
/// `text` is the raw text content, whitespace included; trimming is up to the writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub kind: LineKind,
    pub text: String,
    pub inner_html: String,
}

impl ContentLine {
    /// Text with surrounding whitespace removed, empty lines map to `None`.
    pub fn stripped(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Lines found in one document, grouped per page in the order the pages first showed up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLines {
    entries: Vec<(PageMarker, Vec<ContentLine>)>,
}

impl PageLines {
    /// Appends `lines` to the page of `marker`. Empty batches don't create an entry.
    pub fn append(&mut self, marker: &PageMarker, lines: Vec<ContentLine>) {
        if lines.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(m, _)| m.id == marker.id) {
            Some((_, existing)) => existing.extend(lines),
            None => self.entries.push((marker.clone(), lines)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&[ContentLine]> {
        self.entries
            .iter()
            .find(|(m, _)| m.id.as_str() == id)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PageMarker, &[ContentLine])> {
        self.entries.iter().map(|(m, lines)| (m, lines.as_slice()))
    }
}

impl IntoIterator for PageLines {
    type Item = (PageMarker, Vec<ContentLine>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A page of the book with everything scraped for it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub link: Option<String>,
    pub chapter: String,
    pub lines: Vec<ContentLine>,
}

/// All the pages of the book, keyed by page number.
#[derive(Debug, Default)]
pub struct Book {
    pages: Vec<Page>,
    index: HashMap<PageId, usize>,
}

impl Book {
    /// Merges the pages found in one document into the book.
    /// A page seen before gets the new lines appended, its chapter and link stay the ones
    /// it was created with.
    pub fn merge(&mut self, found: PageLines, chapter: &str) {
        for (marker, lines) in found {
            match self.index.get(&marker.id) {
                Some(&idx) => self.pages[idx].lines.extend(lines),
                None => {
                    self.index.insert(marker.id.clone(), self.pages.len());
                    self.pages.push(Page {
                        id: marker.id,
                        link: marker.link,
                        chapter: chapter.to_string(),
                        lines,
                    });
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Page> {
        self.index.get(id).map(|&idx| &self.pages[idx])
    }

    /// Pages in the order they were first scraped.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

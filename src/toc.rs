use std::path::PathBuf;

use scraper::{ElementRef, Html};

use crate::parse::create_selector;
use crate::{warn_time, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Starts a new part (`head2` link). The page state doesn't carry over into a new part.
    Part,
    /// Starts a new chapter inside the last part (`head3` link).
    Chapter,
    /// Any other link: one more document of the section before it.
    Continuation,
}

/// A document to scrape, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub url: String,
    pub kind: SectionKind,
    /// Title of the part or chapter the document belongs to.
    pub label: String,
    /// Output folder relative to the output root: `h01` for a part, `h01/c02` for a chapter.
    pub folder: PathBuf,
}

/// The book's table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    pub parts: Vec<String>,
    /// Chapter titles per part, in the order of `parts`.
    pub chapters: Vec<(String, Vec<String>)>,
    pub entries: Vec<TocEntry>,
}

impl Toc {
    /// Reads the table of contents from the book's index page.
    /// The contents start after the `h2.inhoud` heading; every link below it is a document,
    /// links with the `head2` or `head3` class also open a new part or chapter.
    pub fn parse(html: &str, base_url: &str) -> Result<Toc> {
        let doc = Html::parse_document(html);
        let toc_selector = create_selector("h2.inhoud")?;
        let link_selector = create_selector("a")?;

        let heading = doc
            .select(&toc_selector)
            .next()
            .ok_or_else(|| Error::ParseMissingSelector("h2.inhoud".into()))?;
        let container = heading
            .parent()
            .ok_or_else(|| Error::ParseMissingSelector("h2.inhoud".into()))?;

        let mut toc = Toc::default();
        for sibling in container.next_siblings().filter_map(ElementRef::wrap) {
            for link in sibling.select(&link_selector) {
                toc.push_link(link, base_url)?;
            }
        }
        Ok(toc)
    }

    /// The contents cut down to the first `limit` documents.
    /// Parts and chapters that only have documents past the limit are left out as well.
    pub fn limited(&self, limit: usize) -> Toc {
        let mut toc = Toc::default();
        for entry in self.entries.iter().take(limit) {
            match entry.kind {
                SectionKind::Part => {
                    toc.parts.push(entry.label.clone());
                    toc.chapters.push((entry.label.clone(), Vec::new()));
                }
                SectionKind::Chapter => {
                    if let Some((_, chapters)) = toc.chapters.last_mut() {
                        chapters.push(entry.label.clone());
                    }
                }
                SectionKind::Continuation => {}
            }
            toc.entries.push(entry.clone());
        }
        toc
    }

    fn push_link(&mut self, link: ElementRef, base_url: &str) -> Result<()> {
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| Error::MissingAttribute {
                element: "a".into(),
                attr: "href".into(),
            })?;
        let title = link.text().collect::<String>().trim().to_string();
        let has_class = |name: &str| {
            link.value()
                .attr("class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == name))
        };

        let (kind, label, folder) = if has_class("head2") {
            if self.parts.contains(&title) {
                return Err(Error::DuplicateLabel(title));
            }
            self.parts.push(title.clone());
            self.chapters.push((title.clone(), Vec::new()));
            (SectionKind::Part, title, part_folder(self.parts.len()))
        } else if has_class("head3") {
            let Some((_, chapters)) = self.chapters.last_mut() else {
                return Err(Error::ChapterOutsidePart(title));
            };
            chapters.push(title.clone());
            let folder = part_folder(self.parts.len()).join(format!("c{:02}", chapters.len()));
            (SectionKind::Chapter, title, folder)
        } else {
            let Some(prev) = self.entries.last() else {
                warn_time!("Skipping {href}, it comes before the first part");
                return Ok(());
            };
            (SectionKind::Continuation, prev.label.clone(), prev.folder.clone())
        };

        self.entries.push(TocEntry {
            url: format!("{base_url}{href}"),
            kind,
            label,
            folder,
        });
        Ok(())
    }
}

fn part_folder(part_nr: usize) -> PathBuf {
    PathBuf::from(format!("h{part_nr:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://example.org/tekst/book01_01/";

    fn index_page(links: &str) -> String {
        format!(
            r#"<html><body>
            <div class="header"><a class="head2" href="nav.php">Not in the contents</a></div>
            <div><h2 class="inhoud">Inhoudsopgave</h2></div>
            {links}
            </body></html>"#
        )
    }

    #[test]
    fn parts_and_chapters() {
        let html = index_page(
            r#"<p><a class="head2" href="p1.php">Part one</a></p>
            <p><a class="head3" href="p1c1.php">Chapter A</a>
               <a class="head3" href="p1c2.php">Chapter B</a></p>
            <p><a href="p1c2b.php">more of B</a></p>
            <p><a class="head2" href="p2.php"> Part two </a>
               <a class="head3" href="p2c1.php">Chapter C</a></p>"#,
        );
        let toc = Toc::parse(&html, BASE).unwrap();

        assert_eq!(toc.parts, vec!["Part one", "Part two"]);
        assert_eq!(
            toc.chapters,
            vec![
                ("Part one".to_string(), vec!["Chapter A".to_string(), "Chapter B".to_string()]),
                ("Part two".to_string(), vec!["Chapter C".to_string()]),
            ]
        );

        let summary: Vec<_> = toc
            .entries
            .iter()
            .map(|e| (e.kind, e.label.as_str(), e.folder.to_str().unwrap()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (SectionKind::Part, "Part one", "h01"),
                (SectionKind::Chapter, "Chapter A", "h01/c01"),
                (SectionKind::Chapter, "Chapter B", "h01/c02"),
                (SectionKind::Continuation, "Chapter B", "h01/c02"),
                (SectionKind::Part, "Part two", "h02"),
                (SectionKind::Chapter, "Chapter C", "h02/c01"),
            ]
        );
        assert_eq!(toc.entries[0].url, format!("{BASE}p1.php"));
    }

    #[test]
    fn limited_contents() {
        let html = index_page(
            r#"<p><a class="head2" href="p1.php">Part one</a>
               <a class="head3" href="p1c1.php">Chapter A</a>
               <a class="head3" href="p1c2.php">Chapter B</a>
               <a class="head2" href="p2.php">Part two</a></p>"#,
        );
        let toc = Toc::parse(&html, BASE).unwrap();

        let short = toc.limited(2);
        assert_eq!(short.parts, vec!["Part one"]);
        assert_eq!(
            short.chapters,
            vec![("Part one".to_string(), vec!["Chapter A".to_string()])]
        );
        assert_eq!(short.entries.len(), 2);
        assert_eq!(toc.limited(usize::MAX), toc);
    }

    #[test]
    fn duplicate_part_titles_fail() {
        let html = index_page(
            r#"<p><a class="head2" href="p1.php">Same</a></p>
            <p><a class="head2" href="p2.php">Same</a></p>"#,
        );
        let err = Toc::parse(&html, BASE).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel(label) if label == "Same"));
    }

    #[test]
    fn chapter_before_part_fails() {
        let html = index_page(r#"<p><a class="head3" href="c1.php">Lost chapter</a></p>"#);
        let err = Toc::parse(&html, BASE).unwrap_err();
        assert!(matches!(err, Error::ChapterOutsidePart(_)));
    }

    #[test]
    fn links_before_first_section_are_skipped() {
        let html = index_page(
            r#"<p><a href="colofon.php">Colofon</a></p>
            <p><a class="head2" href="p1.php">Part one</a></p>"#,
        );
        let toc = Toc::parse(&html, BASE).unwrap();
        assert_eq!(toc.entries.len(), 1);
        assert_eq!(toc.entries[0].kind, SectionKind::Part);
    }

    #[test]
    fn missing_contents_heading() {
        let err = Toc::parse("<html><body><p>nothing</p></body></html>", BASE).unwrap_err();
        assert!(matches!(err, Error::ParseMissingSelector(_)));
    }

    #[test]
    fn link_without_href() {
        let html = index_page(r#"<p><a class="head2">Part one</a></p>"#);
        let err = Toc::parse(&html, BASE).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { .. }));
    }
}

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Element <{element}> is missing the `{attr}` attribute.")]
    MissingAttribute { element: String, attr: String },

    #[error("Couldn't parse a page number out of the page break marker: {text:?}")]
    MarkerParse { text: String },
    #[error("Part titles must be unique, found a second part titled: {0}")]
    DuplicateLabel(String),
    #[error("Chapter {0:?} appears in the table of contents before any part.")]
    ChapterOutsidePart(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

//! Wire document for resolved games.
//!
//! One `<game>` element per record, children in a fixed order:
//!
//! ```text
//! <game>
//!     <GameTitle>Pac-Man</GameTitle>
//!     <Overview></Overview>
//!     <ImageURL></ImageURL>
//!     <ImagePath>/tmp/pacman.png</ImagePath>
//!     <Rating>0.8</Rating>
//!     <ReleaseDate>1980</ReleaseDate>
//!     <Developer>Namco</Developer>
//!     <Publisher>Midway</Publisher>
//!     <Genre>Maze</Genre>
//!     <Players>2</Players>
//!     <CRCMatch>true</CRCMatch>
//! </game>
//! ```
//!
//! `Players` is left out when the count is unknown. An empty record list
//! encodes to the empty string.

use std::io;

use quick_xml::Writer;
use quick_xml::events::BytesText;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("XML write failed: {0}")]
    Write(#[from] io::Error),

    #[error("document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A normalized game as exposed to the host.
///
/// At most one of `image_url` and `image_path` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    pub title: String,
    pub overview: String,
    pub image_url: String,
    pub image_path: String,
    pub rating: f64,
    pub release_date: String,
    pub developer: String,
    pub publisher: String,
    pub genre: String,
    /// Base-10 player count; `None` when unknown.
    pub players: Option<String>,
    pub crc_match: bool,
}

impl GameRecord {
    fn write<W: io::Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("game")
            .write_inner_content(|w| {
                text_element(w, "GameTitle", &self.title)?;
                text_element(w, "Overview", &self.overview)?;
                text_element(w, "ImageURL", &self.image_url)?;
                text_element(w, "ImagePath", &self.image_path)?;
                text_element(w, "Rating", &self.rating.to_string())?;
                text_element(w, "ReleaseDate", &self.release_date)?;
                text_element(w, "Developer", &self.developer)?;
                text_element(w, "Publisher", &self.publisher)?;
                text_element(w, "Genre", &self.genre)?;
                if let Some(players) = &self.players {
                    text_element(w, "Players", players)?;
                }
                text_element(w, "CRCMatch", if self.crc_match { "true" } else { "false" })
            })?;
        Ok(())
    }
}

fn text_element<W: io::Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Serialize `records` into the wire document.
pub fn to_document(records: &[GameRecord]) -> Result<String, DocumentError> {
    if records.is_empty() {
        return Ok(String::new());
    }
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    for record in records {
        record.write(&mut writer)?;
    }
    Ok(String::from_utf8(writer.into_inner())?)
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;

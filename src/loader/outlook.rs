//! Outlook `.msg` subject and body.
//!
//! A message is an OLE compound file; each MAPI property lives in a stream
//! named `__substg1.0_<tag><type>`, where type `001F` is UTF-16LE and `001E`
//! is 8-bit text.

use super::{LoadError, LoadResult};
use std::io::{Cursor, Read, Seek};
use tracing::debug;

const PR_SUBJECT: &str = "0037";
const PR_BODY: &str = "1000";

/// The parts of a message that get rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageText {
    pub subject: String,
    pub body: String,
}

impl MessageText {
    /// Subject line, a blank line, then the body.
    pub fn display_text(&self) -> String {
        format!("Subject: {}\n\n{}", self.subject, self.body)
    }
}

/// Read a string property, preferring the Unicode stream.
fn string_property<F: Read + Seek>(
    container: &mut cfb::CompoundFile<F>,
    tag: &str,
) -> LoadResult<Option<String>> {
    let unicode = format!("/__substg1.0_{tag}001F");
    if container.is_stream(&unicode) {
        let mut data = Vec::new();
        container.open_stream(&unicode)?.read_to_end(&mut data)?;
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();
        return Ok(Some(trim_nul(String::from_utf16_lossy(&units))));
    }

    let ansi = format!("/__substg1.0_{tag}001E");
    if container.is_stream(&ansi) {
        let mut data = Vec::new();
        container.open_stream(&ansi)?.read_to_end(&mut data)?;
        return Ok(Some(trim_nul(String::from_utf8_lossy(&data).into_owned())));
    }

    Ok(None)
}

fn trim_nul(s: String) -> String {
    s.trim_end_matches('\0').to_string()
}

/// Extract subject and body from `.msg` bytes. Missing properties read as empty.
pub fn read_message(bytes: &[u8]) -> LoadResult<MessageText> {
    let mut container = cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| LoadError::DecodeFailure(format!("not an Outlook message: {e}")))?;

    let subject = string_property(&mut container, PR_SUBJECT)?;
    let body = string_property(&mut container, PR_BODY)?;
    if subject.is_none() && body.is_none() {
        return Err(LoadError::DecodeFailure(
            "message has neither subject nor body".into(),
        ));
    }

    let message = MessageText {
        subject: subject.unwrap_or_default(),
        body: body.unwrap_or_default().replace("\r\n", "\n"),
    };
    debug!(subject = %message.subject, body_chars = message.body.len(), "msg read");
    Ok(message)
}

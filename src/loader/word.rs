//! Raw text extraction from Word documents. Formatting is discarded.
//!
//! - DOCX: the `w:t` runs of `word/document.xml`, one line per paragraph
//! - DOC: the piece table of the binary format, read from its OLE container

use super::{LoadError, LoadResult};
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use std::io::{Cursor, Read};
use tracing::debug;

// ============================================================================
// DOCX
// ============================================================================

const DOCX_BODY: &str = "word/document.xml";

/// Extract paragraph text from a DOCX package.
pub fn extract_docx_text(bytes: &[u8]) -> LoadResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;
    let text = document_xml_text(&xml)?;
    debug!(chars = text.len(), "docx text extracted");
    Ok(text)
}

/// Collect the text runs of a WordprocessingML body.
pub fn document_xml_text(xml: &str) -> LoadResult<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut out = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            XmlEvent::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            XmlEvent::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                b"p" => out.push('\n'),
                _ => {}
            },
            XmlEvent::Text(t) if in_text => out.push_str(&t.unescape()?),
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out.trim_end().to_string())
}

// ============================================================================
// DOC (Word 97-2003 binary)
// ============================================================================

/// FIB flags word; bit 9 selects the `1Table` stream
const FIB_FLAGS_OFFSET: usize = 0x000A;
const FIB_WHICH_TABLE: u16 = 0x0200;
/// FIB location of the piece table (`fcClx`, `lcbClx`)
const FIB_FC_CLX_OFFSET: usize = 0x01A2;
const FIB_LCB_CLX_OFFSET: usize = 0x01A6;
/// Piece descriptor flag: text is 8-bit at `fc / 2`
const FC_COMPRESSED: u32 = 0x4000_0000;
const PCD_SIZE: usize = 8;

fn read_u16(data: &[u8], at: usize) -> LoadResult<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| LoadError::DecodeFailure(format!("truncated record at {at:#x}")))
}

fn read_u32(data: &[u8], at: usize) -> LoadResult<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| LoadError::DecodeFailure(format!("truncated record at {at:#x}")))
}

fn read_stream<F: Read + std::io::Seek>(
    container: &mut cfb::CompoundFile<F>,
    path: &str,
) -> LoadResult<Vec<u8>> {
    let mut data = Vec::new();
    container.open_stream(path)?.read_to_end(&mut data)?;
    Ok(data)
}

/// Extract the main document text of a `.doc` file.
pub fn extract_doc_text(bytes: &[u8]) -> LoadResult<String> {
    let mut container = cfb::CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| LoadError::DecodeFailure(format!("not an OLE container: {e}")))?;
    if !container.is_stream("/WordDocument") {
        return Err(LoadError::DecodeFailure("missing WordDocument stream".into()));
    }
    let word = read_stream(&mut container, "/WordDocument")?;

    let flags = read_u16(&word, FIB_FLAGS_OFFSET)?;
    let table_name = if flags & FIB_WHICH_TABLE != 0 { "/1Table" } else { "/0Table" };
    if !container.is_stream(table_name) {
        return Err(LoadError::DecodeFailure(format!("missing {table_name} stream")));
    }
    let table = read_stream(&mut container, table_name)?;

    let fc_clx = read_u32(&word, FIB_FC_CLX_OFFSET)? as usize;
    let lcb_clx = read_u32(&word, FIB_LCB_CLX_OFFSET)? as usize;
    let clx = table
        .get(fc_clx..fc_clx + lcb_clx)
        .ok_or_else(|| LoadError::DecodeFailure("piece table out of bounds".into()))?;

    let raw = piece_table_text(clx, &word)?;
    let text = clean_word_text(&raw);
    debug!(chars = text.len(), "doc text extracted");
    Ok(text)
}

/// Walk the Clx structure and concatenate the text of every piece.
fn piece_table_text(clx: &[u8], word: &[u8]) -> LoadResult<String> {
    // Skip property modifier records (Prc, tag 0x01) up to the Pcdt (tag 0x02).
    let mut pos = 0;
    while clx.get(pos) == Some(&0x01) {
        let cb = read_u16(clx, pos + 1)? as usize;
        pos += 3 + cb;
    }
    if clx.get(pos) != Some(&0x02) {
        return Err(LoadError::DecodeFailure("piece table not found".into()));
    }
    let lcb = read_u32(clx, pos + 1)? as usize;
    let plc = clx
        .get(pos + 5..pos + 5 + lcb)
        .ok_or_else(|| LoadError::DecodeFailure("truncated piece table".into()))?;

    // n + 1 character positions followed by n piece descriptors.
    let pieces = lcb.saturating_sub(4) / (4 + PCD_SIZE);
    let mut text = String::new();
    for i in 0..pieces {
        let cp_start = read_u32(plc, i * 4)? as usize;
        let cp_end = read_u32(plc, (i + 1) * 4)? as usize;
        let chars = cp_end.saturating_sub(cp_start);
        let pcd = (pieces + 1) * 4 + i * PCD_SIZE;
        let fc = read_u32(plc, pcd + 2)?;

        if fc & FC_COMPRESSED != 0 {
            let start = ((fc & !FC_COMPRESSED) / 2) as usize;
            let slice = word
                .get(start..start + chars)
                .ok_or_else(|| LoadError::DecodeFailure("piece out of bounds".into()))?;
            text.extend(slice.iter().map(|&b| cp1252_char(b)));
        } else {
            let start = fc as usize;
            let slice = word
                .get(start..start + chars * 2)
                .ok_or_else(|| LoadError::DecodeFailure("piece out of bounds".into()))?;
            let units: Vec<u16> = slice
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect();
            text.push_str(&String::from_utf16_lossy(&units));
        }
    }
    Ok(text)
}

/// Windows-1252 byte to char (0x80-0x9F differ from Latin-1).
fn cp1252_char(b: u8) -> char {
    const HIGH: [char; 32] = [
        '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8d}', 'Ž',
        '\u{8f}', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{9d}',
        'ž', 'Ÿ',
    ];
    match b {
        0x80..=0x9F => HIGH[(b - 0x80) as usize],
        _ => b as char,
    }
}

/// Turn Word control characters into plain text.
///
/// Paragraph and line marks become newlines, cell marks become tabs, and
/// field instructions (between 0x13 and 0x14) are dropped.
fn clean_word_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_field_code = false;
    for c in raw.chars() {
        match c {
            '\u{13}' => in_field_code = true,
            '\u{14}' | '\u{15}' => in_field_code = false,
            _ if in_field_code => {}
            '\r' | '\u{0b}' | '\u{0c}' => out.push('\n'),
            '\u{07}' => out.push('\t'),
            '\n' | '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out.trim_end().to_string()
}

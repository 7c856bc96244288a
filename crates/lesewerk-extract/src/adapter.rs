// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format-specific adapters for non-PDF inputs.
//
// Word-processor containers (DOCX, ODT) are ZIP archives holding a main
// XML part; the adapter pulls the text runs out of it. Plain text is a
// strict UTF-8 decode and the only adapter allowed to fail internally;
// the facade catches that failure and substitutes a placeholder.

use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, instrument};
use zip::ZipArchive;

use lesewerk_core::error::{LesewerkError, Result};

/// Strict plain-text decode.
pub fn extract_plain_text(data: &[u8]) -> Result<String> {
    let text = String::from_utf8(data.to_vec())
        .map_err(|err| LesewerkError::Adapter(format!("not valid UTF-8 text: {err}")))?;
    if text.trim().is_empty() {
        return Err(LesewerkError::Adapter("decoded text is empty".into()));
    }
    Ok(text)
}

/// Pull the text runs out of a word-processor container.
///
/// Tries the DOCX main part first, then the ODT one. Legacy binary `.doc`
/// files are not ZIP archives and fail at the archive step, which the
/// caller turns into the convert-to-text placeholder.
#[instrument(skip_all, fields(len = data.len()))]
pub fn extract_word_processor(data: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|err| LesewerkError::Adapter(format!("not a ZIP container: {err}")))?;

    for part in ["word/document.xml", "content.xml"] {
        let xml = match archive.by_name(part) {
            Ok(file) => std::io::read_to_string(file)
                .map_err(|err| LesewerkError::Adapter(format!("unreadable part {part}: {err}")))?,
            Err(_) => continue,
        };
        let text = text_runs(&xml)?;
        if !text.trim().is_empty() {
            debug!(part, chars = text.len(), "word-processor text extracted");
            return Ok(text);
        }
    }

    Err(LesewerkError::Adapter(
        "no document body part found in container".into(),
    ))
}

/// Collect the character data of every text run in the main document part.
///
/// DOCX keeps text in `w:t` elements; ODT nests it in `text:p`, `text:h`,
/// and `text:span`. Paragraph ends become newlines so the document cleaner
/// can normalize them later.
fn text_runs(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_run = false;
    let mut paragraph_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_run = true,
                b"text:p" | b"text:h" | b"text:span" => paragraph_depth += 1,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_run = false,
                b"w:p" => out.push('\n'),
                b"text:p" | b"text:h" | b"text:span" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if e.name().as_ref() != b"text:span" {
                        out.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_run || paragraph_depth > 0 => {
                let text = e
                    .unescape()
                    .map_err(|err| LesewerkError::Adapter(format!("bad XML text: {err}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(LesewerkError::Adapter(format!("XML parsing failed: {err}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

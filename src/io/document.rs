use std::path::Path;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, info};

use crate::error::{ReconcileError, Result};
use crate::models::SpeakerRecord;

const SPEAKERS_TAG: &[u8] = b"Speakers";
const SPEAKER_TAG: &[u8] = b"Speaker";

/// A transcription document (Transcriber `.trs` or any XML with a
/// `<Speakers>` block) held as an ordered event list
///
/// Only speaker records that were modified are re-emitted from their
/// attributes; every other event is written back untouched.
#[derive(Debug, Clone)]
pub struct TrsDocument {
    events: Vec<Event<'static>>,
    /// Index into `events` for each entry of `speakers`
    speaker_events: Vec<usize>,
    speakers: Vec<SpeakerRecord>,
}

impl TrsDocument {
    /// Read and parse a document from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ReconcileError::io(path, e))?;
        let document = Self::parse_bytes(&bytes)?;
        info!(
            "Loaded document {:?} with {} speakers",
            path,
            document.speakers.len()
        );
        Ok(document)
    }

    /// Parse raw bytes, decoding them per the XML declaration when not UTF-8
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        let xml = decode_source(bytes)?;
        Self::parse(&xml)
    }

    /// Parse a document from text
    ///
    /// Speaker records are the `Speaker` children of the first `Speakers`
    /// element found at any depth.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut events = Vec::new();
        let mut speaker_events = Vec::new();
        let mut speakers = Vec::new();

        let mut depth = 0usize;
        let mut block_depth: Option<usize> = None;
        let mut block_found = false;

        loop {
            let event = reader.read_event()?;
            match &event {
                Event::Start(e) => {
                    depth += 1;
                    if !block_found && e.name().as_ref() == SPEAKERS_TAG {
                        block_found = true;
                        block_depth = Some(depth);
                    } else if block_depth == Some(depth - 1) && e.name().as_ref() == SPEAKER_TAG {
                        speaker_events.push(events.len());
                        speakers.push(read_record(e, &reader)?);
                    }
                }
                Event::Empty(e) => {
                    if !block_found && e.name().as_ref() == SPEAKERS_TAG {
                        block_found = true;
                    } else if block_depth == Some(depth) && e.name().as_ref() == SPEAKER_TAG {
                        speaker_events.push(events.len());
                        speakers.push(read_record(e, &reader)?);
                    }
                }
                Event::End(_) => {
                    if block_depth == Some(depth) {
                        block_depth = None;
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            events.push(event.into_owned());
        }

        if !block_found {
            return Err(ReconcileError::DocumentStructure(
                "no <Speakers> block found in document".to_string(),
            ));
        }

        debug!("Parsed {} XML events, {} speakers", events.len(), speakers.len());

        Ok(Self {
            events,
            speaker_events,
            speakers,
        })
    }

    pub fn speakers(&self) -> &[SpeakerRecord] {
        &self.speakers
    }

    /// The speaker collection, in document order, for in-place reconciliation
    pub fn speakers_mut(&mut self) -> &mut [SpeakerRecord] {
        &mut self.speakers
    }

    /// The `<!DOCTYPE ...>` line of the source, if any
    pub fn doctype(&self) -> Option<String> {
        self.events.iter().find_map(|event| match event {
            Event::DocType(text) => Some(format!(
                "<!DOCTYPE {}>",
                String::from_utf8_lossy(text)
            )),
            _ => None,
        })
    }

    /// Serialize to UTF-8 text
    ///
    /// The XML declaration is always rewritten as UTF-8 and comes first; the
    /// doctype follows it unchanged.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        if !matches!(self.events.first(), Some(Event::Decl(_))) {
            writer.write_event(Event::Decl(utf8_declaration()))?;
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }

        let mut next_speaker = 0;

        for (i, event) in self.events.iter().enumerate() {
            let record = if self.speaker_events.get(next_speaker) == Some(&i) {
                next_speaker += 1;
                self.speakers.get(next_speaker - 1)
            } else {
                None
            };

            match (event, record) {
                (Event::Decl(_), _) => writer.write_event(Event::Decl(utf8_declaration()))?,
                (Event::Start(e), Some(record)) if record.is_modified() => {
                    writer.write_event(Event::Start(rebuild_start(e, record)))?
                }
                (Event::Empty(e), Some(record)) if record.is_modified() => {
                    writer.write_event(Event::Empty(rebuild_start(e, record)))?
                }
                (Event::Eof, _) => {}
                (event, _) => writer.write_event(event.borrow())?,
            }
        }

        String::from_utf8(writer.into_inner()).map_err(|e| ReconcileError::Encoding(e.to_string()))
    }

    /// Write the document to a UTF-8 file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml()?;
        std::fs::write(path, xml).map_err(|e| ReconcileError::io(path, e))?;
        Ok(())
    }
}

fn utf8_declaration() -> BytesDecl<'static> {
    BytesDecl::new("1.0", Some("UTF-8"), None)
}

fn read_record(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<SpeakerRecord> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(SpeakerRecord::from_attributes(attributes))
}

fn rebuild_start(original: &BytesStart<'_>, record: &SpeakerRecord) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(original.name().as_ref()).into_owned();
    let mut start = BytesStart::new(name);
    for (key, value) in record.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    start
}

/// Decode the source bytes into text
///
/// UTF-8 (with or without a byte-order mark) is taken as is; anything else is
/// decoded with the encoding named in the XML declaration.
fn decode_source(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let label = declared_encoding(bytes).ok_or_else(|| {
        ReconcileError::Encoding("document is not UTF-8 and declares no encoding".to_string())
    })?;
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| ReconcileError::Encoding(label.clone()))?;

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ReconcileError::Encoding(format!(
            "document is not valid {}",
            encoding.name()
        )));
    }
    debug!("Decoded document from {}", encoding.name());
    Ok(text.into_owned())
}

/// The `encoding` pseudo-attribute of the XML declaration, if present
///
/// Read from the raw bytes because the text must be decoded before quick-xml
/// can parse it, so `BytesDecl::encoding` is not available yet. The
/// declaration is ASCII in every encoding this accepts.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let decl = head.strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_string())
}

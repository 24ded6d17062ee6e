//! Forward-only reader that yields one `<entry>` subtree at a time.
//!
//! Only the entry currently being read is held in memory: the open element
//! stack is empty between entries and the event buffer is cleared after
//! every event, so peak memory tracks the largest single entry rather than
//! the size of the document.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::uniprot::element::Element;

const ENTRY_TAG: &str = "entry";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("unexpected end of file inside <{0}>")]
    UnexpectedEof(String),
}

/// Advisory progress of a streaming parse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParseProgress {
    pub entries: u64,
    pub bytes: u64,
}

pub struct EntryReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    stack: Vec<Element>,
    root: Option<String>,
    depth: usize,
    entries: u64,
    finished: bool,
}

impl EntryReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EntryReader<R> {
    pub fn new(source: R) -> Self {
        EntryReader {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            stack: Vec::new(),
            root: None,
            depth: 0,
            entries: 0,
            finished: false,
        }
    }

    pub fn progress(&self) -> ParseProgress {
        ParseProgress {
            entries: self.entries,
            bytes: self.reader.buffer_position(),
        }
    }

    /// Number of elements of the current entry still open.
    pub fn open_elements(&self) -> usize {
        self.stack.len()
    }

    /// Capacity of the reusable event buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Reads up to and including the next complete `<entry>` element.
    ///
    /// Returns `Ok(None)` once the root element has been closed or the
    /// input is exhausted; anything after the root closing tag is never read.
    pub fn next_entry(&mut self) -> Result<Option<Element>, ParseError> {
        while !self.finished {
            self.buf.clear();
            let position = self.reader.buffer_position();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|source| ParseError::Xml { position, source })?;

            match event {
                Event::Start(start) => {
                    if self.depth == 0 {
                        self.root = Some(local_name(&start));
                    }
                    self.depth += 1;
                    if !self.stack.is_empty() || local_name(&start) == ENTRY_TAG {
                        self.stack.push(to_element(&start, position)?);
                    }
                }
                Event::Empty(start) => {
                    let element = to_element(&start, position)?;
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None if element.name == ENTRY_TAG => {
                            self.entries += 1;
                            return Ok(Some(element));
                        }
                        None => {}
                    }
                }
                Event::Text(text) => {
                    if let Some(open) = self.stack.last_mut() {
                        let text = text
                            .unescape()
                            .map_err(|source| ParseError::Xml { position, source })?;
                        push_text(open, &text);
                    }
                }
                Event::CData(data) => {
                    if let Some(open) = self.stack.last_mut() {
                        push_text(open, &String::from_utf8_lossy(&data));
                    }
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if let Some(closed) = self.stack.pop() {
                        match self.stack.last_mut() {
                            Some(parent) => parent.children.push(closed),
                            None => {
                                self.entries += 1;
                                return Ok(Some(closed));
                            }
                        }
                    } else if self.depth == 0 {
                        debug!("Root element closed after {} entries", self.entries);
                        self.finished = true;
                    }
                }
                Event::Eof => {
                    self.finished = true;
                    if let Some(open) = self.stack.first() {
                        return Err(ParseError::UnexpectedEof(open.name.clone()));
                    }
                    if self.depth > 0 {
                        let root = self.root.clone().unwrap_or_default();
                        return Err(ParseError::UnexpectedEof(root));
                    }
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = Result<Element, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

fn local_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn to_element(start: &BytesStart, position: u64) -> Result<Element, ParseError> {
    let mut element = Element::new(local_name(start));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        if attribute.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|source| ParseError::Xml { position, source })?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

/// Fragments split by comments or CDATA sections are joined as-is;
/// `Element::text` trims the result.
fn push_text(element: &mut Element, text: &str) {
    element.text.push_str(text);
}

/// Streams every entry of `path` into `on_entry`, reporting progress after
/// each one. Each subtree is moved into the callback and dropped there.
pub fn run<F, P, E>(path: &Path, mut on_entry: F, mut progress: P) -> Result<ParseProgress, E>
where
    F: FnMut(Element) -> Result<(), E>,
    P: FnMut(&ParseProgress),
    E: From<ParseError>,
{
    let mut reader = EntryReader::from_path(path)?;
    while let Some(entry) = reader.next_entry()? {
        on_entry(entry)?;
        progress(&reader.progress());
    }
    Ok(reader.progress())
}

//! Streaming dump walker with BZ2 decompression.
//!
//! `DumpWalker` pulls quick-xml events off the byte stream and mirrors them
//! into a [`NodeArena`], so at any point the only materialized structure is
//! the open-element chain plus the record currently being read. Each closed
//! `page` element yields one [`RecordState`]; the page subtree (and any
//! earlier siblings up the ancestor chain, e.g. `siteinfo`) is reclaimed when
//! the caller pulls the next record.

use crate::models::RecordState;
use crate::tree::{NodeArena, NodeId};
use anyhow::{bail, Context, Result};
use bzip2::read::BzDecoder;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Which export-schema namespace qualifies the record vocabulary.
#[derive(Debug, Clone)]
pub enum NsSpec {
    /// Bind to whatever namespace the document's root element declares.
    Detect,
    /// Require an explicit URI, e.g. `http://www.mediawiki.org/xml/export-0.11/`.
    Uri(String),
}

pub struct DumpWalker<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    tree: NodeArena,
    stack: Vec<NodeId>,
    bound_ns: Option<Vec<u8>>,
    pending_reclaim: Option<NodeId>,
    finished: bool,
}

impl DumpWalker<Box<dyn BufRead>> {
    /// Open a dump file, transparently decompressing `.bz2` inputs.
    pub fn from_path(path: &str, ns: NsSpec) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open dump file: {}", path))?;
        let reader: Box<dyn BufRead> = if Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bz2"))
        {
            Box::new(BufReader::new(BzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::from_reader(reader, ns))
    }
}

impl<R: BufRead> DumpWalker<R> {
    pub fn from_reader(reader: R, ns: NsSpec) -> Self {
        let bound_ns = match ns {
            NsSpec::Detect => None,
            NsSpec::Uri(uri) => Some(uri.into_bytes()),
        };
        Self {
            reader: NsReader::from_reader(reader),
            buf: Vec::with_capacity(8 * 1024),
            tree: NodeArena::new(),
            stack: Vec::new(),
            bound_ns,
            pending_reclaim: None,
            finished: false,
        }
    }

    /// Parse forward until the next record container closes.
    ///
    /// Reclamation of the previous record rides on this call, so after every
    /// pull the arena holds at most the open-element chain plus one record.
    /// Returns `Ok(None)` on clean exhaustion; an `Err` means the walk is
    /// aborted and the walker yields nothing further.
    pub fn next_record(&mut self) -> Result<Option<RecordState>> {
        if self.finished {
            return Ok(None);
        }
        if let Some(page) = self.pending_reclaim.take() {
            self.tree.reclaim(page);
        }
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    self.finished = true;
                    let pos = self.reader.buffer_position();
                    return Err(anyhow::Error::new(e)
                        .context(format!("Malformed XML near byte {}", pos)));
                }
            };
            match event {
                Event::Start(e) => {
                    let (resolve, local) = self.reader.resolve_element(e.name());
                    let name = String::from_utf8_lossy(local.as_ref()).into_owned();
                    let ns = match resolve {
                        ResolveResult::Bound(Namespace(ns)) => ns.to_vec(),
                        _ => Vec::new(),
                    };
                    let in_ns = self.element_in_ns(&ns);
                    let parent = self.stack.last().copied();
                    let id = self.tree.alloc(&name, in_ns, parent);
                    self.stack.push(id);
                }
                Event::Empty(e) => {
                    let (resolve, local) = self.reader.resolve_element(e.name());
                    let name = String::from_utf8_lossy(local.as_ref()).into_owned();
                    let ns = match resolve {
                        ResolveResult::Bound(Namespace(ns)) => ns.to_vec(),
                        _ => Vec::new(),
                    };
                    let in_ns = self.element_in_ns(&ns);
                    let parent = self.stack.last().copied();
                    self.tree.alloc(&name, in_ns, parent);
                }
                Event::Text(t) => {
                    if let Some(&top) = self.stack.last() {
                        let text = match t.unescape() {
                            Ok(text) => text,
                            Err(e) => {
                                self.finished = true;
                                let pos = self.reader.buffer_position();
                                return Err(anyhow::Error::new(e)
                                    .context(format!("Malformed XML near byte {}", pos)));
                            }
                        };
                        self.tree.append_text(top, &text);
                    }
                }
                Event::CData(t) => {
                    if let Some(&top) = self.stack.last() {
                        let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                        self.tree.append_text(top, &text);
                    }
                }
                Event::End(_) => {
                    if let Some(id) = self.stack.pop() {
                        if self.tree.name(id) == "page" && self.tree.in_ns(id) {
                            let record = self.materialize(id);
                            self.pending_reclaim = Some(id);
                            return Ok(Some(record));
                        }
                    }
                }
                Event::Eof => {
                    self.finished = true;
                    if !self.stack.is_empty() {
                        bail!(
                            "Unexpected end of document at byte {}: {} element(s) still open",
                            self.reader.buffer_position(),
                            self.stack.len()
                        );
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    /// Byte position within the (decompressed) stream, for abort reporting.
    pub fn buffer_position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    pub fn live_nodes(&self) -> usize {
        self.tree.live_nodes()
    }

    pub fn peak_live_nodes(&self) -> usize {
        self.tree.peak_live_nodes()
    }

    pub fn retained_text_bytes(&self) -> usize {
        self.tree.retained_text_bytes()
    }

    fn element_in_ns(&mut self, ns: &[u8]) -> bool {
        match &self.bound_ns {
            Some(bound) => bound.as_slice() == ns,
            // Detect mode: the root element's namespace becomes the binding.
            None => {
                self.bound_ns = Some(ns.to_vec());
                true
            }
        }
    }

    /// Copy the record's filterable fields out of the partial tree.
    ///
    /// `page` and `title` must carry the bound export namespace; `ns`,
    /// `revision` and `text` children match by local name in any namespace,
    /// mirroring the wildcard matching of the original extractor.
    fn materialize(&self, page: NodeId) -> RecordState {
        let mut record = RecordState::default();
        for &child in self.tree.children(page) {
            match self.tree.name(child) {
                "ns" => record.namespace_ids.push(self.tree.text(child).to_string()),
                "title" if self.tree.in_ns(child) => {
                    record.title = Some(self.tree.text(child).to_string());
                }
                "revision" => {
                    for &sub in self.tree.children(child) {
                        if self.tree.name(sub) == "text" {
                            record.revision_texts.push(self.tree.text(sub).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
        record
    }
}

impl<R: BufRead> Iterator for DumpWalker<R> {
    type Item = Result<RecordState>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing_indent_handler::prelude::*;

/// One parsed line or group of the indented output.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(String),
    Group(BTreeMap<String, Node>),
}

impl Node {
    pub fn value(&self) -> &str {
        match self {
            Node::Value(v) => v,
            Node::Group(g) => panic!("expected a value, found group {:?}", g),
        }
    }

    pub fn group(&self) -> &BTreeMap<String, Node> {
        match self {
            Node::Group(g) => g,
            Node::Value(v) => panic!("expected a group, found value {:?}", v),
        }
    }
}

pub type ParsedRecord = BTreeMap<String, Node>;

/// Parse handler output into one map per record.
///
/// Panics on anything that is not well-formed, so tests that only parse
/// also check that records were not torn apart.
pub fn parse_records(output: &str) -> Vec<ParsedRecord> {
    let mut records = Vec::new();
    let mut lines = Vec::new();
    for line in output.lines() {
        if line == "---" {
            records.push(parse_record(&lines));
            lines.clear();
        } else {
            lines.push(line);
        }
    }
    assert!(lines.is_empty(), "unterminated record: {:?}", lines);
    records
}

pub fn parse_single(output: &str) -> ParsedRecord {
    let mut records = parse_records(output);
    assert_eq!(records.len(), 1, "expected one record in {:?}", output);
    records.remove(0)
}

/// Follow `path` through nested groups.
pub fn lookup<'a>(record: &'a ParsedRecord, path: &[&str]) -> Option<&'a Node> {
    let (last, groups) = path.split_last()?;
    let mut map = record;
    for key in groups {
        match map.get(*key)? {
            Node::Group(g) => map = g,
            Node::Value(_) => return None,
        }
    }
    map.get(*last)
}

fn parse_record(lines: &[&str]) -> ParsedRecord {
    let mut pos = 0;
    let record = parse_level(lines, &mut pos, 0);
    assert_eq!(pos, lines.len(), "trailing lines in {:?}", lines);
    record
}

fn parse_level(lines: &[&str], pos: &mut usize, depth: usize) -> ParsedRecord {
    let mut map = BTreeMap::new();
    while *pos < lines.len() {
        let line = lines[*pos];
        let text = line.trim_start_matches(' ');
        let indent = line.len() - text.len();
        assert_eq!(indent % 4, 0, "odd indentation in {:?}", line);
        if indent / 4 < depth {
            break;
        }
        assert_eq!(indent / 4, depth, "unexpected indentation in {:?}", line);

        *pos += 1;
        if let Some((key, value)) = text.split_once(": ") {
            map.insert(key.to_string(), Node::Value(value.to_string()));
        } else if let Some(key) = text.strip_suffix(':') {
            let nested = parse_level(lines, pos, depth + 1);
            assert!(!nested.is_empty(), "group {:?} has no members", key);
            map.insert(key.to_string(), Node::Group(nested));
        } else {
            panic!("unparseable line {:?}", line);
        }
    }
    map
}

pub fn memory_handler() -> (IndentHandler, MemoryWriter) {
    memory_handler_with(HandlerOptions::default())
}

pub fn memory_handler_with(options: HandlerOptions) -> (IndentHandler, MemoryWriter) {
    let out = MemoryWriter::new();
    let handler = IndentHandler::new(Sink::new(out.clone()), options);
    (handler, out)
}

/// Writer that always fails.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that accepts one byte per call and yields in between, so any
/// caller that is not serialized by the sink lock gets interleaved.
#[derive(Clone, Default)]
pub struct TricklingWriter {
    inner: MemoryWriter,
}

impl TricklingWriter {
    pub fn contents(&self) -> String {
        self.inner.contents()
    }
}

impl Write for TricklingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.inner.write_all(&buf[..1])?;
        std::thread::yield_now();
        Ok(1)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! Byte-offset markup scanner.
//!
//! A single forward pass that records where every element starts and ends in
//! the original input. Nothing is re-serialised: callers slice the input with
//! the returned ranges, so fragments keep their exact bytes.
//!
//! Tree construction follows the part of the HTML rules that rich-text
//! proposal bodies actually exercise:
//! - void elements and `/>` never take children
//! - `script`, `style`, `textarea` and `title` hold raw text
//! - a block element implicitly closes an open `p`, then an open heading
//! - `li` implicitly closes an open `li`
//! - an end tag closes everything opened after its match; stray end tags are ignored
//! - elements still open at end of input end there
use std::ops::Range;

/// Deepest element nesting the scanner accepts before giving up.
pub const MAX_DEPTH: usize = 256;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),

    #[error("element nesting exceeds {MAX_DEPTH} levels at byte {0}")]
    TooDeep(usize),
}

/// An element located in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name.
    pub name: String,
    /// From `<` of the start tag to past `>` of the end tag (or the implied end).
    pub outer: Range<usize>,
    /// Between the start tag and the end tag.
    pub inner: Range<usize>,
    /// Child element ids in source order.
    pub children: Vec<usize>,
}

/// Scanned element tree. Element ids index into document order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    roots: Vec<usize>,
}

impl Document {
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn element(&self, id: usize) -> &Element {
        &self.elements[id]
    }

    /// First element with the given name in document order, at any depth.
    pub fn first_named(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }
}

pub fn scan(input: &str) -> Result<Document, ScanError> {
    let bytes = input.as_bytes();
    let mut tree = TreeBuilder::default();
    let mut pos = 0;

    while let Some(start) = find_byte(bytes, pos, b'<') {
        let rest = &bytes[start..];

        if rest.starts_with(b"<!--") {
            let end = find_seq(bytes, start + 4, b"-->")
                .ok_or(ScanError::UnterminatedComment(start))?;
            pos = end + 3;
            continue;
        }

        match rest.get(1) {
            Some(b'!') | Some(b'?') => match find_byte(bytes, start + 2, b'>') {
                Some(end) => pos = end + 1,
                None => break,
            },
            Some(b'/') => {
                let name_end = name_end(bytes, start + 2);
                let Some(end) = find_byte(bytes, name_end, b'>') else {
                    break;
                };
                if name_end > start + 2 {
                    let name = input[start + 2..name_end].to_ascii_lowercase();
                    tree.close(&name, start, end + 1);
                }
                pos = end + 1;
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let name_end = name_end(bytes, start + 1);
                let Some(end) = tag_end(bytes, name_end) else {
                    // `<` that never becomes a tag is text.
                    pos = start + 1;
                    continue;
                };
                let name = input[start + 1..name_end].to_ascii_lowercase();
                let self_closing = end > name_end && bytes[end - 1] == b'/';
                let tag_close = end + 1;

                if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    let (inner_end, outer_end) = raw_text_end(input, tag_close, &name);
                    tree.leaf(name, start, tag_close, inner_end, outer_end);
                    pos = outer_end;
                } else {
                    tree.open(name, start, tag_close, self_closing)?;
                    pos = tag_close;
                }
            }
            _ => pos = start + 1,
        }
    }

    Ok(tree.finish(input.len()))
}

/// Plain text of a markup fragment: tags and comments removed, character
/// references decoded, whitespace collapsed to single spaces.
pub fn text_content(markup: &str) -> String {
    let bytes = markup.as_bytes();
    let mut text = String::with_capacity(markup.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(lt) = find_byte(bytes, pos, b'<') else {
            text.push_str(&markup[pos..]);
            break;
        };
        text.push_str(&markup[pos..lt]);

        let rest = &bytes[lt..];
        let next = if rest.starts_with(b"<!--") {
            find_seq(bytes, lt + 4, b"-->").map(|e| e + 3)
        } else {
            match rest.get(1) {
                Some(c) if c.is_ascii_alphabetic() => tag_end(bytes, lt + 1).map(|e| e + 1),
                Some(b'/') | Some(b'!') | Some(b'?') => find_byte(bytes, lt + 1, b'>').map(|e| e + 1),
                _ => {
                    text.push('<');
                    Some(lt + 1)
                }
            }
        };
        match next {
            Some(next) => pos = next,
            None => break,
        }
    }

    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `gap` holds only whitespace, comments and declarations.
pub fn is_insignificant(gap: &str) -> bool {
    let mut rest = gap;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return true;
        }
        let skip = if rest.starts_with("<!--") {
            rest[4..].find("-->").map(|e| e + 7)
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest.find('>').map(|e| e + 1)
        } else {
            None
        };
        match skip {
            Some(n) => rest = &rest[n..],
            None => return false,
        }
    }
}

pub fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

#[derive(Default)]
struct TreeBuilder {
    elements: Vec<Element>,
    roots: Vec<usize>,
    stack: Vec<usize>,
}

impl TreeBuilder {
    fn open(
        &mut self,
        name: String,
        start: usize,
        tag_close: usize,
        self_closing: bool,
    ) -> Result<(), ScanError> {
        self.close_implied(&name, start);
        let void = self_closing || VOID_ELEMENTS.contains(&name.as_str());
        if !void && self.stack.len() >= MAX_DEPTH {
            return Err(ScanError::TooDeep(start));
        }
        let id = self.attach(Element {
            name,
            outer: start..tag_close,
            inner: tag_close..tag_close,
            children: Vec::new(),
        });
        if !void {
            self.stack.push(id);
        }
        Ok(())
    }

    fn leaf(&mut self, name: String, start: usize, tag_close: usize, inner_end: usize, outer_end: usize) {
        self.close_implied(&name, start);
        self.attach(Element {
            name,
            outer: start..outer_end,
            inner: tag_close..inner_end,
            children: Vec::new(),
        });
    }

    fn attach(&mut self, element: Element) -> usize {
        let id = self.elements.len();
        self.elements.push(element);
        match self.stack.last() {
            Some(&parent) => self.elements[parent].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Pop every open element that `name` implicitly ends: an open `p` first,
    /// then the heading it sat in.
    fn close_implied(&mut self, name: &str, at: usize) {
        while let Some(&top) = self.stack.last() {
            let top_name = self.elements[top].name.as_str();
            let block = CLOSES_PARAGRAPH.contains(&name);
            let implied = ((top_name == "p" || is_heading(top_name)) && block)
                || (top_name == "li" && name == "li");
            if !implied {
                break;
            }
            self.end_at(top, at, at);
            self.stack.pop();
        }
    }

    fn close(&mut self, name: &str, start: usize, end: usize) {
        // Any heading end tag closes whichever heading is open.
        let closes = |open: &str| open == name || (is_heading(open) && is_heading(name));
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|&id| closes(&self.elements[id].name))
        else {
            return;
        };
        let closed: Vec<usize> = self.stack.drain(pos..).collect();
        for (i, id) in closed.into_iter().enumerate() {
            if i == 0 {
                self.end_at(id, start, end);
            } else {
                self.end_at(id, start, start);
            }
        }
    }

    fn end_at(&mut self, id: usize, inner_end: usize, outer_end: usize) {
        let element = &mut self.elements[id];
        element.inner.end = inner_end;
        element.outer.end = outer_end;
    }

    fn finish(mut self, len: usize) -> Document {
        for id in std::mem::take(&mut self.stack) {
            self.end_at(id, len, len);
        }
        Document {
            elements: self.elements,
            roots: self.roots,
        }
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

fn name_end(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b'_' | b':')) {
        i += 1;
    }
    i
}

/// Position of the `>` closing a start tag, skipping quoted attribute values.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            b'=' => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if let Some(&quote @ (b'"' | b'\'')) = bytes.get(i) {
                    i = find_byte(bytes, i + 1, quote)? + 1;
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// Inner and outer end of a raw-text element whose content starts at `from`.
fn raw_text_end(input: &str, from: usize, name: &str) -> (usize, usize) {
    let bytes = input.as_bytes();
    let name = name.as_bytes();
    let mut pos = from;
    while let Some(lt) = find_seq(bytes, pos, b"</") {
        let name_start = lt + 2;
        let matched = bytes
            .get(name_start..name_start + name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name));
        if matched {
            let outer_end = find_byte(bytes, name_start, b'>').map_or(input.len(), |e| e + 1);
            return (lt, outer_end);
        }
        pos = name_start;
    }
    (input.len(), input.len())
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(c)
}

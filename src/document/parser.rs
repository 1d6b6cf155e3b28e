use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::types::{Document, LayerNode};
use crate::error::{ExportError, Result};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";

/// `xmlns` declarations in scope, innermost element last
#[derive(Debug, Default)]
struct Namespaces {
    scopes: Vec<Vec<(String, String)>>,
}

impl Namespaces {
    fn push(&mut self, declarations: Vec<(String, String)>) {
        self.scopes.push(declarations);
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Resolve a prefix ("" for the default namespace). Undeclared Inkscape
    /// prefixes are accepted so that hand-trimmed files still parse.
    fn resolve(&self, prefix: &str) -> Option<&str> {
        for scope in self.scopes.iter().rev() {
            if let Some((_, uri)) = scope.iter().rev().find(|(p, _)| p == prefix) {
                return Some(uri.as_str());
            }
        }

        match prefix {
            "svg" => Some(SVG_NS),
            "inkscape" => Some(INKSCAPE_NS),
            "sodipodi" => Some(SODIPODI_NS),
            _ => None,
        }
    }
}

fn split_name(name: &str) -> (&str, &str) {
    name.split_once(':').unwrap_or(("", name))
}

/// The attributes this module cares about, resolved against the namespaces in scope
#[derive(Debug, Default)]
struct ElementInfo {
    is_svg_element: bool,
    local_name: String,
    id: Option<String>,
    label: Option<String>,
    is_layer: bool,
    docname: Option<String>,
}

/// Read one element's attributes. Pushes a namespace scope that the caller
/// must pop when the element closes.
fn read_element(e: &BytesStart, namespaces: &mut Namespaces) -> ElementInfo {
    let mut declarations = Vec::new();
    let mut attributes = Vec::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        let raw = std::str::from_utf8(&attr.value).unwrap_or("");
        let value = quick_xml::escape::unescape(raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());

        if key == "xmlns" {
            declarations.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((prefix.to_string(), value));
        } else {
            attributes.push((key.to_string(), value));
        }
    }
    namespaces.push(declarations);

    let name_bytes = e.name();
    let name = std::str::from_utf8(name_bytes.as_ref()).unwrap_or("");
    let (prefix, local) = split_name(name);

    let mut info = ElementInfo {
        // Unprefixed elements in a document without any xmlns are taken as SVG
        is_svg_element: namespaces
            .resolve(prefix)
            .map_or(prefix.is_empty(), |uri| uri == SVG_NS),
        local_name: local.to_string(),
        ..Default::default()
    };

    for (key, value) in attributes {
        let (prefix, local) = split_name(&key);
        let namespace = if prefix.is_empty() {
            None
        } else {
            namespaces.resolve(prefix)
        };

        match (namespace, local) {
            (None, "id") if prefix.is_empty() => info.id = Some(value),
            (Some(INKSCAPE_NS), "label") => info.label = Some(value),
            (Some(INKSCAPE_NS), "groupmode") => info.is_layer = value == "layer",
            (Some(SODIPODI_NS), "docname") => info.docname = Some(value),
            _ => {}
        }
    }

    info
}

#[derive(Debug)]
enum Frame {
    Root,
    Layer(LayerNode),
    Other,
}

impl Frame {
    fn holds_layers(&self) -> bool {
        matches!(self, Frame::Root | Frame::Layer(_))
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    document: Document,
    namespaces: Namespaces,
    stack: Vec<Frame>,
    seen_root: bool,
}

impl TreeBuilder {
    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let info = read_element(e, &mut self.namespaces);

        if self.document.docname.is_none() {
            self.document.docname = info.docname.clone();
        }

        let frame = if !self.seen_root {
            if !(info.is_svg_element && info.local_name == "svg") {
                return Err(ExportError::MissingRoot);
            }
            self.seen_root = true;
            self.document.id = info.id;
            self.document.label = info.label;
            Frame::Root
        } else if info.is_svg_element
            && info.local_name == "g"
            && info.is_layer
            && self.stack.last().is_some_and(Frame::holds_layers)
        {
            let id = info.id.ok_or_else(|| ExportError::MissingLayerId {
                label: info.label.clone().unwrap_or_default(),
            })?;
            Frame::Layer(LayerNode::new(id, info.label.as_deref()))
        } else {
            Frame::Other
        };

        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.namespaces.pop();

        let Some(Frame::Layer(node)) = self.stack.pop() else {
            return;
        };

        match self.stack.last_mut() {
            Some(Frame::Layer(parent)) => parent.sublayers.push(node),
            Some(Frame::Root) => self.document.layers.push(node),
            _ => {}
        }
    }

    fn is_done(&self) -> bool {
        self.seen_root && self.stack.is_empty()
    }
}

/// Parse SVG text into its layer tree
pub fn parse_document(svg: &str) -> Result<Document> {
    let mut reader = Reader::from_str(svg);
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => builder.open(e)?,
            Ok(Event::Empty(ref e)) => {
                builder.open(e)?;
                builder.close();
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();

        if builder.is_done() {
            break;
        }
    }

    if !builder.seen_root {
        return Err(ExportError::MissingRoot);
    }

    Ok(builder.document)
}

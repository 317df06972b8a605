//! Flat XML and JSON wire formats.
//!
//! Server to server traffic uses XML:
//!
//! ```text
//! <xml><appid><![CDATA[wx01]]></appid><total_fee><![CDATA[100]]></total_fee></xml>
//! ```
//!
//! JSON is used for payloads handed to a browser or JS bridge.

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::params::{ParameterSet, Value};
use crate::{Error, Result};

const XML_ROOT: &str = "xml";

/// The wire format a payload is rendered to or decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// `<xml><k><![CDATA[v]]></k>...</xml>`
    #[default]
    Xml,
    /// Flat JSON object with string values.
    Json,
}

impl WireFormat {
    /// Render fields in this format.
    pub fn encode(&self, fields: &ParameterSet) -> Result<String> {
        match self {
            WireFormat::Xml => to_xml(fields),
            WireFormat::Json => to_json(fields),
        }
    }

    /// Decode a payload in this format.
    pub fn decode(&self, payload: &str) -> Result<ParameterSet> {
        match self {
            WireFormat::Xml => from_xml(payload),
            WireFormat::Json => from_json(payload),
        }
    }
}

/// Render fields as a flat XML document, every value wrapped in CDATA.
pub fn to_xml(fields: &ParameterSet) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    write_xml_event(&mut writer, Event::Start(BytesStart::new(XML_ROOT)))?;
    for (k, v) in fields.iter() {
        if !is_valid_name(k) {
            return Err(Error::payload_invalid(format!(
                "field name {k:?} is not a valid xml element name"
            )));
        }

        write_xml_event(&mut writer, Event::Start(BytesStart::new(k)))?;
        for section in cdata_sections(&v.to_string()) {
            write_xml_event(&mut writer, Event::CData(BytesCData::new(section)))?;
        }
        write_xml_event(&mut writer, Event::End(BytesEnd::new(k)))?;
    }
    write_xml_event(&mut writer, Event::End(BytesEnd::new(XML_ROOT)))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Decode a flat XML document into fields.
///
/// The root element name is not checked. Children may carry text or CDATA;
/// nested elements and DOCTYPE declarations are rejected.
///
/// Whitespace around plain text values is trimmed, CDATA values are kept
/// as is.
pub fn from_xml(payload: &str) -> Result<ParameterSet> {
    let mut reader = Reader::from_str(payload);
    reader.config_mut().trim_text(true);

    let mut params = ParameterSet::new();
    let mut depth = 0usize;
    let mut has_root = false;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 if !has_root => has_root = true,
                    2 => {
                        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                        current = Some((name, String::new()));
                    }
                    _ => return Err(Error::payload_invalid("xml payload must be flat")),
                }
            }
            Event::Empty(e) => match depth {
                0 if !has_root => has_root = true,
                1 => {
                    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                    params.set(name, "");
                }
                _ => return Err(Error::payload_invalid("xml payload must be flat")),
            },
            Event::End(_) => {
                if let Some((k, v)) = current.take() {
                    params.set(k, v);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(e) => match current.as_mut() {
                Some((_, v)) => v.push_str(&e.unescape().map_err(xml_error)?),
                None => return Err(Error::payload_invalid("unexpected text in xml payload")),
            },
            Event::CData(e) => match current.as_mut() {
                Some((_, v)) => v.push_str(&String::from_utf8(e.into_inner().into_owned())?),
                None => return Err(Error::payload_invalid("unexpected cdata in xml payload")),
            },
            Event::DocType(_) => {
                return Err(Error::payload_invalid(
                    "xml payload must not declare a doctype",
                ))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !has_root || depth != 0 {
        return Err(Error::payload_invalid("xml payload is incomplete"));
    }
    Ok(params)
}

/// Render fields as a flat JSON object of strings.
pub fn to_json(fields: &ParameterSet) -> Result<String> {
    let map = fields
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect::<serde_json::Map<_, _>>();

    Ok(serde_json::to_string(&map)?)
}

/// Decode a flat JSON object into fields.
///
/// Numbers keep their text as written (`1.50` stays `1.50`), since that text
/// is what the sender signed.
pub fn from_json(payload: &str) -> Result<ParameterSet> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    let serde_json::Value::Object(map) = value else {
        return Err(Error::payload_invalid("json payload must be an object"));
    };

    let mut params = ParameterSet::new();
    for (k, v) in map {
        let value = match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Bool(b) => Value::String(b.to_string()),
            serde_json::Value::Number(n) => Value::String(n.to_string()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(Error::payload_invalid(format!(
                    "json field {k:?} must not be nested"
                )))
            }
        };
        params.set(k, value);
    }
    Ok(params)
}

fn write_xml_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::unexpected("failed to write xml payload").with_source(e))
}

/// Split a value so that a literal `]]>` never terminates its CDATA section.
fn cdata_sections(value: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = value;
    while let Some(idx) = rest.find("]]>") {
        sections.push(&rest[..idx + 2]);
        rest = &rest[idx + 2..];
    }
    sections.push(rest);
    sections
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn xml_error<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::payload_invalid(format!("invalid xml payload: {err}")).with_source(err)
}

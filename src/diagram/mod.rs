//! Diagram decoding.
//!
//! Turns the raw bytes of a draw.io file into a [`GraphDocument`]:
//! - plain `mxGraphModel` XML
//! - `mxfile` documents, uncompressed or with a compressed payload
//!   (base64 → raw deflate → URL encoding)
//! - SVG exports carrying the diagram source in their `content` attribute
//!
//! PNG exports are rejected: their embedded metadata is not recoverable.

mod graph;
pub mod xml;

pub use graph::{is_truthy, GraphDocument, GraphNode, NodeAttributes};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use std::fmt;
use std::io::Read;
use thiserror::Error;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Stage of the compressed payload pipeline that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStage {
    Base64,
    Inflate,
    Encoding,
    UrlDecode,
}

impl fmt::Display for PayloadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadStage::Base64 => write!(f, "base64"),
            PayloadStage::Inflate => write!(f, "inflate"),
            PayloadStage::Encoding => write!(f, "utf-8"),
            PayloadStage::UrlDecode => write!(f, "url-decode"),
        }
    }
}

/// Fatal errors that stop the pipeline before any extraction
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("format not supported: {0} (raster exports do not carry a readable diagram source)")]
    UnsupportedFormat(String),

    #[error("SVG doesn't contain embedded source diagram")]
    MissingEmbeddedSource,

    #[error("malformed compressed diagram ({stage}): {message}")]
    Payload {
        stage: PayloadStage,
        message: String,
    },

    #[error("malformed diagram XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("diagram not recognized")]
    NotRecognized,
}

impl DecodeError {
    fn payload(stage: PayloadStage, err: impl fmt::Display) -> Self {
        DecodeError::Payload {
            stage,
            message: err.to_string(),
        }
    }
}

/// Check whether the input is a raster image rather than a diagram document
pub fn is_raster_image(bytes: &[u8], source_hint: &str) -> bool {
    bytes.starts_with(PNG_MAGIC) || source_hint.to_lowercase().ends_with(".png")
}

/// Decode raw diagram bytes into a graph document.
///
/// `source_hint` is the file name (or URL) the bytes came from; it is only
/// used to recognize raster exports.
pub fn decode(bytes: &[u8], source_hint: &str) -> Result<GraphDocument, DecodeError> {
    if is_raster_image(bytes, source_hint) {
        return Err(DecodeError::UnsupportedFormat(source_hint.to_string()));
    }

    let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::payload(PayloadStage::Encoding, e))?;
    let mut tree = xml::parse(text)?;

    if let Some(svg) = tree.find("svg") {
        let content = svg
            .attr("content")
            .ok_or(DecodeError::MissingEmbeddedSource)?
            .to_string();
        tree = xml::parse(&content)?;
    }

    if let Some(mxfile) = tree.find("mxfile") {
        if mxfile.find("mxGraphModel").is_none() {
            let payload = mxfile.find("diagram").unwrap_or(mxfile).text_content();
            let source = inflate_payload(&payload)?;
            tree = xml::parse(&source)?;
        }
    }

    let model = tree.find("mxGraphModel").ok_or(DecodeError::NotRecognized)?;
    Ok(GraphDocument::from_model(model))
}

/// Decode a compressed `diagram` payload back to its XML source
pub fn inflate_payload(payload: &str) -> Result<String, DecodeError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let compressed = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| DecodeError::payload(PayloadStage::Base64, e))?;

    let mut inflated = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut inflated)
        .map_err(|e| DecodeError::payload(PayloadStage::Inflate, e))?;

    let inflated =
        String::from_utf8(inflated).map_err(|e| DecodeError::payload(PayloadStage::Encoding, e))?;

    // Form-component decoding: '+' stands for a space
    let spaced = inflated.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .map_err(|e| DecodeError::payload(PayloadStage::UrlDecode, e))?;

    Ok(decoded.into_owned())
}

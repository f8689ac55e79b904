//! File formats a diagram can be saved in.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// Output format of a generated diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Bare `mxGraphModel`
    Plain,
    /// `mxfile` with the model inline
    MxFile,
    /// `mxfile` with a deflated, base64 payload
    Compressed,
    /// SVG export with a compressed `mxfile` in its `content` attribute
    Svg,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "xml" => Ok(Format::Plain),
            "mxfile" => Ok(Format::MxFile),
            "compressed" => Ok(Format::Compressed),
            "svg" => Ok(Format::Svg),
            _ => Err(format!(
                "Unknown format: {}. Valid options: plain, mxfile, compressed, svg",
                s
            )),
        }
    }
}

impl Format {
    /// File extension conventionally used for the format
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Plain => "xml",
            Format::MxFile | Format::Compressed => "drawio",
            Format::Svg => "svg",
        }
    }

    /// Wrap a model document in this format
    pub fn wrap(&self, model_xml: &str) -> String {
        match self {
            Format::Plain => model_xml.to_string(),
            Format::MxFile => mxfile(model_xml),
            Format::Compressed => mxfile(&compress_payload(model_xml)),
            Format::Svg => format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" content=\"{}\"><defs/><g/></svg>",
                escape_attr(&mxfile(&compress_payload(model_xml)))
            ),
        }
    }
}

fn mxfile(diagram_body: &str) -> String {
    format!(
        "<mxfile host=\"test_data_gen\"><diagram id=\"d0\" name=\"Page-1\">{}</diagram></mxfile>",
        diagram_body
    )
}

/// URL-encode, raw-deflate and base64 a model document
pub fn compress_payload(model_xml: &str) -> String {
    let encoded = urlencoding::encode(model_xml);

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    // Writing to a Vec cannot fail
    let _ = encoder.write_all(encoded.as_bytes());
    let compressed = encoder.finish().unwrap_or_default();

    STANDARD.encode(compressed)
}

/// Escape a string for use inside a double-quoted XML attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_compressed_payload_is_base64() {
        let payload = compress_payload("<mxGraphModel/>");
        assert!(!payload.is_empty());
        assert!(STANDARD.decode(&payload).is_ok());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("SVG".parse::<Format>(), Ok(Format::Svg));
        assert!("png".parse::<Format>().is_err());
    }
}

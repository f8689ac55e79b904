//! Reading diagram files from disk, with transparent decompression.

use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> std::io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// Raw bytes of a diagram file
#[derive(Debug, Clone)]
pub struct DiagramSource {
    pub bytes: Vec<u8>,
    /// File name of the diagram itself, without any compression extension
    pub hint: String,
    pub compression: Compression,
}

/// Read a diagram file, decompressing it if its extension says so
pub fn read_diagram(path: &Path) -> anyhow::Result<DiagramSource> {
    let file =
        File::open(path).with_context(|| format!("cannot open diagram {}", path.display()))?;
    let compression = Compression::from_path(path);

    let mut reader = compression.wrap_reader(Box::new(BufReader::new(file)))?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("cannot read diagram {} ({})", path.display(), compression))?;

    Ok(DiagramSource {
        bytes,
        hint: source_hint(path, compression),
        compression,
    })
}

/// `diagram.svg.gz` -> `diagram.svg`
fn source_hint(path: &Path, compression: Compression) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if compression == Compression::None {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name.to_string(),
    }
}

//! The codec seam shared by every on-disk representation of a [`Document`].
//!
//! [`Document`]: crate::types::Document

use std::{
    fs,
    io::{BufWriter, Read, Write},
    path::Path,
};

use tracing::debug;

use crate::error::Error;

/// Decoding from raw bytes and encoding to a writer.
///
/// Implementors only provide [`Parser::from_bytes`] and [`Parser::to_writer`];
/// the encoding of the input is the implementor's business, so every other
/// entry point funnels through the byte form.
///
/// ```rust,no_run
/// use tscodec::traits::Parser;
/// let doc = tscodec::Document::read_from("translations/ProofNetwork.ja.ts")?;
/// doc.write_to("translations/ProofNetwork.ja.ts")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser: Sized {
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>;

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    fn from_reader<R: Read>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_bytes(s.as_bytes())
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read file");
        Self::from_bytes(&bytes)
    }

    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut writer = BufWriter::new(fs::File::create(path.as_ref())?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes into a `String`; fails only if the output is not UTF-8.
    fn to_string_lossless(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| {
            Error::invalid_document(format!("serialized output is not UTF-8: {}", e))
        })
    }
}

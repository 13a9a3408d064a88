//! Lossless JSON form of [`Document`], used for debugging and caching.

use std::io::{Read, Write};

use crate::{error::Error, types::Document};

pub fn read_json<R: Read>(reader: R) -> Result<Document, Error> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_json<W: Write>(doc: &Document, mut writer: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    Ok(())
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Little-endian field helpers shared by the binary blob formats.
//!
//! Every blob starts with a four-byte signature and a four-byte version,
//! and is rejected on any mismatch. Multi-byte fields are little-endian.

use std::io::{Read, Write};

use crate::error::BoggleError;

pub(crate) fn write_u16<W: Write>(writer: &mut W, value: u16) -> std::io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub(crate) fn write_u32<W: Write>(writer: &mut W, value: u32) -> std::io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub(crate) fn write_i32<W: Write>(writer: &mut W, value: i32) -> std::io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub(crate) fn read_u16<R: Read>(reader: &mut R) -> std::io::Result<u16> {
    let mut bytes = [0u8; 2];
    reader.read_exact(&mut bytes)?;
    Ok(u16::from_le_bytes(bytes))
}

pub(crate) fn read_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

pub(crate) fn read_i32<R: Read>(reader: &mut R) -> std::io::Result<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

/// Pack a four-character signature the way C multi-character literals do.
pub(crate) const fn signature(tag: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*tag)
}

/// Read and check a blob's signature/version pair, failing closed.
pub(crate) fn read_header<R: Read>(
    reader: &mut R,
    expected_signature: u32,
    expected_version: u32,
    blob: &'static str,
) -> Result<(), BoggleError> {
    let file_signature = read_u32(reader)?;
    let file_version = read_u32(reader)?;

    if file_signature != expected_signature || file_version != expected_version {
        return Err(BoggleError::HeaderMismatch { blob });
    }

    Ok(())
}

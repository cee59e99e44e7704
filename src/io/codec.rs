//! Little-endian primitive encoding shared by the grid formats.
//!
//! Booleans are one byte (0 or 1). A stream that ends early decodes as
//! [`MargaError::CorruptData`]; every other read failure stays an
//! [`MargaError::IoFailure`].

use std::io::{ErrorKind, Read, Write};

use crate::error::{MargaError, Result};

pub(crate) fn write_u8(w: &mut dyn Write, v: u8) -> Result<()> {
    w.write_all(&[v])?;
    Ok(())
}

pub(crate) fn write_bool(w: &mut dyn Write, v: bool) -> Result<()> {
    write_u8(w, v as u8)
}

pub(crate) fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_exact(r: &mut dyn Read, buf: &mut [u8]) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => MargaError::CorruptData("unexpected end of stream".into()),
        _ => MargaError::IoFailure(e),
    })
}

pub(crate) fn read_u8(r: &mut dyn Read) -> Result<u8> {
    let mut buf = [0u8; 1];
    read_exact(r, &mut buf)?;
    Ok(buf[0])
}

/// Read a boolean, rejecting any byte other than 0 or 1.
pub(crate) fn read_bool(r: &mut dyn Read) -> Result<bool> {
    match read_u8(r)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(MargaError::CorruptData(format!(
            "invalid boolean byte {other:#04x}"
        ))),
    }
}

pub(crate) fn read_i32_le(r: &mut dyn Read) -> Result<i32> {
    let mut buf = [0u8; 4];
    read_exact(r, &mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub(crate) fn read_u64_le(r: &mut dyn Read) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_exact(r, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub(crate) fn read_f64_le(r: &mut dyn Read) -> Result<f64> {
    let mut buf = [0u8; 8];
    read_exact(r, &mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

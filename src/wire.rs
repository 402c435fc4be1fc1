//! Checked big-endian reads over a response body.
//!
//! `bytes::Buf` panics when a read runs past the end of the buffer; every
//! method here checks the remaining length first and reports a short buffer
//! as [`CqlError::MalformedProtocolData`] instead.

use bytes::{Buf, Bytes};

use crate::{CqlError, Result};

/// Cursor over the bytes of a single response section.
#[derive(Clone, Debug, Default)]
pub struct ProtocolReader {
    buf: Bytes,
}

impl ProtocolReader {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Returns the unread tail of the buffer.
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }

    fn ensure(&self, needed: usize, what: &str) -> Result<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(CqlError::malformed(format!(
                "unexpected end of buffer reading {what}: need {needed} bytes, {remaining} left"
            )));
        }
        Ok(())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2, "unsigned short")?;
        Ok(self.buf.get_u16())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2, "short")?;
        Ok(self.buf.get_i16())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4, "int")?;
        Ok(self.buf.get_i32())
    }

    /// Reads a `[string]`: a 2-byte length followed by UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let len = usize::from(self.read_u16()?);
        self.ensure(len, "string body")?;
        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec())
            .map_err(|err| CqlError::malformed(format!("invalid UTF-8 in string: {err}")))
    }

    /// Reads `[bytes]`: a 4-byte length followed by that many bytes.
    ///
    /// A negative length encodes a null value and yields `None`.
    pub fn read_bytes(&mut self) -> Result<Option<Bytes>> {
        let len = self.read_i32()?;
        if len < 0 {
            return Ok(None);
        }
        let len = len as usize;
        self.ensure(len, "bytes body")?;
        Ok(Some(self.buf.split_to(len)))
    }
}

impl From<Bytes> for ProtocolReader {
    fn from(buf: Bytes) -> Self {
        Self::new(buf)
    }
}

impl From<&'static [u8]> for ProtocolReader {
    fn from(buf: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(buf))
    }
}

//! `/ASCIIHexDecode`.

use oxipdf_core::error::{FilterError, Result};
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{Direction, StreamFilter};
use std::io::Write;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// ASCII hexadecimal filter.
///
/// Encoding writes two uppercase digits per byte. Decoding skips PDF
/// whitespace, accepts either case, stops at `>` and pads an odd final
/// digit with a zero low nibble.
#[derive(Debug, Default)]
pub struct HexFilter {
    /// Pending high nibble.
    high: Option<u8>,
    /// `>` has been seen.
    finished: bool,
    /// Decode input position, for error reports.
    offset: u64,
}

impl HexFilter {
    /// Filter name used in error reports.
    pub const NAME: &'static str = "ASCIIHexDecode";

    /// Create an idle filter.
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ' | b'\x08')
}

fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

impl StreamFilter for HexFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, _direction: Direction) -> bool {
        true
    }

    fn begin_encode(&mut self) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn encode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let mut out = Vec::with_capacity(input.len() * 2);
        for &byte in input {
            out.push(HEX_DIGITS[usize::from(byte >> 4)]);
            out.push(HEX_DIGITS[usize::from(byte & 0x0F)]);
        }
        sink.write_all(&out)?;
        Ok(())
    }

    fn end_encode(&mut self, _sink: &mut dyn Write) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn begin_decode(&mut self, _parms: Option<&DecodeParms>) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        if self.finished {
            if !input.is_empty() {
                log::debug!("ASCIIHexDecode: ignoring {} bytes after '>'", input.len());
            }
            return Ok(());
        }

        let mut out = Vec::with_capacity(input.len() / 2 + 1);
        for (i, &byte) in input.iter().enumerate() {
            if byte == b'>' {
                self.finished = true;
                let trailing = input.len() - i - 1;
                if trailing > 0 {
                    log::debug!("ASCIIHexDecode: ignoring {trailing} bytes after '>'");
                }
                break;
            }
            self.offset += 1;
            if is_whitespace(byte) {
                continue;
            }

            let value = nibble(byte).ok_or_else(|| {
                FilterError::value_out_of_range(
                    Self::NAME,
                    self.offset - 1,
                    format!("invalid hex digit 0x{byte:02x}"),
                )
            })?;

            match self.high.take() {
                Some(high) => out.push((high << 4) | value),
                None => self.high = Some(value),
            }
        }

        sink.write_all(&out)?;
        Ok(())
    }

    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()> {
        if let Some(high) = self.high.take() {
            sink.write_all(&[high << 4])?;
        }
        self.reset();
        Ok(())
    }

    fn abort(&mut self) {
        self.reset();
    }
}

//! `/ASCII85Decode`.
//!
//! Four bytes map to five base-85 digits written as `!` (0) to `u` (84). An
//! all-zero group is abbreviated to `z`, and the stream ends with `~>`.

use oxipdf_core::error::{FilterError, Result};
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{Direction, StreamFilter};
use std::io::Write;

/// Powers of 85, most significant digit first.
pub const POWERS_85: [u32; 5] = [85 * 85 * 85 * 85, 85 * 85 * 85, 85 * 85, 85, 1];

/// ASCII base-85 filter.
#[derive(Debug, Default)]
pub struct Ascii85Filter {
    /// Accumulated group value. Wider than 32 bits so overflow is detectable.
    tuple: u64,
    /// Bytes (encode) or digits (decode) in the current group.
    count: usize,
    /// A `~` is waiting for its `>`.
    pending_tilde: bool,
    /// `~>` has been seen.
    finished: bool,
    /// Decode input position, for error reports.
    offset: u64,
}

impl Ascii85Filter {
    /// Filter name used in error reports.
    pub const NAME: &'static str = "ASCII85Decode";

    /// Create an idle filter.
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn error(&self, message: impl Into<String>) -> FilterError {
        FilterError::value_out_of_range(Self::NAME, self.offset, message)
    }

    /// Write the current group as `count + 1` digits, or `z` for a full
    /// zero group.
    fn encode_group(&mut self, out: &mut Vec<u8>) {
        let tuple = self.tuple as u32;
        if self.count == 4 && tuple == 0 {
            out.push(b'z');
        } else {
            let mut digits = [0u8; 5];
            let mut value = tuple;
            for digit in digits.iter_mut().rev() {
                *digit = (value % 85) as u8 + b'!';
                value /= 85;
            }
            out.extend_from_slice(&digits[..=self.count]);
        }
        self.tuple = 0;
        self.count = 0;
    }

    /// Convert a group value into its four bytes.
    fn group_bytes(&self, tuple: u64) -> Result<[u8; 4]> {
        let value = u32::try_from(tuple)
            .map_err(|_| self.error(format!("group value {tuple} exceeds 32 bits")))?;
        Ok(value.to_be_bytes())
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(
        byte,
        b'\n' | b'\r' | b'\t' | b' ' | b'\0' | b'\x0c' | b'\x08' | 0x7F
    )
}

impl StreamFilter for Ascii85Filter {
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
        let mut out = Vec::with_capacity(input.len() / 4 * 5 + 5);
        for &byte in input {
            self.tuple |= u64::from(byte) << (24 - 8 * self.count);
            self.count += 1;
            if self.count == 4 {
                self.encode_group(&mut out);
            }
        }
        sink.write_all(&out)?;
        Ok(())
    }

    fn end_encode(&mut self, sink: &mut dyn Write) -> Result<()> {
        let mut out = Vec::with_capacity(7);
        if self.count > 0 {
            self.encode_group(&mut out);
        }
        out.extend_from_slice(b"~>");
        sink.write_all(&out)?;
        self.reset();
        Ok(())
    }

    fn begin_decode(&mut self, _parms: Option<&DecodeParms>) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let mut out = Vec::with_capacity(input.len() / 5 * 4 + 4);

        for (i, &byte) in input.iter().enumerate() {
            if self.finished {
                log::debug!("ASCII85Decode: ignoring {} bytes after '~>'", input.len() - i);
                break;
            }

            if self.pending_tilde {
                if byte != b'>' {
                    return Err(self.error(format!("expected '>' after '~', found 0x{byte:02x}")));
                }
                self.pending_tilde = false;
                self.finished = true;
            } else {
                match byte {
                    b'!'..=b'u' => {
                        self.tuple += u64::from(byte - b'!') * u64::from(POWERS_85[self.count]);
                        self.count += 1;
                        if self.count == 5 {
                            out.extend_from_slice(&self.group_bytes(self.tuple)?);
                            self.tuple = 0;
                            self.count = 0;
                        }
                    }
                    b'z' if self.count == 0 => out.extend_from_slice(&[0; 4]),
                    b'z' => return Err(self.error("'z' inside a group")),
                    b'~' => self.pending_tilde = true,
                    _ if is_whitespace(byte) => {}
                    _ => return Err(self.error(format!("invalid character 0x{byte:02x}"))),
                }
            }
            self.offset += 1;
        }

        sink.write_all(&out)?;
        Ok(())
    }

    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()> {
        if self.pending_tilde {
            return Err(self.error("stream ends after '~'"));
        }

        if self.count == 1 {
            log::debug!("ASCII85Decode: dropping a lone final digit");
        } else if self.count > 1 {
            // Missing digits count as 'u' so the kept bytes round up correctly.
            let mut tuple = self.tuple;
            for power in &POWERS_85[self.count..] {
                tuple += 84 * u64::from(*power);
            }
            let bytes = self.group_bytes(tuple)?;
            sink.write_all(&bytes[..self.count - 1])?;
        }

        self.reset();
        Ok(())
    }

    fn abort(&mut self) {
        self.reset();
    }
}

//! Streaming LZW decoder.
//!
//! Codes are decoded as soon as their last bit arrives. The code table,
//! the previous code and any partial code survive between `feed` calls.

use crate::bitstream_msb::CodeReader;
use crate::config::LzwConfig;
use crate::dictionary::LzwTable;
use oxipdf_core::error::{FilterError, Result};
use std::io::Write;

const FILTER_NAME: &str = "LZWDecode";

/// LZW decoder for one stream.
#[derive(Debug)]
pub struct LzwDecoder {
    config: LzwConfig,
    table: LzwTable,
    reader: CodeReader,
    /// Previously decoded code, `None` right after a clear.
    prev_code: Option<u16>,
    /// Set once the end-of-data code has been read.
    finished: bool,
}

impl LzwDecoder {
    /// Create a new LZW decoder with the given configuration.
    pub fn new(config: LzwConfig) -> Self {
        Self {
            config,
            table: LzwTable::new(config),
            reader: CodeReader::new(),
            prev_code: None,
            finished: false,
        }
    }

    /// Whether the end-of-data code has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current code width in bits.
    pub fn code_bits(&self) -> u8 {
        self.table.code_bits()
    }

    /// Decode a block of LZW data, writing every completed string to `sink`.
    pub fn feed(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        if self.finished {
            if !input.is_empty() {
                log::debug!("LZW: ignoring {} bytes after end-of-data", input.len());
            }
            return Ok(());
        }

        let mut pos = 0;
        loop {
            pos += self.reader.fill(&input[pos..]);

            let Some(code) = self.reader.read_code(self.table.code_bits()) else {
                break;
            };

            if code == self.config.clear_code() {
                log::trace!("LZW: clear code at table size {}", self.table.len());
                self.table.reset();
                self.prev_code = None;
                continue;
            }

            if code == self.config.eod_code() {
                self.finished = true;
                let trailing = input.len() - pos;
                if trailing > 0 {
                    log::debug!("LZW: ignoring {trailing} bytes after end-of-data");
                }
                break;
            }

            self.decode_code(code, sink)?;
        }

        Ok(())
    }

    /// Finish the stream. Leftover bits shorter than a code are padding.
    pub fn finish(&mut self) -> Result<()> {
        if !self.finished {
            log::debug!(
                "LZW: stream ended without end-of-data code ({} bits pending)",
                self.reader.pending_bits()
            );
        }
        Ok(())
    }

    fn decode_code(&mut self, code: u16, sink: &mut dyn Write) -> Result<()> {
        let table_len = self.table.len();

        let string = match (self.table.get(code), self.prev_code) {
            (Some(entry), _) => entry.to_vec(),
            (None, Some(prev)) => {
                if usize::from(code) != table_len {
                    log::warn!(
                        "LZW: code {code} beyond table size {table_len}, decoding as the next code"
                    );
                }
                let prev_string = self.entry(prev)?;
                let mut string = Vec::with_capacity(prev_string.len() + 1);
                string.extend_from_slice(prev_string);
                string.push(prev_string[0]);
                string
            }
            (None, None) => {
                return Err(FilterError::value_out_of_range(
                    FILTER_NAME,
                    self.reader.bits_read() / 8,
                    format!("code {code} is outside the table of {table_len} entries"),
                ));
            }
        };

        sink.write_all(&string)?;

        if let Some(prev) = self.prev_code {
            if !self.table.is_full() {
                let prev_string = self.entry(prev)?;
                let mut entry = Vec::with_capacity(prev_string.len() + 1);
                entry.extend_from_slice(prev_string);
                entry.push(string[0]);
                self.table.push(entry);
            }
        }

        self.prev_code = Some(code);
        Ok(())
    }

    fn entry(&self, code: u16) -> Result<&[u8]> {
        self.table
            .get(code)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                FilterError::value_out_of_range(
                    FILTER_NAME,
                    self.reader.bits_read() / 8,
                    format!("code {code} has no table entry"),
                )
            })
    }
}

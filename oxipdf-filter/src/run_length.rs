//! `/RunLengthDecode` (decode only).

use oxipdf_core::error::Result;
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{Direction, StreamFilter, encode_unsupported};
use std::io::Write;

/// End-of-data length byte.
const EOD: u8 = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RunState {
    /// Expecting a length byte.
    #[default]
    Length,
    /// Copying this many more literal bytes.
    Literal(usize),
    /// The next byte is repeated this many times.
    Repeat(usize),
    /// End-of-data seen.
    Done,
}

/// Run-length decoder.
///
/// A length byte `L` of 0-127 copies the next `L + 1` bytes, 129-255 repeats
/// the next byte `257 - L` times and 128 ends the data.
#[derive(Debug, Default)]
pub struct RunLengthFilter {
    state: RunState,
}

impl RunLengthFilter {
    /// Filter name used in error reports.
    pub const NAME: &'static str = "RunLengthDecode";

    /// Create an idle filter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamFilter for RunLengthFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, direction: Direction) -> bool {
        direction == Direction::Decode
    }

    fn begin_encode(&mut self) -> Result<()> {
        Err(encode_unsupported(Self::NAME))
    }

    fn encode_block(&mut self, _input: &[u8], _sink: &mut dyn Write) -> Result<()> {
        Err(encode_unsupported(Self::NAME))
    }

    fn end_encode(&mut self, _sink: &mut dyn Write) -> Result<()> {
        Err(encode_unsupported(Self::NAME))
    }

    fn begin_decode(&mut self, _parms: Option<&DecodeParms>) -> Result<()> {
        self.state = RunState::Length;
        Ok(())
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let mut out = Vec::with_capacity(input.len());
        let mut pos = 0;

        while pos < input.len() {
            match self.state {
                RunState::Length => {
                    let length = input[pos];
                    pos += 1;
                    self.state = match length {
                        0..=127 => RunState::Literal(usize::from(length) + 1),
                        EOD => RunState::Done,
                        _ => RunState::Repeat(257 - usize::from(length)),
                    };
                }
                RunState::Literal(remaining) => {
                    let take = remaining.min(input.len() - pos);
                    out.extend_from_slice(&input[pos..pos + take]);
                    pos += take;
                    self.state = if take == remaining {
                        RunState::Length
                    } else {
                        RunState::Literal(remaining - take)
                    };
                }
                RunState::Repeat(count) => {
                    out.resize(out.len() + count, input[pos]);
                    pos += 1;
                    self.state = RunState::Length;
                }
                RunState::Done => {
                    log::debug!(
                        "RunLengthDecode: ignoring {} bytes after end-of-data",
                        input.len() - pos
                    );
                    break;
                }
            }
        }

        sink.write_all(&out)?;
        Ok(())
    }

    fn end_decode(&mut self, _sink: &mut dyn Write) -> Result<()> {
        match self.state {
            RunState::Literal(remaining) => {
                log::warn!("RunLengthDecode: literal run truncated, {remaining} bytes missing");
            }
            RunState::Repeat(count) => {
                log::warn!("RunLengthDecode: repeat run of {count} truncated before its byte");
            }
            RunState::Length | RunState::Done => {}
        }
        self.state = RunState::Length;
        Ok(())
    }

    fn abort(&mut self) {
        self.state = RunState::Length;
    }
}

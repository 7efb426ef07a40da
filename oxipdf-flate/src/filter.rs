//! `/FlateDecode` as a [`StreamFilter`].
//!
//! Both directions stream through flate2's low-level `Compress` and
//! `Decompress` engines with a fixed staging buffer, so a session never
//! holds more than one buffer of output in memory (except when a predictor
//! needs the whole image).

use crate::config::FlateConfig;
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use oxipdf_core::error::{FilterError, Result, try_reserve};
use oxipdf_core::params::DecodeParms;
use oxipdf_core::predictor::{PredictorBuffer, PredictorParams};
use oxipdf_core::traits::{Direction, StreamFilter};
use std::io::Write;
use std::mem;

/// Flate (zlib) filter supporting both directions.
#[derive(Debug)]
pub struct FlateFilter {
    config: FlateConfig,
    state: State,
}

#[derive(Debug)]
enum State {
    Idle,
    Encoding {
        engine: Compress,
        staging: Vec<u8>,
    },
    Decoding {
        engine: Decompress,
        staging: Vec<u8>,
        predictor: Option<PredictorBuffer>,
        finished: bool,
    },
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Idle => "idle filter",
            State::Encoding { .. } => "encode session",
            State::Decoding { .. } => "decode session",
        }
    }
}

impl FlateFilter {
    /// Filter name used in error reports.
    pub const NAME: &'static str = "FlateDecode";

    /// Create a filter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(FlateConfig::default())
    }

    /// Create a filter with a custom configuration.
    pub fn with_config(config: FlateConfig) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    /// The filter configuration.
    pub fn config(&self) -> &FlateConfig {
        &self.config
    }

    fn staging(&self) -> Result<Vec<u8>> {
        let mut staging = Vec::new();
        try_reserve(&mut staging, self.config.buffer_size)?;
        staging.resize(self.config.buffer_size, 0);
        Ok(staging)
    }

    /// Release the engine after a failure and pass the error on.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = State::Idle;
        }
        result
    }
}

impl Default for FlateFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamFilter for FlateFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, _direction: Direction) -> bool {
        true
    }

    fn begin_encode(&mut self) -> Result<()> {
        let staging = self.staging()?;
        let level = Compression::new(u32::from(self.config.level.level()));
        self.state = State::Encoding {
            engine: Compress::new(level, true),
            staging,
        };
        Ok(())
    }

    fn encode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let result = match &mut self.state {
            State::Encoding { engine, staging } => compress_block(engine, staging, input, sink),
            other => return Err(FilterError::invalid_state("encode session", other.name())),
        };
        self.settle(result)
    }

    fn end_encode(&mut self, sink: &mut dyn Write) -> Result<()> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Encoding {
                mut engine,
                mut staging,
            } => finish_compress(&mut engine, &mut staging, sink),
            other => Err(FilterError::invalid_state("encode session", other.name())),
        }
    }

    fn begin_decode(&mut self, parms: Option<&DecodeParms>) -> Result<()> {
        self.state = State::Idle;

        let params = PredictorParams::from_parms(parms);
        let predictor = if params.is_active() {
            Some(PredictorBuffer::new(params)?)
        } else {
            None
        };

        self.state = State::Decoding {
            engine: Decompress::new(true),
            staging: self.staging()?,
            predictor,
            finished: false,
        };
        Ok(())
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let result = match &mut self.state {
            State::Decoding { finished: true, .. } => {
                if !input.is_empty() {
                    log::debug!("FlateDecode: ignoring {} bytes after stream end", input.len());
                }
                Ok(())
            }
            State::Decoding {
                engine,
                staging,
                predictor,
                finished,
            } => {
                let ended = match predictor {
                    Some(rows) => decompress_block(engine, staging, input, rows),
                    None => decompress_block(engine, staging, input, sink),
                };
                ended.map(|ended| *finished = ended)
            }
            other => return Err(FilterError::invalid_state("decode session", other.name())),
        };
        self.settle(result)
    }

    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Decoding {
                engine,
                predictor,
                finished,
                ..
            } => {
                if !finished {
                    log::warn!(
                        "FlateDecode: stream truncated, keeping {} decoded bytes",
                        engine.total_out()
                    );
                }
                match predictor {
                    Some(rows) => rows.finish(sink),
                    None => Ok(()),
                }
            }
            other => Err(FilterError::invalid_state("decode session", other.name())),
        }
    }

    fn abort(&mut self) {
        self.state = State::Idle;
    }
}

/// Feed `input` to the compressor, writing every full staging buffer.
fn compress_block(
    engine: &mut Compress,
    staging: &mut [u8],
    mut input: &[u8],
    sink: &mut dyn Write,
) -> Result<()> {
    loop {
        let before_in = engine.total_in();
        let before_out = engine.total_out();
        engine
            .compress(input, staging, FlushCompress::None)
            .map_err(|e| FilterError::flate_encoding(e.to_string()))?;

        let consumed = (engine.total_in() - before_in) as usize;
        let produced = (engine.total_out() - before_out) as usize;
        sink.write_all(&staging[..produced])?;
        input = &input[consumed..];

        if input.is_empty() && produced < staging.len() {
            return Ok(());
        }
        if consumed == 0 && produced == 0 {
            return Err(FilterError::flate_encoding("compressor made no progress"));
        }
    }
}

/// Flush the compressor until the zlib trailer is written.
fn finish_compress(engine: &mut Compress, staging: &mut [u8], sink: &mut dyn Write) -> Result<()> {
    loop {
        let before_out = engine.total_out();
        let status = engine
            .compress(&[], staging, FlushCompress::Finish)
            .map_err(|e| FilterError::flate_encoding(e.to_string()))?;

        let produced = (engine.total_out() - before_out) as usize;
        sink.write_all(&staging[..produced])?;

        match status {
            Status::StreamEnd => return Ok(()),
            _ if produced == 0 => {
                return Err(FilterError::flate_encoding("compressor made no progress"));
            }
            _ => {}
        }
    }
}

/// Feed `input` to the decompressor. Returns `true` once the zlib stream
/// has ended; any bytes after the end are ignored.
fn decompress_block(
    engine: &mut Decompress,
    staging: &mut [u8],
    mut input: &[u8],
    sink: &mut dyn Write,
) -> Result<bool> {
    loop {
        let before_in = engine.total_in();
        let before_out = engine.total_out();
        let status = engine
            .decompress(input, staging, FlushDecompress::None)
            .map_err(|e| FilterError::flate_decoding(e.to_string()))?;

        let consumed = (engine.total_in() - before_in) as usize;
        let produced = (engine.total_out() - before_out) as usize;
        sink.write_all(&staging[..produced])?;
        input = &input[consumed..];

        if status == Status::StreamEnd {
            if !input.is_empty() {
                log::debug!("FlateDecode: ignoring {} bytes after stream end", input.len());
            }
            return Ok(true);
        }
        if input.is_empty() && produced < staging.len() {
            return Ok(false);
        }
        if consumed == 0 && produced == 0 {
            return Err(FilterError::flate_decoding("decompressor made no progress"));
        }
    }
}

//! `/LZWDecode` as a [`StreamFilter`].

use crate::config::LzwConfig;
use crate::decoder::LzwDecoder;
use oxipdf_core::error::{FilterError, Result};
use oxipdf_core::params::DecodeParms;
use oxipdf_core::predictor::{PredictorBuffer, PredictorParams};
use oxipdf_core::traits::{Direction, StreamFilter, encode_unsupported};
use std::io::Write;

/// Decode-only LZW filter.
///
/// When the stream's `/DecodeParms` names a predictor, decoded bytes are
/// collected and the predictor is reverted in `end_decode`.
#[derive(Debug, Default)]
pub struct LzwFilter {
    session: Option<Session>,
}

#[derive(Debug)]
struct Session {
    decoder: LzwDecoder,
    predictor: Option<PredictorBuffer>,
}

impl LzwFilter {
    /// Filter name used in error reports.
    pub const NAME: &'static str = "LZWDecode";

    /// Create an idle filter.
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&mut self) -> Result<&mut Session> {
        self.session
            .as_mut()
            .ok_or_else(|| FilterError::invalid_state("decode session", "idle filter"))
    }
}

impl StreamFilter for LzwFilter {
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

    fn begin_decode(&mut self, parms: Option<&DecodeParms>) -> Result<()> {
        self.session = None;

        let params = PredictorParams::from_parms(parms);
        let config = LzwConfig::from_params(&params)?;
        let predictor = if params.is_active() {
            Some(PredictorBuffer::new(params)?)
        } else {
            None
        };

        self.session = Some(Session {
            decoder: LzwDecoder::new(config),
            predictor,
        });
        Ok(())
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let session = self.session()?;
        match session.predictor.as_mut() {
            Some(rows) => session.decoder.feed(input, rows),
            None => session.decoder.feed(input, sink),
        }
    }

    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| FilterError::invalid_state("decode session", "idle filter"))?;

        session.decoder.finish()?;
        if let Some(rows) = session.predictor {
            rows.finish(sink)?;
        }
        Ok(())
    }

    fn abort(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream_msb::MsbBitWriter;

    #[test]
    fn test_encode_is_unsupported() {
        let mut filter = LzwFilter::new();
        assert!(!filter.supports(Direction::Encode));
        assert!(filter.begin_encode().unwrap_err().is_unsupported());
        assert!(filter.encode_block(b"x", &mut Vec::new()).unwrap_err().is_unsupported());
        assert!(filter.end_encode(&mut Vec::new()).unwrap_err().is_unsupported());
        assert!(filter.encode(b"abc").unwrap_err().is_unsupported());
    }

    #[test]
    fn test_block_before_begin() {
        let mut filter = LzwFilter::new();
        let err = filter.decode_block(b"\x80", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidState { .. }));
    }

    #[test]
    fn test_png_predictor_applied() {
        // Two rows of two bytes, both tagged Sub.
        let mut w = MsbBitWriter::new();
        for &b in &[1u8, 1, 1, 1, 1, 2] {
            w.write_bits(u16::from(b), 9);
        }
        w.write_bits(257, 9);

        let parms = DecodeParms::new().with("Predictor", 11).with("Columns", 2);
        let out = LzwFilter::new().decode(&w.finish(), Some(&parms)).unwrap();
        assert_eq!(out, [1, 2, 1, 3]);
    }

    #[test]
    fn test_invalid_predictor_rejected_at_begin() {
        let parms = DecodeParms::new().with("Predictor", 7);
        let err = LzwFilter::new().begin_decode(Some(&parms)).unwrap_err();
        assert!(matches!(err, FilterError::InvalidPredictor(7)));
    }
}

//! Filter chains built from a stream's `/Filter` and `/DecodeParms`.
//!
//! Decoding runs stage 0 over the whole input, then stage 1 over the
//! complete output of stage 0, and so on. Stages are never pipelined: a
//! predictor needs the full output of the stage before it.

use crate::error::{ChainError, Result};
use crate::filter::Filter;
use crate::session::FilterSession;
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{Direction, StreamFilter};
use std::io::Write;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One stage of a chain: a filter and its parameter dictionary.
#[derive(Debug)]
pub struct Stage {
    filter: Filter,
    parms: Option<DecodeParms>,
}

impl Stage {
    /// The stage's filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The stage's `/DecodeParms`, if any.
    pub fn parms(&self) -> Option<&DecodeParms> {
        self.parms.as_ref()
    }

    fn run(
        &mut self,
        index: usize,
        direction: Direction,
        input: &[u8],
        sink: &mut dyn Write,
    ) -> Result<()> {
        let wrap = |name: &str, e| ChainError::new(index, name, e);
        let name = self.filter.name().to_owned();
        log::debug!("stage {index}: {name} over {} bytes", input.len());

        let mut session = match direction {
            Direction::Encode => FilterSession::begin_encode(&mut self.filter, sink),
            Direction::Decode => {
                FilterSession::begin_decode(&mut self.filter, self.parms.as_ref(), sink)
            }
        }
        .map_err(|e| wrap(&name, e))?;

        session.feed(input).map_err(|e| wrap(&name, e))?;
        session.end().map_err(|e| wrap(&name, e))
    }
}

/// An ordered list of filters for one stream.
#[derive(Debug, Default)]
pub struct FilterChain {
    stages: Vec<Stage>,
}

impl FilterChain {
    /// Create an empty chain (identity transform).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from `/Filter` names and the parallel `/DecodeParms`
    /// list. Missing parameter entries count as `None`.
    pub fn from_names<S: AsRef<str>>(names: &[S], parms: &[Option<DecodeParms>]) -> Self {
        let mut chain = Self::new();
        for (i, name) in names.iter().enumerate() {
            chain.push(
                Filter::from_name(name.as_ref()),
                parms.get(i).cloned().flatten(),
            );
        }
        chain
    }

    /// Append a stage.
    pub fn push(&mut self, filter: Filter, parms: Option<DecodeParms>) -> &mut Self {
        self.stages.push(Stage { filter, parms });
        self
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, filter: impl Into<Filter>, parms: Option<DecodeParms>) -> Self {
        self.push(filter.into(), parms);
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stages in `/Filter` order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether every stage supports `direction`.
    pub fn supports(&self, direction: Direction) -> bool {
        self.stages.iter().all(|s| s.filter.supports(direction))
    }

    /// Decode `input` through every stage in order.
    pub fn decode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decode_into(input, &mut out)?;
        Ok(out)
    }

    /// Decode `input`, writing the last stage's output to `sink`.
    pub fn decode_into(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        let order: Vec<usize> = (0..self.stages.len()).collect();
        self.run(&order, Direction::Decode, input, sink)
    }

    /// Encode `input` so that decoding with this chain reproduces it.
    ///
    /// Stages run last to first.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let order: Vec<usize> = (0..self.stages.len()).rev().collect();
        let mut out = Vec::new();
        self.run(&order, Direction::Encode, input, &mut out)?;
        Ok(out)
    }

    fn run(
        &mut self,
        order: &[usize],
        direction: Direction,
        input: &[u8],
        sink: &mut dyn Write,
    ) -> Result<()> {
        let Some((&last, rest)) = order.split_last() else {
            sink.write_all(input).map_err(|e| ChainError::new(0, "identity", e.into()))?;
            return Ok(());
        };

        let mut data = input.to_vec();
        for &index in rest {
            let mut out = Vec::new();
            self.stages[index].run(index, direction, &data, &mut out)?;
            data = out;
        }
        self.stages[last].run(last, direction, &data, sink)
    }
}

/// A standalone stream to decode: its filter names, parameters and data.
#[derive(Debug, Clone, Default)]
pub struct DecodeJob {
    /// `/Filter` names in order.
    pub filters: Vec<String>,
    /// `/DecodeParms`, parallel to `filters`.
    pub parms: Vec<Option<DecodeParms>>,
    /// Encoded stream data.
    pub data: Vec<u8>,
}

impl DecodeJob {
    /// Decode the job with a fresh chain.
    pub fn decode(&self) -> Result<Vec<u8>> {
        FilterChain::from_names(&self.filters, &self.parms).decode(&self.data)
    }
}

/// Decode independent streams in parallel using rayon.
///
/// Each job gets its own chain, so no filter state is shared between
/// threads. Results are returned in job order.
#[cfg(feature = "parallel")]
pub fn decode_streams_parallel(jobs: &[DecodeJob]) -> Vec<Result<Vec<u8>>> {
    jobs.par_iter().map(DecodeJob::decode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxipdf_core::kind::FilterKind;

    #[test]
    fn test_empty_chain_is_identity() {
        let mut chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.decode(b"raw").unwrap(), b"raw");
        assert_eq!(chain.encode(b"raw").unwrap(), b"raw");
    }

    #[test]
    fn test_two_stage_decode() {
        // Hex of the ASCII85 encoding of "Man ".
        let hex: Vec<u8> = b"9jqo^~>"
            .iter()
            .flat_map(|b| format!("{b:02X}").into_bytes())
            .collect();

        let mut chain = FilterChain::from_names(&["AHx", "A85"], &[]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.decode(&hex).unwrap(), b"Man ");
    }

    #[test]
    fn test_encode_runs_in_reverse() {
        let mut chain = FilterChain::new()
            .with(FilterKind::AsciiHexDecode, None)
            .with(FilterKind::Ascii85Decode, None);
        let encoded = chain.encode(b"Man ").unwrap();
        assert_eq!(encoded, b"396A716F5E7E3E");
        assert_eq!(chain.decode(&encoded).unwrap(), b"Man ");
    }

    #[test]
    fn test_failing_stage_reported() {
        let mut chain = FilterChain::from_names(&["ASCIIHexDecode", "JPXDecode"], &[]);
        assert!(!chain.supports(Direction::Decode));

        let err = chain.decode(b"00").unwrap_err();
        assert_eq!(err.stage, 1);
        assert_eq!(err.filter, "JPXDecode");
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_corrupt_data_is_not_unsupported() {
        let mut chain = FilterChain::from_names(&["ASCII85Decode"], &[]);
        let err = chain.decode(b"abc{").unwrap_err();
        assert_eq!(err.stage, 0);
        assert!(!err.is_unsupported());
    }
}

//! Lifecycle guard for a single filter session.
//!
//! ```text
//!   begin_* ──► Open ──feed──► Open ──end──► (consumed)
//!                 │
//!                 └──error──► Failed ──feed/end──► InvalidState
//! ```
//!
//! A session borrows its filter and sink for its whole lifetime. Dropping an
//! open session aborts the filter, so codec state never outlives the bracket.

use oxipdf_core::error::{FilterError, Result};
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{Direction, StreamFilter};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Failed,
    Closed,
}

/// An open begin/feed/end bracket over one filter.
pub struct FilterSession<'a, F: StreamFilter + ?Sized> {
    filter: &'a mut F,
    sink: &'a mut dyn Write,
    direction: Direction,
    phase: Phase,
    fed: u64,
}

impl<'a, F: StreamFilter + ?Sized> FilterSession<'a, F> {
    /// Begin an encode session writing to `sink`.
    pub fn begin_encode(filter: &'a mut F, sink: &'a mut dyn Write) -> Result<Self> {
        if let Err(e) = filter.begin_encode() {
            filter.abort();
            return Err(e);
        }
        Ok(Self::open(filter, sink, Direction::Encode))
    }

    /// Begin a decode session writing to `sink`.
    pub fn begin_decode(
        filter: &'a mut F,
        parms: Option<&DecodeParms>,
        sink: &'a mut dyn Write,
    ) -> Result<Self> {
        if let Err(e) = filter.begin_decode(parms) {
            filter.abort();
            return Err(e);
        }
        Ok(Self::open(filter, sink, Direction::Decode))
    }

    fn open(filter: &'a mut F, sink: &'a mut dyn Write, direction: Direction) -> Self {
        log::debug!("{} {direction} session started", filter.name());
        Self {
            filter,
            sink,
            direction,
            phase: Phase::Open,
            fed: 0,
        }
    }

    /// The session direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Total input bytes fed so far.
    pub fn bytes_fed(&self) -> u64 {
        self.fed
    }

    /// Feed one block of input.
    pub fn feed(&mut self, input: &[u8]) -> Result<()> {
        self.ensure_open()?;
        let result = match self.direction {
            Direction::Encode => self.filter.encode_block(input, self.sink),
            Direction::Decode => self.filter.decode_block(input, self.sink),
        };
        self.fed += input.len() as u64;
        self.settle(result)
    }

    /// Flush pending output and close the session.
    pub fn end(mut self) -> Result<()> {
        self.ensure_open()?;
        let result = match self.direction {
            Direction::Encode => self.filter.end_encode(self.sink),
            Direction::Decode => self.filter.end_decode(self.sink),
        };
        let result = self.settle(result);
        if result.is_ok() {
            log::debug!(
                "{} {} session finished after {} input bytes",
                self.filter.name(),
                self.direction,
                self.fed
            );
            self.phase = Phase::Closed;
        }
        result
    }

    fn ensure_open(&self) -> Result<()> {
        match self.phase {
            Phase::Open => Ok(()),
            Phase::Failed => Err(FilterError::invalid_state("open session", "failed session")),
            Phase::Closed => Err(FilterError::invalid_state("open session", "closed session")),
        }
    }

    fn settle(&mut self, result: Result<()>) -> Result<()> {
        if result.is_err() {
            self.phase = Phase::Failed;
            self.filter.abort();
        }
        result
    }
}

impl<F: StreamFilter + ?Sized> Drop for FilterSession<'_, F> {
    fn drop(&mut self) {
        if self.phase == Phase::Open {
            log::debug!("{} session dropped before end", self.filter.name());
            self.filter.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::hex::HexFilter;
    use crate::run_length::RunLengthFilter;
    use std::io;

    /// A sink whose reader has gone away.
    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_feed_and_end() {
        let mut filter = HexFilter::new();
        let mut out = Vec::new();
        {
            let mut session = FilterSession::begin_decode(&mut filter, None, &mut out).unwrap();
            session.feed(b"48 6").unwrap();
            session.feed(b"9").unwrap();
            assert_eq!(session.bytes_fed(), 5);
            session.end().unwrap();
        }
        assert_eq!(out, b"Hi");
    }

    #[test]
    fn test_failed_session_refuses_more_input() {
        let mut filter = HexFilter::new();
        let mut out = Vec::new();
        let mut session = FilterSession::begin_decode(&mut filter, None, &mut out).unwrap();

        assert!(matches!(
            session.feed(b"4Q"),
            Err(FilterError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            session.feed(b"41"),
            Err(FilterError::InvalidState {
                found: "failed session",
                ..
            })
        ));
        assert!(session.end().is_err());
    }

    #[test]
    fn test_sink_failure_fails_session() {
        let mut filter = HexFilter::new();
        let mut sink = ClosedSink;
        let mut session = FilterSession::begin_decode(&mut filter, None, &mut sink).unwrap();

        match session.feed(b"4869") {
            Err(FilterError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected an I/O error, got {other:?}"),
        }
        assert!(matches!(
            session.end(),
            Err(FilterError::InvalidState {
                found: "failed session",
                ..
            })
        ));

        // The filter was torn down and can serve a new session.
        assert_eq!(filter.decode(b"4869>", None).unwrap(), b"Hi");
    }

    #[test]
    fn test_sink_failure_in_lzw_session() {
        // 'H', 'i', EOD as 9-bit codes.
        let encoded = [0x24, 0x1A, 0x60, 0x20];
        let mut filter = Filter::from_name("LZWDecode");
        let mut sink = ClosedSink;
        let mut session = FilterSession::begin_decode(&mut filter, None, &mut sink).unwrap();

        assert!(matches!(session.feed(&encoded), Err(FilterError::Io(_))));
        assert!(session.feed(&encoded).is_err());
        drop(session);

        assert_eq!(filter.decode(&encoded, None).unwrap(), b"Hi");
    }

    #[test]
    fn test_begin_unsupported_direction() {
        let mut filter = RunLengthFilter::new();
        let mut out = Vec::new();
        let err = FilterSession::begin_encode(&mut filter, &mut out).err().unwrap();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_dropped_session_aborts() {
        let mut filter = Filter::from_name("AHx");
        let mut out = Vec::new();
        {
            let mut session = FilterSession::begin_decode(&mut filter, None, &mut out).unwrap();
            session.feed(b"4").unwrap();
        }
        // The pending nibble was discarded with the session.
        let mut out2 = Vec::new();
        let mut session = FilterSession::begin_decode(&mut filter, None, &mut out2).unwrap();
        session.feed(b"41").unwrap();
        session.end().unwrap();
        assert_eq!(out2, b"A");
        assert!(out.is_empty());
    }
}

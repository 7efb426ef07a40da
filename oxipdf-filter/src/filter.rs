//! The tagged filter type dispatched by chains.

use crate::ascii85::Ascii85Filter;
use crate::hex::HexFilter;
use crate::run_length::RunLengthFilter;
use oxipdf_core::error::{FilterError, Result};
use oxipdf_core::kind::FilterKind;
use oxipdf_core::params::DecodeParms;
use oxipdf_core::traits::{Direction, StreamFilter};
use oxipdf_flate::FlateFilter;
use oxipdf_lzw::LzwFilter;
use std::io::Write;

/// Stand-in for a filter this library cannot run.
///
/// Every operation fails with [`FilterError::UnsupportedOperation`], which
/// callers can tell apart from corrupt data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFilter {
    name: String,
    kind: Option<FilterKind>,
}

impl UnsupportedFilter {
    /// A standard filter without a codec (image codecs, `/Crypt`).
    pub fn known(kind: FilterKind) -> Self {
        Self {
            name: kind.name().to_owned(),
            kind: Some(kind),
        }
    }

    /// A name that is not in the standard filter table.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// The standard filter, if the name was recognised.
    pub fn kind(&self) -> Option<FilterKind> {
        self.kind
    }

    fn fail(&self, direction: Direction) -> FilterError {
        FilterError::unsupported(self.name.as_str(), direction)
    }
}

impl StreamFilter for UnsupportedFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, _direction: Direction) -> bool {
        false
    }

    fn begin_encode(&mut self) -> Result<()> {
        Err(self.fail(Direction::Encode))
    }

    fn encode_block(&mut self, _input: &[u8], _sink: &mut dyn Write) -> Result<()> {
        Err(self.fail(Direction::Encode))
    }

    fn end_encode(&mut self, _sink: &mut dyn Write) -> Result<()> {
        Err(self.fail(Direction::Encode))
    }

    fn begin_decode(&mut self, _parms: Option<&DecodeParms>) -> Result<()> {
        Err(self.fail(Direction::Decode))
    }

    fn decode_block(&mut self, _input: &[u8], _sink: &mut dyn Write) -> Result<()> {
        Err(self.fail(Direction::Decode))
    }

    fn end_decode(&mut self, _sink: &mut dyn Write) -> Result<()> {
        Err(self.fail(Direction::Decode))
    }
}

/// One PDF stream filter.
#[derive(Debug)]
pub enum Filter {
    /// `/ASCIIHexDecode`
    AsciiHex(HexFilter),
    /// `/ASCII85Decode`
    Ascii85(Ascii85Filter),
    /// `/LZWDecode`
    Lzw(LzwFilter),
    /// `/FlateDecode`
    Flate(FlateFilter),
    /// `/RunLengthDecode`
    RunLength(RunLengthFilter),
    /// Any filter without a codec here.
    Unsupported(UnsupportedFilter),
}

macro_rules! dispatch {
    ($self:expr, $f:ident => $body:expr) => {
        match $self {
            Filter::AsciiHex($f) => $body,
            Filter::Ascii85($f) => $body,
            Filter::Lzw($f) => $body,
            Filter::Flate($f) => $body,
            Filter::RunLength($f) => $body,
            Filter::Unsupported($f) => $body,
        }
    };
}

impl Filter {
    /// Instantiate the codec for `kind`.
    pub fn new(kind: FilterKind) -> Self {
        match kind {
            FilterKind::AsciiHexDecode => Filter::AsciiHex(HexFilter::new()),
            FilterKind::Ascii85Decode => Filter::Ascii85(Ascii85Filter::new()),
            FilterKind::LzwDecode => Filter::Lzw(LzwFilter::new()),
            FilterKind::FlateDecode => Filter::Flate(FlateFilter::new()),
            FilterKind::RunLengthDecode => Filter::RunLength(RunLengthFilter::new()),
            FilterKind::CcittFaxDecode
            | FilterKind::Jbig2Decode
            | FilterKind::DctDecode
            | FilterKind::JpxDecode
            | FilterKind::Crypt => Filter::Unsupported(UnsupportedFilter::known(kind)),
        }
    }

    /// Instantiate a filter from a `/Filter` name, full or abbreviated.
    ///
    /// Unknown names give [`Filter::Unsupported`] rather than an error so a
    /// chain can still be built and report which stage is missing.
    pub fn from_name(name: &str) -> Self {
        match FilterKind::from_name(name) {
            Some(kind) => Self::new(kind),
            None => {
                log::warn!("unknown filter {name}");
                Filter::Unsupported(UnsupportedFilter::unknown(
                    name.strip_prefix('/').unwrap_or(name),
                ))
            }
        }
    }

    /// The standard filter this is, if any.
    pub fn kind(&self) -> Option<FilterKind> {
        match self {
            Filter::AsciiHex(_) => Some(FilterKind::AsciiHexDecode),
            Filter::Ascii85(_) => Some(FilterKind::Ascii85Decode),
            Filter::Lzw(_) => Some(FilterKind::LzwDecode),
            Filter::Flate(_) => Some(FilterKind::FlateDecode),
            Filter::RunLength(_) => Some(FilterKind::RunLengthDecode),
            Filter::Unsupported(f) => f.kind(),
        }
    }

    /// Whether this is the unsupported stand-in.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Filter::Unsupported(_))
    }
}

impl From<FilterKind> for Filter {
    fn from(kind: FilterKind) -> Self {
        Self::new(kind)
    }
}

impl StreamFilter for Filter {
    fn name(&self) -> &str {
        dispatch!(self, f => f.name())
    }

    fn supports(&self, direction: Direction) -> bool {
        dispatch!(self, f => f.supports(direction))
    }

    fn begin_encode(&mut self) -> Result<()> {
        dispatch!(self, f => f.begin_encode())
    }

    fn encode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        dispatch!(self, f => f.encode_block(input, sink))
    }

    fn end_encode(&mut self, sink: &mut dyn Write) -> Result<()> {
        dispatch!(self, f => f.end_encode(sink))
    }

    fn begin_decode(&mut self, parms: Option<&DecodeParms>) -> Result<()> {
        dispatch!(self, f => f.begin_decode(parms))
    }

    fn decode_block(&mut self, input: &[u8], sink: &mut dyn Write) -> Result<()> {
        dispatch!(self, f => f.decode_block(input, sink))
    }

    fn end_decode(&mut self, sink: &mut dyn Write) -> Result<()> {
        dispatch!(self, f => f.end_decode(sink))
    }

    fn abort(&mut self) {
        dispatch!(self, f => f.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert!(matches!(Filter::from_name("/FlateDecode"), Filter::Flate(_)));
        assert!(matches!(Filter::from_name("AHx"), Filter::AsciiHex(_)));
        assert!(matches!(Filter::from_name("RL"), Filter::RunLength(_)));

        let filter = Filter::from_name("/BrotliDecode");
        assert!(filter.is_unsupported());
        assert_eq!(filter.name(), "BrotliDecode");
        assert_eq!(filter.kind(), None);
    }

    #[test]
    fn test_image_codecs_unsupported() {
        let mut filter = Filter::new(FilterKind::DctDecode);
        assert_eq!(filter.kind(), Some(FilterKind::DctDecode));
        assert!(!filter.supports(Direction::Decode));

        let err = filter.decode(b"\xFF\xD8", None).unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "DCTDecode does not support decoding");
    }

    #[test]
    fn test_dispatch_matches_kind_capabilities() {
        for kind in FilterKind::ALL {
            let filter = Filter::new(kind);
            assert_eq!(filter.name(), kind.name());
            assert_eq!(filter.kind(), Some(kind));
            for direction in [Direction::Encode, Direction::Decode] {
                assert_eq!(
                    filter.supports(direction),
                    kind.supports(direction),
                    "{kind} {direction}"
                );
            }
        }
    }

    #[test]
    fn test_dispatch_decode() {
        let mut filter = Filter::from(FilterKind::AsciiHexDecode);
        assert_eq!(filter.decode(b"4869>", None).unwrap(), b"Hi");
    }
}

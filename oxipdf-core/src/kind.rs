//! Standard PDF filter names.

use crate::error::FilterError;
use crate::traits::Direction;
use std::fmt;
use std::str::FromStr;

/// A standard filter from the PDF `/Filter` name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// `/ASCIIHexDecode`
    AsciiHexDecode,
    /// `/ASCII85Decode`
    Ascii85Decode,
    /// `/LZWDecode`
    LzwDecode,
    /// `/FlateDecode`
    FlateDecode,
    /// `/RunLengthDecode`
    RunLengthDecode,
    /// `/CCITTFaxDecode`
    CcittFaxDecode,
    /// `/JBIG2Decode`
    Jbig2Decode,
    /// `/DCTDecode`
    DctDecode,
    /// `/JPXDecode`
    JpxDecode,
    /// `/Crypt`
    Crypt,
}

impl FilterKind {
    /// All standard filters, in PDF reference order.
    pub const ALL: [FilterKind; 10] = [
        FilterKind::AsciiHexDecode,
        FilterKind::Ascii85Decode,
        FilterKind::LzwDecode,
        FilterKind::FlateDecode,
        FilterKind::RunLengthDecode,
        FilterKind::CcittFaxDecode,
        FilterKind::Jbig2Decode,
        FilterKind::DctDecode,
        FilterKind::JpxDecode,
        FilterKind::Crypt,
    ];

    /// Full filter name without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::AsciiHexDecode => "ASCIIHexDecode",
            FilterKind::Ascii85Decode => "ASCII85Decode",
            FilterKind::LzwDecode => "LZWDecode",
            FilterKind::FlateDecode => "FlateDecode",
            FilterKind::RunLengthDecode => "RunLengthDecode",
            FilterKind::CcittFaxDecode => "CCITTFaxDecode",
            FilterKind::Jbig2Decode => "JBIG2Decode",
            FilterKind::DctDecode => "DCTDecode",
            FilterKind::JpxDecode => "JPXDecode",
            FilterKind::Crypt => "Crypt",
        }
    }

    /// Abbreviated name allowed in inline image dictionaries.
    pub fn abbreviation(&self) -> Option<&'static str> {
        match self {
            FilterKind::AsciiHexDecode => Some("AHx"),
            FilterKind::Ascii85Decode => Some("A85"),
            FilterKind::LzwDecode => Some("LZW"),
            FilterKind::FlateDecode => Some("Fl"),
            FilterKind::RunLengthDecode => Some("RL"),
            FilterKind::CcittFaxDecode => Some("CCF"),
            FilterKind::DctDecode => Some("DCT"),
            FilterKind::Jbig2Decode | FilterKind::JpxDecode | FilterKind::Crypt => None,
        }
    }

    /// Look up a filter by full or abbreviated name. A leading `/` is ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('/').unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.abbreviation() == Some(name))
    }

    /// Whether this library ships a codec for the filter.
    ///
    /// Image codecs and the crypt filter are reported as unsupported.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            FilterKind::AsciiHexDecode
                | FilterKind::Ascii85Decode
                | FilterKind::LzwDecode
                | FilterKind::FlateDecode
                | FilterKind::RunLengthDecode
        )
    }

    /// Whether the codec can run in `direction`.
    pub fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Decode => self.is_implemented(),
            Direction::Encode => matches!(
                self,
                FilterKind::AsciiHexDecode | FilterKind::Ascii85Decode | FilterKind::FlateDecode
            ),
        }
    }

    /// Whether the filter honours predictor entries in `/DecodeParms`.
    pub fn accepts_predictor(&self) -> bool {
        matches!(self, FilterKind::LzwDecode | FilterKind::FlateDecode)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FilterError::unsupported(s, Direction::Decode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::from_name(kind.name()), Some(kind));
            assert_eq!(FilterKind::from_name(&format!("/{}", kind.name())), Some(kind));
        }
        assert_eq!(FilterKind::from_name("Fl"), Some(FilterKind::FlateDecode));
        assert_eq!(FilterKind::from_name("/AHx"), Some(FilterKind::AsciiHexDecode));
        assert_eq!(FilterKind::from_name("flatedecode"), None);
        assert_eq!(FilterKind::from_name("BrotliDecode"), None);
    }

    #[test]
    fn test_from_str_unknown_is_unsupported() {
        let err = "BrotliDecode".parse::<FilterKind>().unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_capabilities() {
        assert!(FilterKind::FlateDecode.supports(Direction::Encode));
        assert!(FilterKind::LzwDecode.supports(Direction::Decode));
        assert!(!FilterKind::LzwDecode.supports(Direction::Encode));
        assert!(!FilterKind::RunLengthDecode.supports(Direction::Encode));
        assert!(!FilterKind::DctDecode.supports(Direction::Decode));
        assert!(!FilterKind::Crypt.is_implemented());
        assert!(FilterKind::LzwDecode.accepts_predictor());
        assert!(!FilterKind::Ascii85Decode.accepts_predictor());
    }
}

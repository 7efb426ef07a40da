//! MSB-first code reader for PDF LZW.
//!
//! PDF LZW packs codes most significant bit first. The reader keeps a small
//! shift register that survives between blocks, so a code may straddle any
//! number of `feed` calls.

/// Masks for 9, 10, 11 and 12 bit codes.
pub const CODE_MASKS: [u32; 4] = [0x1FF, 0x3FF, 0x7FF, 0xFFF];

/// Streaming MSB-first code reader.
#[derive(Debug, Default)]
pub struct CodeReader {
    /// Bit buffer; only the low `bits_in_buffer` bits are valid.
    buffer: u32,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits consumed as codes (for error reporting).
    total_bits_read: u64,
}

impl CodeReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load bytes from `input` until the register holds more than 16 bits.
    ///
    /// Returns the number of bytes consumed.
    #[inline]
    pub fn fill(&mut self, input: &[u8]) -> usize {
        let mut consumed = 0;
        while self.bits_in_buffer <= 16 && consumed < input.len() {
            self.buffer = (self.buffer << 8) | u32::from(input[consumed]);
            self.bits_in_buffer += 8;
            consumed += 1;
        }
        consumed
    }

    /// Take one code of `width` bits (9 to 12), or `None` if the register
    /// does not hold enough bits yet.
    #[inline]
    pub fn read_code(&mut self, width: u8) -> Option<u16> {
        debug_assert!((9..=12).contains(&width));
        if self.bits_in_buffer < width {
            return None;
        }

        let shift = self.bits_in_buffer - width;
        let code = (self.buffer >> shift) & CODE_MASKS[usize::from(width - 9)];

        self.bits_in_buffer = shift;
        self.buffer &= (1u32 << shift) - 1;
        self.total_bits_read += u64::from(width);

        Some(code as u16)
    }

    /// Bits left over in the register.
    pub fn pending_bits(&self) -> u8 {
        self.bits_in_buffer
    }

    /// Get total bits read as codes.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }
}

/// MSB-first bit writer used to hand-pack code sequences in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MsbBitWriter {
    output: Vec<u8>,
    buffer: u32,
    bits_in_buffer: u8,
}

#[cfg(test)]
impl MsbBitWriter {
    /// Create a new MSB bit writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write up to 16 bits to the stream (MSB-first).
    pub fn write_bits(&mut self, value: u16, count: u8) {
        self.buffer = (self.buffer << count) | (u32::from(value) & ((1u32 << count) - 1));
        self.bits_in_buffer += count;

        while self.bits_in_buffer >= 8 {
            self.output.push((self.buffer >> (self.bits_in_buffer - 8)) as u8);
            self.bits_in_buffer -= 8;
        }
        self.buffer &= (1u32 << self.bits_in_buffer) - 1;
    }

    /// Pad the final byte with zero bits and return the stream.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_in_buffer > 0 {
            self.output.push((self.buffer << (8 - self.bits_in_buffer)) as u8);
        }
        self.output
    }
}

//! LZW code table management.

use crate::config::LzwConfig;

/// LZW code table for decoding.
///
/// Codes 0-255 map to single bytes, 256 and 257 are the clear and
/// end-of-data markers, and new strings are assigned from 258 upwards
/// until the table holds 4096 entries.
#[derive(Debug)]
pub struct LzwTable {
    /// Code table: code -> byte sequence.
    table: Vec<Vec<u8>>,
    /// Configuration.
    config: LzwConfig,
    /// Current code bit width.
    current_bits: u8,
}

impl LzwTable {
    /// Create a new table with the given configuration.
    pub fn new(config: LzwConfig) -> Self {
        let mut table = Self {
            table: Vec::with_capacity(config.max_table_size()),
            config,
            current_bits: config.min_bits,
        };
        table.reset();
        table
    }

    /// Reset the table to its initial state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.current_bits = self.config.min_bits;

        for byte in 0..=u8::MAX {
            self.table.push(vec![byte]);
        }

        self.table.push(Vec::new()); // clear
        self.table.push(Vec::new()); // eod
    }

    /// Number of assigned codes, including the two markers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false: the table starts with 258 entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether no more codes can be assigned.
    pub fn is_full(&self) -> bool {
        self.table.len() >= self.config.max_table_size()
    }

    /// Get the string for a code.
    pub fn get(&self, code: u16) -> Option<&[u8]> {
        self.table.get(code as usize).map(Vec::as_slice)
    }

    /// Current code width in bits.
    pub fn code_bits(&self) -> u8 {
        self.current_bits
    }

    /// Assign the next code to `string`.
    ///
    /// Once the table is full further strings are dropped until a clear code
    /// resets it. Returns whether the string was added.
    pub fn push(&mut self, string: Vec<u8>) -> bool {
        if self.is_full() {
            return false;
        }

        self.table.push(string);

        if self.current_bits < self.config.max_bits
            && self.table.len() >= self.config.width_threshold(self.current_bits)
        {
            self.current_bits += 1;
            log::trace!(
                "LZW code width grows to {} bits at table size {}",
                self.current_bits,
                self.table.len()
            );
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let table = LzwTable::new(LzwConfig::PDF);
        assert_eq!(table.len(), 258);
        assert_eq!(table.code_bits(), 9);
        assert_eq!(table.get(0), Some(&[0u8][..]));
        assert_eq!(table.get(255), Some(&[255u8][..]));
        assert_eq!(table.get(258), None);
        assert!(!table.is_full());
    }

    #[test]
    fn test_width_growth_early() {
        let mut table = LzwTable::new(LzwConfig::PDF);
        while table.len() < 510 {
            table.push(vec![0, 0]);
        }
        assert_eq!(table.code_bits(), 9);

        table.push(vec![0, 0]);
        assert_eq!(table.len(), 511);
        assert_eq!(table.code_bits(), 10);
    }

    #[test]
    fn test_width_growth_late() {
        let mut table = LzwTable::new(LzwConfig::PDF_LATE_CHANGE);
        while table.len() < 511 {
            table.push(vec![0, 0]);
        }
        assert_eq!(table.code_bits(), 9);

        table.push(vec![0, 0]);
        assert_eq!(table.code_bits(), 10);
    }

    #[test]
    fn test_full_table_and_reset() {
        let mut table = LzwTable::new(LzwConfig::PDF);
        while table.push(vec![1]) {}
        assert!(table.is_full());
        assert_eq!(table.len(), 4096);
        assert_eq!(table.code_bits(), 12);
        assert!(!table.push(vec![2]));

        table.reset();
        assert_eq!(table.len(), 258);
        assert_eq!(table.code_bits(), 9);
    }
}

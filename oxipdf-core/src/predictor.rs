//! PNG and TIFF predictor reversal.
//!
//! Flate and LZW streams may carry data that was run through a row predictor
//! before compression. After decompression the prediction must be undone:
//!
//! - `/Predictor 1`: no prediction
//! - `/Predictor 2`: TIFF predictor 2 (horizontal differencing per component)
//! - `/Predictor 10..=15`: PNG filters, chosen per row by a leading tag byte
//!   (0 None, 1 Sub, 2 Up, 3 Average, 4 Paeth)
//!
//! All arithmetic is unsigned and modulo 256 (modulo 2^16 for 16-bit TIFF
//! samples).

use crate::error::{FilterError, Result, try_reserve};
use crate::params::{DecodeParms, keys};
use std::io::{self, Write};

/// Predictor parameters from a `/DecodeParms` dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    /// `/Predictor` (default 1).
    pub predictor: i64,
    /// `/Colors`: interleaved colour components per sample (default 1).
    pub colors: i64,
    /// `/BitsPerComponent` (default 8).
    pub bits_per_component: i64,
    /// `/Columns`: samples per row (default 1).
    pub columns: i64,
    /// `/EarlyChange`: LZW code width switch timing (default 1).
    pub early_change: i64,
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
            early_change: 1,
        }
    }
}

impl PredictorParams {
    /// Read the parameters, taking defaults for absent keys.
    pub fn from_parms(parms: Option<&DecodeParms>) -> Self {
        let defaults = Self::default();
        match parms {
            None => defaults,
            Some(parms) => Self {
                predictor: parms.get_or(keys::PREDICTOR, defaults.predictor),
                colors: parms.get_or(keys::COLORS, defaults.colors),
                bits_per_component: parms
                    .get_or(keys::BITS_PER_COMPONENT, defaults.bits_per_component),
                columns: parms.get_or(keys::COLUMNS, defaults.columns),
                early_change: parms.get_or(keys::EARLY_CHANGE, defaults.early_change),
            },
        }
    }

    /// Whether decoded output has to go through [`revert_predictor`].
    pub fn is_active(&self) -> bool {
        self.predictor > 1
    }

    /// Bytes in one unpredicted row.
    pub fn row_bytes(&self) -> Result<usize> {
        self.layout().map(|layout| layout.row_bytes)
    }

    fn layout(&self) -> Result<RowLayout> {
        if !(1..=32).contains(&self.colors) {
            return Err(FilterError::invalid_parameter(keys::COLORS, self.colors));
        }
        if !matches!(self.bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(FilterError::invalid_parameter(
                keys::BITS_PER_COMPONENT,
                self.bits_per_component,
            ));
        }
        if self.columns < 1 {
            return Err(FilterError::invalid_parameter(keys::COLUMNS, self.columns));
        }

        let colors = self.colors as usize;
        let bits = self.bits_per_component as usize;
        let bits_per_pixel = colors * bits;
        let row_bytes = usize::try_from(self.columns)
            .ok()
            .and_then(|columns| columns.checked_mul(bits_per_pixel))
            .map(|row_bits| row_bits.div_ceil(8))
            .ok_or_else(|| FilterError::invalid_parameter(keys::COLUMNS, self.columns))?;

        Ok(RowLayout {
            colors,
            bits,
            columns: self.columns as usize,
            row_bytes,
            bytes_per_pixel: bits_per_pixel.div_ceil(8).max(1),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct RowLayout {
    colors: usize,
    bits: usize,
    columns: usize,
    row_bytes: usize,
    bytes_per_pixel: usize,
}

/// Undo row prediction on a fully decompressed buffer.
///
/// A trailing partial row is reconstructed from the bytes that are present.
pub fn revert_predictor(params: &PredictorParams, data: &[u8]) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(data.to_vec()),
        2 => revert_tiff(&params.layout()?, data),
        10..=15 => revert_png(&params.layout()?, data),
        other => Err(FilterError::InvalidPredictor(other)),
    }
}

fn revert_png(layout: &RowLayout, data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let row_bytes = layout.row_bytes;
    // No row can be wider than the input that carries it.
    let scratch = row_bytes.min(data.len());

    let mut output = Vec::new();
    try_reserve(&mut output, data.len())?;

    let mut prev = Vec::new();
    try_reserve(&mut prev, scratch)?;
    prev.resize(scratch, 0);
    let mut current = prev.clone();

    for chunk in data.chunks(row_bytes + 1) {
        let Some((&tag, row)) = chunk.split_first() else {
            continue;
        };
        let width = row.len();
        if width < row_bytes {
            log::debug!("PNG predictor: partial last row ({width} of {row_bytes} bytes)");
        }

        let current = &mut current[..width];
        current.copy_from_slice(row);
        unfilter_png_row(tag, current, &prev[..width], layout.bytes_per_pixel)?;

        output.extend_from_slice(current);
        prev[..width].copy_from_slice(current);
    }

    Ok(output)
}

fn unfilter_png_row(tag: u8, row: &mut [u8], prev: &[u8], bpp: usize) -> Result<()> {
    match tag {
        // None
        0 => {}
        // Sub
        1 => {
            for i in bpp..row.len() {
                row[i] = row[i].wrapping_add(row[i - bpp]);
            }
        }
        // Up
        2 => {
            for (byte, &up) in row.iter_mut().zip(prev) {
                *byte = byte.wrapping_add(up);
            }
        }
        // Average
        3 => {
            for i in 0..row.len() {
                let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let avg = ((left + prev[i] as u16) / 2) as u8;
                row[i] = row[i].wrapping_add(avg);
            }
        }
        // Paeth
        4 => {
            for i in 0..row.len() {
                let (left, upper_left) = if i >= bpp {
                    (row[i - bpp], prev[i - bpp])
                } else {
                    (0, 0)
                };
                row[i] = row[i].wrapping_add(paeth(left, prev[i], upper_left));
            }
        }
        other => return Err(FilterError::InvalidPredictor(10 + other as i64)),
    }
    Ok(())
}

/// PNG Paeth predictor.
fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn revert_tiff(layout: &RowLayout, data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    try_reserve(&mut output, data.len())?;
    output.extend_from_slice(data);

    let colors = layout.colors;
    for row in output.chunks_mut(layout.row_bytes) {
        match layout.bits {
            8 => {
                for i in colors..row.len() {
                    row[i] = row[i].wrapping_add(row[i - colors]);
                }
            }
            16 => {
                let samples = row.len() / 2;
                for s in colors..samples {
                    let l = 2 * (s - colors);
                    let left = u16::from_be_bytes([row[l], row[l + 1]]);
                    let cur = u16::from_be_bytes([row[2 * s], row[2 * s + 1]]);
                    let sum = cur.wrapping_add(left).to_be_bytes();
                    row[2 * s..2 * s + 2].copy_from_slice(&sum);
                }
            }
            bits => {
                let samples = (layout.columns * colors).min(row.len() * 8 / bits);
                let mask = (1u8 << bits) - 1;
                for s in colors..samples {
                    let left = read_sample(row, s - colors, bits);
                    let cur = read_sample(row, s, bits);
                    write_sample(row, s, bits, cur.wrapping_add(left) & mask);
                }
            }
        }
    }

    Ok(output)
}

/// Read a sub-byte sample (MSB first). `bits` divides 8, so samples never
/// straddle a byte.
fn read_sample(row: &[u8], index: usize, bits: usize) -> u8 {
    let offset = index * bits;
    let shift = 8 - bits - offset % 8;
    (row[offset / 8] >> shift) & ((1u8 << bits) - 1)
}

fn write_sample(row: &mut [u8], index: usize, bits: usize, value: u8) {
    let offset = index * bits;
    let shift = 8 - bits - offset % 8;
    let mask = ((1u8 << bits) - 1) << shift;
    let byte = &mut row[offset / 8];
    *byte = (*byte & !mask) | ((value << shift) & mask);
}

/// Collects a decoder's raw output so the predictor can be reverted once the
/// whole stream is known.
#[derive(Debug)]
pub struct PredictorBuffer {
    params: PredictorParams,
    data: Vec<u8>,
}

impl PredictorBuffer {
    /// Create a buffer for `params`, failing early on unusable parameters.
    pub fn new(params: PredictorParams) -> Result<Self> {
        match params.predictor {
            1 | 2 | 10..=15 => {}
            other => return Err(FilterError::InvalidPredictor(other)),
        }
        params.layout()?;

        Ok(Self {
            params,
            data: Vec::new(),
        })
    }

    /// Bytes collected so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Revert the predictor and write the rows to `sink`.
    pub fn finish(self, sink: &mut dyn Write) -> Result<()> {
        let rows = revert_predictor(&self.params, &self.data)?;
        sink.write_all(&rows)?;
        Ok(())
    }
}

impl Write for PredictorBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.try_reserve(buf.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::OutOfMemory,
                FilterError::out_of_memory(buf.len()),
            )
        })?;
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! MATLAB Level 4 reader and writer.
//!
//! Challenge signals are stored as a single int16 matrix named `val`
//! (channels × samples). A Level 4 variable is a 20 byte preamble of five
//! `i32` (`MOPT`, rows, cols, imagf, namlen), the NUL terminated name, then the
//! real part in column-major order and, if `imagf`, the imaginary part.
use std::path::Path;

use ndarray::{Array2, ShapeBuilder};

use crate::error::{MatErrorKind, PrepError, Result};

const PREAMBLE_LEN: usize = 20;
const LEVEL5_MAGIC: &[u8] = b"MATLAB 5.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

/// Element type, the `P` digit of `MOPT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatPrecision {
    F64,
    F32,
    I32,
    I16,
    U16,
    U8,
}

impl MatPrecision {
    fn from_digit(p: i32) -> Option<Self> {
        match p {
            0 => Some(MatPrecision::F64),
            1 => Some(MatPrecision::F32),
            2 => Some(MatPrecision::I32),
            3 => Some(MatPrecision::I16),
            4 => Some(MatPrecision::U16),
            5 => Some(MatPrecision::U8),
            _ => None,
        }
    }

    fn digit(self) -> i32 {
        match self {
            MatPrecision::F64 => 0,
            MatPrecision::F32 => 1,
            MatPrecision::I32 => 2,
            MatPrecision::I16 => 3,
            MatPrecision::U16 => 4,
            MatPrecision::U8 => 5,
        }
    }

    fn size(self) -> usize {
        match self {
            MatPrecision::F64 => 8,
            MatPrecision::F32 | MatPrecision::I32 => 4,
            MatPrecision::I16 | MatPrecision::U16 => 2,
            MatPrecision::U8 => 1,
        }
    }
}

struct VarHeader {
    endian: Endian,
    precision: MatPrecision,
    rows: usize,
    cols: usize,
    complex: bool,
    name: String,
}

/// Read the matrix called `name` from a Level 4 file.
pub fn read_mat_variable(path: &Path, name: &str) -> Result<Array2<f64>> {
    let bytes = std::fs::read(path).map_err(|e| PrepError::io(path, e))?;
    parse_variable(&bytes, name).map_err(|kind| PrepError::Mat {
        path: path.to_path_buf(),
        kind,
    })
}

fn parse_variable(bytes: &[u8], wanted: &str) -> std::result::Result<Array2<f64>, MatErrorKind> {
    if bytes.starts_with(LEVEL5_MAGIC) {
        return Err(MatErrorKind::Level5);
    }

    let mut pos = 0;
    while pos < bytes.len() {
        let (var, data_start) = parse_var_header(bytes, pos)?;
        let parts = if var.complex { 2 } else { 1 };
        let sizes = var
            .rows
            .checked_mul(var.cols)
            .and_then(|n| n.checked_mul(var.precision.size()))
            .and_then(|len| Some((len, data_start.checked_add(len.checked_mul(parts)?)?)));
        let (data_len, data_end) = match sizes {
            Some((len, end)) if end <= bytes.len() => (len, end),
            _ => return Err(MatErrorKind::Truncated(var.name)),
        };

        if var.name == wanted {
            let values = decode(
                &bytes[data_start..data_start + data_len],
                var.precision,
                var.endian,
            );
            // column-major on disk
            return Array2::from_shape_vec((var.rows, var.cols).f(), values)
                .map(|a| a.as_standard_layout().into_owned())
                .map_err(|_| MatErrorKind::Truncated(var.name));
        }
        pos = data_end;
    }

    Err(MatErrorKind::VariableNotFound(wanted.to_string()))
}

fn parse_var_header(bytes: &[u8], pos: usize) -> std::result::Result<(VarHeader, usize), MatErrorKind> {
    let preamble = bytes
        .get(pos..pos + PREAMBLE_LEN)
        .ok_or_else(|| MatErrorKind::Truncated(String::new()))?;
    let raw: [u8; 4] = [preamble[0], preamble[1], preamble[2], preamble[3]];

    // M digit: 0 little endian, 1 big endian
    let le = i32::from_le_bytes(raw);
    let be = i32::from_be_bytes(raw);
    let (endian, mopt) = if (0..1000).contains(&le) {
        (Endian::Little, le)
    } else if (1000..2000).contains(&be) {
        (Endian::Big, be)
    } else {
        return Err(MatErrorKind::BadTypeFlag(le));
    };

    let o = (mopt / 100) % 10;
    let p = (mopt / 10) % 10;
    let t = mopt % 10;
    if o != 0 {
        return Err(MatErrorKind::BadTypeFlag(mopt));
    }
    if t != 0 {
        return Err(MatErrorKind::NotNumeric(mopt));
    }
    let precision = MatPrecision::from_digit(p).ok_or(MatErrorKind::BadTypeFlag(mopt))?;

    let field = |i: usize| {
        let b = [
            preamble[4 * i],
            preamble[4 * i + 1],
            preamble[4 * i + 2],
            preamble[4 * i + 3],
        ];
        match endian {
            Endian::Little => i32::from_le_bytes(b),
            Endian::Big => i32::from_be_bytes(b),
        }
    };
    let (rows, cols, imagf, namlen) = (field(1), field(2), field(3), field(4));
    if rows < 0 || cols < 0 || namlen < 1 {
        return Err(MatErrorKind::BadTypeFlag(mopt));
    }

    let name_start = pos + PREAMBLE_LEN;
    let name_end = name_start + namlen as usize;
    let name_bytes = bytes
        .get(name_start..name_end)
        .ok_or_else(|| MatErrorKind::Truncated(String::new()))?;
    let name = String::from_utf8_lossy(name_bytes)
        .trim_end_matches('\0')
        .to_string();

    Ok((
        VarHeader {
            endian,
            precision,
            rows: rows as usize,
            cols: cols as usize,
            complex: imagf != 0,
            name,
        },
        name_end,
    ))
}

fn decode(raw: &[u8], precision: MatPrecision, endian: Endian) -> Vec<f64> {
    macro_rules! chunks {
        ($t:ty, $n:expr) => {
            raw.chunks_exact($n)
                .map(|c| {
                    let b: [u8; $n] = c.try_into().unwrap_or([0; $n]);
                    match endian {
                        Endian::Little => <$t>::from_le_bytes(b) as f64,
                        Endian::Big => <$t>::from_be_bytes(b) as f64,
                    }
                })
                .collect()
        };
    }

    match precision {
        MatPrecision::F64 => chunks!(f64, 8),
        MatPrecision::F32 => chunks!(f32, 4),
        MatPrecision::I32 => chunks!(i32, 4),
        MatPrecision::I16 => chunks!(i16, 2),
        MatPrecision::U16 => chunks!(u16, 2),
        MatPrecision::U8 => raw.iter().map(|&b| b as f64).collect(),
    }
}

/// Write `data` as a single little-endian Level 4 variable.
///
/// Values are cast to `precision`; integer casts saturate.
pub fn write_mat_variable(
    path: &Path,
    name: &str,
    data: &Array2<f64>,
    precision: MatPrecision,
) -> Result<()> {
    let (rows, cols) = data.dim();
    let mut out = Vec::with_capacity(PREAMBLE_LEN + name.len() + 1 + rows * cols * precision.size());

    let mopt = precision.digit() * 10;
    for v in [mopt, rows as i32, cols as i32, 0, name.len() as i32 + 1] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(name.as_bytes());
    out.push(0);

    // column-major: all channels of sample 0, then sample 1, ...
    for j in 0..cols {
        for i in 0..rows {
            let v = data[[i, j]];
            match precision {
                MatPrecision::F64 => out.extend_from_slice(&v.to_le_bytes()),
                MatPrecision::F32 => out.extend_from_slice(&(v as f32).to_le_bytes()),
                MatPrecision::I32 => out.extend_from_slice(&(v as i32).to_le_bytes()),
                MatPrecision::I16 => out.extend_from_slice(&(v as i16).to_le_bytes()),
                MatPrecision::U16 => out.extend_from_slice(&(v as u16).to_le_bytes()),
                MatPrecision::U8 => out.push(v as u8),
            }
        }
    }

    std::fs::write(path, out).map_err(|e| PrepError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn level4_bytes(big_endian: bool, mopt: i32, name: &str, rows: i32, cols: i32, data: &[i16]) -> Vec<u8> {
        let mut out = Vec::new();
        let namlen = name.len() as i32 + 1;
        for v in [mopt, rows, cols, 0, namlen] {
            if big_endian {
                out.extend_from_slice(&v.to_be_bytes());
            } else {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        for v in data {
            if big_endian {
                out.extend_from_slice(&v.to_be_bytes());
            } else {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }

    #[test]
    fn test_preamble_is_24_bytes_for_val() {
        // the `16+24` byte offset in Challenge headers
        let bytes = level4_bytes(false, 30, "val", 2, 3, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(bytes.len(), 24 + 6 * 2);
    }

    #[test]
    fn test_reads_column_major_int16() {
        let bytes = level4_bytes(false, 30, "val", 2, 3, &[1, -1, 2, -2, 3, -3]);
        let val = parse_variable(&bytes, "val").unwrap();
        assert_eq!(val, array![[1.0, 2.0, 3.0], [-1.0, -2.0, -3.0]]);
    }

    #[test]
    fn test_reads_big_endian() {
        let bytes = level4_bytes(true, 1030, "val", 1, 2, &[300, -300]);
        let val = parse_variable(&bytes, "val").unwrap();
        assert_eq!(val, array![[300.0, -300.0]]);
    }

    #[test]
    fn test_skips_other_variables() {
        let mut bytes = level4_bytes(false, 30, "fs", 1, 1, &[500]);
        bytes.extend(level4_bytes(false, 30, "val", 1, 2, &[7, 8]));
        assert_eq!(parse_variable(&bytes, "val").unwrap(), array![[7.0, 8.0]]);
    }

    #[test]
    fn test_missing_variable() {
        let bytes = level4_bytes(false, 30, "fs", 1, 1, &[500]);
        assert_eq!(
            parse_variable(&bytes, "val"),
            Err(MatErrorKind::VariableNotFound("val".to_string()))
        );
    }

    #[test]
    fn test_truncated_data() {
        let mut bytes = level4_bytes(false, 30, "val", 2, 2, &[1, 2, 3, 4]);
        bytes.truncate(bytes.len() - 1);
        assert_eq!(
            parse_variable(&bytes, "val"),
            Err(MatErrorKind::Truncated("val".to_string()))
        );
    }

    #[test]
    fn test_huge_declared_dimensions() {
        let mut bytes = Vec::new();
        for v in [0, i32::MAX, i32::MAX, 1, 4] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(b"val\0");
        assert_eq!(
            parse_variable(&bytes, "val"),
            Err(MatErrorKind::Truncated("val".to_string()))
        );
    }

    #[test]
    fn test_rejects_level5() {
        let mut bytes = b"MATLAB 5.0 MAT-file, Platform: GLNXA64".to_vec();
        bytes.resize(128, b' ');
        assert_eq!(parse_variable(&bytes, "val"), Err(MatErrorKind::Level5));
    }

    #[test]
    fn test_rejects_sparse() {
        let bytes = level4_bytes(false, 32, "val", 1, 1, &[1]);
        assert_eq!(parse_variable(&bytes, "val"), Err(MatErrorKind::NotNumeric(32)));
    }

    #[test]
    fn test_written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A0001.mat");
        let data = array![[0.0, 12.0, -40.0, 7.0], [1.0, 2.0, 3.0, 4.0], [-5.0, 0.0, 5.0, 100.0]];

        write_mat_variable(&path, "val", &data, MatPrecision::I16).unwrap();

        assert_eq!(read_mat_variable(&path, "val").unwrap(), data);
    }
}

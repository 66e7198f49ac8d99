//! A minimal reader for the subset of the NPY format this crate's
//! artifacts use: little-endian `<f4`/`<f8` 2-D matrices and `<U*`/`|S*`
//! fixed-width 1-D string arrays, uncompressed, C (row-major) order.
//!
//! No crate in the dependency tree parses NPY directly, so this hand-rolls
//! just enough of the format (magic, version, header dict, raw data) to
//! read what `numpy.save` produces for these two artifact shapes. It does
//! not support Fortran-ordered or object-dtype arrays.

use std::path::Path;

use crate::error::DenseError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

struct Header {
    descr: String,
    shape: Vec<usize>,
    data_start: usize,
}

fn parse_header(buf: &[u8], path: &Path) -> Result<Header, DenseError> {
    let err = |reason: String| DenseError::Npy {
        path: path.display().to_string(),
        reason,
    };

    if buf.len() < 10 || &buf[0..6] != MAGIC {
        return Err(err("missing NPY magic bytes".into()));
    }
    let major = buf[6];
    let (header_len, header_start) = if major == 1 {
        let len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        (len, 10usize)
    } else {
        if buf.len() < 12 {
            return Err(err("truncated NPY v2 header".into()));
        }
        let len = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]) as usize;
        (len, 12usize)
    };
    if buf.len() < header_start + header_len {
        return Err(err("truncated NPY header".into()));
    }
    let header_str = std::str::from_utf8(&buf[header_start..header_start + header_len])
        .map_err(|_| err("header is not valid UTF-8".into()))?;

    let descr = extract_str_field(header_str, "descr")
        .ok_or_else(|| err("header missing 'descr'".into()))?;
    let shape = extract_shape(header_str).ok_or_else(|| err("header missing 'shape'".into()))?;

    Ok(Header {
        descr,
        shape,
        data_start: header_start + header_len,
    })
}

fn extract_str_field(header: &str, key: &str) -> Option<String> {
    let marker = format!("'{key}':");
    let pos = header.find(&marker)? + marker.len();
    let rest = header[pos..].trim_start();
    let rest = rest.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

fn extract_shape(header: &str) -> Option<Vec<usize>> {
    let marker = "'shape':";
    let pos = header.find(marker)? + marker.len();
    let rest = header[pos..].trim_start();
    let rest = rest.strip_prefix('(')?;
    let end = rest.find(')')?;
    let inner = &rest[..end];
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().ok())
        .collect()
}

/// Reads a 2-D `<f4`/`<f8` matrix, returning its flattened row-major data
/// and `(rows, cols)`.
pub fn read_f32_matrix(path: &Path) -> Result<(Vec<f32>, (usize, usize)), DenseError> {
    let buf = std::fs::read(path).map_err(|e| DenseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let header = parse_header(&buf, path)?;
    let (rows, cols) = match header.shape.as_slice() {
        [r, c] => (*r, *c),
        [r] => (*r, 1),
        _ => {
            return Err(DenseError::Npy {
                path: path.display().to_string(),
                reason: format!("expected a 1-D or 2-D shape, got {:?}", header.shape),
            })
        }
    };
    let data = &buf[header.data_start..];
    let n = rows * cols;

    let values = match header.descr.as_str() {
        "<f4" => {
            if data.len() < n * 4 {
                return Err(DenseError::Npy {
                    path: path.display().to_string(),
                    reason: "data shorter than shape implies".into(),
                });
            }
            (0..n)
                .map(|i| f32::from_le_bytes(data[i * 4..i * 4 + 4].try_into().unwrap()))
                .collect()
        }
        "<f8" => {
            if data.len() < n * 8 {
                return Err(DenseError::Npy {
                    path: path.display().to_string(),
                    reason: "data shorter than shape implies".into(),
                });
            }
            (0..n)
                .map(|i| f64::from_le_bytes(data[i * 8..i * 8 + 8].try_into().unwrap()) as f32)
                .collect()
        }
        other => {
            return Err(DenseError::Npy {
                path: path.display().to_string(),
                reason: format!("unsupported matrix dtype `{other}`"),
            })
        }
    };

    Ok((values, (rows, cols)))
}

/// Reads a 1-D fixed-width string array (`<U*` unicode or `|S*` ascii),
/// trimming trailing NUL padding from each element.
pub fn read_string_vector(path: &Path) -> Result<Vec<String>, DenseError> {
    let buf = std::fs::read(path).map_err(|e| DenseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let header = parse_header(&buf, path)?;
    let n = *header.shape.first().unwrap_or(&0);
    let data = &buf[header.data_start..];

    if let Some(width) = header.descr.strip_prefix("<U") {
        let chars_per_item: usize = width
            .parse()
            .map_err(|_| DenseError::Npy {
                path: path.display().to_string(),
                reason: format!("malformed unicode dtype `{}`", header.descr),
            })?;
        let bytes_per_item = chars_per_item * 4;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let start = i * bytes_per_item;
            let chunk = &data[start..start + bytes_per_item];
            let codepoints: Vec<u32> = chunk
                .chunks(4)
                .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
                .take_while(|&cp| cp != 0)
                .collect();
            let s: String = codepoints
                .into_iter()
                .filter_map(char::from_u32)
                .collect();
            out.push(s);
        }
        return Ok(out);
    }

    if let Some(width) = header.descr.strip_prefix("|S") {
        let bytes_per_item: usize = width.parse().map_err(|_| DenseError::Npy {
            path: path.display().to_string(),
            reason: format!("malformed byte-string dtype `{}`", header.descr),
        })?;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let start = i * bytes_per_item;
            let chunk = &data[start..start + bytes_per_item];
            let trimmed = &chunk[..chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len())];
            out.push(String::from_utf8_lossy(trimmed).into_owned());
        }
        return Ok(out);
    }

    Err(DenseError::Npy {
        path: path.display().to_string(),
        reason: format!("unsupported id vector dtype `{}`", header.descr),
    })
}

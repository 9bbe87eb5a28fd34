//! Text encoding for triples exchanged with the host.
//!
//! Forces arrive and positions leave as `"a,b,c"`. Numbers are written with
//! the default `Display` for `f64` (shortest form that parses back exactly).

use crate::types::Vec3;
use crate::{HapticError, Result};

pub const SEPARATOR: char = ',';

/// Parse `"a,b,c"` into a [`Vec3`].
///
/// Empty fields between separators are skipped and surrounding whitespace is
/// ignored. Anything other than exactly three numbers is rejected.
pub fn string_to_array(s: &str) -> Result<Vec3> {
    let mut out = [0.0f64; 3];
    let mut count = 0usize;

    for token in s.split(SEPARATOR).map(str::trim).filter(|t| !t.is_empty()) {
        if count == out.len() {
            return Err(HapticError::InvalidTriple(s.to_string()));
        }
        out[count] = token
            .parse::<f64>()
            .map_err(|_| HapticError::InvalidTriple(s.to_string()))?;
        count += 1;
    }

    if count != out.len() {
        return Err(HapticError::InvalidTriple(s.to_string()));
    }

    Ok(Vec3::from(out))
}

/// Join the components as `"x,y,z"`.
pub fn array_to_string(v: &Vec3) -> String {
    format!("{}{sep}{}{sep}{}", v.x, v.y, v.z, sep = SEPARATOR)
}

/// Extract a NUL-terminated string from a driver-filled byte buffer.
pub fn extract_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).to_string()
}

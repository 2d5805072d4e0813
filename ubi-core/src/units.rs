//! Size suffixes and the integer literal grammar used by the option values

use thiserror::Error;

/// Bytes in a kibibyte
pub const KIB: u64 = 1024;
/// Bytes in a mebibyte
pub const MIB: u64 = 1024 * KIB;
/// Bytes in a gibibyte
pub const GIB: u64 = 1024 * MIB;

/// Suffix that is not one of `KiB`, `MiB` or `GiB`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bad size specifier: \"{0}\" - should be 'KiB', 'MiB' or 'GiB'")]
pub struct UnknownSuffix(pub String);

/// Return the byte multiplier for the suffix following a number.
///
/// Matching is case-sensitive: only `KiB`, `MiB` and `GiB` are recognized,
/// and an empty suffix means plain bytes.
pub fn multiplier(suffix: &str) -> Result<u64, UnknownSuffix> {
    match suffix {
        "" => Ok(1),
        "KiB" => Ok(KIB),
        "MiB" => Ok(MIB),
        "GiB" => Ok(GIB),
        other => Err(UnknownSuffix(other.to_string())),
    }
}

/// Parse the unsigned integer at the start of `s` and return it together
/// with the unparsed remainder.
///
/// The radix is picked the way `strtoul(s, &end, 0)` does: a `0x`/`0X`
/// prefix selects hexadecimal, a leading `0` octal, anything else decimal.
/// Returns `None` if `s` does not start with a digit or the value overflows.
pub fn parse_uint_prefix(s: &str) -> Option<(u64, &str)> {
    let bytes = s.as_bytes();
    if bytes.first().map_or(true, |b| !b.is_ascii_digit()) {
        return None;
    }

    let (radix, start) = if bytes.len() > 2
        && bytes[0] == b'0'
        && (bytes[1] | 0x20) == b'x'
        && bytes[2].is_ascii_hexdigit()
    {
        (16, 2)
    } else if bytes[0] == b'0' {
        (8, 0)
    } else {
        (10, 0)
    };

    let digits = s[start..]
        .bytes()
        .take_while(|b| (*b as char).is_digit(radix))
        .count();
    let end = start + digits;
    let value = u64::from_str_radix(&s[start..end], radix).ok()?;

    Some((value, &s[end..]))
}

/// Parse a whole token as an unsigned integer, rejecting trailing characters.
pub fn parse_uint(s: &str) -> Option<u64> {
    match parse_uint_prefix(s)? {
        (value, "") => Some(value),
        _ => None,
    }
}

//! Human-readable byte sizes
//!
//! Sizes use a decimal scale: `K` is 1000 bytes, `M` is 1000² and `G` is 1000³.

use crate::error::SizeParseError;

const SCALE: u64 = 1000;
const KB: u64 = SCALE;
const MB: u64 = KB * SCALE;
const GB: u64 = MB * SCALE;

/// Longest string `format_size` can produce (`u64::MAX` in gigabytes).
pub const MAX_FORMATTED_LEN: usize = 16;

/// Format a size in bytes to a short human-readable string.
///
/// Fractions are truncated to two digits and omitted entirely when both
/// digits are zero, so `1000` is `1K` while `1500` is `1.50K`.
pub fn format_size(bytes: u64) -> String {
    let (scale, unit) = if bytes >= GB {
        (GB, 'G')
    } else if bytes >= MB {
        (MB, 'M')
    } else if bytes >= KB {
        (KB, 'K')
    } else {
        return format!("{}B", bytes);
    };

    let whole = bytes / scale;
    let hundredths = (bytes % scale) * 100 / scale;
    if hundredths == 0 {
        format!("{}{}", whole, unit)
    } else {
        format!("{}.{:02}{}", whole, hundredths, unit)
    }
}

/// Parse a size string like `50K`, `0x20M`, `1.5G` or `4096` into bytes.
///
/// The number may be decimal (optionally with a fraction) or hexadecimal
/// with a `0x` prefix. An optional `K`, `M` or `G` suffix scales it;
/// without one the number is taken as bytes. The result must be a whole
/// number of bytes.
pub fn parse_size(s: &str) -> Result<u64, SizeParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SizeParseError::Empty);
    }
    if s.starts_with('-') {
        return Err(SizeParseError::Negative);
    }

    let (num_str, multiplier) = match s.chars().last() {
        Some('K' | 'k') => (&s[..s.len() - 1], KB),
        Some('M' | 'm') => (&s[..s.len() - 1], MB),
        Some('G' | 'g') => (&s[..s.len() - 1], GB),
        _ => (s, 1),
    };

    let overflow = || SizeParseError::Overflow(s.to_string());

    if let Some(hex) = num_str
        .strip_prefix("0x")
        .or_else(|| num_str.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SizeParseError::InvalidNumber(s.to_string()));
        }
        let value = u64::from_str_radix(hex, 16).map_err(|_| overflow())?;
        return value.checked_mul(multiplier).ok_or_else(overflow);
    }

    let (int_str, frac_str) = match num_str.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (num_str, ""),
    };
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (int_str.is_empty() && frac_str.is_empty()) || !all_digits(int_str) || !all_digits(frac_str)
    {
        return Err(SizeParseError::InvalidNumber(s.to_string()));
    }

    let whole = if int_str.is_empty() {
        0
    } else {
        int_str.parse::<u64>().map_err(|_| overflow())?
    };
    let whole = whole.checked_mul(multiplier).ok_or_else(overflow)?;

    let frac_str = frac_str.trim_end_matches('0');
    if frac_str.is_empty() {
        return Ok(whole);
    }
    // The largest multiplier has nine zeros; any more significant digits
    // cannot land on a whole byte.
    if frac_str.len() > 9 {
        return Err(SizeParseError::FractionalBytes(s.to_string()));
    }
    let frac: u64 = frac_str
        .parse()
        .map_err(|_| SizeParseError::InvalidNumber(s.to_string()))?;
    let denominator = 10u64.pow(frac_str.len() as u32);
    let scaled = frac * multiplier;
    if scaled % denominator != 0 {
        return Err(SizeParseError::FractionalBytes(s.to_string()));
    }

    whole.checked_add(scaled / denominator).ok_or_else(overflow)
}

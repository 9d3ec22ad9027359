use crate::utils::constants::NON_DETECT_PREFIX;
use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;

/// Decode raw input bytes: BOM-sniffed, then UTF-8, falling back to Windows-1252
pub fn decode_input(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}

/// Numeric result of a sample.
///
/// A leading `<` marks a value below the detection limit; the limit itself is used as the
/// value. Anything that still fails to parse becomes 0.0.
pub fn coerce_result(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim) else {
        return 0.0;
    };

    parse_finite(raw)
        .or_else(|| {
            raw.strip_prefix(NON_DETECT_PREFIX)
                .and_then(|limit| parse_finite(limit.trim()))
        })
        .unwrap_or(0.0)
}

/// Compliance-sample indicator: `true`, `1` or `yes` in any case, everything else is false
pub fn coerce_compliance_flag(raw: Option<&str>) -> bool {
    raw.map(|value| matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

//! Price normalization.
//!
//! Prices travel the staging workbook as text with a decimal comma and no
//! thousands separators. Incoming cells can carry dots, mixed separators,
//! float noise from earlier conversions, or no decimals at all; this module
//! rewrites them all into the canonical `1234,56` shape. Normalization is
//! idempotent: a value already in canonical form is returned unchanged.

/// Normalize a textual price. Returns the canonical text and whether the
/// input was changed.
pub fn normalize_price(raw: &str) -> (String, bool) {
    let s = raw.trim();
    if s.contains(',') && !s.contains('.') {
        // Already comma-based, nothing to do.
        return (s.to_string(), false);
    }
    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        2 => {
            let dec = parts[1];
            if dec.len() > 4 {
                // Float noise such as 23.900000000000002: round to cents.
                match s.parse::<f64>() {
                    Ok(v) => (format_comma(round2(v)), true),
                    Err(_) => (format!("{},{}", parts[0], dec), true),
                }
            } else if dec.len() >= 3 {
                if dec == "000" {
                    // Exactly "000" is a thousands group, not decimals.
                    (format!("{}000,00", parts[0]), true)
                } else {
                    match s.parse::<f64>() {
                        Ok(v) => (format_comma(round2(v)), true),
                        Err(_) => (format!("{},{}", parts[0], &dec[..2]), true),
                    }
                }
            } else {
                // One or two decimal digits: keep them, pad to two.
                let mut dec = dec.to_string();
                while dec.len() < 2 {
                    dec.push('0');
                }
                (format!("{},{}", parts[0], dec), true)
            }
        }
        3 => {
            // Two dots: thousands separator plus decimals, e.g. 1.234.56.
            (format!("{}{},{}", parts[0], parts[1], parts[2]), true)
        }
        _ => {
            // No dot at all: append the cents.
            (format!("{s},00"), true)
        }
    }
}

/// Canonical text for a price that arrived as a spreadsheet number.
pub fn normalize_price_number(v: f64) -> String {
    format_comma(round2(v))
}

/// Parse canonical (or near-canonical) price text into a number.
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().replace(',', ".").parse().ok()
}

pub fn format_comma(v: f64) -> String {
    format!("{v:.2}").replace('.', ",")
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

use crate::models::PriceInput;

/// Turns a display price such as `"25 KWD"` into a number.
///
/// Input that cannot be read as a price becomes zero.
pub fn normalize_price(price: Option<&PriceInput>) -> f64 {
    let value = match price {
        Some(PriceInput::Number(value)) => *value,
        Some(PriceInput::Text(text)) => parse_price_text(text),
        None => 0.0,
    };

    if value.is_finite() { value } else { 0.0 }
}

fn parse_price_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == ',' || *ch == '.')
        .collect();

    // With both separators present the comma groups thousands.
    let cleaned = if cleaned.contains('.') {
        cleaned.replace(',', "")
    } else {
        cleaned.replace(',', ".")
    };

    leading_decimal(&cleaned)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Longest prefix of the form `digits[.digits]`, as `parseFloat` reads it.
fn leading_decimal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut cursor = end + 1;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        frac_digits = cursor - end - 1;
        if frac_digits > 0 {
            end = cursor;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    Some(&text[..end])
}

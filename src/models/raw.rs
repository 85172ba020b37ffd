// Upstream record shapes. Nothing here trusts the type a field claims to have.
use serde_json::{Number, Value};

/// One upstream field, kept in whatever shape it arrived in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Missing,
    Null,
    Number(Number),
    Text(String),
    Bool(bool),
    Other(Value),
}

impl FieldValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None => FieldValue::Missing,
            Some(Value::Null) => FieldValue::Null,
            Some(Value::Number(n)) => FieldValue::Number(n.clone()),
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Bool(b)) => FieldValue::Bool(*b),
            Some(other) => FieldValue::Other(other.clone()),
        }
    }

    /// Numeric reading of the field: numbers as-is, strings parsed from their
    /// leading numeric part. Anything else, or a non-finite result, is `None`.
    pub fn as_number(&self) -> Option<f64> {
        let parsed = match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => parse_leading_number(s),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    /// Textual reading of the field. Numbers keep their integer formatting so
    /// `42` and `"42"` read the same.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Like [`as_text`](Self::as_text) but blank strings read as absent.
    pub fn as_non_empty_text(&self) -> Option<String> {
        self.as_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Parses the longest numeric prefix of `input`, the way browsers read
/// "12.50 USD" as 12.5.
pub fn parse_leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSticker {
    pub name: FieldValue,
    pub wear: FieldValue,
    pub image: FieldValue,
}

impl RawSticker {
    pub fn from_json(value: &Value) -> Self {
        Self {
            name: FieldValue::from_json(value.get("name")),
            wear: FieldValue::from_json(value.get("wear")),
            image: FieldValue::from_json(value.get("image").or_else(|| value.get("imageUrl"))),
        }
    }
}

/// A catalog entry as the source sent it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    /// False when the source sent something other than a JSON object.
    pub is_object: bool,
    pub id: FieldValue,
    pub name: FieldValue,
    pub price: FieldValue,
    pub float: FieldValue,
    /// `None` when the field is absent or not an array.
    pub stickers: Option<Vec<RawSticker>>,
    pub name_tag: FieldValue,
    pub unlock_at: FieldValue,
    pub image: FieldValue,
    pub phase: FieldValue,
    pub pattern: FieldValue,
}

fn first_of<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
        .or_else(|| keys.iter().find_map(|key| value.get(*key)))
}

impl RawRecord {
    pub fn from_json(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }

        let stickers = value
            .get("stickers")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(RawSticker::from_json).collect());

        Self {
            is_object: true,
            id: FieldValue::from_json(value.get("id")),
            name: FieldValue::from_json(value.get("name")),
            price: FieldValue::from_json(value.get("price")),
            float: FieldValue::from_json(first_of(value, &["item_float", "float"])),
            stickers,
            name_tag: FieldValue::from_json(first_of(value, &["name_tag", "nameTag"])),
            unlock_at: FieldValue::from_json(first_of(value, &["unlock_at", "unlockAt"])),
            image: FieldValue::from_json(first_of(value, &["image", "imageUrl", "image_url"])),
            phase: FieldValue::from_json(value.get("phase")),
            pattern: FieldValue::from_json(value.get("pattern")),
        }
    }

    /// Raw label, only when the source actually sent a string.
    pub fn name_text(&self) -> Option<&str> {
        match &self.name {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn price_or_zero(&self) -> f64 {
        self.price.as_number().filter(|p| *p >= 0.0).unwrap_or(0.0)
    }

    pub fn float_or_zero(&self) -> f64 {
        self.float.as_number().map(|f| f.clamp(0.0, 1.0)).unwrap_or(0.0)
    }

    pub fn id_text(&self) -> Option<String> {
        self.id.as_non_empty_text()
    }

    pub fn sticker_count(&self) -> usize {
        self.stickers.as_ref().map_or(0, Vec::len)
    }
}

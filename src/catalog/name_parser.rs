// Market label decoding: "StatTrak™ AK-47 | Redline (Field-Tested)" and friends

use crate::models::Exterior;
use serde::Serialize;

pub const STAT_TRAK_MARKER: &str = "StatTrak™";
pub const SOUVENIR_MARKER: &str = "Souvenir";

pub const NOT_SPECIFIED: &str = "Not Specified";
pub const UNKNOWN_WEAPON: &str = "Unknown Weapon";
pub const VANILLA: &str = "Vanilla";

const NAME_DELIMITER: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedName {
    pub weapon: String,
    pub skin: String,
    /// Raw label from the trailing parentheses, or "Not Specified".
    pub exterior: String,
    pub is_stat_trak: bool,
    pub is_souvenir: bool,
}

impl ParsedName {
    pub fn exterior_band(&self) -> Exterior {
        Exterior::from_label(&self.exterior)
    }

    pub fn display_name(&self) -> String {
        format!("{}{}{}", self.weapon, NAME_DELIMITER, self.skin)
    }
}

/// Splits a trailing "(...)" off `name`. The group starts at the first
/// opening parenthesis and must close at the very end of the string.
fn split_exterior(name: &str) -> (&str, Option<&str>) {
    if !name.ends_with(')') {
        return (name, None);
    }
    match name.find('(') {
        Some(open) => {
            let label = &name[open + 1..name.len() - 1];
            (name[..open].trim_end(), Some(label))
        }
        None => (name, None),
    }
}

/// Decodes a market label. Never fails: missing parts take their defaults.
pub fn parse_name(label: &str) -> ParsedName {
    let is_stat_trak = label.contains(STAT_TRAK_MARKER);
    let is_souvenir = label.contains(SOUVENIR_MARKER);

    let clean = label
        .replacen(&format!("{} ", STAT_TRAK_MARKER), "", 1)
        .replacen(&format!("{} ", SOUVENIR_MARKER), "", 1);

    let (base, exterior) = split_exterior(&clean);
    let exterior = exterior
        .filter(|label| !label.is_empty())
        .unwrap_or(NOT_SPECIFIED)
        .to_string();

    let mut parts = base.split(NAME_DELIMITER);
    let weapon = parts
        .next()
        .filter(|w| !w.is_empty())
        .unwrap_or(UNKNOWN_WEAPON)
        .to_string();
    let skin = parts.next().unwrap_or(VANILLA).to_string();

    ParsedName {
        weapon,
        skin,
        exterior,
        is_stat_trak,
        is_souvenir,
    }
}

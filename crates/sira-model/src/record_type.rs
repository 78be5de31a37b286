use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three regulatory record types carried by the source workbooks.
///
/// Each record type is bound to exactly one workbook sheet and one
/// destination table; the names are fixed by the regulator and must match
/// byte-for-byte, accents and spaces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordType {
    /// MT/BT transformer centers ("Centro MTBT").
    TransformerCenter,
    /// Switching equipment ("Equipos de maniobras").
    SwitchingEquipment,
    /// Service interruptions ("Interrupciones").
    Interruption,
}

impl RecordType {
    /// All record types, in the order sheets appear in the workbooks.
    pub const ALL: [RecordType; 3] = [
        RecordType::TransformerCenter,
        RecordType::SwitchingEquipment,
        RecordType::Interruption,
    ];

    /// The workbook sheet this record type is read from.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            RecordType::TransformerCenter => "Centro MTBT",
            RecordType::SwitchingEquipment => "Equipos de maniobras",
            RecordType::Interruption => "Interrupciones",
        }
    }

    /// The destination table this record type is appended to.
    ///
    /// Destination tables are named after the sheets, spaces included.
    pub fn table_name(&self) -> &'static str {
        self.sheet_name()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::TransformerCenter => "transformer-center",
            RecordType::SwitchingEquipment => "switching-equipment",
            RecordType::Interruption => "interruption",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transformer-center" | "centro-mtbt" => Ok(RecordType::TransformerCenter),
            "switching-equipment" | "equipos-de-maniobras" => Ok(RecordType::SwitchingEquipment),
            "interruption" | "interrupciones" => Ok(RecordType::Interruption),
            _ => Err(format!("unknown record type: {s}")),
        }
    }
}

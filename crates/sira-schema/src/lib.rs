//! Canonical destination schemas and the raw-spelling alias tables.
//!
//! The destination tables keep the regulator's exact column names, accents
//! and spaces included. Field workbooks arrive with human-typed variations
//! of those names (missing accents, different capitalization, shifted
//! underscores); the alias tables map every known variation onto the one
//! canonical spelling. Lookup is exact and accent-sensitive: an unknown
//! spelling is surfaced to the caller instead of being guessed at.

use std::collections::{BTreeMap, BTreeSet};

use sira_model::RecordType;

/// Canonical column names referenced by per-field rules, plus destination
/// precision limits.
pub mod columns {
    pub const KVA_INSTALLED: &str = "KVA instalado por transformador";
    pub const CT_UTM_NORTH: &str = "UTM Centro MT/BT Norte";
    pub const CT_UTM_WEST: &str = "UTM Centro MT/BT Oeste";

    pub const EQUIPMENT_CODE: &str = "Código de equipo";
    pub const VOLTAGE_LEVEL: &str = "Nivel de tensión";
    pub const MAX_CURRENT: &str = "Corriente máxima";
    pub const EQ_UTM_NORTH: &str = "UTM Equipo Norte";
    pub const EQ_UTM_WEST: &str = "UTM Equipo Oeste";

    pub const INTERRUPTION_START: &str = "Fecha y Hora_Inicio";
    pub const INTERRUPTION_CLOSE: &str = "Fecha y Hora_Cierre";
    pub const INTERRUPTION_USER_NOTICE: &str = "Fecha Notificacion al Usuario";
    pub const INTERRUPTION_EQUIPMENT: &str = "Código de Equipo";
    /// Derived during normalization, not present in the workbooks.
    pub const FIRST_EQUIPMENT_CODE: &str = "CódigoDePrimerEquipo";

    /// Destination-managed identity column; dropped when present.
    pub const IDENTITY: &str = "id";

    /// DECIMAL(6,4) in the destination; larger values are flagged, never
    /// truncated.
    pub const KVA_LIMIT: f64 = 99.9999;
    /// DECIMAL(3,2) in the destination, in kV.
    pub const VOLTAGE_LIMIT_KV: f64 = 9.99;
}

/// Known raw spelling -> canonical column name, per record type.
///
/// Data, not code: extending coverage for a new observed spelling means
/// adding a row here and nothing else.
const TRANSFORMER_CENTER_ALIASES: &[(&str, &str)] = &[
    (
        "Código Centro MT/BT",
        "Código Centro de transformación MT/BT",
    ),
    (
        "Codigo Centro MT/BT",
        "Código Centro de transformación MT/BT",
    ),
    (
        "Código Centro de transformación MT/BT",
        "Código Centro de transformación MT/BT",
    ),
    (
        "KVA instalado por transformador",
        "KVA instalado por transformador",
    ),
    ("Equipo aguas arriba", "Equipo aguas arriba"),
    ("Propietario", "Propietario"),
    ("UTM Centro MT/BT Norte", "UTM Centro MT/BT Norte"),
    ("UTM Centro MT/BT Oeste", "UTM Centro MT/BT Oeste"),
];

const SWITCHING_EQUIPMENT_ALIASES: &[(&str, &str)] = &[
    // Destination uses lowercase "equipo"; workbooks mix both.
    ("Código de Equipo", "Código de equipo"),
    ("Código de equipo", "Código de equipo"),
    ("Codigo de Equipo", "Código de equipo"),
    ("Codigo de equipo", "Código de equipo"),
    ("Tipo de Equipo", "Tipo de equipo"),
    ("Tipo de equipo", "Tipo de equipo"),
    ("Código de subestación", "Código de subestación"),
    ("Codigo de Equipo Aguas Arriba", "Codigo de Equipo Aguas Arriba"),
    ("Nivel de tensión", "Nivel de tensión"),
    ("Nivel de tension", "Nivel de tensión"),
    ("Corriente máxima", "Corriente máxima"),
    ("Corriente maxima", "Corriente máxima"),
    ("UTM Equipo Norte", "UTM Equipo Norte"),
    ("UTM Equipo Oeste", "UTM Equipo Oeste"),
];

const INTERRUPTION_ALIASES: &[(&str, &str)] = &[
    ("ID_Interrupcion", "ID_Interrupcion"),
    ("ID Interrupcion", "ID_Interrupcion"),
    ("Fecha y Hora_Inicio", "Fecha y Hora_Inicio"),
    ("Fecha y Hora Inicio", "Fecha y Hora_Inicio"),
    ("Fecha y Hora_Cierre", "Fecha y Hora_Cierre"),
    ("Fecha y Hora Cierre", "Fecha y Hora_Cierre"),
    ("Causa", "Causa"),
    (
        "Fecha Notificacion al Usuario",
        "Fecha Notificacion al Usuario",
    ),
    (
        "Fecha Notificación al Usuario",
        "Fecha Notificacion al Usuario",
    ),
    ("Origen del evento", "Origen del evento"),
    ("Código de Equipo", "Código de Equipo"),
    ("Codigo de Equipo", "Código de Equipo"),
    (
        "Enlace Medio de Notificacion a los Usuarios",
        "Enlace Medio de Notificacion a los Usuarios",
    ),
    ("Observaciones", "Observaciones"),
];

fn alias_table(record_type: RecordType) -> &'static [(&'static str, &'static str)] {
    match record_type {
        RecordType::TransformerCenter => TRANSFORMER_CENTER_ALIASES,
        RecordType::SwitchingEquipment => SWITCHING_EQUIPMENT_ALIASES,
        RecordType::Interruption => INTERRUPTION_ALIASES,
    }
}

/// Exact-match lookup over the alias tables, built once at startup and
/// passed by reference to every component that reconciles or validates.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    aliases: BTreeMap<RecordType, BTreeMap<String, String>>,
    canonical: BTreeMap<RecordType, BTreeSet<String>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut aliases = BTreeMap::new();
        let mut canonical = BTreeMap::new();
        for record_type in RecordType::ALL {
            let table = alias_table(record_type);
            let map: BTreeMap<String, String> = table
                .iter()
                .map(|(raw, canon)| ((*raw).to_string(), (*canon).to_string()))
                .collect();
            let fields: BTreeSet<String> =
                table.iter().map(|(_, canon)| (*canon).to_string()).collect();
            aliases.insert(record_type, map);
            canonical.insert(record_type, fields);
        }
        Self { aliases, canonical }
    }

    /// The raw-spelling -> canonical map for one record type.
    pub fn aliases_for(&self, record_type: RecordType) -> &BTreeMap<String, String> {
        &self.aliases[&record_type]
    }

    /// The canonical column names of one record type's destination table.
    pub fn canonical_fields_for(&self, record_type: RecordType) -> &BTreeSet<String> {
        &self.canonical[&record_type]
    }

    /// Resolve one raw column name. Exact match only; `None` means the
    /// column is unknown and should flow through under its own name.
    pub fn resolve(&self, record_type: RecordType, raw: &str) -> Option<&str> {
        self.aliases[&record_type].get(raw).map(String::as_str)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! # Entity Catalog
//!
//! The portal's concrete record types. Each struct is exactly the shape a
//! caller may write: no identifiers, no timestamps, no audit fields.
//!
//! Relation fields are optional at the type level so a missing identifier
//! surfaces as a descriptive validation error rather than a decode failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{ColumnSpec, RecordFields, RelationRef};

/// A registered farm or premise. Target of every other entity's relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    /// Government premise code; unique among live farms.
    pub premise_code: String,
    pub name: String,
    pub district: String,
    pub state: String,
    pub holder_name: String,
}

impl RecordFields for FarmRecord {
    const KIND: &'static str = "farms";
    const SEQUENCE_PREFIX: &'static str = "FM";

    fn unique_key(&self) -> Option<String> {
        Some(self.premise_code.clone())
    }

    fn workbook_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Premise Code"),
            ColumnSpec::new("Name"),
            ColumnSpec::new("District"),
            ColumnSpec::new("State"),
            ColumnSpec::new("Holder"),
        ]
    }

    fn workbook_cells(&self) -> Vec<String> {
        vec![
            self.premise_code.clone(),
            self.name.clone(),
            self.district.clone(),
            self.state.clone(),
            self.holder_name.clone(),
        ]
    }
}

/// A crop planting entry for a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecord {
    pub farm_uuid: Option<Uuid>,
    pub crop_type: String,
    pub variety: String,
    pub planted_area_hectares: f64,
    pub planting_season: String,
}

impl RecordFields for CropRecord {
    const KIND: &'static str = "crops";
    const SEQUENCE_PREFIX: &'static str = "CR";

    fn relations(&self) -> Vec<RelationRef> {
        vec![RelationRef {
            field: "farmUuid",
            kind: FarmRecord::KIND,
            uuid: self.farm_uuid,
        }]
    }

    fn workbook_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Crop"),
            ColumnSpec::new("Variety"),
            ColumnSpec::new("Planted Area (ha)"),
            ColumnSpec::new("Season"),
        ]
    }

    fn workbook_cells(&self) -> Vec<String> {
        vec![
            self.crop_type.clone(),
            self.variety.clone(),
            format!("{:.2}", self.planted_area_hectares),
            self.planting_season.clone(),
        ]
    }
}

/// A livestock holding entry for a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockRecord {
    pub farm_uuid: Option<Uuid>,
    /// e.g. "Ayam Kampung"
    pub species: String,
    pub breed: String,
    pub headcount: u32,
    pub rearing_system: String,
}

impl RecordFields for LivestockRecord {
    const KIND: &'static str = "livestock";
    const SEQUENCE_PREFIX: &'static str = "LV";

    fn relations(&self) -> Vec<RelationRef> {
        vec![RelationRef {
            field: "farmUuid",
            kind: FarmRecord::KIND,
            uuid: self.farm_uuid,
        }]
    }

    fn workbook_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Species"),
            ColumnSpec::new("Breed"),
            ColumnSpec::new("Headcount"),
            ColumnSpec::new("Rearing System"),
        ]
    }

    fn workbook_cells(&self) -> Vec<String> {
        vec![
            self.species.clone(),
            self.breed.clone(),
            self.headcount.to_string(),
            self.rearing_system.clone(),
        ]
    }
}

/// A biosecurity inspection outcome for a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiosecurityCheck {
    pub farm_uuid: Option<Uuid>,
    pub checklist_code: String,
    pub inspector: String,
    pub passed: bool,
    pub remarks: String,
}

impl RecordFields for BiosecurityCheck {
    const KIND: &'static str = "biosecurity";
    const SEQUENCE_PREFIX: &'static str = "BS";

    fn relations(&self) -> Vec<RelationRef> {
        vec![RelationRef {
            field: "farmUuid",
            kind: FarmRecord::KIND,
            uuid: self.farm_uuid,
        }]
    }

    fn workbook_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Checklist"),
            ColumnSpec::new("Inspector"),
            ColumnSpec::new("Passed"),
            ColumnSpec::new("Remarks"),
        ]
    }

    fn workbook_cells(&self) -> Vec<String> {
        vec![
            self.checklist_code.clone(),
            self.inspector.clone(),
            if self.passed { "yes" } else { "no" }.to_string(),
            self.remarks.clone(),
        ]
    }
}

/// A production quantity reported for a farm and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub farm_uuid: Option<Uuid>,
    pub commodity: String,
    pub quantity_kg: f64,
    /// Reporting period, e.g. "2025-Q3".
    pub period: String,
}

impl RecordFields for ProductionRecord {
    const KIND: &'static str = "production";
    const SEQUENCE_PREFIX: &'static str = "PR";

    fn relations(&self) -> Vec<RelationRef> {
        vec![RelationRef {
            field: "farmUuid",
            kind: FarmRecord::KIND,
            uuid: self.farm_uuid,
        }]
    }

    fn workbook_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Commodity"),
            ColumnSpec::new("Quantity (kg)"),
            ColumnSpec::new("Period"),
        ]
    }

    fn workbook_cells(&self) -> Vec<String> {
        vec![
            self.commodity.clone(),
            format!("{:.1}", self.quantity_kg),
            self.period.clone(),
        ]
    }
}

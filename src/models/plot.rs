use crate::error::{Result, TerraMindError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandPlot {
    pub id: Option<i64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area_hectares: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LandPlot {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TerraMindError::InvalidData(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(TerraMindError::InvalidData(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: None,
            name: name.into(),
            latitude,
            longitude,
            area_hectares: None,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_area(mut self, hectares: f64) -> Self {
        self.area_hectares = Some(hectares);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

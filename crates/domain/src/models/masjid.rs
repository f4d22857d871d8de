//! Masjid (tenant) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tenant root. Owns all screens, schedules, and content items. Never
/// deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Masjid {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Prayer calculation method identifier, consumed by the external
    /// calculation library. Opaque here.
    pub calculation_method: String,
    pub madhab: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public tenant info embedded in device-facing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MasjidInfo {
    pub name: String,
    pub timezone: String,
}

impl From<&Masjid> for MasjidInfo {
    fn from(masjid: &Masjid) -> Self {
        Self {
            name: masjid.name.clone(),
            timezone: masjid.timezone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masjid_info_from_masjid() {
        let masjid = Masjid {
            id: Uuid::new_v4(),
            name: "Masjid An-Nur".to_string(),
            timezone: "Europe/London".to_string(),
            latitude: 51.5,
            longitude: -0.12,
            calculation_method: "MWL".to_string(),
            madhab: "hanafi".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let info = MasjidInfo::from(&masjid);
        assert_eq!(info.name, "Masjid An-Nur");
        assert_eq!(info.timezone, "Europe/London");
    }
}

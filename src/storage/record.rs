use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the case dataset.
///
/// Every attribute is optional text. The upstream table has no fixed schema,
/// and counts or coordinates are frequently blank or malformed, so they are
/// kept exactly as stored and parsed only when asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "FIPS")]
    pub fips: Option<String>,
    #[serde(rename = "Admin2")]
    pub admin2: Option<String>,
    #[serde(rename = "Province_State")]
    pub province_state: Option<String>,
    #[serde(rename = "Country_Region")]
    pub country_region: Option<String>,
    #[serde(rename = "Last_Update")]
    pub last_update: Option<String>,
    #[serde(rename = "Lat")]
    pub lat: Option<String>,
    #[serde(rename = "Long_")]
    pub long: Option<String>,
    #[serde(rename = "Confirmed")]
    pub confirmed: Option<String>,
    #[serde(rename = "Deaths")]
    pub deaths: Option<String>,
    #[serde(rename = "Recovered")]
    pub recovered: Option<String>,
    #[serde(rename = "Active")]
    pub active: Option<String>,
    #[serde(rename = "Combined_Key")]
    pub combined_key: Option<String>,
    #[serde(rename = "Incident_Rate")]
    pub incident_rate: Option<String>,
    #[serde(rename = "Case_Fatality_Ratio")]
    pub case_fatality_ratio: Option<String>,
}

impl CaseRecord {
    /// Attribute names as stored in the table, in declaration order.
    pub const ATTRIBUTES: [&'static str; 14] = [
        "FIPS",
        "Admin2",
        "Province_State",
        "Country_Region",
        "Last_Update",
        "Lat",
        "Long_",
        "Confirmed",
        "Deaths",
        "Recovered",
        "Active",
        "Combined_Key",
        "Incident_Rate",
        "Case_Fatality_Ratio",
    ];

    /// Mutable slot for a stored attribute name, `None` for unknown names.
    pub fn field_mut(&mut self, attribute: &str) -> Option<&mut Option<String>> {
        let slot = match attribute {
            "FIPS" => &mut self.fips,
            "Admin2" => &mut self.admin2,
            "Province_State" => &mut self.province_state,
            "Country_Region" => &mut self.country_region,
            "Last_Update" => &mut self.last_update,
            "Lat" => &mut self.lat,
            "Long_" => &mut self.long,
            "Confirmed" => &mut self.confirmed,
            "Deaths" => &mut self.deaths,
            "Recovered" => &mut self.recovered,
            "Active" => &mut self.active,
            "Combined_Key" => &mut self.combined_key,
            "Incident_Rate" => &mut self.incident_rate,
            "Case_Fatality_Ratio" => &mut self.case_fatality_ratio,
            _ => return None,
        };
        Some(slot)
    }

    /// Counts parsed from their stored text; blank or malformed values are `None`.
    pub fn confirmed_count(&self) -> Option<u64> {
        parse_field(&self.confirmed)
    }

    pub fn death_count(&self) -> Option<u64> {
        parse_field(&self.deaths)
    }

    pub fn recovered_count(&self) -> Option<u64> {
        parse_field(&self.recovered)
    }

    pub fn active_count(&self) -> Option<u64> {
        parse_field(&self.active)
    }

    /// Latitude/longitude pair, only when both parse.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((parse_field(&self.lat)?, parse_field(&self.long)?))
    }
}

/// Counts are sometimes exported as floats ("100.0"); those are accepted
/// when they carry no fractional part.
fn parse_field<T: FromStr>(value: &Option<String>) -> Option<T> {
    let raw = value.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse()
        .ok()
        .or_else(|| raw.strip_suffix(".0").and_then(|whole| whole.parse().ok()))
}

//! Static city table used for text-based location search.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::{
    error::LocationError,
    model::{CityRecord, Coordinates},
};

const BUNDLED_CITY_LIST: &str = include_str!("../assets/city_list.json");

/// A parsed `"City, CC"` search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub name: String,
    pub country: String,
}

impl CityQuery {
    /// Split on the first comma and trim both halves.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let (name, country) = input
            .split_once(',')
            .ok_or_else(|| LocationError::InvalidQuery(input.to_string()))?;

        let name = name.trim();
        let country = country.trim();

        if name.is_empty() || country.is_empty() {
            return Err(LocationError::InvalidQuery(input.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            country: country.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CityTable {
    records: Vec<CityRecord>,
}

impl CityTable {
    pub fn new(records: Vec<CityRecord>) -> Self {
        Self { records }
    }

    /// The table shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CITY_LIST).context("Failed to parse bundled city list")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CityRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read city list: {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse city list: {}", path.display()))
    }

    /// Use `path` when given, the bundled table otherwise.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::bundled(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-sensitive match on both name and country code.
    pub fn find(&self, name: &str, country: &str) -> Option<&CityRecord> {
        self.records
            .iter()
            .find(|c| c.name == name && c.country == country)
    }

    /// Parse a `"City, CC"` string and look it up.
    pub fn resolve(&self, input: &str) -> Result<Coordinates, LocationError> {
        let query = CityQuery::parse(input)?;

        self.find(&query.name, &query.country)
            .map(CityRecord::coordinates)
            .ok_or(LocationError::CityNotFound {
                city: query.name,
                country: query.country,
            })
    }

    /// Case-insensitive prefix search, for helping users find the exact spelling.
    pub fn starting_with(&self, prefix: &str) -> Vec<&CityRecord> {
        let prefix = prefix.trim().to_lowercase();
        self.records
            .iter()
            .filter(|c| c.name.to_lowercase().starts_with(&prefix))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CityCoord;

    fn table() -> CityTable {
        CityTable::new(vec![
            CityRecord {
                id: Some(3530597),
                name: "Mexico City".into(),
                state: None,
                country: "MX".into(),
                coord: CityCoord { lat: 19.43, lon: -99.13 },
            },
            CityRecord {
                id: None,
                name: "Merida".into(),
                state: None,
                country: "MX".into(),
                coord: CityCoord { lat: 20.97, lon: -89.62 },
            },
            CityRecord {
                id: None,
                name: "Merida".into(),
                state: None,
                country: "ES".into(),
                coord: CityCoord { lat: 38.92, lon: -6.34 },
            },
        ])
    }

    #[test]
    fn resolves_exact_city_and_country() {
        let coords = table().resolve("Mexico City, MX").unwrap();
        assert_eq!(coords, Coordinates::new(19.43, -99.13));
    }

    #[test]
    fn trims_whitespace_around_parts() {
        let coords = table().resolve("  Mexico City ,   MX ").unwrap();
        assert_eq!(coords, Coordinates::new(19.43, -99.13));
    }

    #[test]
    fn requires_both_name_and_country_to_match() {
        let t = table();
        assert_eq!(t.resolve("Merida, ES").unwrap(), Coordinates::new(38.92, -6.34));
        assert_eq!(t.resolve("Merida, MX").unwrap(), Coordinates::new(20.97, -89.62));
        assert!(matches!(
            t.resolve("Mexico City, ES"),
            Err(LocationError::CityNotFound { .. })
        ));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(table().resolve("mexico city, mx").is_err());
    }

    #[test]
    fn miss_reports_city_not_found() {
        let err = table().resolve("Nowhereville, ZZ").unwrap_err();
        match err {
            LocationError::CityNotFound { city, country } => {
                assert_eq!(city, "Nowhereville");
                assert_eq!(country, "ZZ");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn query_without_comma_is_invalid() {
        assert!(matches!(
            CityQuery::parse("Mexico City"),
            Err(LocationError::InvalidQuery(_))
        ));
        assert!(matches!(
            CityQuery::parse("Mexico City, "),
            Err(LocationError::InvalidQuery(_))
        ));
    }

    #[test]
    fn bundled_table_contains_mexico_city() {
        let t = CityTable::bundled().unwrap();
        assert!(!t.is_empty());
        assert_eq!(t.resolve("Mexico City, MX").unwrap(), Coordinates::new(19.43, -99.13));
    }

    #[test]
    fn prefix_search_is_case_insensitive() {
        let t = table();
        let hits = t.starting_with("mer");
        assert_eq!(hits.len(), 2);
        assert!(t.starting_with("zzz").is_empty());
    }

    #[test]
    fn load_reads_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        std::fs::write(
            &path,
            r#"[{"name":"Oslo","country":"NO","coord":{"lat":59.91,"lon":10.75}}]"#,
        )
        .unwrap();

        let t = CityTable::load_or_bundled(Some(&path)).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.resolve("Oslo, NO").unwrap(), Coordinates::new(59.91, 10.75));
    }
}

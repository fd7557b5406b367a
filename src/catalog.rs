use once_cell::sync::Lazy;
use serde::Serialize;

// ============================================================================
// METADATA STRUCTS
// ============================================================================

/// A selectable country. The ISO2 code is what the World Bank API takes; the
/// ISO3 code is what map geometry features are keyed by.
#[derive(Debug, Clone, Serialize)]
pub struct CountryMetadata {
    pub code: &'static str,
    pub iso3: &'static str,
    pub name: &'static str,
}

/// One row of the gender / sustainability comparison. Static dataset;
/// there is no public API behind this view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexEntry {
    pub country: &'static str,
    pub gender: f64,
    pub sustainability: f64,
}

// Helper macro to reduce boilerplate
macro_rules! country {
    ($code:expr, $iso3:expr, $name:expr) => {
        CountryMetadata {
            code: $code,
            iso3: $iso3,
            name: $name,
        }
    };
}

// ============================================================================
// STATIC CATALOG (Lazy initialization)
// ============================================================================

static COUNTRIES: Lazy<Vec<CountryMetadata>> = Lazy::new(|| {
    vec![
        country!("IN", "IND", "India"),
        country!("US", "USA", "United States"),
        country!("CN", "CHN", "China"),
        country!("GB", "GBR", "United Kingdom"),
        country!("DE", "DEU", "Germany"),
        country!("FR", "FRA", "France"),
        country!("JP", "JPN", "Japan"),
        country!("BR", "BRA", "Brazil"),
        country!("ZA", "ZAF", "South Africa"),
        country!("CA", "CAN", "Canada"),
        country!("RU", "RUS", "Russia"),
        country!("IT", "ITA", "Italy"),
        country!("KR", "KOR", "South Korea"),
        country!("AU", "AUS", "Australia"),
        country!("MX", "MEX", "Mexico"),
        country!("ID", "IDN", "Indonesia"),
        country!("NG", "NGA", "Nigeria"),
        country!("AR", "ARG", "Argentina"),
        country!("SA", "SAU", "Saudi Arabia"),
        country!("TR", "TUR", "Turkey"),
        country!("ES", "ESP", "Spain"),
        country!("NL", "NLD", "Netherlands"),
        country!("CH", "CHE", "Switzerland"),
        country!("SE", "SWE", "Sweden"),
        country!("PL", "POL", "Poland"),
        country!("EG", "EGY", "Egypt"),
        country!("MY", "MYS", "Malaysia"),
        country!("TH", "THA", "Thailand"),
        country!("SG", "SGP", "Singapore"),
        country!("PK", "PAK", "Pakistan"),
    ]
});

static INDICES: Lazy<Vec<IndexEntry>> = Lazy::new(|| {
    vec![
        IndexEntry {
            country: "India",
            gender: 0.72,
            sustainability: 0.55,
        },
        IndexEntry {
            country: "USA",
            gender: 0.89,
            sustainability: 0.82,
        },
        IndexEntry {
            country: "Germany",
            gender: 0.91,
            sustainability: 0.93,
        },
        IndexEntry {
            country: "Maldives",
            gender: 0.68,
            sustainability: 0.71,
        },
        IndexEntry {
            country: "Sweden",
            gender: 0.95,
            sustainability: 0.97,
        },
        IndexEntry {
            country: "Nigeria",
            gender: 0.65,
            sustainability: 0.52,
        },
    ]
});

pub struct Catalog;

impl Catalog {
    /// Look up a country by its ISO2 code (case-insensitive).
    pub fn get(code: &str) -> Option<&'static CountryMetadata> {
        COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn all() -> &'static [CountryMetadata] {
        &COUNTRIES
    }

    pub fn iso2_to_iso3(code: &str) -> Option<&'static str> {
        Self::get(code).map(|c| c.iso3)
    }

    /// The static index table, optionally filtered by country name.
    pub fn indices(filter: &[String]) -> Vec<IndexEntry> {
        if filter.is_empty() {
            return INDICES.clone();
        }

        INDICES
            .iter()
            .copied()
            .filter(|entry| {
                filter
                    .iter()
                    .any(|name| entry.country.eq_ignore_ascii_case(name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Catalog::get("in").unwrap().name, "India");
        assert_eq!(Catalog::get("IN").unwrap().iso3, "IND");
        assert!(Catalog::get("ZZ").is_none());
    }

    #[test]
    fn test_iso2_to_iso3() {
        assert_eq!(Catalog::iso2_to_iso3("DE"), Some("DEU"));
        assert_eq!(Catalog::iso2_to_iso3("XX"), None);
    }

    #[test]
    fn test_indices_filter() {
        let all = Catalog::indices(&[]);
        assert_eq!(all.len(), 6);

        let filtered = Catalog::indices(&["sweden".to_string(), "India".to_string()]);
        assert_eq!(filtered.len(), 2);
    }
}

//! Country Centroid Lookup
//! Maps nation display names to lon/lat centroids for the world-map view.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

const CENTROID_JSON: &str = include_str!("../../assets/country_centroids.json");

#[derive(Debug, Deserialize)]
struct CountryRecord {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    aliases: Vec<String>,
}

/// (longitude, latitude), plot order on the equirectangular plane.
pub type Centroid = (f64, f64);

fn table() -> &'static HashMap<String, Centroid> {
    static TABLE: OnceLock<HashMap<String, Centroid>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let records: Vec<CountryRecord> = match serde_json::from_str(CENTROID_JSON) {
            Ok(records) => records,
            Err(e) => {
                log::error!("Embedded centroid table is invalid: {e}");
                Vec::new()
            }
        };

        let mut map = HashMap::new();
        for rec in records {
            let centroid = (rec.lon, rec.lat);
            map.insert(rec.name.to_ascii_lowercase(), centroid);
            for alias in rec.aliases {
                map.insert(alias.to_ascii_lowercase(), centroid);
            }
        }
        map
    })
}

/// Look up a nation's centroid, case-insensitively. Nations without an
/// entry return `None` and are left off the map, matching how the
/// country-name location mode drops unmatched values.
pub fn centroid(nation: &str) -> Option<Centroid> {
    table().get(&nation.trim().to_ascii_lowercase()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_resolve() {
        assert!(centroid("Nepal").is_some());
        assert!(centroid("Japan").is_some());
        assert!(centroid("France").is_some());
    }

    #[test]
    fn aliases_and_case_are_tolerated() {
        assert_eq!(centroid("USA"), centroid("United States"));
        assert_eq!(centroid("UK"), centroid("United Kingdom"));
        assert_eq!(centroid("S Korea"), centroid("South Korea"));
        assert_eq!(centroid("W Germany"), centroid("Germany"));
        assert_eq!(centroid("nepal"), centroid("Nepal"));
        assert_eq!(centroid(" Nepal "), centroid("Nepal"));
    }

    #[test]
    fn unknown_nations_are_dropped() {
        assert!(centroid("Atlantis").is_none());
        assert!(centroid("").is_none());
    }

    #[test]
    fn every_centroid_is_a_plausible_coordinate() {
        for (name, (lon, lat)) in table() {
            assert!((-180.0..=180.0).contains(lon), "{name}: lon {lon}");
            assert!((-90.0..=90.0).contains(lat), "{name}: lat {lat}");
        }
    }
}

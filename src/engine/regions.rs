//! Static region membership table.
//!
//! A fixed mapping from region to member countries, used by the region
//! filter and the regional rollup. Countries in no region fall into the
//! implicit "Other" bucket during rollups.

/// One region with its defined member countries.
#[derive(Debug, Clone)]
pub struct Region {
    /// Stable key used by filters ("north-america").
    pub key: String,
    /// Display name ("North America").
    pub name: String,
    /// Defined member countries (the coverage denominator).
    pub countries: Vec<String>,
}

/// The full region table.
#[derive(Debug, Clone)]
pub struct RegionMap {
    regions: Vec<Region>,
}

/// Sentinel filter key meaning "no region filter".
pub const ALL_REGIONS: &str = "all";

impl RegionMap {
    /// The built-in seven-region table.
    pub fn builtin() -> Self {
        let regions = [
            (
                "Asia",
                vec![
                    "China",
                    "Japan",
                    "South Korea",
                    "India",
                    "Vietnam",
                    "Thailand",
                    "Taiwan",
                    "Malaysia",
                    "Indonesia",
                    "Philippines",
                    "Laos",
                    "Cambodia",
                    "Myanmar (Burma)",
                    "Brunei",
                    "Bangladesh",
                    "Pakistan",
                    "Sri Lanka",
                ],
            ),
            (
                "Europe",
                vec![
                    "European Union",
                    "United Kingdom",
                    "Switzerland",
                    "Norway",
                    "Serbia",
                    "Bosnia and Herzegovina",
                    "North Macedonia",
                    "Moldova",
                    "Liechtenstein",
                ],
            ),
            (
                "Africa",
                vec![
                    "Algeria",
                    "Angola",
                    "Botswana",
                    "Cameroon",
                    "Chad",
                    "Democratic Republic of the Congo",
                    "Côte d`Ivoire",
                    "Equatorial Guinea",
                    "Lesotho",
                    "Libya",
                    "Madagascar",
                    "Malawi",
                    "Mauritius",
                    "Mozambique",
                    "Namibia",
                    "Nigeria",
                    "South Africa",
                    "Tunisia",
                    "Zambia",
                    "Zimbabwe",
                ],
            ),
            ("North America", vec!["Canada", "Mexico", "Nicaragua"]),
            (
                "South America",
                vec!["Argentina", "Brazil", "Guyana", "Venezuela"],
            ),
            ("Oceania", vec!["Australia", "Fiji", "Nauru", "Vanuatu"]),
            (
                "Middle East",
                vec!["Iraq", "Israel", "Jordan", "Saudi Arabia", "Syria"],
            ),
        ]
        .into_iter()
        .map(|(name, countries)| Region {
            key: slugify(name),
            name: name.to_string(),
            countries: countries.into_iter().map(String::from).collect(),
        })
        .collect();

        Self { regions }
    }

    /// Look up a region by key or display name, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&Region> {
        let wanted = slugify(key);
        self.regions.iter().find(|r| r.key == wanted)
    }

    /// The region a country belongs to, if any.
    pub fn region_of(&self, country: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.countries.iter().any(|c| c == country))
    }

    /// Iterate regions in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Valid filter keys, including the "all" sentinel.
    pub fn filter_keys(&self) -> Vec<String> {
        std::iter::once(ALL_REGIONS.to_string())
            .chain(self.regions.iter().map(|r| r.key.clone()))
            .collect()
    }
}

fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_regions() {
        let regions = RegionMap::builtin();
        assert_eq!(regions.iter().count(), 7);
        assert!(regions.get("asia").is_some());
        assert!(regions.get("North America").is_some());
        assert!(regions.get("middle-east").is_some());
        assert!(regions.get("atlantis").is_none());
    }

    #[test]
    fn test_region_of() {
        let regions = RegionMap::builtin();
        assert_eq!(regions.region_of("China").map(|r| r.name.as_str()), Some("Asia"));
        assert_eq!(
            regions.region_of("European Union").map(|r| r.name.as_str()),
            Some("Europe")
        );
        assert!(regions.region_of("Atlantis").is_none());
    }

    #[test]
    fn test_filter_keys_include_all() {
        let regions = RegionMap::builtin();
        let keys = regions.filter_keys();
        assert_eq!(keys[0], "all");
        assert!(keys.contains(&"south-america".to_string()));
    }
}

//! Bundled static data
//!
//! Served in place of live data when a public read fails, so the catalog
//! always has something to show. Also holds the presentation table used to
//! decorate live categories and the company profile.

use serde::Serialize;
use std::collections::BTreeMap;

use super::slug::humanize_slug;
use crate::types::{Category, CategoryLabel, CategoryRef, RecordStatus, Service};

const DEFAULT_ICON: &str = "fas fa-car";
const DEFAULT_GRADIENT: &str = "from-blue-500 to-blue-700";
const DEFAULT_COLOR: &str = "blue";

struct CategorySeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    slug: &'static str,
    icon: &'static str,
    gradient: &'static str,
    color: &'static str,
}

struct ServiceSeed {
    id: &'static str,
    category_slug: &'static str,
    name: &'static str,
    description: &'static str,
    price: f64,
    duration: &'static str,
    features: &'static [&'static str],
    image: &'static str,
}

static CATEGORY_SEEDS: [CategorySeed; 4] = [
    CategorySeed {
        id: "cat1",
        name: "Intracity",
        description: "Local city rides and daily commute",
        slug: "intracity",
        icon: "fas fa-city",
        gradient: "from-blue-500 to-blue-700",
        color: "blue",
    },
    CategorySeed {
        id: "cat2",
        name: "Airport Transfer",
        description: "Reliable airport pickup and drop-off",
        slug: "airport_transfer",
        icon: "fas fa-plane",
        gradient: "from-green-500 to-green-700",
        color: "green",
    },
    CategorySeed {
        id: "cat3",
        name: "Outstation",
        description: "Comfortable intercity travel",
        slug: "outstation",
        icon: "fas fa-route",
        gradient: "from-purple-500 to-purple-700",
        color: "purple",
    },
    CategorySeed {
        id: "cat4",
        name: "Hourly Rental",
        description: "Flexible hourly cab booking",
        slug: "hourly_rental",
        icon: "fas fa-clock",
        gradient: "from-orange-500 to-orange-700",
        color: "orange",
    },
];

static SERVICE_SEEDS: [ServiceSeed; 8] = [
    ServiceSeed {
        id: "svc1",
        category_slug: "intracity",
        name: "City Ride Economy",
        description: "Affordable rides within city limits with professional drivers",
        price: 150.0,
        duration: "Base Fare",
        features: &["AC Vehicle", "Professional Driver", "GPS Tracking"],
        image: "/uploads/services/city-economy.jpg",
    },
    ServiceSeed {
        id: "svc2",
        category_slug: "intracity",
        name: "City Ride Premium",
        description: "Comfortable premium vehicles for city travel",
        price: 250.0,
        duration: "Base Fare",
        features: &["Luxury Vehicle", "Experienced Driver", "Complimentary Water"],
        image: "/uploads/services/city-premium.jpg",
    },
    ServiceSeed {
        id: "svc3",
        category_slug: "airport_transfer",
        name: "Airport Pickup Standard",
        description: "Reliable airport transfers with flight tracking",
        price: 400.0,
        duration: "One Way",
        features: &["Flight Tracking", "Meet & Greet", "AC Vehicle"],
        image: "/uploads/services/airport-standard.jpg",
    },
    ServiceSeed {
        id: "svc4",
        category_slug: "airport_transfer",
        name: "Airport VIP Transfer",
        description: "Premium airport service with luxury vehicles",
        price: 800.0,
        duration: "One Way",
        features: &["Luxury Car", "Priority Service", "Lounge Access"],
        image: "/uploads/services/airport-vip.jpg",
    },
    ServiceSeed {
        id: "svc5",
        category_slug: "outstation",
        name: "Outstation Economy",
        description: "Budget-friendly intercity travel",
        price: 12.0,
        duration: "Per KM",
        features: &["Fuel Included", "Driver Allowance", "Toll Charges Extra"],
        image: "/uploads/services/outstation-economy.jpg",
    },
    ServiceSeed {
        id: "svc6",
        category_slug: "outstation",
        name: "Outstation Premium",
        description: "Comfortable long-distance travel",
        price: 18.0,
        duration: "Per KM",
        features: &["Premium Vehicle", "All Inclusive", "24/7 Support"],
        image: "/uploads/services/outstation-premium.jpg",
    },
    ServiceSeed {
        id: "svc7",
        category_slug: "hourly_rental",
        name: "4 Hour Package",
        description: "Flexible 4-hour rental with 40km included",
        price: 800.0,
        duration: "4 Hours",
        features: &["4 Hours", "40 KM Included", "Extra KM Chargeable"],
        image: "/uploads/services/hourly-4h.jpg",
    },
    ServiceSeed {
        id: "svc8",
        category_slug: "hourly_rental",
        name: "8 Hour Package",
        description: "Full day rental with 80km included",
        price: 1400.0,
        duration: "8 Hours",
        features: &["8 Hours", "80 KM Included", "Driver Allowance"],
        image: "/uploads/services/hourly-8h.jpg",
    },
];

impl CategorySeed {
    fn to_category(&self) -> Category {
        Category {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            slug: self.slug.to_string(),
            status: RecordStatus::Active,
            icon: Some(self.icon.to_string()),
            gradient: Some(self.gradient.to_string()),
            color: Some(self.color.to_string()),
        }
    }
}

impl ServiceSeed {
    fn to_service(&self) -> Service {
        let category_id = find_seed(self.category_slug).map(|seed| seed.id.to_string());
        Service {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            price: self.price,
            duration: self.duration.to_string(),
            features: self.features.iter().map(|f| f.to_string()).collect(),
            image: Some(self.image.to_string()),
            status: RecordStatus::Active,
            category: category_id.map(CategoryRef::Id),
        }
    }
}

fn find_seed(slug: &str) -> Option<&'static CategorySeed> {
    CATEGORY_SEEDS.iter().find(|seed| seed.slug == slug)
}

/// All bundled categories, in display order
pub fn categories() -> Vec<Category> {
    CATEGORY_SEEDS.iter().map(CategorySeed::to_category).collect()
}

/// Bundled services for one category slug (empty for unknown slugs)
pub fn services_for(slug: &str) -> Vec<Service> {
    SERVICE_SEEDS
        .iter()
        .filter(|seed| seed.category_slug == slug)
        .map(ServiceSeed::to_service)
        .collect()
}

/// Bundled services keyed by category slug
pub fn services_by_slug() -> BTreeMap<String, Vec<Service>> {
    CATEGORY_SEEDS
        .iter()
        .map(|seed| (seed.slug.to_string(), services_for(seed.slug)))
        .collect()
}

/// Label for a slug: bundled name when known, humanized slug otherwise
pub fn category_label(slug: &str) -> CategoryLabel {
    let name = match find_seed(slug) {
        Some(seed) => seed.name.to_string(),
        None => humanize_slug(slug),
    };
    CategoryLabel {
        name,
        slug: slug.to_string(),
    }
}

/// Fill in icon/gradient/color from the bundled table by slug.
pub fn decorate(category: &mut Category) {
    let seed = find_seed(&category.slug);
    let icon = if category.slug == "airport" {
        "fas fa-plane"
    } else {
        seed.map_or(DEFAULT_ICON, |s| s.icon)
    };
    category.icon = Some(icon.to_string());
    category.gradient = Some(seed.map_or(DEFAULT_GRADIENT, |s| s.gradient).to_string());
    category.color = Some(seed.map_or(DEFAULT_COLOR, |s| s.color).to_string());
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompanyProfile {
    pub name: &'static str,
    pub tagline: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub domain: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub address: &'static str,
}

pub const COMPANY: CompanyProfile = CompanyProfile {
    name: "Go Cab",
    tagline: "Your Journey, Our Passion",
    subtitle: "Reliable Rides, Everywhere You Go",
    description: "Premium cab services across Jharkhand with professional drivers and comfortable vehicles",
    domain: "gocab.co",
    phone: "+919102749920",
    email: "contact@gocab.co",
    address: "Jharkhand, India",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_categories_with_unique_slugs() {
        let cats = categories();
        assert_eq!(cats.len(), 4);
        let slugs: std::collections::HashSet<_> = cats.iter().map(|c| c.slug.clone()).collect();
        assert_eq!(slugs.len(), 4);
    }

    #[test]
    fn test_category_slugs_match_names() {
        for cat in categories() {
            assert_eq!(crate::services::slug::generate_slug(&cat.name), cat.slug);
        }
    }

    #[test]
    fn test_services_for_known_slug() {
        let services = services_for("airport_transfer");
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "Airport Pickup Standard");
        assert_eq!(services[0].features, vec!["Flight Tracking", "Meet & Greet", "AC Vehicle"]);
        assert_eq!(services[0].category_id(), Some("cat2"));
    }

    #[test]
    fn test_services_for_unknown_slug_empty() {
        assert!(services_for("helicopter").is_empty());
    }

    #[test]
    fn test_services_by_slug_covers_every_category() {
        let map = services_by_slug();
        assert_eq!(map.len(), 4);
        assert!(map.values().all(|v| v.len() == 2));
    }

    #[test]
    fn test_category_label_known_and_unknown() {
        assert_eq!(category_label("hourly_rental").name, "Hourly Rental");
        let label = category_label("night_ride_special");
        assert_eq!(label.name, "Night Ride Special");
        assert_eq!(label.slug, "night_ride_special");
    }

    #[test]
    fn test_decorate_known_slug() {
        let mut cat = categories().remove(2);
        cat.icon = None;
        decorate(&mut cat);
        assert_eq!(cat.icon.as_deref(), Some("fas fa-route"));
        assert_eq!(cat.color.as_deref(), Some("purple"));
    }

    #[test]
    fn test_decorate_unknown_slug_gets_defaults() {
        let mut cat = categories().remove(0);
        cat.slug = "bike_taxi".into();
        decorate(&mut cat);
        assert_eq!(cat.icon.as_deref(), Some(DEFAULT_ICON));
        assert_eq!(cat.gradient.as_deref(), Some(DEFAULT_GRADIENT));
        assert_eq!(cat.color.as_deref(), Some(DEFAULT_COLOR));
    }

    #[test]
    fn test_decorate_airport_alias() {
        let mut cat = categories().remove(0);
        cat.slug = "airport".into();
        decorate(&mut cat);
        assert_eq!(cat.icon.as_deref(), Some("fas fa-plane"));
        assert_eq!(cat.color.as_deref(), Some(DEFAULT_COLOR));
    }
}

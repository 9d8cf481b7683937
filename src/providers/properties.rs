use chrono::{Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationData {
    pub area_name: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentData {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub image_url: String,
}

/// Listing record as the property widget renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub purpose: String,
    pub price: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_period: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub size_sqft: u32,
    pub location: LocationData,
    pub amenities: Vec<String>,
    pub image_urls: Vec<String>,
    pub agent: AgentData,
    pub is_featured: bool,
    pub is_verified: bool,
    pub listing_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
}

/// Search filters, all optional. `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct PropertyFilters {
    pub purpose: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

const CITY: &str = "Dubai";
const MAX_RESULTS: usize = 20;
const PROPERTY_TYPES: &[&str] = &["apartment", "villa", "townhouse", "commercial"];

const DUBAI_LOCATIONS: &[(&str, f64, f64)] = &[
    ("Dubai Marina", 25.0805, 55.1403),
    ("Downtown Dubai", 25.1972, 55.2744),
    ("JBR", 25.0762, 55.1328),
    ("Palm Jumeirah", 25.1124, 55.1390),
    ("Dubai South", 24.8962, 55.1665),
    ("Business Bay", 25.1851, 55.2619),
    ("DIFC", 25.2096, 55.2795),
    ("Dubai Hills Estate", 25.1021, 55.2355),
    ("Arabian Ranches", 25.0576, 55.2667),
    ("Jumeirah Village Circle", 25.0548, 55.2095),
    ("Al Barsha", 25.1032, 55.2000),
    ("Deira", 25.2697, 55.3094),
    ("Bur Dubai", 25.2532, 55.2906),
    ("Mirdif", 25.2274, 55.4207),
    ("Motor City", 25.0450, 55.2350),
];

const AGENTS: &[(&str, &str, &str, &str)] = &[
    ("Ahmed Hassan", "Emirates Properties", "+971 50 123 4567", "https://randomuser.me/api/portraits/men/32.jpg"),
    ("Sarah Johnson", "Dubai Luxury Homes", "+971 50 234 5678", "https://randomuser.me/api/portraits/women/44.jpg"),
    ("Mohammad Al Rashid", "Golden Gate Real Estate", "+971 50 345 6789", "https://randomuser.me/api/portraits/men/52.jpg"),
    ("Emma Williams", "Prime Properties Dubai", "+971 50 456 7890", "https://randomuser.me/api/portraits/women/28.jpg"),
    ("Omar Khalid", "Bayut Properties", "+971 50 567 8901", "https://randomuser.me/api/portraits/men/22.jpg"),
    ("Fatima Al Maktoum", "Royal Estates", "+971 50 678 9012", "https://randomuser.me/api/portraits/women/56.jpg"),
    ("James Wilson", "Hamptons International", "+971 50 789 0123", "https://randomuser.me/api/portraits/men/62.jpg"),
    ("Aisha Patel", "Property Finder Elite", "+971 50 890 1234", "https://randomuser.me/api/portraits/women/67.jpg"),
];

const AMENITY_SETS: &[&[&str]] = &[
    &["Pool", "Gym", "Parking", "Security", "Balcony"],
    &["Beach Access", "Concierge", "Spa", "Kids Play Area", "BBQ Area"],
    &["Private Garden", "Maid's Room", "Study", "Laundry Room", "Storage"],
    &["Covered Parking", "Central A/C", "Built-in Wardrobes", "Intercom", "CCTV"],
    &["Rooftop Terrace", "Smart Home", "Walk-in Closet", "Kitchen Appliances", "Pets Allowed"],
];

fn images_for(property_type: &str) -> &'static [&'static str] {
    match property_type {
        "villa" => &[
            "https://images.unsplash.com/photo-1613977257363-707ba9348227?w=800",
            "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800",
            "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800",
            "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?w=800",
        ],
        "townhouse" => &[
            "https://images.unsplash.com/photo-1605276374104-dee2a0ed3cd6?w=800",
            "https://images.unsplash.com/photo-1580587771525-78b9dba3b914?w=800",
            "https://images.unsplash.com/photo-1564013799919-ab600027ffc6?w=800",
            "https://images.unsplash.com/photo-1583608205776-bfd35f0d9f83?w=800",
        ],
        "commercial" => &[
            "https://images.unsplash.com/photo-1497366216548-37526070297c?w=800",
            "https://images.unsplash.com/photo-1497366811353-6870744d04b2?w=800",
            "https://images.unsplash.com/photo-1604328698692-f76ea9498e76?w=800",
            "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=800",
        ],
        _ => &[
            "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
            "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?w=800",
            "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800",
            "https://images.unsplash.com/photo-1493809842364-78817add7ffb?w=800",
        ],
    }
}

fn titles_for(property_type: &str) -> &'static [&'static str] {
    match property_type {
        "villa" => &[
            "Magnificent {bedrooms}BR Villa with Private Pool",
            "Exclusive {bedrooms} Bedroom Villa with Garden",
            "Stunning {bedrooms}BR Villa in Gated Community",
            "Elegant {bedrooms}BR Family Villa with Maid's Room",
        ],
        "townhouse" => &[
            "Beautiful {bedrooms}BR Townhouse with Terrace",
            "Modern {bedrooms} Bedroom Townhouse in Community",
            "Spacious {bedrooms}BR Townhouse with Garden",
            "Brand New {bedrooms}BR Townhouse Ready to Move",
        ],
        "commercial" => &[
            "Premium Office Space - {size} sqft",
            "Retail Shop in Prime Location - {size} sqft",
            "Grade A Office in Business District - {size} sqft",
            "Showroom Space in Mall - {size} sqft",
        ],
        _ => &[
            "Luxurious {bedrooms}BR Apartment with Sea View",
            "Modern {bedrooms}BR Apartment in Prime Location",
            "Stunning {bedrooms} Bedroom Apartment with Balcony",
            "Contemporary {bedrooms}BR Apartment near Metro",
        ],
    }
}

pub fn available_locations() -> Vec<FilterOption> {
    DUBAI_LOCATIONS
        .iter()
        .map(|(name, _, _)| FilterOption {
            id: name.to_string(),
            label: name.to_string(),
        })
        .collect()
}

/// Generate listings matching the filters: up to three matching areas,
/// two to four listings per area/type combination, price filters applied,
/// featured-then-newest ordering, capped at twenty results.
pub fn search(filters: &PropertyFilters) -> Vec<PropertyData> {
    let matching_locations: Vec<&(&str, f64, f64)> = match &filters.location {
        Some(query) => {
            let query = query.to_lowercase();
            let matches: Vec<_> = DUBAI_LOCATIONS
                .iter()
                .filter(|(name, _, _)| name.to_lowercase().contains(&query))
                .collect();
            if matches.is_empty() {
                vec![&DUBAI_LOCATIONS[0]]
            } else {
                matches
            }
        }
        None => DUBAI_LOCATIONS.iter().collect(),
    };

    let property_types: Vec<&str> = match &filters.property_type {
        Some(t) => vec![t.as_str()],
        None => PROPERTY_TYPES.to_vec(),
    };

    let mut rng = rand::thread_rng();
    let mut properties = Vec::new();
    let mut idx = 0usize;

    for location in matching_locations.iter().take(3) {
        for property_type in &property_types {
            for _ in 0..rng.gen_range(2..=4) {
                let listing = generate(&mut rng, idx, filters, location, property_type);

                if filters.min_price.is_some_and(|min| listing.price < min) {
                    continue;
                }
                if filters.max_price.is_some_and(|max| listing.price > max) {
                    continue;
                }

                properties.push(listing);
                idx += 1;
            }
        }
    }

    properties.sort_by(|a, b| {
        b.is_featured
            .cmp(&a.is_featured)
            .then_with(|| b.listing_date.cmp(&a.listing_date))
    });
    properties.truncate(MAX_RESULTS);
    properties
}

fn generate(
    rng: &mut impl Rng,
    idx: usize,
    filters: &PropertyFilters,
    location: &(&str, f64, f64),
    property_type: &str,
) -> PropertyData {
    let (area_name, lat, lng) = *location;

    let purpose = filters
        .purpose
        .clone()
        .unwrap_or_else(|| {
            if rng.gen_bool(0.5) {
                "rent".to_string()
            } else {
                "buy".to_string()
            }
        });

    let bedrooms = match filters.bedrooms {
        Some(n) => n,
        None => match property_type {
            "commercial" => 0,
            "villa" => *[3, 4, 5, 6].choose(rng).unwrap_or(&4),
            "townhouse" => *[2, 3, 4].choose(rng).unwrap_or(&3),
            _ => *[1, 2, 3, 4].choose(rng).unwrap_or(&2),
        },
    };

    let size_sqft = match property_type {
        "commercial" => rng.gen_range(500..=5000),
        "villa" => rng.gen_range(2500..=8000),
        "townhouse" => rng.gen_range(1500..=3500),
        _ => rng.gen_range(500..=2500),
    };

    let (price, price_period) = if purpose == "rent" {
        let yearly = match property_type {
            "commercial" => rng.gen_range(50_000..=500_000),
            "villa" => rng.gen_range(150_000..=800_000),
            "townhouse" => rng.gen_range(80_000..=300_000),
            _ => rng.gen_range(40_000..=250_000),
        };
        (yearly as f64, Some("yearly".to_string()))
    } else {
        let price = match property_type {
            "commercial" => rng.gen_range(1_000_000..=20_000_000),
            "villa" => rng.gen_range(2_000_000..=50_000_000),
            "townhouse" => rng.gen_range(1_500_000..=8_000_000),
            _ => rng.gen_range(500_000..=10_000_000),
        };
        (price as f64, None)
    };

    let title = titles_for(property_type)
        .choose(rng)
        .copied()
        .unwrap_or("{bedrooms}BR Property")
        .replace("{bedrooms}", &bedrooms.to_string())
        .replace("{size}", &size_sqft.to_string());

    let description = if property_type == "commercial" {
        format!(
            "Prime commercial space in {area_name}. This {size_sqft} sqft space offers \
             excellent visibility and is ideal for businesses looking for a strategic \
             location in {CITY}."
        )
    } else {
        format!(
            "Beautiful {bedrooms} bedroom {property_type} located in the heart of \
             {area_name}. This {size_sqft} sqft property features modern finishes, ample \
             natural light, and stunning views."
        )
    };

    let images = images_for(property_type);
    let image_urls: Vec<String> = images
        .choose_multiple(rng, 3.min(images.len()))
        .map(|url| url.to_string())
        .collect();

    let mut amenities: Vec<String> = AMENITY_SETS
        .choose_multiple(rng, 2)
        .flat_map(|set| set.iter().map(|a| a.to_string()))
        .collect();
    amenities.dedup();
    amenities.truncate(6);

    let (agent_name, company, phone, image) = AGENTS.choose(rng).copied().unwrap_or(AGENTS[0]);

    let listing_date = (Utc::now() - Duration::days(rng.gen_range(1..=60))).to_rfc3339();

    PropertyData {
        id: format!("prop-{}", idx + 1),
        title,
        description,
        property_type: property_type.to_string(),
        purpose,
        price,
        currency: "AED".to_string(),
        price_period,
        bedrooms,
        bathrooms: if property_type == "commercial" {
            1
        } else {
            bedrooms.saturating_sub(1).max(1)
        },
        size_sqft,
        location: LocationData {
            area_name: area_name.to_string(),
            city: CITY.to_string(),
            lat: lat + rng.gen_range(-0.01..=0.01),
            lng: lng + rng.gen_range(-0.01..=0.01),
        },
        amenities,
        image_urls,
        agent: AgentData {
            name: agent_name.to_string(),
            company: company.to_string(),
            phone: phone.to_string(),
            image_url: image.to_string(),
        },
        is_featured: rng.gen_bool(0.2),
        is_verified: rng.gen_bool(0.7),
        listing_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_are_capped() {
        let results = search(&PropertyFilters::default());
        assert!(results.len() <= MAX_RESULTS);
        assert!(!results.is_empty());
    }

    #[test]
    fn test_type_filter_is_exclusive() {
        let filters = PropertyFilters {
            property_type: Some("villa".to_string()),
            ..Default::default()
        };
        assert!(search(&filters).iter().all(|p| p.property_type == "villa"));
    }

    #[test]
    fn test_purpose_filter_fixes_purpose_and_period() {
        let filters = PropertyFilters {
            purpose: Some("rent".to_string()),
            ..Default::default()
        };
        for listing in search(&filters) {
            assert_eq!(listing.purpose, "rent");
            assert_eq!(listing.price_period.as_deref(), Some("yearly"));
        }
    }

    #[test]
    fn test_location_substring_match_is_case_insensitive() {
        let filters = PropertyFilters {
            location: Some("marina".to_string()),
            ..Default::default()
        };
        for listing in search(&filters) {
            assert_eq!(listing.location.area_name, "Dubai Marina");
        }
    }

    #[test]
    fn test_price_filters_bound_results() {
        let filters = PropertyFilters {
            purpose: Some("rent".to_string()),
            min_price: Some(100_000.0),
            max_price: Some(400_000.0),
            ..Default::default()
        };
        for listing in search(&filters) {
            assert!(listing.price >= 100_000.0 && listing.price <= 400_000.0);
        }
    }

    #[test]
    fn test_featured_listings_sort_first() {
        let results = search(&PropertyFilters::default());
        let first_regular = results.iter().position(|p| !p.is_featured);
        if let Some(boundary) = first_regular {
            assert!(
                results[boundary..].iter().all(|p| !p.is_featured),
                "featured listings must precede regular ones"
            );
        }
    }
}

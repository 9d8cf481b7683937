use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuisineData {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl CuisineData {
    fn new(id: &str, name: &str, slug: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// Restaurant record as the delivery widget renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub review_count: u32,
    pub delivery_time_min: u32,
    pub delivery_time_max: u32,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    pub cuisines: Vec<CuisineData>,
    pub is_promoted: bool,
    pub has_free_delivery: bool,
    pub discount_percent: u32,
    pub logo_url: String,
    pub cover_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    pub is_open: bool,
}

/// Source of restaurant listings. The output shape is the contract with
/// the widget; where the records come from is up to the implementation.
pub trait RestaurantProvider: Send + Sync {
    fn restaurants(
        &self,
        lat: f64,
        lng: f64,
        page: u32,
        size: u32,
        cuisine: Option<&str>,
    ) -> Vec<RestaurantData>;

    /// Total the provider advertises, used for the `has_more` pagination
    /// flag.
    fn total_count(&self) -> u32;
}

const RESTAURANT_NAMES: &[(&str, &str, &str)] = &[
    (
        "Al Mallah",
        "Authentic Lebanese shawarma and grills",
        "https://images.unsplash.com/photo-1555939594-58d7cb561ad1?w=200",
    ),
    (
        "Biryani Express",
        "Royal Hyderabadi biryani specialists",
        "https://images.unsplash.com/photo-1563379091339-03b21ab4a4f8?w=200",
    ),
    (
        "Pizza Di Rocco",
        "Wood-fired Neapolitan pizzas",
        "https://images.unsplash.com/photo-1565299624946-b28f40a0ae38?w=200",
    ),
    (
        "Dragon Palace",
        "Traditional Cantonese cuisine",
        "https://images.unsplash.com/photo-1525755662778-989d0524087e?w=200",
    ),
    (
        "Shake Shack",
        "Premium burgers and shakes",
        "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?w=200",
    ),
    (
        "Sushi Lab",
        "Creative Japanese fusion rolls",
        "https://images.unsplash.com/photo-1579871494447-9811cf80d66c?w=200",
    ),
    (
        "Tacos El Paso",
        "Authentic Mexican street food",
        "https://images.unsplash.com/photo-1565299585323-38d6b0865b47?w=200",
    ),
    (
        "Zaatar W Zeit",
        "Fresh Lebanese manakish",
        "https://images.unsplash.com/photo-1579684947550-22e945225d9a?w=200",
    ),
    (
        "Thai Orchid",
        "Aromatic Thai curries",
        "https://images.unsplash.com/photo-1562565652-a0d8f0c59eb4?w=200",
    ),
    (
        "Protein House",
        "Healthy bowls and smoothies",
        "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=200",
    ),
    (
        "Kebab Factory",
        "Premium grilled kebabs",
        "https://images.unsplash.com/photo-1603360946369-dc9bb6258143?w=200",
    ),
    (
        "Curry House",
        "North Indian delicacies",
        "https://images.unsplash.com/photo-1585937421612-70a008356fbe?w=200",
    ),
];

const MOCK_TOTAL_COUNT: u32 = 150;

/// Mock provider cycling through a fixed name table with randomized
/// ratings, fees and distances.
pub struct MockRestaurantProvider {
    cuisine_sets: Vec<Vec<CuisineData>>,
}

impl Default for MockRestaurantProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRestaurantProvider {
    pub fn new() -> Self {
        Self {
            cuisine_sets: vec![
                vec![CuisineData::new("1", "Arabic", "arabic")],
                vec![
                    CuisineData::new("2", "Indian", "indian"),
                    CuisineData::new("3", "Pakistani", "pakistani"),
                ],
                vec![
                    CuisineData::new("4", "Italian", "italian"),
                    CuisineData::new("5", "Pizza", "pizza"),
                ],
                vec![
                    CuisineData::new("6", "Chinese", "chinese"),
                    CuisineData::new("7", "Asian", "asian"),
                ],
                vec![
                    CuisineData::new("8", "American", "american"),
                    CuisineData::new("9", "Burgers", "burgers"),
                ],
                vec![
                    CuisineData::new("10", "Japanese", "japanese"),
                    CuisineData::new("11", "Sushi", "sushi"),
                ],
                vec![CuisineData::new("12", "Mexican", "mexican")],
                vec![
                    CuisineData::new("13", "Lebanese", "lebanese"),
                    CuisineData::new("1", "Arabic", "arabic"),
                ],
                vec![
                    CuisineData::new("14", "Thai", "thai"),
                    CuisineData::new("7", "Asian", "asian"),
                ],
                vec![
                    CuisineData::new("15", "Healthy", "healthy"),
                    CuisineData::new("16", "Salads", "salads"),
                ],
            ],
        }
    }
}

impl RestaurantProvider for MockRestaurantProvider {
    fn restaurants(
        &self,
        lat: f64,
        lng: f64,
        page: u32,
        size: u32,
        _cuisine: Option<&str>,
    ) -> Vec<RestaurantData> {
        let mut rng = rand::thread_rng();
        let start = (page.saturating_sub(1) as usize).saturating_mul(size as usize);

        (0..size as usize)
            .map(|i| {
                let idx = (start + i) % RESTAURANT_NAMES.len();
                let (name, description, logo) = RESTAURANT_NAMES[idx];
                let cuisines = self.cuisine_sets[idx % self.cuisine_sets.len()].clone();

                RestaurantData {
                    id: format!("rest-{}", start + i + 1),
                    name: name.to_string(),
                    description: description.to_string(),
                    rating: (rng.gen_range(3.5..=5.0_f64) * 10.0).round() / 10.0,
                    review_count: rng.gen_range(50..=2000),
                    delivery_time_min: rng.gen_range(15..=35),
                    delivery_time_max: rng.gen_range(35..=55),
                    delivery_fee: rng.gen_range(0.0..=10.0_f64).round(),
                    minimum_order: rng.gen_range(20.0..=50.0_f64).round(),
                    cuisines,
                    is_promoted: i < 2,
                    has_free_delivery: rng.gen_bool(0.3),
                    discount_percent: *[0, 0, 0, 10, 15, 20, 25].choose(&mut rng).unwrap_or(&0),
                    logo_url: logo.to_string(),
                    cover_url: logo.replace("w=200", "w=800"),
                    latitude: lat + rng.gen_range(-0.05..=0.05),
                    longitude: lng + rng.gen_range(-0.05..=0.05),
                    distance_km: (rng.gen_range(0.5..=5.0_f64) * 10.0).round() / 10.0,
                    is_open: true,
                }
            })
            .collect()
    }

    fn total_count(&self) -> u32 {
        MOCK_TOTAL_COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_exactly_requested_page_size() {
        let provider = MockRestaurantProvider::new();
        let page = provider.restaurants(25.2, 55.27, 1, 10, None);
        assert_eq!(page.len(), 10);
    }

    #[test]
    fn test_ids_continue_across_pages() {
        let provider = MockRestaurantProvider::new();
        let second = provider.restaurants(25.2, 55.27, 2, 5, None);
        assert_eq!(second[0].id, "rest-6");
    }

    #[test]
    fn test_generated_values_stay_in_declared_ranges() {
        let provider = MockRestaurantProvider::new();
        for restaurant in provider.restaurants(25.2, 55.27, 1, 24, None) {
            assert!((3.5..=5.0).contains(&restaurant.rating));
            assert!((50..=2000).contains(&restaurant.review_count));
            assert!(!restaurant.cuisines.is_empty());
            assert!(restaurant.is_open);
        }
    }
}

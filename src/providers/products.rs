use serde::{Deserialize, Serialize};

pub const CURRENCY: &str = "AED";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub item_count: u32,
}

/// Grocery item as the quick-delivery widget renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub original_price: f64,
    pub currency: String,
    pub unit: String,
    pub quantity_available: u32,
    pub category_id: String,
    pub category_name: String,
    pub image_url: String,
    pub is_promoted: bool,
    pub is_new: bool,
    pub discount_percent: u32,
    pub brand: String,
}

/// Source of grocery items and their category tree.
pub trait ProductProvider: Send + Sync {
    fn products(
        &self,
        lat: f64,
        lng: f64,
        category: Option<&str>,
    ) -> (Vec<ProductData>, Vec<CategoryData>);
}

fn category(id: &str, name: &str, slug: &str, icon: &str, item_count: u32) -> CategoryData {
    CategoryData {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        icon: icon.to_string(),
        item_count,
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    price: f64,
    original_price: f64,
    unit: &str,
    quantity_available: u32,
    category_id: &str,
    category_name: &str,
    image_url: &str,
    is_promoted: bool,
    is_new: bool,
    discount_percent: u32,
    brand: &str,
) -> ProductData {
    ProductData {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        original_price,
        currency: CURRENCY.to_string(),
        unit: unit.to_string(),
        quantity_available,
        category_id: category_id.to_string(),
        category_name: category_name.to_string(),
        image_url: image_url.to_string(),
        is_promoted,
        is_new,
        discount_percent,
        brand: brand.to_string(),
    }
}

/// Fixed in-process catalog standing in for a quick-commerce inventory
/// service.
pub struct MockProductProvider {
    categories: Vec<CategoryData>,
    catalog: Vec<ProductData>,
}

impl Default for MockProductProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProductProvider {
    pub fn new() -> Self {
        let categories = vec![
            category("fruits", "Fruits & Vegetables", "fruits-vegetables", "🥬", 45),
            category("dairy", "Dairy & Eggs", "dairy-eggs", "🥛", 32),
            category("bakery", "Bakery", "bakery", "🍞", 28),
            category("beverages", "Beverages", "beverages", "🥤", 56),
            category("snacks", "Snacks", "snacks", "🍿", 67),
            category("frozen", "Frozen Foods", "frozen", "🧊", 41),
            category("household", "Household", "household", "🧹", 38),
            category("personal", "Personal Care", "personal-care", "🧴", 52),
        ];

        let catalog = vec![
            product("p1", "Fresh Bananas", "Sweet ripe bananas", 5.99, 5.99, "1 kg", 50, "fruits", "Fruits & Vegetables", "https://images.unsplash.com/photo-1571771894821-ce9b6c11b08e?w=300", true, false, 0, "Farm Fresh"),
            product("p2", "Organic Avocados", "Perfectly ripe Hass avocados", 12.99, 15.99, "Pack of 3", 30, "fruits", "Fruits & Vegetables", "https://images.unsplash.com/photo-1523049673857-eb18f1d7b578?w=300", false, true, 19, "Organic Valley"),
            product("p3", "Red Tomatoes", "Vine-ripened tomatoes", 4.49, 4.49, "500g", 100, "fruits", "Fruits & Vegetables", "https://images.unsplash.com/photo-1592924357228-91a4daadcfea?w=300", false, false, 0, "Local Farm"),
            product("p4", "Fresh Spinach", "Crisp baby spinach leaves", 7.99, 9.99, "200g", 40, "fruits", "Fruits & Vegetables", "https://images.unsplash.com/photo-1576045057995-568f588f82fb?w=300", false, false, 20, "Green Fields"),
            product("p5", "Fresh Milk", "Full cream pasteurized milk", 6.50, 6.50, "1 Liter", 80, "dairy", "Dairy & Eggs", "https://images.unsplash.com/photo-1563636619-e9143da7973b?w=300", true, false, 0, "Al Rawabi"),
            product("p6", "Free Range Eggs", "Farm fresh free range eggs", 15.99, 15.99, "12 pieces", 60, "dairy", "Dairy & Eggs", "https://images.unsplash.com/photo-1582722872445-44dc5f7e3c8f?w=300", false, false, 0, "Happy Hens"),
            product("p7", "Greek Yogurt", "Creamy strained yogurt", 8.99, 10.99, "500g", 45, "dairy", "Dairy & Eggs", "https://images.unsplash.com/photo-1488477181946-6428a0291777?w=300", false, true, 18, "Chobani"),
            product("p8", "Whole Wheat Bread", "Fresh baked whole wheat loaf", 5.50, 5.50, "500g", 25, "bakery", "Bakery", "https://images.unsplash.com/photo-1509440159596-0249088772ff?w=300", false, false, 0, "Bakers Delight"),
            product("p9", "Croissants", "Buttery French croissants", 12.99, 14.99, "Pack of 4", 20, "bakery", "Bakery", "https://images.unsplash.com/photo-1555507036-ab1f4038808a?w=300", true, false, 13, "Paul"),
            product("p10", "Orange Juice", "100% fresh squeezed orange juice", 9.99, 9.99, "1 Liter", 70, "beverages", "Beverages", "https://images.unsplash.com/photo-1621506289937-a8e4df240d0b?w=300", false, false, 0, "Tropicana"),
            product("p11", "Mineral Water", "Natural spring water", 2.50, 2.50, "1.5 Liter", 200, "beverages", "Beverages", "https://images.unsplash.com/photo-1548839140-29a749e1cf4d?w=300", false, false, 0, "Evian"),
            product("p12", "Cold Brew Coffee", "Premium cold brew coffee", 14.99, 18.99, "500ml", 30, "beverages", "Beverages", "https://images.unsplash.com/photo-1461023058943-07fcbe16d735?w=300", false, true, 21, "Starbucks"),
            product("p13", "Mixed Nuts", "Premium roasted mixed nuts", 24.99, 29.99, "500g", 40, "snacks", "Snacks", "https://images.unsplash.com/photo-1599599810769-bcde5a160d32?w=300", true, false, 17, "Planters"),
            product("p14", "Potato Chips", "Classic salted potato chips", 7.99, 7.99, "200g", 90, "snacks", "Snacks", "https://images.unsplash.com/photo-1566478989037-eec170784d0b?w=300", false, false, 0, "Lay's"),
            product("p15", "Dark Chocolate", "72% cocoa dark chocolate", 11.99, 11.99, "100g", 55, "snacks", "Snacks", "https://images.unsplash.com/photo-1549007994-cb92caebd54b?w=300", false, false, 0, "Lindt"),
            product("p16", "Frozen Pizza", "Classic margherita frozen pizza", 18.99, 18.99, "400g", 35, "frozen", "Frozen Foods", "https://images.unsplash.com/photo-1565299624946-b28f40a0ae38?w=300", true, false, 0, "Dr. Oetker"),
            product("p17", "Ice Cream Tub", "Belgian chocolate ice cream", 32.99, 38.99, "1 Liter", 25, "frozen", "Frozen Foods", "https://images.unsplash.com/photo-1497034825429-c343d7c6a68f?w=300", false, false, 15, "Häagen-Dazs"),
            product("p18", "Chicken Nuggets", "Crispy breaded chicken nuggets", 24.99, 24.99, "500g", 45, "frozen", "Frozen Foods", "https://images.unsplash.com/photo-1562967914-608f82629710?w=300", false, true, 0, "Tyson"),
            product("p19", "Dish Soap", "Lemon fresh dishwashing liquid", 8.99, 8.99, "750ml", 80, "household", "Household", "https://images.unsplash.com/photo-1585421514284-efb74c2b69ba?w=300", false, false, 0, "Fairy"),
            product("p20", "Laundry Detergent", "Deep clean liquid detergent", 34.99, 39.99, "3 Liter", 50, "household", "Household", "https://images.unsplash.com/photo-1610557892470-55d9e80c0bce?w=300", true, false, 13, "Persil"),
            product("p21", "Kitchen Towels", "Ultra absorbent paper towels", 15.99, 15.99, "6 Rolls", 70, "household", "Household", "https://images.unsplash.com/photo-1583947215259-38e31be8751f?w=300", false, false, 0, "Bounty"),
            product("p22", "Shampoo", "Moisturizing argan oil shampoo", 28.99, 28.99, "400ml", 45, "personal", "Personal Care", "https://images.unsplash.com/photo-1631729371254-42c2892f0e6e?w=300", false, false, 0, "Pantene"),
            product("p23", "Body Wash", "Refreshing citrus body wash", 19.99, 24.99, "500ml", 60, "personal", "Personal Care", "https://images.unsplash.com/photo-1556228578-0d85b1a4d571?w=300", true, false, 20, "Dove"),
            product("p24", "Toothpaste", "Whitening mint toothpaste", 12.99, 12.99, "100ml", 120, "personal", "Personal Care", "https://images.unsplash.com/photo-1609840114035-3c981b782dfe?w=300", false, false, 0, "Colgate"),
        ];

        Self {
            categories,
            catalog,
        }
    }
}

impl ProductProvider for MockProductProvider {
    fn products(
        &self,
        _lat: f64,
        _lng: f64,
        category: Option<&str>,
    ) -> (Vec<ProductData>, Vec<CategoryData>) {
        let products = match category {
            Some(id) => self
                .catalog
                .iter()
                .filter(|p| p.category_id == id)
                .cloned()
                .collect(),
            None => self.catalog.clone(),
        };
        (products, self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_limits_results() {
        let provider = MockProductProvider::new();
        let (products, categories) = provider.products(25.2, 55.27, Some("dairy"));
        assert!(!products.is_empty());
        assert!(products.iter().all(|p| p.category_id == "dairy"));
        assert_eq!(categories.len(), 8);
    }

    #[test]
    fn test_unknown_category_yields_empty_list_not_error() {
        let provider = MockProductProvider::new();
        let (products, _) = provider.products(25.2, 55.27, Some("electronics"));
        assert!(products.is_empty());
    }

    #[test]
    fn test_full_catalog_returned_without_filter() {
        let provider = MockProductProvider::new();
        let (products, _) = provider.products(25.2, 55.27, None);
        assert_eq!(products.len(), 24);
        assert!(products.iter().all(|p| p.currency == CURRENCY));
    }
}

use lightbnb_store::models::{NewProperty, NewUser};
use rust_decimal::Decimal;

/// Builder for property listings with sensible defaults
pub struct PropertyBuilder {
    owner_id: i32,
    title: String,
    city: String,
    cost_per_night: Decimal,
    bedrooms: i32,
}

impl PropertyBuilder {
    pub fn new(owner_id: i32) -> Self {
        Self {
            owner_id,
            title: "Cozy place".to_string(),
            city: "Toronto".to_string(),
            cost_per_night: Decimal::from(100),
            bedrooms: 2,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Nightly cost in major units.
    pub fn cost(mut self, dollars: i64) -> Self {
        self.cost_per_night = Decimal::from(dollars);
        self
    }

    pub fn bedrooms(mut self, bedrooms: i32) -> Self {
        self.bedrooms = bedrooms;
        self
    }

    pub fn build(self) -> NewProperty {
        NewProperty {
            owner_id: self.owner_id,
            title: self.title,
            description: "description".to_string(),
            thumbnail_photo_url: "https://images.example.com/thumb.jpg".to_string(),
            cover_photo_url: "https://images.example.com/cover.jpg".to_string(),
            cost_per_night: self.cost_per_night,
            street: "123 Main Street".to_string(),
            city: self.city,
            province: "Ontario".to_string(),
            post_code: "M5V 2T6".to_string(),
            country: "Canada".to_string(),
            parking_spaces: 1,
            number_of_bathrooms: 1,
            number_of_bedrooms: self.bedrooms,
        }
    }
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
    }
}

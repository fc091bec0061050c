use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ListingId);
id_newtype!(SellerId);
id_newtype!(UserId);

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_DRAFT: &str = "DRAFT";
pub const STATUS_SOLD: &str = "SOLD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bike,
    Car,
    Laptop,
    Mobile,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Bike,
        Category::Car,
        Category::Laptop,
        Category::Mobile,
    ];

    /// Lowercase singular noun used in user-facing messages ("Failed to update car").
    pub fn noun(self) -> &'static str {
        match self {
            Category::Bike => "bike",
            Category::Car => "car",
            Category::Laptop => "laptop",
            Category::Mobile => "mobile",
        }
    }

    /// Capitalised form for notices ("Car soft-deleted").
    pub fn label(self) -> &'static str {
        match self {
            Category::Bike => "Bike",
            Category::Car => "Car",
            Category::Laptop => "Laptop",
            Category::Mobile => "Mobile",
        }
    }

    /// Key under which the catalog service reports a listing's identifier.
    pub fn id_key(self) -> &'static str {
        match self {
            Category::Bike => "bikeId",
            Category::Car => "carId",
            Category::Laptop => "laptopId",
            Category::Mobile => "mobileId",
        }
    }

    /// Key under which the asking price is serialized. Bikes use `prize`.
    pub fn price_key(self) -> &'static str {
        match self {
            Category::Bike => "prize",
            _ => "price",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bike" | "bikes" => Ok(Category::Bike),
            "car" | "cars" => Ok(Category::Car),
            "laptop" | "laptops" => Ok(Category::Laptop),
            "mobile" | "mobiles" => Ok(Category::Mobile),
            _ => Err(UnknownCategory(value.to_string())),
        }
    }
}

//! Per-category field descriptors.
//!
//! The four categories share their validation, diff and update-payload algorithms; what
//! differs between them lives in the static tables below.

use chrono::Datelike;
use shared::domain::Category;

use crate::form::FormState;

pub const MIN_VEHICLE_YEAR: i32 = 1990;
pub const MIN_MOBILE_YEAR: i32 = 2000;
pub const MAX_PRICE: f64 = 100_000_000.0;

pub const CONDITIONS: &[&str] = &["NEW", "USED", "REFURBISHED"];
pub const MOBILE_CONDITIONS: &[&str] = &["NEW", "USED"];
pub const CAR_FUEL_TYPES: &[&str] = &["PETROL", "DIESEL", "CNG", "ELECTRIC", "HYBRID"];
pub const BIKE_FUEL_TYPES: &[&str] = &["PETROL", "ELECTRIC", "HYBRID"];
pub const TRANSMISSIONS: &[&str] = &["MANUAL", "AUTOMATIC"];

/// Calendar year on the local clock; upper bound for every year field.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text; lengths count trimmed characters. `min <= 1` means "non-empty".
    Text { min: usize, max: usize },
    /// Monetary amount: strictly positive, at most `max`.
    Price { max: f64 },
    /// Whole number within `min..=max`; no upper bound when `max` is `None`.
    Count { min: i64, max: Option<i64> },
    /// Year between `min` and the current calendar year.
    Year { min: i32 },
    /// Calendar date written as `YYYY-MM-DD`.
    Date,
    /// One of a fixed option set.
    Choice(&'static [&'static str]),
    /// Yes/no picker that starts out unset.
    Flag,
    /// Feature toggle that defaults to off and never fails validation.
    Feature,
    /// Exactly `n` ASCII digits (postal codes).
    Digits(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Required only while the named flag is `true`.
    RequiredWhen(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
}

impl FieldSpec {
    const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Required,
        }
    }

    const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Optional,
        }
    }

    const fn required_when(
        flag: &'static str,
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::RequiredWhen(flag),
        }
    }

    /// Whether the field must hold a value given the rest of the form.
    pub fn is_required_in(&self, form: &FormState) -> bool {
        match self.requirement {
            Requirement::Required => true,
            Requirement::Optional => false,
            Requirement::RequiredWhen(flag) => form.flag(flag) == Some(true),
        }
    }
}

#[derive(Debug)]
pub struct CategorySchema {
    pub category: Category,
    pub fields: &'static [FieldSpec],
}

impl CategorySchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Fields a submit attempt checks: the required ones plus conditionally required
    /// ones whose governing flag is on.
    pub fn checked_fields<'a>(
        &'a self,
        form: &'a FormState,
    ) -> impl Iterator<Item = &'static FieldSpec> + 'a {
        self.fields.iter().filter(move |spec| spec.is_required_in(form))
    }
}

pub fn schema_for(category: Category) -> &'static CategorySchema {
    match category {
        Category::Bike => &BIKE,
        Category::Car => &CAR,
        Category::Laptop => &LAPTOP,
        Category::Mobile => &MOBILE,
    }
}

const fn text(min: usize, max: usize) -> FieldKind {
    FieldKind::Text { min, max }
}

const PRICE: FieldKind = FieldKind::Price { max: MAX_PRICE };

static CAR: CategorySchema = CategorySchema {
    category: Category::Car,
    fields: &[
        FieldSpec::required("title", "Title", text(10, 100)),
        FieldSpec::required("description", "Description", text(30, 500)),
        FieldSpec::required("price", "Price", PRICE),
        FieldSpec::required("negotiable", "Negotiable", FieldKind::Flag),
        FieldSpec::required("condition", "Condition", FieldKind::Choice(CONDITIONS)),
        FieldSpec::required("brand", "Brand", text(1, 50)),
        FieldSpec::required("model", "Model", text(1, 50)),
        FieldSpec::optional("variant", "Variant", text(0, 50)),
        FieldSpec::required("color", "Color", text(1, 40)),
        FieldSpec::required(
            "yearOfPurchase",
            "Year of purchase",
            FieldKind::Year {
                min: MIN_VEHICLE_YEAR,
            },
        ),
        FieldSpec::required("fuelType", "Fuel type", FieldKind::Choice(CAR_FUEL_TYPES)),
        FieldSpec::required(
            "transmission",
            "Transmission",
            FieldKind::Choice(TRANSMISSIONS),
        ),
        FieldSpec::optional(
            "kmDriven",
            "Kilometers",
            FieldKind::Count { min: 0, max: None },
        ),
        FieldSpec::optional(
            "numberOfOwners",
            "Number of owners",
            FieldKind::Count {
                min: 1,
                max: Some(10),
            },
        ),
        FieldSpec::optional("carInsurance", "Car insurance", FieldKind::Flag),
        FieldSpec::required_when(
            "carInsurance",
            "carInsuranceType",
            "Insurance type",
            text(1, 50),
        ),
        FieldSpec::required_when(
            "carInsurance",
            "carInsuranceDate",
            "Insurance valid till",
            FieldKind::Date,
        ),
        FieldSpec::optional("address", "Address", text(0, 100)),
        FieldSpec::optional("city", "City", text(0, 50)),
        FieldSpec::optional("state", "State", text(0, 50)),
        FieldSpec::optional("pincode", "Pincode", FieldKind::Digits(6)),
        FieldSpec::optional("airbag", "Airbag", FieldKind::Feature),
        FieldSpec::optional("abs", "ABS", FieldKind::Feature),
        FieldSpec::optional("buttonStart", "Button start", FieldKind::Feature),
        FieldSpec::optional("sunroof", "Sunroof", FieldKind::Feature),
        FieldSpec::optional("childSafetyLocks", "Child safety locks", FieldKind::Feature),
        FieldSpec::optional("acFeature", "AC", FieldKind::Feature),
        FieldSpec::optional("musicFeature", "Music system", FieldKind::Feature),
        FieldSpec::optional("powerWindowFeature", "Power windows", FieldKind::Feature),
        FieldSpec::optional(
            "rearParkingCameraFeature",
            "Rear parking camera",
            FieldKind::Feature,
        ),
    ],
};

static MOBILE: CategorySchema = CategorySchema {
    category: Category::Mobile,
    fields: &[
        FieldSpec::required("title", "Title", text(10, 80)),
        FieldSpec::required("description", "Description", text(30, 400)),
        FieldSpec::required("price", "Price", PRICE),
        FieldSpec::required(
            "condition",
            "Condition",
            FieldKind::Choice(MOBILE_CONDITIONS),
        ),
        FieldSpec::required("brand", "Brand", text(1, 40)),
        FieldSpec::required("model", "Model", text(1, 40)),
        FieldSpec::required("color", "Color", text(1, 40)),
        FieldSpec::required(
            "yearOfPurchase",
            "Year of purchase",
            FieldKind::Year {
                min: MIN_MOBILE_YEAR,
            },
        ),
        FieldSpec::required("negotiable", "Negotiable", FieldKind::Flag),
    ],
};

static LAPTOP: CategorySchema = CategorySchema {
    category: Category::Laptop,
    fields: &[
        FieldSpec::required("serialNumber", "Serial number", text(1, 50)),
        FieldSpec::optional("dealer", "Dealer", text(0, 100)),
        FieldSpec::required("brand", "Brand", text(1, 50)),
        FieldSpec::required("model", "Model", text(1, 50)),
        FieldSpec::required("price", "Price", PRICE),
        FieldSpec::required(
            "warrantyInYear",
            "Warranty",
            FieldKind::Count {
                min: 0,
                max: Some(10),
            },
        ),
        FieldSpec::optional("processor", "Processor", text(0, 50)),
        FieldSpec::optional("processorBrand", "Processor brand", text(0, 50)),
        FieldSpec::optional("memoryType", "Memory type", text(0, 50)),
        FieldSpec::optional("screenSize", "Screen size", text(0, 50)),
        FieldSpec::optional("colour", "Colour", text(0, 50)),
        FieldSpec::optional("ram", "RAM", text(0, 50)),
        FieldSpec::optional("storage", "Storage", text(0, 50)),
        FieldSpec::optional("battery", "Battery", text(0, 50)),
        FieldSpec::optional("batteryLife", "Battery life", text(0, 50)),
        FieldSpec::optional("graphicsCard", "Graphics card", text(0, 50)),
        FieldSpec::optional("graphicBrand", "Graphics brand", text(0, 50)),
        FieldSpec::optional("weight", "Weight", text(0, 50)),
        FieldSpec::optional("manufacturer", "Manufacturer", text(0, 50)),
        FieldSpec::optional(
            "usbPorts",
            "USB ports",
            FieldKind::Count {
                min: 0,
                max: Some(16),
            },
        ),
    ],
};

static BIKE: CategorySchema = CategorySchema {
    category: Category::Bike,
    fields: &[
        FieldSpec::required("prize", "Price", PRICE),
        FieldSpec::required("brand", "Brand", text(1, 50)),
        FieldSpec::required("model", "Model", text(1, 50)),
        FieldSpec::optional("variant", "Variant", text(0, 50)),
        FieldSpec::required(
            "manufactureYear",
            "Manufacture year",
            FieldKind::Year {
                min: MIN_VEHICLE_YEAR,
            },
        ),
        FieldSpec::optional(
            "engineCC",
            "Engine CC",
            FieldKind::Count {
                min: 50,
                max: Some(2000),
            },
        ),
        FieldSpec::optional(
            "kilometersDriven",
            "Kilometers driven",
            FieldKind::Count { min: 0, max: None },
        ),
        FieldSpec::required("fuelType", "Fuel type", FieldKind::Choice(BIKE_FUEL_TYPES)),
        FieldSpec::required("color", "Color", text(1, 40)),
        FieldSpec::required("registrationNumber", "Registration number", text(1, 15)),
        FieldSpec::required("description", "Description", text(10, 500)),
    ],
};

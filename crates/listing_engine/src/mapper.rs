//! Form → create payload mapping.
//!
//! Mapping never fails: validation has already gated submission, so unparseable
//! numerics degrade to a fallback instead of raising.

use serde::Serialize;
use shared::{
    domain::{Category, SellerId, STATUS_ACTIVE},
    protocol::lenient,
};

use crate::{form::FormState, schema::current_year};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileCreateDto {
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "wire::number")]
    pub price: f64,
    pub negotiable: bool,
    pub condition: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub year_of_purchase: i64,
    pub status: String,
    pub seller_id: SellerId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarCreateDto {
    pub title: String,
    pub description: String,
    pub airbag: bool,
    pub abs: bool,
    pub button_start: bool,
    pub sunroof: bool,
    pub child_safety_locks: bool,
    pub ac_feature: bool,
    pub music_feature: bool,
    #[serde(serialize_with = "wire::number")]
    pub price: f64,
    pub negotiable: bool,
    pub condition: String,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub color: String,
    pub year_of_purchase: i64,
    pub fuel_type: String,
    pub car_insurance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_insurance_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_insurance_type: Option<String>,
    pub transmission: String,
    pub power_window_feature: bool,
    pub rear_parking_camera_feature: bool,
    #[serde(serialize_with = "wire::number")]
    pub km_driven: f64,
    #[serde(serialize_with = "wire::number")]
    pub number_of_owners: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    pub status: String,
    pub seller_id: SellerId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaptopCreateDto {
    pub serial_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer: Option<String>,
    pub brand: String,
    pub model: String,
    #[serde(serialize_with = "wire::number")]
    pub price: f64,
    #[serde(serialize_with = "wire::number")]
    pub warranty_in_year: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_life: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphics_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphic_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::optional_number"
    )]
    pub usb_ports: Option<f64>,
    pub status: String,
    pub seller_id: SellerId,
}

/// Bike payload. The asking price travels as `prize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeCreateDto {
    #[serde(serialize_with = "wire::number")]
    pub prize: f64,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub manufacture_year: i64,
    #[serde(
        rename = "engineCC",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::optional_number"
    )]
    pub engine_cc: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::optional_number"
    )]
    pub kilometers_driven: Option<f64>,
    pub fuel_type: String,
    pub color: String,
    pub registration_number: String,
    pub description: String,
    pub seller_id: SellerId,
    pub status: String,
}

/// Category-specific create payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingDto {
    Bike(BikeCreateDto),
    Car(CarCreateDto),
    Laptop(LaptopCreateDto),
    Mobile(MobileCreateDto),
}

impl ListingDto {
    pub fn category(&self) -> Category {
        match self {
            ListingDto::Bike(_) => Category::Bike,
            ListingDto::Car(_) => Category::Car,
            ListingDto::Laptop(_) => Category::Laptop,
            ListingDto::Mobile(_) => Category::Mobile,
        }
    }

    pub fn seller_id(&self) -> SellerId {
        match self {
            ListingDto::Bike(dto) => dto.seller_id,
            ListingDto::Car(dto) => dto.seller_id,
            ListingDto::Laptop(dto) => dto.seller_id,
            ListingDto::Mobile(dto) => dto.seller_id,
        }
    }
}

/// Builds the create payload for `category` from raw form input.
pub fn to_create_dto(category: Category, form: &FormState, seller_id: SellerId) -> ListingDto {
    match category {
        Category::Bike => ListingDto::Bike(to_bike_dto(form, seller_id)),
        Category::Car => ListingDto::Car(to_car_dto(form, seller_id)),
        Category::Laptop => ListingDto::Laptop(to_laptop_dto(form, seller_id)),
        Category::Mobile => ListingDto::Mobile(to_mobile_dto(form, seller_id)),
    }
}

pub fn to_mobile_dto(form: &FormState, seller_id: SellerId) -> MobileCreateDto {
    MobileCreateDto {
        title: form.trimmed("title"),
        description: form.trimmed("description"),
        price: number_or(form, "price", 0.0),
        negotiable: is_on(form, "negotiable"),
        condition: form.trimmed("condition"),
        brand: form.trimmed("brand"),
        model: form.trimmed("model"),
        color: form.trimmed("color"),
        year_of_purchase: year_or_current(form, "yearOfPurchase"),
        status: STATUS_ACTIVE.to_string(),
        seller_id,
    }
}

/// Unset pickers fall back to USED / PETROL / MANUAL. Insurance details are attached
/// only while the insurance flag is on, whatever was typed into them.
pub fn to_car_dto(form: &FormState, seller_id: SellerId) -> CarCreateDto {
    let insured = is_on(form, "carInsurance");
    CarCreateDto {
        title: form.trimmed("title"),
        description: form.trimmed("description"),
        airbag: is_on(form, "airbag"),
        abs: is_on(form, "abs"),
        button_start: is_on(form, "buttonStart"),
        sunroof: is_on(form, "sunroof"),
        child_safety_locks: is_on(form, "childSafetyLocks"),
        ac_feature: is_on(form, "acFeature"),
        music_feature: is_on(form, "musicFeature"),
        price: number_or(form, "price", 0.0),
        negotiable: is_on(form, "negotiable"),
        condition: choice_or(form, "condition", "USED"),
        brand: form.trimmed("brand"),
        model: form.trimmed("model"),
        variant: trim_or_none(form, "variant"),
        color: form.trimmed("color"),
        year_of_purchase: year_or_current(form, "yearOfPurchase"),
        fuel_type: choice_or(form, "fuelType", "PETROL"),
        car_insurance: insured,
        car_insurance_date: insured
            .then(|| trim_or_none(form, "carInsuranceDate"))
            .flatten(),
        car_insurance_type: insured
            .then(|| trim_or_none(form, "carInsuranceType"))
            .flatten(),
        transmission: choice_or(form, "transmission", "MANUAL"),
        power_window_feature: is_on(form, "powerWindowFeature"),
        rear_parking_camera_feature: is_on(form, "rearParkingCameraFeature"),
        km_driven: number_or(form, "kmDriven", 0.0),
        number_of_owners: number_or(form, "numberOfOwners", 1.0),
        address: trim_or_none(form, "address"),
        city: trim_or_none(form, "city"),
        state: trim_or_none(form, "state"),
        pincode: trim_or_none(form, "pincode"),
        status: STATUS_ACTIVE.to_string(),
        seller_id,
    }
}

pub fn to_laptop_dto(form: &FormState, seller_id: SellerId) -> LaptopCreateDto {
    LaptopCreateDto {
        serial_number: form.trimmed("serialNumber"),
        dealer: trim_or_none(form, "dealer"),
        brand: form.trimmed("brand"),
        model: form.trimmed("model"),
        price: number_or(form, "price", 0.0),
        warranty_in_year: number_or(form, "warrantyInYear", 0.0),
        processor: trim_or_none(form, "processor"),
        processor_brand: trim_or_none(form, "processorBrand"),
        memory_type: trim_or_none(form, "memoryType"),
        screen_size: trim_or_none(form, "screenSize"),
        colour: trim_or_none(form, "colour"),
        ram: trim_or_none(form, "ram"),
        storage: trim_or_none(form, "storage"),
        battery: trim_or_none(form, "battery"),
        battery_life: trim_or_none(form, "batteryLife"),
        graphics_card: trim_or_none(form, "graphicsCard"),
        graphic_brand: trim_or_none(form, "graphicBrand"),
        weight: trim_or_none(form, "weight"),
        manufacturer: trim_or_none(form, "manufacturer"),
        usb_ports: form.get("usbPorts").as_number(),
        status: STATUS_ACTIVE.to_string(),
        seller_id,
    }
}

/// Blank engine size and distance are left out of the payload entirely.
pub fn to_bike_dto(form: &FormState, seller_id: SellerId) -> BikeCreateDto {
    BikeCreateDto {
        prize: number_or(form, "prize", 0.0),
        brand: form.trimmed("brand"),
        model: form.trimmed("model"),
        variant: trim_or_none(form, "variant"),
        manufacture_year: year_or_current(form, "manufactureYear"),
        engine_cc: form.get("engineCC").as_number(),
        kilometers_driven: form.get("kilometersDriven").as_number(),
        fuel_type: form.trimmed("fuelType"),
        color: form.trimmed("color"),
        registration_number: form.trimmed("registrationNumber"),
        description: form.trimmed("description"),
        seller_id,
        status: STATUS_ACTIVE.to_string(),
    }
}

fn trim_or_none(form: &FormState, field: &str) -> Option<String> {
    let trimmed = form.trimmed(field);
    (!trimmed.is_empty()).then_some(trimmed)
}

fn number_or(form: &FormState, field: &str, fallback: f64) -> f64 {
    form.get(field).as_number().unwrap_or(fallback)
}

fn year_or_current(form: &FormState, field: &str) -> i64 {
    form.get(field)
        .as_number()
        .and_then(|year| lenient::whole_number(year.trunc()))
        .unwrap_or_else(|| i64::from(current_year()))
}

fn is_on(form: &FormState, field: &str) -> bool {
    form.flag(field) == Some(true)
}

fn choice_or(form: &FormState, field: &str, fallback: &str) -> String {
    trim_or_none(form, field).unwrap_or_else(|| fallback.to_string())
}

/// JSON number encoding matching what the catalog service expects: whole values are
/// written without a fractional part.
pub(crate) mod wire {
    use serde::{Serialize, Serializer};
    use serde_json::Value;
    use shared::protocol::lenient;

    pub fn to_json(value: f64) -> Value {
        match lenient::whole_number(value) {
            Some(whole) => Value::from(whole),
            None => serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number),
        }
    }

    pub fn number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_json(*value).serialize(serializer)
    }

    pub fn optional_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(to_json).serialize(serializer)
    }
}

#[cfg(test)]
#[path = "tests/mapper_tests.rs"]
mod tests;

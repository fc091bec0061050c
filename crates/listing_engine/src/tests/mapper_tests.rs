use serde_json::json;

use super::*;

const SELLER: SellerId = SellerId(42);

#[test]
fn mobile_dto_trims_text_and_coerces_numbers() {
    let form = FormState::new()
        .with("title", "  Pixel 7 in great shape ")
        .with("description", " Boxed ")
        .with("price", " 32000 ")
        .with("negotiable", true)
        .with("condition", "USED")
        .with("brand", "Google ")
        .with("model", "Pixel 7")
        .with("color", "Obsidian")
        .with("yearOfPurchase", "2023");

    let body = serde_json::to_value(to_create_dto(Category::Mobile, &form, SELLER)).expect("json");
    assert_eq!(
        body,
        json!({
            "title": "Pixel 7 in great shape",
            "description": "Boxed",
            "price": 32000,
            "negotiable": true,
            "condition": "USED",
            "brand": "Google",
            "model": "Pixel 7",
            "color": "Obsidian",
            "yearOfPurchase": 2023,
            "status": "ACTIVE",
            "sellerId": 42
        })
    );
}

#[test]
fn unparseable_required_numbers_fall_back() {
    let form = FormState::new().with("price", "n/a").with("yearOfPurchase", "");
    let dto = to_mobile_dto(&form, SELLER);
    assert_eq!(dto.price, 0.0);
    assert_eq!(dto.year_of_purchase, i64::from(current_year()));
}

#[test]
fn out_of_range_years_fall_back_instead_of_saturating() {
    let form = FormState::new().with("yearOfPurchase", "1e30");
    let dto = to_mobile_dto(&form, SELLER);
    assert_eq!(dto.year_of_purchase, i64::from(current_year()));
    assert_eq!(wire::to_json(1e30), json!(1e30));
}

#[test]
fn car_pickers_default_and_features_stay_off() {
    let form = FormState::blank(Category::Car)
        .with("price", "550000")
        .with("yearOfPurchase", "2019");
    let dto = to_car_dto(&form, SELLER);
    assert_eq!(dto.condition, "USED");
    assert_eq!(dto.fuel_type, "PETROL");
    assert_eq!(dto.transmission, "MANUAL");
    assert!(!dto.airbag && !dto.sunroof && !dto.rear_parking_camera_feature);
    assert_eq!(dto.km_driven, 0.0);
    assert_eq!(dto.number_of_owners, 1.0);

    let body = serde_json::to_value(&dto).expect("json");
    for omitted in ["variant", "address", "city", "state", "pincode"] {
        assert!(body.get(omitted).is_none(), "{omitted} should be omitted");
    }
}

#[test]
fn car_insurance_details_need_the_flag() {
    let typed = FormState::blank(Category::Car)
        .with("carInsurance", false)
        .with("carInsuranceType", "Comprehensive")
        .with("carInsuranceDate", "2026-03-31");
    let body = serde_json::to_value(to_car_dto(&typed, SELLER)).expect("json");
    assert_eq!(body["carInsurance"], json!(false));
    assert!(body.get("carInsuranceType").is_none());
    assert!(body.get("carInsuranceDate").is_none());

    let insured = typed.with("carInsurance", true);
    let body = serde_json::to_value(to_car_dto(&insured, SELLER)).expect("json");
    assert_eq!(body["carInsuranceType"], json!("Comprehensive"));
    assert_eq!(body["carInsuranceDate"], json!("2026-03-31"));
}

#[test]
fn laptop_usb_ports_only_when_numeric() {
    let base = FormState::blank(Category::Laptop)
        .with("serialNumber", "SN-1")
        .with("price", "65000")
        .with("warrantyInYear", "");

    for raw in ["", "   ", "four"] {
        let body = serde_json::to_value(to_laptop_dto(&base.clone().with("usbPorts", raw), SELLER))
            .expect("json");
        assert!(body.get("usbPorts").is_none(), "{raw:?}");
        assert_eq!(body["warrantyInYear"], json!(0));
    }

    let body =
        serde_json::to_value(to_laptop_dto(&base.with("usbPorts", " 3 "), SELLER)).expect("json");
    assert_eq!(body["usbPorts"], json!(3));
}

#[test]
fn bike_uses_prize_and_omits_blank_optional_numbers() {
    let form = FormState::blank(Category::Bike)
        .with("prize", "145000")
        .with("brand", "Royal Enfield")
        .with("model", "Classic 350")
        .with("manufactureYear", "2021")
        .with("fuelType", "PETROL")
        .with("registrationNumber", " KA01AB1234 ");

    let body = serde_json::to_value(to_create_dto(Category::Bike, &form, SELLER)).expect("json");
    assert_eq!(body["prize"], json!(145000));
    assert!(body.get("price").is_none());
    assert!(body.get("engineCC").is_none());
    assert!(body.get("kilometersDriven").is_none());
    assert_eq!(body["registrationNumber"], json!("KA01AB1234"));
    assert_eq!(body["status"], json!("ACTIVE"));

    let with_engine = form.with("engineCC", "349").with("kilometersDriven", "12000");
    let body = serde_json::to_value(to_bike_dto(&with_engine, SELLER)).expect("json");
    assert_eq!(body["engineCC"], json!(349));
    assert_eq!(body["kilometersDriven"], json!(12000));
}

#[test]
fn fractional_prices_keep_their_fraction() {
    assert_eq!(wire::to_json(1499.5), json!(1499.5));
    assert_eq!(wire::to_json(1500.0), json!(1500));
}

#[test]
fn dto_reports_its_category_and_seller() {
    let dto = to_create_dto(Category::Laptop, &FormState::new(), SELLER);
    assert_eq!(dto.category(), Category::Laptop);
    assert_eq!(dto.seller_id(), SELLER);
}

use serde_json::json;
use zelo_domain::factors::{ConversionFactors, FactorMap};

#[test]
fn factors_serialize_as_flat_map() {
    let value = serde_json::to_value(ConversionFactors::default()).unwrap();
    assert_eq!(value["cristal_to_liquido"], json!(0.85));
    assert_eq!(value["liquido_to_cristal"], json!(1.18));
    assert_eq!(value["acido_citrico_fator"], json!(1.0));
    assert_eq!(value["brix_correcao_temp.30"], json!(0.98));
}

#[test]
fn partial_override_deserializes_on_top_of_defaults() {
    let factors: ConversionFactors =
        serde_json::from_value(json!({ "liquido_to_cristal": 1.2 })).unwrap();
    assert_eq!(factors.liquid_to_crystal, 1.2);
    assert_eq!(factors.crystal_to_liquid, 0.85);
    assert_eq!(factors.brix_correction(20.0), 1.0);
}

#[test]
fn invalid_override_fails_deserialization() {
    let result =
        serde_json::from_value::<ConversionFactors>(json!({ "acido_citrico_fator": -1.0 }));
    assert!(result.is_err());
}

#[test]
fn map_conversion_keeps_every_key() {
    let map: FactorMap = ConversionFactors::default().into();
    assert_eq!(map.len(), 6);
}

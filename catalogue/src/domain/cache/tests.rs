//! Unit tests for the catalogue cache.

use rstest::{fixture, rstest};

use super::{CatalogueCache, ModelLoadStatus};
use crate::domain::records::{
    Category, CategoryId, CategoryType, Manufacturer, ManufacturerId, Model, ModelId,
    VehicleClass,
};

fn category(id: u32, category_type: u32, title: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        category_type: CategoryType(category_type),
        title: title.to_owned(),
    }
}

fn manufacturer(id: u32, name: &str, is_car: bool, is_spec: bool) -> Manufacturer {
    Manufacturer {
        id: ManufacturerId::new(id),
        name: name.to_owned(),
        is_car,
        is_spec,
        is_moto: !is_car && !is_spec,
    }
}

fn model(id: u32, manufacturer_id: u32, name: &str) -> Model {
    Model {
        id: ModelId::new(id),
        manufacturer_id: ManufacturerId::new(manufacturer_id),
        name: name.to_owned(),
    }
}

#[fixture]
fn seeded() -> CatalogueCache {
    let mut cache = CatalogueCache::new();
    cache.record_category(category(1, 0, "Sedan"));
    cache.record_category(category(2, 0, "Hatchback"));
    cache.record_category(category(5, 1, "Tractor"));
    cache.record_manufacturer(manufacturer(10, "TOYOTA", true, false));
    cache.record_manufacturer(manufacturer(20, "MAN", true, true));
    cache.record_manufacturer(manufacturer(30, "JCB", false, true));
    cache.record_manufacturer(manufacturer(40, "DUCATI", false, false));
    cache
}

#[rstest]
fn recording_a_category_twice_keeps_the_first(mut seeded: CatalogueCache) {
    let added = seeded.record_category(category(1, 2, "Renamed"));

    assert!(!added, "duplicate id should be rejected");
    let titles: Vec<_> = seeded.all_categories().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Sedan", "Hatchback", "Tractor"]);
    assert_eq!(
        seeded.categories_of_type(CategoryType(2)).count(),
        0,
        "duplicate should not reach the type index",
    );
}

#[rstest]
fn recording_a_manufacturer_twice_keeps_the_first(mut seeded: CatalogueCache) {
    let added = seeded.record_manufacturer(manufacturer(10, "NOT TOYOTA", false, true));

    assert!(!added);
    let toyota = seeded
        .manufacturer(ManufacturerId::new(10))
        .expect("manufacturer cached");
    assert_eq!(toyota.name, "TOYOTA");
    assert_eq!(seeded.manufacturers_of_class(VehicleClass::Special).count(), 1);
}

#[rstest]
fn recording_a_model_twice_keeps_the_first(mut seeded: CatalogueCache) {
    assert!(seeded.record_model(model(101, 10, "Corolla")));
    assert!(!seeded.record_model(model(101, 10, "Camry")));

    let names: Vec<_> = seeded
        .models_of(ManufacturerId::new(10))
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, ["Corolla"]);
}

#[rstest]
fn manufacturers_are_indexed_by_derived_class(seeded: CatalogueCache) {
    let ids = |class| {
        seeded
            .manufacturers_of_class(class)
            .map(|m| m.id.get())
            .collect::<Vec<_>>()
    };

    assert_eq!(ids(VehicleClass::Car), [10, 20]);
    assert_eq!(ids(VehicleClass::Special), [30]);
    assert_eq!(ids(VehicleClass::Motorbike), [40]);
    assert_eq!(seeded.all_manufacturers().count(), 4);
}

#[rstest]
fn categories_are_indexed_by_type(seeded: CatalogueCache) {
    let cars: Vec<_> = seeded
        .categories_of_type(VehicleClass::Car)
        .map(|c| c.id.get())
        .collect();

    assert_eq!(cars, [1, 2]);
    assert_eq!(seeded.categories_of_type(VehicleClass::Motorbike).count(), 0);
}

#[rstest]
fn new_manufacturers_start_with_unloaded_empty_models(seeded: CatalogueCache) {
    let toyota = ManufacturerId::new(10);

    assert_eq!(seeded.model_status(toyota), ModelLoadStatus::NotLoaded);
    assert!(!seeded.has_loaded_models(toyota));
    assert_eq!(seeded.models_of(toyota).count(), 0);
}

#[rstest]
fn completed_loads_are_loaded_even_without_models(mut seeded: CatalogueCache) {
    let ducati = ManufacturerId::new(40);
    seeded.mark_models_loading(ducati);
    assert_eq!(seeded.model_status(ducati), ModelLoadStatus::Loading);

    let added = seeded.complete_model_load(ducati, Vec::new());

    assert_eq!(added, 0);
    assert!(seeded.has_loaded_models(ducati));
}

#[rstest]
fn completed_loads_resolve_model_owners(mut seeded: CatalogueCache) {
    let toyota = ManufacturerId::new(10);
    let added = seeded.complete_model_load(
        toyota,
        vec![model(101, 10, "Corolla"), model(102, 10, "Camry")],
    );

    assert_eq!(added, 2);
    assert_eq!(seeded.manufacturer_of_model(ModelId::new(102)), Some(toyota));
    assert_eq!(seeded.manufacturer_of_model(ModelId::new(999)), None);
}

#[rstest]
fn abandoned_loads_return_to_not_loaded(mut seeded: CatalogueCache) {
    let jcb = ManufacturerId::new(30);
    seeded.mark_models_loading(jcb);
    seeded.abandon_model_load(jcb);

    assert_eq!(seeded.model_status(jcb), ModelLoadStatus::NotLoaded);
}

#[rstest]
fn loaded_status_is_not_downgraded(mut seeded: CatalogueCache) {
    let jcb = ManufacturerId::new(30);
    seeded.complete_model_load(jcb, vec![model(301, 30, "3CX")]);

    seeded.mark_models_loading(jcb);
    seeded.abandon_model_load(jcb);

    assert!(seeded.has_loaded_models(jcb));
}

#[test]
fn classify_delegates_to_flag_priority() {
    let both = manufacturer(1, "BOTH", true, true);
    let special = manufacturer(2, "SPECIAL", false, true);
    let neither = manufacturer(3, "NEITHER", false, false);

    assert_eq!(CatalogueCache::classify(&both), VehicleClass::Car);
    assert_eq!(CatalogueCache::classify(&special), VehicleClass::Special);
    assert_eq!(CatalogueCache::classify(&neither), VehicleClass::Motorbike);
}

//! The config get/set contract, exercised through the public facade

use cardpress::{new_card, CardOptions, ConfigKey, ConfigValue, Error};

#[test]
fn set_then_get_round_trips() {
    let mut card = new_card(CardOptions::default()).unwrap();
    card.set_config(ConfigKey::Color, "red");
    assert_eq!(
        card.get_config(ConfigKey::Color).unwrap(),
        ConfigValue::from("red")
    );
}

#[test]
fn get_many_returns_exactly_the_requested_pairs() {
    let card = new_card(CardOptions {
        align: "center".into(),
        width: 640,
        ..Default::default()
    })
    .unwrap();

    let partial = card.get_config_many(&[ConfigKey::Align, ConfigKey::Width]);
    assert_eq!(partial.len(), 2);
    assert_eq!(partial[&ConfigKey::Align], Some(ConfigValue::from("center")));
    assert_eq!(partial[&ConfigKey::Width], Some(ConfigValue::from(640u32)));
}

#[test]
fn unset_keys_error_on_get_and_map_to_none_in_batches() {
    let card = new_card(CardOptions::default()).unwrap();

    assert!(matches!(
        card.get_config(ConfigKey::Download),
        Err(Error::ConfigKeyError(k)) if k == "download"
    ));

    let partial = card.get_config_many(&[ConfigKey::Download, ConfigKey::Color]);
    assert_eq!(partial[&ConfigKey::Download], None);
    assert_eq!(partial[&ConfigKey::Color], Some(ConfigValue::from("black")));
}

#[test]
fn batch_set_returns_post_update_values() {
    let mut card = new_card(CardOptions::default()).unwrap();
    let updated = card.set_config_many(vec![
        (ConfigKey::Color, ConfigValue::from("teal")),
        (ConfigKey::Align, ConfigValue::from("right")),
    ]);
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[&ConfigKey::Color], Some(ConfigValue::from("teal")));
    assert_eq!(updated[&ConfigKey::Align], Some(ConfigValue::from("right")));
}

#[test]
fn full_record_exposes_every_key() {
    let card = new_card(CardOptions::default()).unwrap();
    let all = card.config_all();
    for key in ConfigKey::ALL {
        assert!(all.contains_key(&key), "missing {}", key);
    }
}

#[test]
fn the_store_does_not_validate_types_for_keys() {
    // Storing text under a dimension key is accepted; interpretation (and
    // the resulting domain error) happens downstream at provisioning time.
    let mut card = new_card(CardOptions::default()).unwrap();
    card.set_config(ConfigKey::Width, "not-a-number");
    assert_eq!(
        card.get_config(ConfigKey::Width).unwrap(),
        ConfigValue::from("not-a-number")
    );
}

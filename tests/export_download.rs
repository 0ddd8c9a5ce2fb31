//! Export and download-trigger wiring

use std::sync::Arc;

use cardpress::{
    CardMaker, CardOptions, ElementKind, Error, ImageFormat, MemoryHost, MemoryLoader, Template,
};

fn card_on(host: Arc<MemoryHost>, options: CardOptions) -> Result<CardMaker, Error> {
    CardMaker::new(options, host, Arc::new(MemoryLoader::new()))
}

#[test]
fn fresh_instance_exports_a_valid_blank_payload() {
    let card = new_default_card();
    let uri = card.get_image(ImageFormat::Png, 1.0).unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));

    // Export never depends on render having run; the default is the lossy
    // format at maximum quality.
    let lossy = card.get_image_default().unwrap();
    assert!(lossy.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn unset_download_target_is_a_no_op() {
    let card = new_default_card();
    card.enable_download().expect("no-op, not an error");
}

#[test]
fn unresolvable_download_target_fails() {
    let host = Arc::new(MemoryHost::new());
    let card = card_on(
        host,
        CardOptions {
            download: "#ghost".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(matches!(
        card.enable_download(),
        Err(Error::TriggerNotFoundError(t)) if t == "#ghost"
    ));
}

#[tokio::test]
async fn activation_redirects_the_host_to_the_payload() {
    let host = Arc::new(MemoryHost::new());
    let trigger = host.register("#save", ElementKind::Trigger);

    let mut card = card_on(
        host.clone(),
        CardOptions {
            download: "#save".into(),
            width: 24,
            height: 24,
            template: Template {
                background: Some("maroon".into()),
                ..Default::default()
            },
            ..Default::default()
        },
    )
    .unwrap();
    card.render().await.unwrap();
    card.enable_download().unwrap();

    assert!(host.activate(trigger), "trigger should redirect");
    let location = host.location().expect("location recorded");
    assert!(location.starts_with("data:image/jpeg;base64,"));

    // The payload tracks the live surface: a later activation re-encodes.
    card.set_config(cardpress::ConfigKey::Background, "white");
    card.render().await.unwrap();
    assert!(host.activate(trigger));
    assert_ne!(host.location().unwrap(), location);
}

fn new_default_card() -> CardMaker {
    card_on(Arc::new(MemoryHost::new()), CardOptions::default()).unwrap()
}

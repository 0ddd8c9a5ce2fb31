//! Content-addressed golden test for the compositing output.
//!
//! Run with UPDATE_GOLDENS=1 to (re)create the expected digest.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use cardpress::{CardMaker, CardOptions, ImageLayer, ImageProps, MemoryHost, MemoryLoader};
use cardpress::{Template, TextItem, TextProps};
use image::{Rgba, RgbaImage};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn reference_card() -> CardMaker {
    let loader = Arc::new(MemoryLoader::new());
    loader.insert(
        "badge",
        RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 255])),
    );
    let template = Template {
        background: Some("#224466".into()),
        images: vec![ImageLayer {
            value: "badge".into(),
            props: ImageProps {
                x: Some(4),
                y: Some(4),
                ..Default::default()
            },
        }],
        text: vec![TextItem {
            value: "Go".into(),
            props: TextProps {
                x: Some(16.0),
                y: Some(24.0),
                ..Default::default()
            },
        }],
    };
    CardMaker::new(
        CardOptions {
            width: 64,
            height: 32,
            template,
            ..Default::default()
        },
        Arc::new(MemoryHost::new()),
        loader,
    )
    .expect("Failed to create card")
}

#[tokio::test]
async fn golden_surface_digest_matches_fixture() {
    let mut card = reference_card();
    let report = card.render().await.expect("render failed");
    assert!(report.is_clean());
    let digest = card.with_surface(|s| s.digest()).unwrap();

    let expected_path = golden_path("reference_card.digest");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim());
}

#[tokio::test]
async fn identical_renders_have_identical_digests() {
    let mut a = reference_card();
    let mut b = reference_card();
    a.render().await.unwrap();
    b.render().await.unwrap();
    assert_eq!(
        a.with_surface(|s| s.digest()).unwrap(),
        b.with_surface(|s| s.digest()).unwrap()
    );
}

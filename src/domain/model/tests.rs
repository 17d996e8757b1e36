// Unit tests for domain models

use super::*;

#[test]
fn test_quadrant_parsing() {
    assert_eq!("top-left".parse::<Quadrant>().unwrap(), Quadrant::TopLeft);
    assert_eq!("top-right".parse::<Quadrant>().unwrap(), Quadrant::TopRight);
    assert_eq!("bottom-left".parse::<Quadrant>().unwrap(), Quadrant::BottomLeft);
    assert_eq!("bottom-right".parse::<Quadrant>().unwrap(), Quadrant::BottomRight);

    // Labels are exact
    assert!("Top-Left".parse::<Quadrant>().is_err());
    assert!("top left".parse::<Quadrant>().is_err());
    assert!("middle".parse::<Quadrant>().is_err());
}

#[test]
fn test_quadrant_menu_order() {
    assert_eq!(Quadrant::from_menu(1), Some(Quadrant::TopLeft));
    assert_eq!(Quadrant::from_menu(2), Some(Quadrant::TopRight));
    assert_eq!(Quadrant::from_menu(3), Some(Quadrant::BottomLeft));
    assert_eq!(Quadrant::from_menu(4), Some(Quadrant::BottomRight));
    assert_eq!(Quadrant::from_menu(0), None);
    assert_eq!(Quadrant::from_menu(5), None);
}

#[test]
fn test_uhd_crops_match_fixed_table() {
    let crop = |q: Quadrant| q.crop(FrameSize::UHD, 4).unwrap().to_string();

    assert_eq!(crop(Quadrant::TopLeft), "1912:1072:4:4");
    assert_eq!(crop(Quadrant::TopRight), "1912:1072:1924:4");
    assert_eq!(crop(Quadrant::BottomLeft), "1912:1072:4:1084");
    assert_eq!(crop(Quadrant::BottomRight), "1912:1072:1924:1084");
}

#[test]
fn test_crop_without_inset() {
    let frame = FrameSize::new(1920, 1080);
    let rect = Quadrant::BottomRight.crop(frame, 0).unwrap();
    assert_eq!(
        rect,
        CropRect {
            width: 960,
            height: 540,
            x: 960,
            y: 540
        }
    );
}

#[test]
fn test_crop_rejects_oversized_inset() {
    let frame = FrameSize::new(64, 32);
    assert!(Quadrant::TopLeft.crop(frame, 8).is_err());
    assert!(Quadrant::TopLeft.crop(frame, 7).is_ok());
}

#[test]
fn test_crop_rejects_huge_inset_without_overflow() {
    assert!(Quadrant::TopLeft.crop(FrameSize::UHD, 2_147_483_648).is_err());
    assert!(Quadrant::BottomRight.crop(FrameSize::UHD, u32::MAX).is_err());
}

#[test]
fn test_frame_size_parsing() {
    assert_eq!("3840x2160".parse::<FrameSize>().unwrap(), FrameSize::UHD);
    assert_eq!(" 1280X720 ".parse::<FrameSize>().unwrap(), FrameSize::new(1280, 720));
    assert!("3840".parse::<FrameSize>().is_err());
    assert!("0x720".parse::<FrameSize>().is_err());
    assert!("wide x tall".parse::<FrameSize>().is_err());
}

#[test]
fn test_source_size_parsing() {
    assert_eq!("auto".parse::<SourceSize>().unwrap(), SourceSize::Auto);
    assert_eq!(
        "1920x1080".parse::<SourceSize>().unwrap(),
        SourceSize::Fixed(FrameSize::new(1920, 1080))
    );
}

#[test]
fn test_tag_map_json_shape() {
    let mut tags = TagMap::new();
    tags.insert(
        "talk.mov".to_string(),
        TagRecord::new(Quadrant::BottomLeft, Quadrant::TopRight, "/videos/talk.mov"),
    );

    let json = serde_json::to_value(&tags).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "talk.mov": {
                "presenter": "bottom-left",
                "slides": "top-right",
                "path": "/videos/talk.mov"
            }
        })
    );
}

#[test]
fn test_tag_record_keeps_unknown_labels() {
    let record: TagRecord = serde_json::from_str(
        r#"{"presenter": "centre", "slides": "top-left", "path": "a.mp4"}"#,
    )
    .unwrap();

    assert_eq!(record.presenter, "centre");
    assert!(record.presenter_quadrant().is_err());
    assert_eq!(record.slides_quadrant().unwrap(), Quadrant::TopLeft);
}

#[test]
fn test_silence_params_validation() {
    assert!(SilenceParams::new(-35, 3.0).is_ok());
    assert!(SilenceParams::new(10, 3.0).is_err());
    assert!(SilenceParams::new(-35, 0.0).is_err());
}

#[test]
fn test_threshold_validation() {
    assert!(SceneParams::new(0.3, None).is_ok());
    assert!(SceneParams::new(1.0, None).is_ok());
    assert!(SceneParams::new(0.0, None).is_err());
    assert!(SceneParams::new(1.5, None).is_err());
}

#[test]
fn test_layout_config_from_toml() {
    let layout: Layout = toml::from_str(
        r#"
source = "auto"
margin = 24
"#,
    )
    .unwrap();

    assert_eq!(layout.source, SourceSize::Auto);
    assert_eq!(layout.margin, 24);
    assert_eq!(layout.canvas, FrameSize::new(2560, 1440));
}

#[test]
fn test_audio_sync_settings_validation() {
    assert_eq!(
        AudioSyncSettings::new(8000, 120, 0.05).unwrap(),
        AudioSyncSettings::default()
    );
    assert!(AudioSyncSettings::new(500, 120, 0.05).is_err());
    assert!(AudioSyncSettings::new(8000, 0, 0.05).is_err());
    assert!(AudioSyncSettings::new(8000, 120, -0.1).is_err());
    assert!(AudioSyncSettings::new(8000, 120, f64::NAN).is_err());
}

use std::io::Cursor;

use super::*;

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_drops_alpha() {
    let src = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let frame = decode_rgb8(&png_bytes(image::DynamicImage::ImageRgba8(src))).unwrap();
    assert_eq!((frame.width, frame.height), (1, 1));
    assert_eq!(frame.data, vec![100, 50, 200]);
}

#[test]
fn decode_garbage_is_asset_error() {
    let err = decode_rgb8(b"definitely not an image").unwrap_err();
    assert!(matches!(err, LoopcamError::Asset(_)));
}

#[test]
fn missing_file_is_asset_error() {
    let path = std::env::temp_dir().join(format!(
        "loopcam_missing_{}_source.png",
        std::process::id()
    ));
    let err = load_source_image(&path).unwrap_err();
    assert!(matches!(err, LoopcamError::Asset(_)));
    assert!(err.to_string().contains("loopcam_missing_"));
}

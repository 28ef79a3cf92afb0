use super::*;

#[test]
fn new_rejects_mismatched_length() {
    assert!(FrameRgb8::new(2, 2, vec![0u8; 11]).is_err());
    assert!(FrameRgb8::new(0, 2, Vec::new()).is_err());
    assert!(FrameRgb8::new(2, 2, vec![0u8; 12]).is_ok());
}

#[test]
fn from_fn_is_row_major() {
    let f = FrameRgb8::from_fn(3, 2, |x, y| [x as u8, y as u8, 7]).unwrap();
    assert_eq!(f.pixel(2, 0), [2, 0, 7]);
    assert_eq!(f.pixel(0, 1), [0, 1, 7]);
    assert_eq!(&f.data[..6], &[0, 0, 7, 1, 0, 7]);
}

#[test]
fn image_round_trip_keeps_dimensions() {
    let f = FrameRgb8::from_fn(4, 3, |x, y| [x as u8 * 10, y as u8 * 20, 0]).unwrap();
    let img = f.clone().into_image().unwrap();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(FrameRgb8::from(img), f);
}

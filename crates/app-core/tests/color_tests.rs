// Tests for color parsing and damped color easing.

use app_core::color::damp;
use app_core::{ColorError, DampedColor, Rgb, ACCENT_PALETTE, NEUTRAL_COLOR};

#[test]
fn parses_hex_and_named_white() {
    assert_eq!(Rgb::parse("#ff4060").map(Rgb::to_hex), Ok("#ff4060".to_string()));
    assert_eq!(Rgb::parse("20FFA0").map(Rgb::to_hex), Ok("#20ffa0".to_string()));
    assert_eq!(Rgb::parse("white"), Ok(Rgb::WHITE));
    assert_eq!(Rgb::parse(" WHITE "), Ok(Rgb::WHITE));
}

#[test]
fn palette_constants_match_their_parsed_literals() {
    let literals = ["#4060ff", "#20ffa0", "#ff4060", "#ffcc00"];
    for (c, lit) in ACCENT_PALETTE.iter().zip(literals) {
        assert_eq!(Rgb::parse(lit), Ok(*c));
    }
    assert_eq!(Rgb::parse("white"), Ok(NEUTRAL_COLOR));
}

#[test]
fn rejects_malformed_colors() {
    for bad in ["", "#", "#12345", "#gggggg", "blue", "#1234567", "+fffff"] {
        assert!(matches!(Rgb::parse(bad), Err(ColorError::Malformed(_))), "{bad}");
    }
}

#[test]
fn linear_conversion_keeps_endpoints() {
    let w = Rgb::WHITE.to_linear();
    assert!((w.r - 1.0).abs() < 1e-5);
    let black = Rgb::hex(0x000000).to_linear();
    assert_eq!(black.to_array(), [0.0, 0.0, 0.0]);
    let mid = Rgb::hex(0x808080).to_linear();
    assert!(mid.r > 0.2 && mid.r < 0.23);
}

#[test]
fn damp_never_overshoots() {
    let mut v = 0.0;
    let mut x = 0.0;
    for _ in 0..200 {
        x = damp(x, 1.0, &mut v, 0.2, 1.0 / 60.0);
        assert!(x <= 1.0);
    }
    assert_eq!(x, 1.0);
}

#[test]
fn damp_with_zero_dt_holds_still() {
    let mut v = 0.0;
    assert_eq!(damp(0.3, 1.0, &mut v, 0.2, 0.0), 0.3);
}

#[test]
fn damped_color_converges_to_target() {
    let target = Rgb::hex(0xffcc00);
    let mut c = DampedColor::new(Rgb::WHITE);
    c.step(target, 0.2, 0.016);
    let first = c.current();
    assert!(first.b < 1.0 && first.b > 0.0);
    for _ in 0..120 {
        c.step(target, 0.2, 0.05);
    }
    assert_eq!(c.current(), target);
}

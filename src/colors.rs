//! Packed color constants and channel helpers.
//!
//! All colors are ARGB8888 (`0xAARRGGBB`), the layout the presentation
//! surface expects.

pub const BACKGROUND: u32 = 0xFF1E1E1E;
pub const GRID: u32 = 0xFF333333;
pub const FILL: u32 = 0xFFFFFFFF;
pub const WIREFRAME: u32 = 0xFF00FF00;
pub const VERTEX: u32 = 0xFFFF0000;

/// Packs 8-bit channels into ARGB8888.
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits ARGB8888 into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(color: u32) -> [u8; 4] {
    [
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    ]
}

/// Scales the RGB channels by a light intensity, leaving alpha untouched.
///
/// Intensity is clamped to `[0, 1]`.
pub fn scale(color: u32, intensity: f32) -> u32 {
    let k = intensity.clamp(0.0, 1.0);
    let [a, r, g, b] = unpack_argb(color);
    let apply = |c: u8| (c as f32 * k) as u8;
    pack_argb(a, apply(r), apply(g), apply(b))
}

/// Multiplies a texel by a shade color channel-wise (`texel * shade / 255`).
///
/// The texel's alpha is preserved.
#[inline]
pub fn modulate(texel: u32, shade: u32) -> u32 {
    let [ta, tr, tg, tb] = unpack_argb(texel);
    let [_, sr, sg, sb] = unpack_argb(shade);
    let mul = |t: u8, s: u8| ((t as u32 * s as u32) / 255) as u8;
    pack_argb(ta, mul(tr, sr), mul(tg, sg), mul(tb, sb))
}

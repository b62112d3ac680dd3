//! Display colors carried by particles. No physical meaning.

use crate::float::Float;

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
    pub const RED: Rgba8 = Rgba8::rgb(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Deterministic pseudo-random opaque color for the `seed`-th spawn.
    ///
    /// Consecutive seeds give visually unrelated colors, so bursts of
    /// particles can be told apart without an RNG.
    pub fn hashed(seed: u32) -> Self {
        let base = seed.wrapping_mul(3);
        Self::rgb(
            (hash_u32(base.wrapping_add(1)) % 256) as u8,
            (hash_u32(base.wrapping_add(2)) % 256) as u8,
            (hash_u32(base.wrapping_add(3)) % 256) as u8,
        )
    }

    /// Red tint proportional to `speed * gain`, saturating at full red.
    pub fn speed_tint<F: Float>(speed: F, gain: F) -> Self {
        let full = F::from_f32(255.0);
        let level = (speed * gain * full).abs();
        let r = if level >= full { 255 } else { level.to_isize() as u8 };
        Self::new(r, 0, 0, 255)
    }
}

/// Integer noise hash (31-bit output).
fn hash_u32(index: u32) -> u32 {
    let index = (index << 13) ^ index;
    index
        .wrapping_mul(
            index
                .wrapping_mul(index)
                .wrapping_mul(15731)
                .wrapping_add(789_221),
        )
        .wrapping_add(1_376_312_589)
        & 0x7fff_ffff
}

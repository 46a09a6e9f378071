/// Straight-alpha RGBA color.
///
/// Invariant:
/// - every channel is an `f32` in `[0, 1]`; constructors that take other
///   ranges convert explicitly.
///
/// Backends that blend in premultiplied space call [`Color::premultiplied`]
/// at upload time; nothing inside the core stores premultiplied or 0–255
/// values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from `[0, 1]` components. Values are stored as given;
    /// use [`Color::clamped`] on untrusted input.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates a color from 0–255 channel bytes.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(unit(r), unit(g), unit(b), unit(a))
    }

    /// Grey level and alpha, both 0–255.
    #[inline]
    pub fn from_gray8(gray: u8, a: u8) -> Self {
        Self::from_rgba8(gray, gray, gray, a)
    }

    /// Creates a color from a hex literal.
    ///
    /// Values up to `0xFFFFFF` are read as `0xRRGGBB` and take `alpha`;
    /// larger values are read as `0xAARRGGBB` and ignore it.
    pub fn from_hex(hex: u32, alpha: f32) -> Self {
        let byte = |shift: u32| ((hex >> shift) & 0xFF) as u8;
        let rgb = Self::from_rgba8(byte(16), byte(8), byte(0), 255);
        if hex > 0xFF_FFFF {
            rgb.with_alpha(unit(byte(24)))
        } else {
            rgb.with_alpha(alpha.clamp(0.0, 1.0))
        }
    }

    /// Converts to 0–255 channel bytes, rounding and clamping.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [byte(self.r), byte(self.g), byte(self.b), byte(self.a)]
    }

    /// `0xRRGGBB`; alpha is dropped.
    #[inline]
    pub fn to_hex(self) -> u32 {
        let [r, g, b, _] = self.to_rgba8();
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Returns `[r*a, g*a, b*a, a]` for premultiplied-alpha pipelines.
    #[inline]
    pub fn premultiplied(self) -> [f32; 4] {
        let c = self.clamped();
        [c.r * c.a, c.g * c.a, c.b * c.a, c.a]
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation per channel; `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b), mix(self.a, other.a))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps all channels to `[0, 1]`; non-finite channels become 0.
    #[inline]
    pub fn clamped(self) -> Self {
        let c = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}

impl From<[f32; 4]> for Color {
    #[inline]
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Color> for [f32; 4] {
    #[inline]
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

#[inline]
fn unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

#[inline]
fn byte(v: f32) -> u8 {
    if v.is_finite() {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        0
    }
}

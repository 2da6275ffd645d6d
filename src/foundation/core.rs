use crate::foundation::error::{DeckError, DeckResult};

/// English Metric Units per inch, the native PPTX length unit.
pub const EMU_PER_INCH: i64 = 914_400;

/// A length in English Metric Units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Emu(pub i64);

impl Emu {
    /// Zero length.
    pub const ZERO: Emu = Emu(0);

    /// Convert from inches.
    pub fn from_inches(inches: f64) -> Self {
        Emu((inches * EMU_PER_INCH as f64).round() as i64)
    }

    /// Length as inches.
    pub fn to_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }

    /// Scale by a dimensionless factor, rounding to the nearest unit.
    pub fn scaled(self, factor: f64) -> Self {
        Emu((self.0 as f64 * factor).round() as i64)
    }
}

impl std::ops::Add for Emu {
    type Output = Emu;
    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Emu {
    type Output = Emu;
    fn sub(self, rhs: Emu) -> Emu {
        Emu(self.0 - rhs.0)
    }
}

/// Slide canvas dimensions in EMU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Canvas width.
    pub width: Emu,
    /// Canvas height.
    pub height: Emu,
}

impl Default for Canvas {
    /// The 10 x 7.5 inch reference canvas used as the typography baseline.
    fn default() -> Self {
        Canvas {
            width: Emu::from_inches(10.0),
            height: Emu::from_inches(7.5),
        }
    }
}

impl Canvas {
    /// Construct from raw EMU extents, validating positivity.
    pub fn from_emu(cx: i64, cy: i64) -> DeckResult<Self> {
        if cx <= 0 || cy <= 0 {
            return Err(DeckError::input("canvas extents must be > 0"));
        }
        Ok(Canvas {
            width: Emu(cx),
            height: Emu(cy),
        })
    }
}

/// A rectangular area of the canvas assigned to one content element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Distance from canvas left edge.
    pub left: Emu,
    /// Distance from canvas top edge.
    pub top: Emu,
    /// Region width.
    pub width: Emu,
    /// Region height.
    pub height: Emu,
}

impl Region {
    /// Construct a region from its components.
    pub fn new(left: Emu, top: Emu, width: Emu, height: Emu) -> Self {
        Region {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge coordinate.
    pub fn right(self) -> Emu {
        self.left + self.width
    }

    /// Bottom edge coordinate.
    pub fn bottom(self) -> Emu {
        self.top + self.height
    }

    /// Whether this region overlaps `other` with positive area.
    pub fn intersects(self, other: Region) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Whether this region lies fully inside `outer`.
    pub fn contained_in(self, outer: Region) -> bool {
        self.left >= outer.left
            && self.top >= outer.top
            && self.right() <= outer.right()
            && self.bottom() <= outer.bottom()
    }

    /// Whether this region lies fully inside the canvas.
    pub fn within_canvas(self, canvas: Canvas) -> bool {
        self.contained_in(Region::new(Emu::ZERO, Emu::ZERO, canvas.width, canvas.height))
    }
}

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl RgbColor {
    /// Pure black.
    pub const BLACK: RgbColor = RgbColor { r: 0, g: 0, b: 0 };
    /// Pure white.
    pub const WHITE: RgbColor = RgbColor {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Construct from channel values.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    /// Parse a `#RRGGBB` or `RRGGBB` hex string.
    pub fn from_hex(hex: &str) -> DeckResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DeckError::input(format!("invalid hex color '{hex}'")));
        }
        let r = u8::from_str_radix(&digits[0..2], 16).map_err(|e| DeckError::input(e.to_string()))?;
        let g = u8::from_str_radix(&digits[2..4], 16).map_err(|e| DeckError::input(e.to_string()))?;
        let b = u8::from_str_radix(&digits[4..6], 16).map_err(|e| DeckError::input(e.to_string()))?;
        Ok(RgbColor { r, g, b })
    }

    /// Uppercase `RRGGBB` form as used by `a:srgbClr`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceptual luminance on a 0..255 scale (ITU-R BT.601 weights).
    pub fn luminance(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }
}

impl TryFrom<String> for RgbColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RgbColor::from_hex(&value).map_err(|e| e.to_string())
    }
}

impl From<RgbColor> for String {
    fn from(value: RgbColor) -> Self {
        format!("#{}", value.to_hex())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

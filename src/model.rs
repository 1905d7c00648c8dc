use rand::Rng;

use crate::error::{TargenError, TargenResult};

/// Characters a sprite glyph may use, in class-id order.
pub const GLYPH_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The eight shape classes. Declaration order fixes the class ids 0..=7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Semicircle,
    QuarterCircle,
    Triangle,
    Rectangle,
    Pentagon,
    Star,
    Cross,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Circle,
        ShapeKind::Semicircle,
        ShapeKind::QuarterCircle,
        ShapeKind::Triangle,
        ShapeKind::Rectangle,
        ShapeKind::Pentagon,
        ShapeKind::Star,
        ShapeKind::Cross,
    ];

    pub fn class_id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Semicircle => "semicircle",
            ShapeKind::QuarterCircle => "quarter_circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Star => "star",
            ShapeKind::Cross => "cross",
        }
    }
}

/// A single alphanumeric glyph drawn onto a sprite.
///
/// Digits map to class ids 8..=17, uppercase letters to 18..=43.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct GlyphChar(char);

impl GlyphChar {
    pub fn new(c: char) -> TargenResult<Self> {
        if c.is_ascii_digit() || c.is_ascii_uppercase() {
            Ok(Self(c))
        } else {
            Err(TargenError::validation(format!(
                "glyph '{c}' is not one of 0-9 or A-Z"
            )))
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn class_id(self) -> u32 {
        let c = self.0 as u32;
        if self.0.is_ascii_digit() {
            8 + (c - '0' as u32)
        } else {
            18 + (c - 'A' as u32)
        }
    }
}

impl TryFrom<char> for GlyphChar {
    type Error = TargenError;

    fn try_from(c: char) -> TargenResult<Self> {
        Self::new(c)
    }
}

impl From<GlyphChar> for char {
    fn from(g: GlyphChar) -> char {
        g.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub rgb: Rgb8,
}

/// Fill colors available to shapes and glyphs (CSS values).
pub const PALETTE: [PaletteColor; 7] = [
    PaletteColor {
        name: "black",
        rgb: Rgb8::new(0, 0, 0),
    },
    PaletteColor {
        name: "red",
        rgb: Rgb8::new(255, 0, 0),
    },
    PaletteColor {
        name: "blue",
        rgb: Rgb8::new(0, 0, 255),
    },
    PaletteColor {
        name: "green",
        rgb: Rgb8::new(0, 128, 0),
    },
    PaletteColor {
        name: "purple",
        rgb: Rgb8::new(128, 0, 128),
    },
    PaletteColor {
        name: "brown",
        rgb: Rgb8::new(165, 42, 42),
    },
    PaletteColor {
        name: "orange",
        rgb: Rgb8::new(255, 165, 0),
    },
];

pub fn pick_shape(rng: &mut impl Rng) -> ShapeKind {
    ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())]
}

pub fn pick_glyph(rng: &mut impl Rng) -> GlyphChar {
    let bytes = GLYPH_ALPHABET.as_bytes();
    GlyphChar(bytes[rng.random_range(0..bytes.len())] as char)
}

/// Pick a shape color and a glyph color guaranteed to differ.
pub fn pick_distinct_colors(rng: &mut impl Rng) -> (PaletteColor, PaletteColor) {
    let shape = PALETTE[rng.random_range(0..PALETTE.len())];
    loop {
        let glyph = PALETTE[rng.random_range(0..PALETTE.len())];
        if glyph != shape {
            return (shape, glyph);
        }
    }
}

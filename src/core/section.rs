use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Navigable page sections, in page order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Hero,
    Projects,
    Skills,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 4] = [
        SectionId::Hero,
        SectionId::Projects,
        SectionId::Skills,
        SectionId::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::Projects => "projects",
            SectionId::Skills => "skills",
            SectionId::Contact => "contact",
        }
    }

    /// Fractional offset into the helix step sequence where this marker sits.
    pub fn helix_fraction(self) -> f32 {
        match self {
            SectionId::Hero => 0.15,
            SectionId::Projects => 0.50,
            SectionId::Skills => 0.85,
            SectionId::Contact => 0.95,
        }
    }

    /// Authored marker color as 0xRRGGBB.
    pub fn color_hex(self) -> u32 {
        match self {
            SectionId::Hero => 0x4e_a2_ff,
            SectionId::Projects => 0xff_95_00,
            SectionId::Skills => 0x00_d9_ff,
            SectionId::Contact => 0x00_ff_88,
        }
    }

    pub fn color_rgb(self) -> [f32; 3] {
        rgb_from_hex(self.color_hex())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(SectionId::Hero),
            "projects" => Ok(SectionId::Projects),
            "skills" => Ok(SectionId::Skills),
            "contact" => Ok(SectionId::Contact),
            other => Err(NavError::UnknownSection(other.to_string())),
        }
    }
}

#[inline]
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[inline]
pub fn hex_string(hex: u32) -> String {
    format!("#{:06x}", hex & 0xff_ff_ff)
}

use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::angle::normalize_angle;

/// Single-zero wheel, clockwise from zero.
pub const EUROPEAN_WHEEL: [u32; 37] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24,
    16, 33, 1, 20, 14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

const RED_NUMBERS: [u32; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Largest wheel accepted from the result authority.
pub const MAX_SECTORS: usize = 256;

/// Color class of a sector. Serialized with the result authority's names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectorColor {
    #[serde(rename = "verde", alias = "green")]
    Green,
    #[serde(rename = "rojo", alias = "red")]
    Red,
    #[serde(rename = "negro", alias = "black")]
    Black,
}

impl SectorColor {
    /// Standard roulette coloring: zero is green, then the fixed red set.
    pub fn of_number(number: u32) -> Self {
        if number == 0 {
            SectorColor::Green
        } else if RED_NUMBERS.contains(&number) {
            SectorColor::Red
        } else {
            SectorColor::Black
        }
    }

    /// Name used on the wire by the result authority.
    pub fn wire_name(self) -> &'static str {
        match self {
            SectorColor::Green => "verde",
            SectorColor::Red => "rojo",
            SectorColor::Black => "negro",
        }
    }

    /// Parse either the wire name or the English name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verde" | "green" => Some(SectorColor::Green),
            "rojo" | "red" => Some(SectorColor::Red),
            "negro" | "black" => Some(SectorColor::Black),
            _ => None,
        }
    }

    /// Compact numeric code for float event buffers.
    pub fn code(self) -> u32 {
        match self {
            SectorColor::Green => 0,
            SectorColor::Red => 1,
            SectorColor::Black => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(SectorColor::Green),
            1 => Some(SectorColor::Red),
            2 => Some(SectorColor::Black),
            _ => None,
        }
    }
}

impl fmt::Display for SectorColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectorColor::Green => "green",
            SectorColor::Red => "red",
            SectorColor::Black => "black",
        };
        f.write_str(name)
    }
}

/// Ordered sectors of the wheel and where sector 0 starts in the wheel frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorLayout {
    sector_values: Vec<u32>,
    rotation_offset: f64,
}

impl SectorLayout {
    /// Build a layout. Returns `None` for an empty or oversized order.
    pub fn new(sector_values: Vec<u32>, rotation_offset: f64) -> Option<Self> {
        if sector_values.is_empty() || sector_values.len() > MAX_SECTORS {
            return None;
        }
        Some(Self {
            sector_values,
            rotation_offset,
        })
    }

    pub fn european(rotation_offset: f64) -> Self {
        Self {
            sector_values: EUROPEAN_WHEEL.to_vec(),
            rotation_offset,
        }
    }

    pub fn sector_count(&self) -> usize {
        self.sector_values.len()
    }

    pub fn sector_angle(&self) -> f64 {
        TAU / self.sector_values.len() as f64
    }

    pub fn rotation_offset(&self) -> f64 {
        self.rotation_offset
    }

    pub fn sector_values(&self) -> &[u32] {
        &self.sector_values
    }

    pub fn value_at(&self, index: usize) -> Option<u32> {
        self.sector_values.get(index).copied()
    }

    pub fn color_of(&self, index: usize) -> Option<SectorColor> {
        self.value_at(index).map(SectorColor::of_number)
    }

    /// Center of sector `index` in the wheel frame (not normalized).
    pub fn sector_center(&self, index: usize) -> f64 {
        let sa = self.sector_angle();
        self.rotation_offset + index as f64 * sa + sa / 2.0
    }

    /// Sector under a wheel-relative angle.
    pub fn index_at(&self, relative_angle: f64) -> usize {
        let local = normalize_angle(relative_angle - self.rotation_offset);
        let idx = (local / self.sector_angle()).floor() as usize;
        idx.min(self.sector_count() - 1)
    }

    /// Same ordering, new values (the authority may reorder the ring per spin).
    pub fn with_values(&self, sector_values: Vec<u32>) -> Option<Self> {
        Self::new(sector_values, self.rotation_offset)
    }
}

impl Default for SectorLayout {
    fn default() -> Self {
        Self::european(0.0)
    }
}

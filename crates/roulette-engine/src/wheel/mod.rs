pub mod layout;

pub use layout::{SectorColor, SectorLayout, EUROPEAN_WHEEL};

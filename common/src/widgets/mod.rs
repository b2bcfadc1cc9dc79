//! Reusable UI widgets.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod button;
mod icons;

pub use button::{Button, ButtonResponse, ButtonState};
pub use icons::{Icon, IconStyle, draw_icon};

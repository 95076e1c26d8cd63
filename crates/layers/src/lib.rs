pub mod canvas;
pub mod palette;
pub mod style;
pub mod visibility;

pub use canvas::*;
pub use palette::*;
pub use style::*;
pub use visibility::*;

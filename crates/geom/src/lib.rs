pub mod handles;
pub mod latlng;
pub mod ring;

// Geometry crate: small, well-tested primitives only.
pub use handles::*;
pub use latlng::*;
pub use ring::*;

/// Opaque handles to objects owned by the rendering canvas.
///
/// The core never dereferences these; it stores them only so it can hand
/// them back when an object must be removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AreaHandle(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LabelHandle(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RouteHandle(pub u64);

/// What a map click does.
///
/// There is exactly one persistent click handler; it dispatches on this
/// enum, so a toggle can never leave both behaviors bound at once.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ClickMode {
    /// A click registers a new isochrone contribution at that point.
    #[default]
    AddIsochrone,
    /// A click requests routes from every contribution anchor to that point.
    RouteToClick,
}

impl ClickMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::AddIsochrone => Self::RouteToClick,
            Self::RouteToClick => Self::AddIsochrone,
        }
    }
}

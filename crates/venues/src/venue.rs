use geom::{LabelHandle, LatLng};

/// Placeholder shown for venues whose source feature carries no usable
/// name property.
pub const DEFAULT_VENUE_NAME: &str = "Label";

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VenueId(pub u64);

/// Whether a venue is currently presented as a viable meeting place.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Presentation {
    #[default]
    Hidden,
    Shown,
}

/// A point of interest evaluated as a possible meeting place.
///
/// Created once at load time and never recreated. Only `presentation` and
/// `label` mutate afterwards, and the label handle is managed exclusively
/// by the visibility reconciler: it exists if and only if the venue is
/// shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: VenueId,
    pub position: LatLng,
    pub name: String,
    pub presentation: Presentation,
    pub label: Option<LabelHandle>,
}

/// Owned collection of candidate venues.
///
/// Ordering contract:
/// - Iteration yields venues in load order; ids are assigned sequentially
///   at load time and stay stable for the life of the set.
///
/// This collection is the source of truth for "which objects are candidate
/// venues"; anything rendered for a venue is a derived view of it.
#[derive(Debug, Default)]
pub struct VenueSet {
    venues: Vec<Venue>,
}

impl VenueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: LatLng, name: String) -> VenueId {
        let id = VenueId(self.venues.len() as u64);
        self.venues.push(Venue {
            id,
            position,
            name,
            presentation: Presentation::Hidden,
            label: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn get(&self, id: VenueId) -> Option<&Venue> {
        self.venues.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Venue> {
        self.venues.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Venue> {
        self.venues.iter_mut()
    }
}

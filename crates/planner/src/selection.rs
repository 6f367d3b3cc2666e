use tripweave_shared::{PointOfInterest, TripConfig};

/// Points of interest chosen per destination.
///
/// The key set is exactly the trip's destination names, in trip order.
/// Membership is decided by point of interest name within one destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<(String, Vec<PointOfInterest>)>,
}

impl SelectionSet {
    pub fn for_trip(trip: &TripConfig) -> Self {
        Self {
            entries: trip.names().map(|n| (n.to_owned(), vec![])).collect(),
        }
    }

    /// Removes the point of interest when one with the same name is already
    /// selected, appends it otherwise. Returns whether it is selected now.
    pub fn toggle(
        &mut self,
        destination: &str,
        poi: PointOfInterest,
    ) -> tripweave_shared::Result<bool> {
        let Some(selected) = self.entry_mut(destination) else {
            tripweave_shared::validation!("{destination} is not part of this trip.");
        };

        if let Some(pos) = selected.iter().position(|s| s.name == poi.name) {
            selected.remove(pos);
            return Ok(false);
        }

        selected.push(poi);

        Ok(true)
    }

    pub fn is_selected(&self, destination: &str, name: &str) -> bool {
        self.get(destination)
            .map(|s| s.iter().any(|p| p.name == name))
            .unwrap_or_default()
    }

    pub fn get(&self, destination: &str) -> Option<&[PointOfInterest]> {
        self.entries
            .iter()
            .find(|(d, _)| d == destination)
            .map(|(_, s)| s.as_slice())
    }

    pub fn count(&self, destination: &str) -> usize {
        self.get(destination).map(<[_]>::len).unwrap_or_default()
    }

    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PointOfInterest])> {
        self.entries.iter().map(|(d, s)| (d.as_str(), s.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, destination: &str) -> Option<&mut Vec<PointOfInterest>> {
        self.entries
            .iter_mut()
            .find(|(d, _)| d == destination)
            .map(|(_, s)| s)
    }
}

//! Administrative regions used to partition road segments

use geo::{BoundingRect, Intersects, MultiPolygon, Polygon, Relate};
use hashbrown::HashMap;

/// Named region boundary
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    pub fn new(name: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            name: name.into(),
            geometry: geometry.into(),
        }
    }

    pub fn from_polygon(name: impl Into<String>, polygon: Polygon<f64>) -> Self {
        Self::new(name, MultiPolygon::new(vec![polygon]))
    }
}

/// Ordered collection of regions.
///
/// Order is the order in which regions were first inserted and is the
/// order used for first-match assignment.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
    by_name: HashMap<String, usize>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a region, replacing the geometry of an existing region with
    /// the same name while keeping its position. Returns the replaced
    /// geometry, if any.
    pub fn insert(&mut self, region: Region) -> Option<MultiPolygon<f64>> {
        match self.by_name.get(&region.name) {
            Some(&idx) => Some(std::mem::replace(
                &mut self.regions[idx].geometry,
                region.geometry,
            )),
            None => {
                self.by_name.insert(region.name.clone(), self.regions.len());
                self.regions.push(region);
                None
            }
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Region> {
        self.position(name).map(|idx| &self.regions[idx])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Region> {
        self.regions.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    /// Pairs of regions (by index, lower first) whose interiors intersect.
    /// Regions sharing only a border are not reported.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let rects: Vec<_> = self
            .regions
            .iter()
            .map(|r| r.geometry.bounding_rect())
            .collect();

        let mut pairs = Vec::new();
        for i in 0..self.regions.len() {
            for j in (i + 1)..self.regions.len() {
                let (Some(a), Some(b)) = (rects[i], rects[j]) else {
                    continue;
                };
                if !a.intersects(&b) {
                    continue;
                }
                let matrix = self.regions[i].geometry.relate(&self.regions[j].geometry);
                if matrix.is_intersects() && !matrix.is_touches() {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<T: IntoIterator<Item = Region>>(iter: T) -> Self {
        let mut set = RegionSet::new();
        for region in iter {
            set.insert(region);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    #[test]
    fn duplicate_name_replaces_in_place() {
        let mut set = RegionSet::new();
        set.insert(Region::from_polygon("Bay", square(0.0, 0.0, 1.0)));
        set.insert(Region::from_polygon("Bakool", square(5.0, 5.0, 1.0)));
        let previous = set.insert(Region::from_polygon("Bay", square(10.0, 10.0, 1.0)));

        assert!(previous.is_some());
        assert_eq!(set.len(), 2);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Bay", "Bakool"]);
        let rect = set.get(0).unwrap().geometry.bounding_rect().unwrap();
        assert_eq!(rect.min().x, 10.0);
        assert_eq!(set.position("Bakool"), Some(1));
        assert!(set.by_name("Hiraan").is_none());
    }

    #[test]
    fn adjacent_regions_do_not_overlap() {
        let set: RegionSet = [
            Region::from_polygon("West", square(0.0, 0.0, 4.0)),
            Region::from_polygon("East", square(4.0, 0.0, 4.0)),
        ]
        .into_iter()
        .collect();
        assert!(set.overlapping_pairs().is_empty());
    }

    #[test]
    fn overlapping_regions_are_reported() {
        let set: RegionSet = [
            Region::from_polygon("A", square(0.0, 0.0, 4.0)),
            Region::from_polygon("B", square(20.0, 20.0, 1.0)),
            Region::from_polygon("C", square(2.0, 2.0, 4.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.overlapping_pairs(), vec![(0, 2)]);
    }
}

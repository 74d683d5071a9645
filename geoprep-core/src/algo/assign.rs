//! Assignment of road segments to administrative regions.
//!
//! A segment belongs to the first region (in region-set order) whose
//! polygon contains the segment centroid. Containment is
//! boundary-exclusive: a centroid lying exactly on a region edge or
//! vertex is not inside that region.
//!
//! The optional R*-tree over region bounding boxes only narrows the
//! candidate list; candidates are tested in region order so the result is
//! the same as a linear scan.

use geo::{Centroid, Contains, LineString, Point};
use log::{debug, info, warn};
use rayon::prelude::*;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Rectangle};

use crate::UNASSIGNED;
use crate::model::{MalformedGeometry, RegionSet, RoadInput, RoadSegment};

type RegionEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Returns the name of the first region containing `centroid`, or
/// [`UNASSIGNED`].
pub fn assign_region<'a>(centroid: &Point<f64>, regions: &'a RegionSet) -> &'a str {
    regions
        .iter()
        .find(|region| region.geometry.contains(centroid))
        .map_or(UNASSIGNED, |region| region.name.as_str())
}

/// Representative point of a segment used for the containment test
///
/// # Errors
///
/// Returns the reason the segment cannot be located when its geometry is
/// empty, degenerate or contains non-finite coordinates.
pub fn segment_centroid(line: &LineString<f64>) -> Result<Point<f64>, MalformedGeometry> {
    match line.0.len() {
        0 => return Err(MalformedGeometry::EmptyPath),
        1 => return Err(MalformedGeometry::SinglePoint),
        _ => {}
    }
    if line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(MalformedGeometry::InvalidCoordinate);
    }
    line.centroid().ok_or(MalformedGeometry::NoCentroid)
}

/// Point locator over a region set
pub struct RegionIndex<'a> {
    regions: &'a RegionSet,
    tree: Option<RTree<RegionEnvelope>>,
}

impl<'a> RegionIndex<'a> {
    /// Plain first-match scan over all regions
    pub fn linear(regions: &'a RegionSet) -> Self {
        Self {
            regions,
            tree: None,
        }
    }

    /// First-match lookup narrowed by a bounding-box R*-tree
    pub fn indexed(regions: &'a RegionSet) -> Self {
        use geo::BoundingRect;

        let envelopes: Vec<RegionEnvelope> = regions
            .iter()
            .enumerate()
            .filter_map(|(idx, region)| {
                let rect = region.geometry.bounding_rect()?;
                let (min, max) = (rect.min(), rect.max());
                Some(GeomWithData::new(
                    Rectangle::from_corners([min.x, min.y], [max.x, max.y]),
                    idx,
                ))
            })
            .collect();

        Self {
            regions,
            tree: Some(RTree::bulk_load(envelopes)),
        }
    }

    pub fn new(regions: &'a RegionSet, use_spatial_index: bool) -> Self {
        if use_spatial_index {
            Self::indexed(regions)
        } else {
            Self::linear(regions)
        }
    }

    pub fn regions(&self) -> &'a RegionSet {
        self.regions
    }

    /// Index of the first region containing `point`
    pub fn locate(&self, point: &Point<f64>) -> Option<usize> {
        match &self.tree {
            None => self
                .regions
                .iter()
                .position(|region| region.geometry.contains(point)),
            Some(tree) => {
                let mut candidates: Vec<usize> = tree
                    .locate_all_at_point(&[point.x(), point.y()])
                    .map(|envelope| envelope.data)
                    .collect();
                candidates.sort_unstable();
                candidates.into_iter().find(|&idx| {
                    self.regions
                        .get(idx)
                        .is_some_and(|region| region.geometry.contains(point))
                })
            }
        }
    }

    /// Name of the first region containing `point`, or [`UNASSIGNED`]
    pub fn region_name(&self, point: &Point<f64>) -> &'a str {
        self.locate(point)
            .and_then(|idx| self.regions.get(idx))
            .map_or(UNASSIGNED, |region| region.name.as_str())
    }

    /// Region index for a segment, `Ok(None)` when it lies outside all
    /// regions
    pub fn locate_segment(&self, segment: &RoadSegment) -> Result<Option<usize>, MalformedGeometry> {
        let centroid = segment_centroid(&segment.geometry)?;
        Ok(self.locate(&centroid))
    }
}

/// Roads assigned to a single region
#[derive(Debug, Clone)]
pub struct RegionRoads {
    pub name: String,
    pub roads: Vec<RoadSegment>,
}

/// Partition of a road layer over a region set
#[derive(Debug, Clone)]
pub struct RoadPartition {
    /// One entry per region, in region order, including empty ones
    pub regions: Vec<RegionRoads>,
    pub unassigned: usize,
    pub skipped: usize,
}

impl RoadPartition {
    pub fn assigned(&self) -> usize {
        self.regions.iter().map(|r| r.roads.len()).sum()
    }

    pub fn total(&self) -> usize {
        self.assigned() + self.unassigned + self.skipped
    }

    pub fn region(&self, name: &str) -> Option<&RegionRoads> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Non-empty regions
    pub fn populated(&self) -> impl Iterator<Item = &RegionRoads> {
        self.regions.iter().filter(|r| !r.roads.is_empty())
    }
}

/// Assigns every segment of `input` to a region.
///
/// Segments are located in parallel and collected in input order, so the
/// partition is identical to a sequential run.
pub fn partition_roads(index: &RegionIndex<'_>, input: RoadInput) -> RoadPartition {
    let RoadInput { segments, skipped } = input;
    info!(
        "Assigning {} road segments to {} regions",
        segments.len(),
        index.regions().len()
    );

    let located: Vec<(Result<Option<usize>, MalformedGeometry>, RoadSegment)> = segments
        .into_par_iter()
        .map(|segment| (index.locate_segment(&segment), segment))
        .collect();

    let mut regions: Vec<RegionRoads> = index
        .regions()
        .names()
        .map(|name| RegionRoads {
            name: name.to_string(),
            roads: Vec::new(),
        })
        .collect();
    let mut unassigned = 0;
    let mut malformed = 0;

    for (location, segment) in located {
        match location {
            Ok(Some(idx)) => regions[idx].roads.push(segment),
            Ok(None) => unassigned += 1,
            Err(reason) => {
                debug!("Skipping road {}: {reason}", segment.source_index + 1);
                malformed += 1;
            }
        }
    }

    if malformed > 0 {
        warn!("{malformed} road segments have no usable centroid and were skipped");
    }

    RoadPartition {
        regions,
        unassigned,
        skipped: skipped + malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Region, RoadAttributes};
    use geo::{Coord, LineString, Polygon, line_string, point, polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    fn segment(idx: usize, line: LineString<f64>) -> RoadSegment {
        RoadSegment {
            source_index: idx,
            geometry: line,
            attributes: RoadAttributes::default(),
        }
    }

    fn grid_regions() -> RegionSet {
        (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .map(|(i, j)| {
                Region::from_polygon(
                    format!("R{i}{j}"),
                    square(f64::from(i) * 4.0, f64::from(j) * 4.0, 4.0),
                )
            })
            .collect()
    }

    #[test]
    fn centroid_inside_square_is_assigned() {
        let regions: RegionSet = [Region::from_polygon("Square", square(0.0, 0.0, 4.0))]
            .into_iter()
            .collect();
        assert_eq!(assign_region(&point!(x: 2.0, y: 2.0), &regions), "Square");
        assert_eq!(assign_region(&point!(x: 10.0, y: 10.0), &regions), UNASSIGNED);
    }

    #[test]
    fn boundary_is_exclusive() {
        let regions: RegionSet = [Region::from_polygon("Square", square(0.0, 0.0, 4.0))]
            .into_iter()
            .collect();
        assert_eq!(assign_region(&point!(x: 4.0, y: 2.0), &regions), UNASSIGNED);
        assert_eq!(assign_region(&point!(x: 0.0, y: 0.0), &regions), UNASSIGNED);
        let index = RegionIndex::indexed(&regions);
        assert_eq!(index.region_name(&point!(x: 4.0, y: 2.0)), UNASSIGNED);
    }

    #[test]
    fn first_match_wins_for_overlapping_regions() {
        let regions: RegionSet = [
            Region::from_polygon("Outer", square(0.0, 0.0, 10.0)),
            Region::from_polygon("Inner", square(2.0, 2.0, 2.0)),
        ]
        .into_iter()
        .collect();
        let p = point!(x: 3.0, y: 3.0);
        assert_eq!(assign_region(&p, &regions), "Outer");
        assert_eq!(RegionIndex::linear(&regions).region_name(&p), "Outer");
        assert_eq!(RegionIndex::indexed(&regions).region_name(&p), "Outer");
    }

    #[test]
    fn indexed_lookup_matches_linear_scan() {
        let regions = grid_regions();
        let linear = RegionIndex::linear(&regions);
        let indexed = RegionIndex::indexed(&regions);
        for step_x in 0..30 {
            for step_y in 0..30 {
                let p = point!(x: -1.0 + f64::from(step_x) * 0.47, y: -1.0 + f64::from(step_y) * 0.47);
                assert_eq!(linear.locate(&p), indexed.locate(&p), "at {p:?}");
                assert_eq!(linear.region_name(&p), assign_region(&p, &regions));
            }
        }
    }

    #[test]
    fn segment_centroid_rejects_degenerate_paths() {
        assert_eq!(
            segment_centroid(&LineString::new(vec![])),
            Err(MalformedGeometry::EmptyPath)
        );
        assert_eq!(
            segment_centroid(&LineString::new(vec![Coord { x: 1.0, y: 1.0 }])),
            Err(MalformedGeometry::SinglePoint)
        );
        assert_eq!(
            segment_centroid(&line_string![(x: 0.0, y: 0.0), (x: f64::NAN, y: 1.0)]),
            Err(MalformedGeometry::InvalidCoordinate)
        );
        let centroid = segment_centroid(&line_string![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0)]).unwrap();
        assert_eq!(centroid, point!(x: 2.0, y: 0.0));
    }

    #[test]
    fn partition_counts_unassigned_and_skipped() {
        let regions = grid_regions();
        let index = RegionIndex::indexed(&regions);
        let input = RoadInput {
            segments: vec![
                segment(0, line_string![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0)]),
                segment(1, line_string![(x: 5.0, y: 9.0), (x: 7.0, y: 9.0)]),
                segment(2, line_string![(x: 50.0, y: 50.0), (x: 51.0, y: 50.0)]),
                segment(3, LineString::new(vec![Coord { x: 1.0, y: 1.0 }])),
                segment(4, line_string![(x: 1.0, y: 2.0), (x: 1.0, y: 3.0)]),
            ],
            skipped: 2,
        };

        let partition = partition_roads(&index, input);

        assert_eq!(partition.regions.len(), 9);
        assert_eq!(partition.assigned(), 3);
        assert_eq!(partition.unassigned, 1);
        assert_eq!(partition.skipped, 3);
        assert_eq!(partition.total(), 7);
        let r00 = partition.region("R00").unwrap();
        assert_eq!(
            r00.roads.iter().map(|r| r.source_index).collect::<Vec<_>>(),
            vec![0, 4]
        );
        assert_eq!(partition.region("R12").unwrap().roads.len(), 1);
        assert_eq!(partition.populated().count(), 2);
    }

    #[test]
    fn partition_is_idempotent_and_order_independent() {
        let regions = grid_regions();
        let segments: Vec<RoadSegment> = (0..200)
            .map(|i| {
                let x = f64::from(i % 20) * 0.61 - 0.5;
                let y = f64::from(i / 20) * 1.23 - 0.5;
                segment(i as usize, line_string![(x: x, y: y), (x: x + 0.2, y: y + 0.1)])
            })
            .collect();

        let summarize = |partition: &RoadPartition| {
            let mut per_region: Vec<(String, Vec<usize>)> = partition
                .regions
                .iter()
                .map(|r| (r.name.clone(), r.roads.iter().map(|s| s.source_index).collect()))
                .collect();
            per_region.sort();
            (per_region, partition.unassigned, partition.skipped)
        };

        let input = RoadInput {
            segments: segments.clone(),
            skipped: 0,
        };
        let first = partition_roads(&RegionIndex::indexed(&regions), input.clone());
        let second = partition_roads(&RegionIndex::indexed(&regions), input.clone());
        assert_eq!(summarize(&first), summarize(&second));

        let reversed: RegionSet = regions.iter().rev().cloned().collect();
        let permuted = partition_roads(&RegionIndex::linear(&reversed), input);
        assert_eq!(summarize(&first), summarize(&permuted));
    }
}

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use geo::{LineString, polygon};
use geoprep_core::algo::{RegionIndex, partition_roads};
use geoprep_core::model::{Region, RegionSet, RoadAttributes, RoadInput, RoadSegment};

const GRID: u32 = 6;

fn regions() -> RegionSet {
    (0..GRID)
        .flat_map(|i| (0..GRID).map(move |j| (i, j)))
        .map(|(i, j)| {
            let (x, y) = (f64::from(i), f64::from(j));
            Region::from_polygon(
                format!("R{i}_{j}"),
                polygon![
                    (x: x, y: y),
                    (x: x + 1.0, y: y),
                    (x: x + 1.0, y: y + 1.0),
                    (x: x, y: y + 1.0),
                    (x: x, y: y),
                ],
            )
        })
        .collect()
}

fn segments(count: u32) -> RoadInput {
    let span = f64::from(GRID) + 1.0;
    let segments = (0..count)
        .map(|k| {
            let x = f64::from(k % 997) / 997.0 * span - 0.5;
            let y = f64::from(k % 991) / 991.0 * span - 0.5;
            RoadSegment {
                source_index: k as usize,
                geometry: LineString::from(vec![(x, y), (x + 0.01, y + 0.005), (x + 0.02, y)]),
                attributes: RoadAttributes::default(),
            }
        })
        .collect();
    RoadInput {
        segments,
        skipped: 0,
    }
}

fn bench_partition(c: &mut Criterion) {
    let regions = regions();
    let input = segments(50_000);

    let mut group = c.benchmark_group("partition_roads");
    group.sample_size(20);
    group.bench_function("linear", |b| {
        let index = RegionIndex::linear(&regions);
        b.iter(|| partition_roads(&index, black_box(input.clone())));
    });
    group.bench_function("rtree", |b| {
        let index = RegionIndex::indexed(&regions);
        b.iter(|| partition_roads(&index, black_box(input.clone())));
    });
    group.finish();
}

criterion_group!(benches, bench_partition);
criterion_main!(benches);

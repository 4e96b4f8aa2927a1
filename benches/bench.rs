use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graze::{Aabb, Body, BodyId, Fp, GridIndex, Shape, ShapeIdCounter, SpatialIndex, Vec2};

fn criterion_benchmark(c: &mut Criterion) {
    let mut ids = ShapeIdCounter::new();
    let body = Body::new(BodyId(0), Vec2::new(0.0, 0.0), 0.0);

    let mut circle = Shape::new_circle(&mut ids, body.id(), 1.0, Vec2::new(0.0, 0.0));
    circle.cache_bb(&body);
    let mut capsule = Shape::new_segment(
        &mut ids,
        body.id(),
        Vec2::new(-4.0, 0.0),
        Vec2::new(4.0, 0.0),
        0.5,
    );
    capsule.cache_bb(&body);

    c.bench_function("circle nearest point", |b| {
        b.iter(|| circle.nearest_point_query(black_box(Vec2::new(3.0, 4.0))))
    });
    c.bench_function("capsule wall raycast", |b| {
        b.iter(|| {
            capsule.segment_query(black_box(Vec2::new(0.0, 5.0)), black_box(Vec2::new(0.5, -5.0)))
        })
    });
    c.bench_function("capsule cap raycast", |b| {
        b.iter(|| {
            capsule.segment_query(black_box(Vec2::new(-7.0, 3.0)), black_box(Vec2::new(-4.0, 0.0)))
        })
    });

    let mut grid = GridIndex::new(2.0);
    let mut grid_ids = ShapeIdCounter::new();
    for i in 0..256u32 {
        let x = (i % 16) as Fp * 2.0;
        let y = (i / 16) as Fp * 2.0;
        grid.insert(grid_ids.next_id(), Aabb::for_circle(Vec2::new(x, y), 0.75));
    }
    c.bench_function("grid bb query", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            grid.query_bb(
                black_box(Aabb::new(Vec2::new(3.0, 3.0), Vec2::new(9.0, 9.0))),
                &mut |_| hits += 1,
            );
            hits
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

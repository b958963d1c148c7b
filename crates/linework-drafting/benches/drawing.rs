use criterion::{black_box, criterion_group, criterion_main, Criterion};

use linework_drafting::{render_drawing, DrawingOptions, VisibilityParams};
use linework_geom::{BoxAabb, Cone, ConeCap, Cylinder, CylinderCaps, Sphere};
use linework_intersect::{intersection_curves, IntersectionOptions};
use linework_math::{Point3, Vec3};
use linework_raytrace::{Camera, Scene};

fn bench_scene() -> Scene {
    let camera =
        Camera::perspective(Point3::new(4.2, 2.8, 5.4), Point3::new(0.2, 0.0, 0.0)).unwrap();
    let mut scene = Scene::new(camera);
    scene.add(Sphere::new(Point3::new(-1.6, 0.2, 0.0), 1.0).unwrap());
    scene.add(
        Cylinder::new(
            Point3::new(0.4, -1.1, -0.2),
            Vec3::y(),
            2.4,
            0.65,
            CylinderCaps::Both,
        )
        .unwrap(),
    );
    scene.add(
        Cone::new(
            Point3::new(2.2, 1.2, 0.0),
            -Vec3::y(),
            2.2,
            0.9,
            ConeCap::Base,
        )
        .unwrap(),
    );
    scene.add(BoxAabb::new(Point3::new(-0.6, -0.9, 1.3), Point3::new(0.8, 0.5, 2.7)).unwrap());
    scene
}

fn drawing_benches(c: &mut Criterion) {
    let scene = bench_scene();

    c.bench_function("intersection_curves", |b| {
        let opts = IntersectionOptions::default();
        b.iter(|| intersection_curves(black_box(scene.primitives()), &opts))
    });

    c.bench_function("render_drawing", |b| {
        let opts = DrawingOptions::default();
        b.iter(|| render_drawing(black_box(&scene), &opts))
    });

    c.bench_function("render_drawing_coarse", |b| {
        let opts = DrawingOptions::default()
            .with_visibility(VisibilityParams::default().with_coarse_samples(24));
        b.iter(|| render_drawing(black_box(&scene), &opts))
    });
}

criterion_group!(benches, drawing_benches);
criterion_main!(benches);

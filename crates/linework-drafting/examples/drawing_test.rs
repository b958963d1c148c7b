//! Test hidden-line drawing of a small scene of primitives.
//!
//! Run with: cargo run -p linework-drafting --example drawing_test

use linework_drafting::{render_drawing, CurveInclude, DrawingOptions, VisibilityParams};
use linework_geom::{BoxAabb, Cone, ConeCap, Cylinder, CylinderCaps, Sphere};
use linework_math::{Point3, Vec3};
use linework_raytrace::{Camera, Scene};

/// Sphere, capped cylinder, cone and box seen from above and to the right.
fn make_scene(camera: Camera) -> Result<Scene, Box<dyn std::error::Error>> {
    let mut scene = Scene::new(camera);
    scene.add(Sphere::new(Point3::new(-1.6, 0.2, 0.0), 1.0)?);
    scene.add(Cylinder::new(
        Point3::new(0.4, -1.1, -0.2),
        Vec3::y(),
        2.4,
        0.65,
        CylinderCaps::Both,
    )?);
    scene.add(Cone::new(
        Point3::new(2.2, 1.2, 0.0),
        -Vec3::y(),
        2.2,
        0.9,
        ConeCap::Base,
    )?);
    scene.add(BoxAabb::new(
        Point3::new(-0.6, -0.9, 1.3),
        Point3::new(0.8, 0.5, 2.7),
    )?);
    Ok(scene)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Hidden Line Drawing Test\n");

    let eye = Point3::new(4.2, 2.8, 5.4);
    let target = Point3::new(0.2, 0.0, 0.0);

    // Test 1: Perspective, everything on
    println!("--- Perspective ---");
    let scene = make_scene(Camera::perspective(eye, target)?)?;
    println!("Primitives: {}", scene.len());
    let drawing = render_drawing(&scene, &DrawingOptions::default());
    println!("Pieces: {}", drawing.len());
    println!("Visible: {}", drawing.num_visible());
    println!("Hidden: {}", drawing.num_hidden());

    // Test 2: Orthographic
    println!("\n--- Orthographic ---");
    let ortho = make_scene(Camera::orthographic(eye, target)?)?;
    let drawing = render_drawing(&ortho, &DrawingOptions::default());
    println!("Visible: {}", drawing.num_visible());
    println!("Hidden: {}", drawing.num_hidden());

    // Test 3: Outlines only
    println!("\n--- Outlines Only ---");
    let opts = DrawingOptions::default().with_intersections(None);
    let drawing = render_drawing(&scene, &opts);
    println!("Visible: {}", drawing.num_visible());
    println!("Hidden: {}", drawing.num_hidden());

    // Test 4: Silhouettes with a coarse pre-pass
    println!("\n--- Silhouettes, Coarse Pre-pass ---");
    let opts = DrawingOptions::default()
        .with_include(CurveInclude {
            silhouettes: true,
            ..CurveInclude::NONE
        })
        .with_intersections(None)
        .with_visibility(VisibilityParams::default().with_coarse_samples(24));
    let drawing = render_drawing(&scene, &opts);
    for (i, piece) in drawing.pieces.iter().enumerate() {
        let c = &piece.curve;
        println!(
            "  Piece {}: ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2}), visible: {}",
            i, c.p0.x, c.p0.y, c.p0.z, c.p3.x, c.p3.y, c.p3.z, piece.visible
        );
    }

    println!("\n=== All tests completed ===");
    Ok(())
}

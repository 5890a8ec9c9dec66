//! Built-in demo scenes.
//!
//! Each scene returns its world, already wrapped in a BVH, and the camera it
//! is meant to be viewed from.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use lumen_renderer::sampling::{random_f64, random_range, random_vec_range};
use lumen_renderer::{
    cuboid, BvhNode, CameraConfig, CheckerTexture, Color, ConstantMedium, Dielectric,
    DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture,
    Point3, Quad, Rotate, Sphere, Translate, Triangle, Vec3,
};
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    /// Diffuse sphere resting on a ground sphere
    #[value(name = "spheres")]
    Spheres,
    /// Field of random small spheres, some in motion, around three large ones
    #[value(name = "bouncing")]
    Bouncing,
    /// Two large checkered spheres
    #[value(name = "checkered")]
    Checkered,
    /// Image-textured globe
    #[value(name = "earth")]
    Earth,
    /// Perlin marble spheres
    #[value(name = "perlin")]
    Perlin,
    /// Five colored quads
    #[value(name = "quads")]
    Quads,
    /// Colored triangles forming an open pyramid
    #[value(name = "triangles")]
    Triangles,
    /// Marble spheres lit by an area light
    #[value(name = "simple_light")]
    SimpleLight,
    /// Cornell box with two rotated blocks
    #[value(name = "cornell_box")]
    CornellBox,
    /// Cornell box with blocks of smoke
    #[value(name = "cornell_smoke")]
    CornellSmoke,
}

/// A ready-to-render scene.
pub struct Scene {
    pub world: BvhNode,
    pub camera: CameraConfig,
}

/// Build the named scene. `rng` drives any random placement or procedural
/// textures; `texture` is the image used by the earth scene.
pub fn build(name: SceneName, rng: &mut dyn RngCore, texture: &Path) -> Scene {
    let (world, camera) = match name {
        SceneName::Spheres => spheres(),
        SceneName::Bouncing => bouncing(rng),
        SceneName::Checkered => checkered(),
        SceneName::Earth => earth(texture),
        SceneName::Perlin => perlin(rng),
        SceneName::Quads => quads(),
        SceneName::Triangles => triangles(),
        SceneName::SimpleLight => simple_light(rng),
        SceneName::CornellBox => cornell_box(),
        SceneName::CornellSmoke => cornell_smoke(),
    };

    log::debug!("Scene {:?}: {} top-level objects", name, world.len());
    Scene {
        world: BvhNode::from_list(world),
        camera,
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

/// Wide-angle camera shared by the book-style outdoor scenes.
fn outdoor_camera(look_from: Point3, look_at: Point3) -> CameraConfig {
    CameraConfig::default()
        .with_image(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
}

fn spheres() -> (HittableList, CameraConfig) {
    let mut world = HittableList::new();
    world.push(Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        lambertian(Color::new(0.5, 0.5, 0.5)),
    ));
    world.push(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        lambertian(Color::new(0.5, 0.5, 0.5)),
    ));

    let camera = CameraConfig::default()
        .with_image(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_lens(90.0, 0.0, 1.0);
    (world, camera)
}

fn bouncing(rng: &mut dyn RngCore) -> (HittableList, CameraConfig) {
    let mut world = HittableList::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.push(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(checker)),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * random_f64(rng),
                0.2,
                b as f64 + 0.9 * random_f64(rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse, bouncing upward over the shutter interval
                let albedo = random_vec_range(rng, 0.0, 1.0) * random_vec_range(rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, random_range(rng, 0.0, 0.5), 0.0);
                world.push(Sphere::moving(center, center2, 0.2, lambertian(albedo)));
            } else if choose_mat < 0.95 {
                let albedo = random_vec_range(rng, 0.5, 1.0);
                let fuzz = random_range(rng, 0.0, 0.5);
                world.push(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                world.push(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    world.push(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.push(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    let camera = outdoor_camera(Point3::new(13.0, 2.0, 3.0), Point3::ZERO).with_lens(20.0, 0.6, 10.0);
    (world, camera)
}

fn checkered() -> (HittableList, CameraConfig) {
    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(checker));

    let mut world = HittableList::new();
    world.push(Sphere::new(Point3::new(0.0, -10.0, 0.0), 10.0, material.clone()));
    world.push(Sphere::new(Point3::new(0.0, 10.0, 0.0), 10.0, material));

    (world, outdoor_camera(Point3::new(13.0, 2.0, 3.0), Point3::ZERO))
}

fn earth(texture: &Path) -> (HittableList, CameraConfig) {
    let earth_texture = Arc::new(ImageTexture::open(texture));
    let surface: Arc<dyn Material> = Arc::new(Lambertian::textured(earth_texture));

    let mut world = HittableList::new();
    world.push(Sphere::new(Point3::ZERO, 2.0, surface));

    (world, outdoor_camera(Point3::new(0.0, 0.0, 12.0), Point3::ZERO))
}

fn marble_spheres(world: &mut HittableList, rng: &mut dyn RngCore) {
    let pertext = Arc::new(NoiseTexture::new(4.0, rng));
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(pertext));

    world.push(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, material.clone()));
    world.push(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0, material));
}

fn perlin(rng: &mut dyn RngCore) -> (HittableList, CameraConfig) {
    let mut world = HittableList::new();
    marble_spheres(&mut world, rng);

    (world, outdoor_camera(Point3::new(13.0, 2.0, 3.0), Point3::ZERO))
}

/// The five quad colors, left to right then top to bottom.
fn palette() -> [Arc<dyn Material>; 5] {
    [
        lambertian(Color::new(1.0, 0.2, 0.2)),
        lambertian(Color::new(0.2, 1.0, 0.2)),
        lambertian(Color::new(0.2, 0.2, 1.0)),
        lambertian(Color::new(1.0, 0.5, 0.0)),
        lambertian(Color::new(0.2, 0.8, 0.8)),
    ]
}

fn quads() -> (HittableList, CameraConfig) {
    let [left_red, back_green, right_blue, upper_orange, lower_teal] = palette();

    let mut world = HittableList::new();
    world.push(Quad::new(
        Point3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    ));
    world.push(Quad::new(
        Point3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    ));
    world.push(Quad::new(
        Point3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    ));
    world.push(Quad::new(
        Point3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    ));
    world.push(Quad::new(
        Point3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    ));

    (world, facing_camera())
}

fn triangles() -> (HittableList, CameraConfig) {
    let [red, green, blue, orange, teal] = palette();

    let apex = Point3::new(0.0, 2.5, 1.0);
    let base = [
        Point3::new(-2.5, -2.0, 3.0),
        Point3::new(2.5, -2.0, 3.0),
        Point3::new(2.5, -2.0, -1.0),
        Point3::new(-2.5, -2.0, -1.0),
    ];

    let mut world = HittableList::new();
    for (k, material) in [red, green, blue, orange].into_iter().enumerate() {
        world.push(Triangle::from_vertices(base[k], base[(k + 1) % 4], apex, material));
    }
    // Floor under the pyramid
    world.push(Triangle::from_vertices(
        Point3::new(-4.0, -2.0, 5.0),
        Point3::new(4.0, -2.0, 5.0),
        Point3::new(0.0, -2.0, -4.0),
        teal,
    ));

    (world, facing_camera())
}

fn facing_camera() -> CameraConfig {
    CameraConfig::default()
        .with_image(400, 1.0)
        .with_quality(100, 50)
        .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
}

fn simple_light(rng: &mut dyn RngCore) -> (HittableList, CameraConfig) {
    let mut world = HittableList::new();
    marble_spheres(&mut world, rng);

    let difflight: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.push(Quad::new(
        Point3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        difflight,
    ));

    let camera = outdoor_camera(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0))
        .with_background(Color::ZERO);
    (world, camera)
}

/// The five walls and a ceiling light of the Cornell box. Returns the world
/// and the white material for the contents.
fn cornell_walls(light_quad: (Point3, Vec3, Vec3), light_power: f64) -> (HittableList, Arc<dyn Material>) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(light_power)));

    let mut world = HittableList::new();
    world.push(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    ));
    world.push(Quad::new(
        Point3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    ));
    let (q, u, v) = light_quad;
    world.push(Quad::new(q, u, v, light));
    world.push(Quad::new(
        Point3::new(0.0, 555.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    ));
    world.push(Quad::new(
        Point3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    ));
    world.push(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    ));

    (world, white)
}

/// The tall and short Cornell blocks, rotated and moved into place.
fn cornell_blocks(white: Arc<dyn Material>) -> [Arc<dyn Hittable>; 2] {
    let tall: Arc<dyn Hittable> = Arc::new(cuboid(
        Point3::ZERO,
        Point3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall: Arc<dyn Hittable> = Arc::new(Rotate::y(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(cuboid(
        Point3::ZERO,
        Point3::new(165.0, 165.0, 165.0),
        white,
    ));
    let short: Arc<dyn Hittable> = Arc::new(Rotate::y(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    [tall, short]
}

fn cornell_camera() -> CameraConfig {
    CameraConfig::default()
        .with_image(600, 1.0)
        .with_quality(200, 50)
        .with_background(Color::ZERO)
        .with_position(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

fn cornell_box() -> (HittableList, CameraConfig) {
    let light = (
        Point3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
    );
    let (mut world, white) = cornell_walls(light, 15.0);
    for block in cornell_blocks(white) {
        world.add(block);
    }

    (world, cornell_camera())
}

fn cornell_smoke() -> (HittableList, CameraConfig) {
    let light = (
        Point3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
    );
    let (mut world, white) = cornell_walls(light, 7.0);
    let [tall, short] = cornell_blocks(white);

    world.push(ConstantMedium::with_color(tall, 0.01, Color::ZERO));
    world.push(ConstantMedium::with_color(short, 0.01, Color::ONE));

    (world, cornell_camera())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{render, Camera, RenderOptions};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build_scene(name: SceneName) -> Scene {
        let mut rng = StdRng::seed_from_u64(0);
        build(name, &mut rng, Path::new("/no/such/earthmap.jpg"))
    }

    #[test]
    fn test_every_scene_renders() {
        let _ = env_logger::builder().is_test(true).try_init();

        for &name in SceneName::value_variants() {
            let scene = build_scene(name);
            assert!(!scene.world.bounding_box().is_empty(), "{:?}", name);

            let camera = Camera::new(scene.camera.clone().with_image(8, 1.0).with_quality(1, 4));
            let options = RenderOptions {
                threads: Some(2),
                seed: Some(1),
                ..RenderOptions::default()
            };
            let image = render(&camera, &scene.world, &options);
            assert_eq!(image.to_rgb8().len(), 8 * 8 * 3, "{:?}", name);
            assert!(image.pixels.iter().all(|c| c.is_finite()), "{:?}", name);
        }
    }

    #[test]
    fn test_bouncing_is_seeded() {
        let a = build_scene(SceneName::Bouncing);
        let b = build_scene(SceneName::Bouncing);
        assert_eq!(a.world.bounding_box(), b.world.bounding_box());
        assert_eq!(a.camera.defocus_angle, 0.6);
    }

    #[test]
    fn test_cornell_scenes_are_dark_boxes() {
        for name in [SceneName::CornellBox, SceneName::CornellSmoke] {
            let scene = build_scene(name);
            assert_eq!(scene.camera.background, Color::ZERO);

            let bbox = scene.world.bounding_box();
            assert!(bbox.x.min > -1.0 && bbox.x.max < 556.0);
            assert!(bbox.y.max < 556.0);
        }
    }

    #[test]
    fn test_spheres_scene_matches_classic_layout() {
        let scene = build_scene(SceneName::Spheres);
        let bbox = scene.world.bounding_box();
        assert!((bbox.y.min + 100.5 + 100.0).abs() < 1e-9);
        assert!((bbox.y.max - 0.5).abs() < 1e-9);
    }
}

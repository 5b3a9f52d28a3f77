use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cube;
use crate::physics::{FollowsCube, PhysicsBody, PhysicsSet, PhysicsWorld};
use crate::pool_ball;
use crate::settings::{
    ToySettings, BALL_COUNT, BALL_MASS, BALL_RADIUS, CUBE_SIZE, WALL_THICKNESS,
};

const CUBE_ALPHA: f32 = 0.2;

#[derive(Event, Default)]
pub struct RecolorCube;

#[derive(Event, Default)]
pub struct ResetBalls;

#[derive(Component)]
pub struct Ball {
    pub number: usize,
}

#[derive(Resource)]
struct CubeMaterials {
    faces: Handle<StandardMaterial>,
    edges: Handle<StandardMaterial>,
}

#[derive(Resource)]
struct PlacementRng(StdRng);

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RecolorCube>()
            .add_event::<ResetBalls>()
            .add_systems(Startup, spawn_scene)
            .add_systems(Update, (recolor_cube, reset_balls).before(PhysicsSet));
    }
}

fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut world: ResMut<PhysicsWorld>,
    settings: Res<ToySettings>,
) {
    let start = Color::srgb(0.0, 1.0, 0.0);
    let faces = materials.add(StandardMaterial {
        base_color: start.with_alpha(CUBE_ALPHA),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    let edges = materials.add(StandardMaterial {
        base_color: start,
        unlit: true,
        ..default()
    });

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::new(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE)),
            material: faces.clone(),
            ..default()
        },
        FollowsCube,
    ));
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(edge_mesh(CUBE_SIZE)),
            material: edges.clone(),
            ..default()
        },
        FollowsCube,
    ));
    commands.insert_resource(CubeMaterials { faces, edges });

    world.build_cube(CUBE_SIZE, WALL_THICKNESS);

    let mut rng = placement_rng(settings.seed);
    let sphere = meshes.add(Sphere::new(BALL_RADIUS).mesh().uv(32, 32));
    let font = match pool_ball::BallFont::load() {
        Ok(font) => Some(font),
        Err(err) => {
            warn!("ball numbers disabled, font failed to load: {err}");
            None
        }
    };
    for number in 0..BALL_COUNT {
        let position = random_position(&mut rng);
        let body = world.add_ball(position, BALL_RADIUS, BALL_MASS, settings.ccd);
        let texture = images.add(pool_ball::ball_image(number, font.as_ref()));
        commands.spawn((
            PbrBundle {
                mesh: sphere.clone(),
                material: materials.add(pool_ball::ball_material(texture)),
                transform: Transform::from_translation(position),
                ..default()
            },
            Ball { number },
            PhysicsBody(body),
        ));
    }
    commands.insert_resource(PlacementRng(rng));

    info!("spawned cube with {BALL_COUNT} balls");
}

fn placement_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn random_position(rng: &mut impl Rng) -> Vec3 {
    let extent = cube::spawn_extent(CUBE_SIZE, BALL_RADIUS);
    let mut coord = || (rng.gen::<f32>() - 0.5) * 2.0 * extent;
    Vec3::new(coord(), coord(), coord())
}

fn edge_mesh(size: f32) -> Mesh {
    let positions: Vec<[f32; 3]> = cube::edge_segments(size)
        .iter()
        .flat_map(|(a, b)| [a.to_array(), b.to_array()])
        .collect();
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::srgb(rng.gen(), rng.gen(), rng.gen())
}

fn recolor_cube(
    mut ev: EventReader<RecolorCube>,
    cube_materials: Res<CubeMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if ev.is_empty() {
        return;
    }
    ev.clear();

    let color = random_color(&mut rand::thread_rng());
    if let Some(faces) = materials.get_mut(&cube_materials.faces) {
        faces.base_color = color.with_alpha(CUBE_ALPHA);
    }
    if let Some(edges) = materials.get_mut(&cube_materials.edges) {
        edges.base_color = color;
    }
    debug!("cube recolored to {:?}", color.to_srgba());
}

fn reset_balls(
    mut ev: EventReader<ResetBalls>,
    mut rng: ResMut<PlacementRng>,
    mut world: ResMut<PhysicsWorld>,
    balls: Query<(&Ball, &PhysicsBody)>,
) {
    if ev.is_empty() {
        return;
    }
    ev.clear();

    if let Err(err) = world.reset_cube() {
        warn!("cube reset failed: {err}");
    }
    for (ball, body) in &balls {
        let position = random_position(&mut rng.0);
        if let Err(err) = world.place_ball(body.0, position) {
            warn!("ball {} not reset: {err}", ball.number);
        }
    }
    info!("balls reset");
}

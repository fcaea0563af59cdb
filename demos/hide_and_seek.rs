use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_avoider::prelude::*;

/// Marker component for the patrolling seeker
#[derive(Component)]
struct Seeker;

/// Moves an entity back and forth between two points
#[derive(Component)]
struct Patrol {
    start_pos: Vec3,
    end_pos: Vec3,
    speed: f32,
    direction: f32, // 1.0 or -1.0
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(AvoiderPlugin)
        .add_plugins(DebugAvoiderPlugin)
        .insert_resource(NavSurface::new(PlanarSurface::new(Vec2::splat(24.0), 0.0)))
        .add_systems(Startup, setup)
        .add_systems(Update, patrol)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Patrolling seeker (red cylinder)
    let seeker_entity = commands
        .spawn((
            Seeker,
            Patrol {
                start_pos: Vec3::new(-12.0, 0.0, -12.0),
                end_pos: Vec3::new(12.0, 0.0, 8.0),
                speed: 4.0,
                direction: 1.0,
            },
            Transform::from_translation(Vec3::new(-12.0, 0.0, -12.0)),
            RigidBody::Kinematic,
            Collider::cylinder(0.5, 1.8),
            Mesh3d(meshes.add(Cylinder::new(0.5, 1.8))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.2, 0.2),
                emissive: LinearRgba::rgb(1.0, 0.0, 0.0),
                ..default()
            })),
        ))
        .id();

    // The hiding agent (blue sphere)
    commands.spawn((
        Avoider::new(seeker_entity)
            .with_avoid_range(10.0)
            .with_move_speed(4.5),
        Transform::from_translation(Vec3::new(2.0, 0.0, 3.0)),
        RigidBody::Kinematic,
        Collider::sphere(0.5),
        Mesh3d(meshes.add(Sphere::new(0.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.6, 0.9),
            ..default()
        })),
    ));

    // Walls providing cover
    spawn_wall(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(6.0, 1.0, 0.0),
        Vec3::new(1.0, 2.5, 8.0),
    );
    spawn_wall(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(-8.0, 1.0, 6.0),
        Vec3::new(6.0, 2.5, 1.0),
    );
    spawn_wall(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(-2.0, 1.0, -9.0),
        Vec3::new(8.0, 2.5, 1.0),
    );

    // Platform
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::new(25.0, 25.0)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.5, 0.3),
            ..default()
        })),
        Transform::from_xyz(0.0, -0.6, 0.0),
        RigidBody::Static,
        Collider::cuboid(50.0, 0.2, 50.0),
    ));

    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 40.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Light
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Helper function to spawn a wall
fn spawn_wall(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    position: Vec3,
    size: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.3, 0.4),
            ..default()
        })),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
    ));
}

fn patrol(time: Res<Time>, mut query: Query<(&mut Patrol, &mut Transform)>) {
    for (mut patrol, mut transform) in query.iter_mut() {
        let target = if patrol.direction > 0.0 {
            patrol.end_pos
        } else {
            patrol.start_pos
        };
        let to_target = target - transform.translation;
        let step = patrol.speed * time.delta_secs();

        if to_target.length() <= step {
            transform.translation = target;
            patrol.direction = -patrol.direction;
        } else {
            transform.translation += to_target.normalize() * step;
        }
    }
}

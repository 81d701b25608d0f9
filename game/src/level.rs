//! Demo level: a hall and a study joined by a corridor
//!
//! The hall's end of the corridor has a wooden door. The study has a window
//! in its north wall and a stair climbing onto a loft platform along its
//! south wall.

use echo_engine::prelude::*;
use std::error::Error;
use tracing::info;

/// Handles the scripted run needs
pub struct DemoLevel {
    pub level: MapAssembly<OcclusionScene>,
    pub hall: RoomId,
    pub study: RoomId,
    pub door: DoorId,
    pub fireplace: Vec3,
}

/// Define the demo level without building it
pub fn define(config: LevelConfig) -> Result<DemoLevel, Box<dyn Error>> {
    let mut level = MapAssembly::new(config, MaterialLibrary::with_presets());

    let hall = level.add_room(
        RoomSpec::new("hall", Vec3::ZERO, Vec3::new(10.0, 10.0, 3.0), 0.2).with_materials(
            RoomMaterials {
                floor: Some("wood".to_string()),
                ..Default::default()
            },
        ),
    );
    let study = level.add_room(
        RoomSpec::new("study", Vec3::new(20.0, 0.0, 0.0), Vec3::new(8.0, 8.0, 3.0), 0.2)
            .with_materials(RoomMaterials {
                floor: Some("carpet".to_string()),
                ..Default::default()
            })
            .with_opening(
                "window",
                Opening::new(Side::North, 2.0, 1.2)
                    .with_position(0.7)
                    .with_bottom_offset(0.9),
            ),
    );

    let corridor = level.add_corridor(hall, Side::East, study, Side::West, 2.0)?;
    let door = level
        .add_door(
            hall,
            &format!("corridor{corridor}_from"),
            DoorCues::new("sounds/door_open.ogg", "sounds/door_close.ogg")
                .with_loop("sounds/draught.ogg", 0.4),
        )
        .ok_or("corridor opening missing")?;

    level.add_stair(
        StairDefinition::new(
            Vec3::new(17.0, -3.5, 0.0),
            4.0,
            1.5,
            1.5,
            ClimbDirection::PosX,
        )
        .with_side_walls(1.0),
    );
    level.add_platform(Platform::new(
        Vec2::new(21.0, -3.5),
        Vec2::new(23.5, -2.0),
        1.5,
    ))?;

    let fireplace = Vec3::new(23.0, 0.0, 0.5);
    level.add_ambient(AmbientSource::new("sounds/fireplace.ogg", fireplace, 0.6));
    level.add_ambient(AmbientSource::new(
        "sounds/clock.ogg",
        Vec3::new(-4.0, 4.0, 1.8),
        0.3,
    ));

    info!(
        rooms = level.rooms().len(),
        doors = level.doors().len(),
        queued = level.pending_len(),
        "Defined demo level"
    );

    Ok(DemoLevel {
        level,
        hall,
        study,
        door,
        fireplace,
    })
}

/// Compute bounds, construct the acoustic scene and build
pub fn build(demo: &mut DemoLevel, audio: &mut dyn AudioDevice) -> Result<(), Box<dyn Error>> {
    let bounds = demo.level.calculate_bounds();
    let scene = OcclusionScene::new(bounds, demo.level.materials().clone());
    demo.level.attach_acoustic(scene)?;
    demo.level.build(audio)?;
    Ok(())
}

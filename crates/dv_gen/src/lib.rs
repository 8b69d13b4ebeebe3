pub mod config;
pub mod ecs;
pub mod error;
pub mod generator;
pub mod graph;
pub mod host;
pub mod layout;
pub mod plugin;

pub use config::{GenerationConfig, MAX_DEPTH_LIMIT};
pub use ecs::{DungeonPartEntity, EcsHost};
pub use error::GenerationError;
pub use generator::{generate, generate_from_entrance, Activation, Generator, SpawnOutcome};
pub use graph::{DungeonGraph, DungeonPart, ExitIndex, ExitStatus, NodeHandle, NodeState};
pub use host::{HostEvent, NullHost, PartHost, RecordingHost};
pub use layout::{DeadEnd, DeadEndReason, DungeonLayout, GenerationReport};
pub use plugin::{
    generate_dungeon_system, run_generation, DungeonGenerated, DungeonGenerationFailed,
    DungeonSettings, DvGenPlugin, GeneratedDungeon,
};

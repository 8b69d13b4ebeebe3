use dv_core::{PartArchetype, Placement};

use crate::graph::{DungeonPart, NodeHandle};

/// World-side collaborator notified as parts come and go.
///
/// The generator's arena owns node lifetime; a host mirrors it into whatever
/// it renders or simulates.
pub trait PartHost {
    /// A new part was created at `part.placement()`.
    fn instantiate(&mut self, handle: NodeHandle, archetype: &PartArchetype, part: &DungeonPart);

    /// A part was removed from the world.
    fn destroy(&mut self, handle: NodeHandle);
}

/// Host that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl PartHost for NullHost {
    fn instantiate(&mut self, _: NodeHandle, _: &PartArchetype, _: &DungeonPart) {}

    fn destroy(&mut self, _: NodeHandle) {}
}

/// One notification received by a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Instantiated {
        handle: NodeHandle,
        archetype: String,
        placement: Placement,
        depth: u32,
    },
    Destroyed {
        handle: NodeHandle,
    },
}

/// Host that keeps a log of every notification in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instantiated(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Instantiated { .. }))
            .count()
    }

    pub fn destroyed(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Destroyed { .. }))
            .count()
    }
}

impl PartHost for RecordingHost {
    fn instantiate(&mut self, handle: NodeHandle, archetype: &PartArchetype, part: &DungeonPart) {
        self.events.push(HostEvent::Instantiated {
            handle,
            archetype: archetype.name.clone(),
            placement: *part.placement(),
            depth: part.depth(),
        });
    }

    fn destroy(&mut self, handle: NodeHandle) {
        self.events.push(HostEvent::Destroyed { handle });
    }
}

use bevy::prelude::*;

/// A line of console output
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

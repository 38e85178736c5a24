//! Axis motion states.

/// Where an axis is in its motion state machine.
///
/// ```text
///            enable()                start_move()
/// Disabled ----------> Idle  ------------------------> Moving
///    ^                  ^  ^                              |  |
///    |                  |  +------- last pulse -----------+  |
///    |                  +--- clear_trip() / enable() --+     |
///    |                                                 |     | interlock
///    +--------------- disable() from any state         Tripped <-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisState {
    /// Enable line inactive; every motion request fails.
    #[default]
    Disabled,
    /// Enabled and ready for commands.
    Idle,
    /// A move is in progress.
    Moving,
    /// The interlock stopped the last move; latched until cleared.
    Tripped,
}

impl AxisState {
    /// Get the state name as a static string.
    pub fn name(self) -> &'static str {
        match self {
            AxisState::Disabled => "Disabled",
            AxisState::Idle => "Idle",
            AxisState::Moving => "Moving",
            AxisState::Tripped => "Tripped",
        }
    }
}

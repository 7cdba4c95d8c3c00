// crates/gesture/src/swipe.rs
//! Swipeable row state machine

use log::trace;

/// Tuning knobs for the gesture
#[derive(Debug, Clone, Copy)]
pub struct SwipeConfig {
    /// Pointer travel in px before a drag (or scroll) engages
    pub slop: f32,
    /// Fraction of the row width the offset must exceed to commit; a
    /// release at exactly this fraction snaps back
    pub commit_fraction: f32,
    /// Asymptotic travel limit in px when dragging toward an unbound side
    pub resistance_limit: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            slop: 8.0,
            commit_fraction: 0.40,
            resistance_limit: 64.0,
        }
    }
}

/// Which swipe directions have an action bound
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionBindings {
    pub left: bool,
    pub right: bool,
}

impl ActionBindings {
    fn bound(&self, direction: SwipeDirection) -> bool {
        match direction {
            SwipeDirection::Left => self.left,
            SwipeDirection::Right => self.right,
        }
    }
}

/// Horizontal swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Pointer events as delivered by the host toolkit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Cancel,
}

/// What the host should do after feeding an event in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Nothing to do; keep rendering at `offset()`
    None,
    /// The pointer went down and up without ever crossing the slop threshold
    Tap,
    /// Released past the commit threshold with an action bound that way;
    /// animate off-screen and fire the action
    Committed(SwipeDirection),
    /// Released short of the threshold; animate the offset back to zero
    SnappedBack,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Pointer down, slop not yet crossed either way
    Pending { x: f32, y: f32 },
    /// Horizontal drag engaged
    Dragging { x: f32 },
    /// Vertical motion won; ignore everything until the pointer lifts
    Scrolling,
}

/// One row's swipe state
///
/// Offsets are positive to the right. The machine never animates; it reports
/// target states and the host interpolates.
#[derive(Debug)]
pub struct SwipeRow {
    width: f32,
    config: SwipeConfig,
    bindings: ActionBindings,
    phase: Phase,
    offset: f32,
}

impl SwipeRow {
    /// Creates a row of the given width with default tuning
    pub fn new(width: f32, bindings: ActionBindings) -> Self {
        Self::with_config(width, bindings, SwipeConfig::default())
    }

    /// Creates a row with explicit tuning
    pub fn with_config(width: f32, bindings: ActionBindings, config: SwipeConfig) -> Self {
        Self {
            width,
            config,
            bindings,
            phase: Phase::Idle,
            offset: 0.0,
        }
    }

    /// Current horizontal offset for rendering
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// True while a horizontal drag is engaged
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Feeds one pointer event through the machine
    pub fn handle(&mut self, event: PointerEvent) -> SwipeOutcome {
        match event {
            PointerEvent::Down { x, y } => {
                self.phase = Phase::Pending { x, y };
                self.offset = 0.0;
                SwipeOutcome::None
            }
            PointerEvent::Move { x, y } => self.on_move(x, y),
            PointerEvent::Up => self.settle(true),
            PointerEvent::Cancel => self.settle(false),
        }
    }

    fn on_move(&mut self, x: f32, y: f32) -> SwipeOutcome {
        match self.phase {
            Phase::Pending { x: x0, y: y0 } => {
                let dx = x - x0;
                let dy = y - y0;
                // Whichever axis crosses the slop first owns the gesture.
                if dy.abs() > self.config.slop && dy.abs() >= dx.abs() {
                    trace!("vertical motion won, disengaging");
                    self.phase = Phase::Scrolling;
                } else if dx.abs() > self.config.slop {
                    self.phase = Phase::Dragging { x: x0 };
                    self.offset = self.attenuate(dx);
                }
                SwipeOutcome::None
            }
            Phase::Dragging { x: x0 } => {
                self.offset = self.attenuate(x - x0);
                SwipeOutcome::None
            }
            Phase::Idle | Phase::Scrolling => SwipeOutcome::None,
        }
    }

    /// 1:1 toward a bound action, diminishing returns toward an unbound side
    fn attenuate(&self, dx: f32) -> f32 {
        let direction = if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        };
        if self.bindings.bound(direction) {
            return dx;
        }
        let limit = self.config.resistance_limit;
        let magnitude = dx.abs();
        // Asymptotic toward `limit`, never hard-blocked.
        dx.signum() * limit * magnitude / (magnitude + limit)
    }

    fn settle(&mut self, may_tap: bool) -> SwipeOutcome {
        let phase = self.phase;
        self.phase = Phase::Idle;

        match phase {
            Phase::Idle | Phase::Scrolling => SwipeOutcome::None,
            Phase::Pending { .. } => {
                if may_tap {
                    SwipeOutcome::Tap
                } else {
                    SwipeOutcome::None
                }
            }
            Phase::Dragging { .. } => {
                let direction = if self.offset < 0.0 {
                    SwipeDirection::Left
                } else {
                    SwipeDirection::Right
                };
                let committed = self.offset.abs() > self.config.commit_fraction * self.width
                    && self.bindings.bound(direction);
                if committed {
                    trace!("swipe committed {direction:?}");
                    SwipeOutcome::Committed(direction)
                } else {
                    self.offset = 0.0;
                    SwipeOutcome::SnappedBack
                }
            }
        }
    }
}

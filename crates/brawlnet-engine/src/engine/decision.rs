/// What an agent wants to do this tick.
///
/// Movement is along the world axes in pixels; rotation is added to the facing angle
/// before moving.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Decision {
    pub move_x: f32,
    pub move_y: f32,
    pub rotate_delta: f32,
    pub wants_to_fire: bool,
}

impl Decision {
    pub const IDLE: Self = Self {
        move_x: 0.0,
        move_y: 0.0,
        rotate_delta: 0.0,
        wants_to_fire: false,
    };

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.move_x != 0.0 || self.move_y != 0.0
    }
}

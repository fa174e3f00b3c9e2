use super::body::ActorBody;

/// Cached answer to "is the actor supported", refreshed once per tick.
#[derive(Debug, Clone, Copy)]
pub struct GroundSensor {
    grounded: bool,
    poll_count: u64,
}

impl Default for GroundSensor {
    fn default() -> Self {
        Self {
            grounded: true,
            poll_count: 0,
        }
    }
}

impl GroundSensor {
    pub fn refresh(&mut self, body: &dyn ActorBody) -> bool {
        self.grounded = body.is_grounded();
        self.poll_count = self.poll_count.saturating_add(1);
        self.grounded
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Local reset after an impulse, ahead of the collaborator reporting it.
    pub fn mark_airborne(&mut self) {
        self.grounded = false;
    }

    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Vec2;

    struct StubBody {
        grounded: bool,
    }

    impl ActorBody for StubBody {
        fn is_grounded(&self) -> bool {
            self.grounded
        }
        fn apply_impulse(&mut self, _impulse: Vec2) {}
        fn position(&self) -> Vec2 {
            Vec2::default()
        }
        fn set_position(&mut self, _position: Vec2) {}
    }

    #[test]
    fn refresh_tracks_collaborator() {
        let mut sensor = GroundSensor::default();
        assert!(!sensor.refresh(&StubBody { grounded: false }));
        assert!(sensor.refresh(&StubBody { grounded: true }));
        assert_eq!(sensor.poll_count(), 2);
    }

    #[test]
    fn mark_airborne_holds_until_next_refresh() {
        let mut sensor = GroundSensor::default();
        let body = StubBody { grounded: true };
        sensor.refresh(&body);
        sensor.mark_airborne();
        assert!(!sensor.is_grounded());
        sensor.refresh(&body);
        assert!(sensor.is_grounded());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BodyHandle(usize);

/// Axis-aligned square body over a flat floor. Unit mass, so an impulse is a
/// velocity change.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RigidBody {
    position: Vec2,
    velocity: Vec2,
    half_extent: f32,
    floor_y: f32,
}

impl RigidBody {
    fn resting_on_floor(x: f32, y: f32, half_extent: f32, floor_y: f32) -> Self {
        Self {
            position: Vec2::new(x, y.max(floor_y + half_extent)),
            velocity: Vec2::ZERO,
            half_extent,
            floor_y,
        }
    }

    fn bottom(&self) -> f32 {
        self.position.y - self.half_extent
    }

    fn step(&mut self, dt_seconds: f32) {
        if self.is_grounded() && self.velocity.y <= 0.0 {
            self.velocity = Vec2::ZERO;
            return;
        }
        self.velocity.y += GRAVITY_UNITS_PER_SECOND_SQUARED * dt_seconds;
        self.position.x += self.velocity.x * dt_seconds;
        self.position.y += self.velocity.y * dt_seconds;
        if self.bottom() < self.floor_y {
            self.position.y = self.floor_y + self.half_extent;
            // Landing kills horizontal drift too.
            self.velocity = Vec2::ZERO;
        }
    }

    fn overlaps(&self, other: &RigidBody) -> bool {
        let reach = self.half_extent + other.half_extent;
        (self.position.x - other.position.x).abs() < reach
            && (self.position.y - other.position.y).abs() < reach
    }
}

impl ActorBody for RigidBody {
    fn is_grounded(&self) -> bool {
        self.bottom() - self.floor_y <= GROUND_PROBE_DISTANCE && self.velocity.y <= 0.0
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity.x += impulse.x;
        self.velocity.y += impulse.y;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

#[derive(Debug, Default)]
struct PhysicsWorld {
    bodies: Vec<RigidBody>,
}

impl PhysicsWorld {
    fn add(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    fn step(&mut self, dt_seconds: f32) {
        for body in &mut self.bodies {
            body.step(dt_seconds);
        }
    }

    /// Disjoint mutable access to two different bodies.
    fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if a.0 == b.0 || a.0.max(b.0) >= self.bodies.len() {
            return None;
        }
        if a.0 < b.0 {
            let (left, right) = self.bodies.split_at_mut(b.0);
            Some((&mut left[a.0], &mut right[0]))
        } else {
            let (left, right) = self.bodies.split_at_mut(a.0);
            Some((&mut right[0], &mut left[b.0]))
        }
    }
}

//! Facing direction and front/back limb resolution
//!
//! A fencer may switch lead side, so "front" is resolved from the frame
//! rather than configured. Every detector calls [`Stance::detect`] with the
//! same convention and keeps the result for the length of a phase.

use serde::{Deserialize, Serialize};

use crate::pose::{
    PoseFrame, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Body side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn shoulder(self) -> usize {
        match self {
            Side::Left => LEFT_SHOULDER,
            Side::Right => RIGHT_SHOULDER,
        }
    }

    pub fn elbow(self) -> usize {
        match self {
            Side::Left => LEFT_ELBOW,
            Side::Right => RIGHT_ELBOW,
        }
    }

    pub fn wrist(self) -> usize {
        match self {
            Side::Left => LEFT_WRIST,
            Side::Right => RIGHT_WRIST,
        }
    }

    pub fn hip(self) -> usize {
        match self {
            Side::Left => LEFT_HIP,
            Side::Right => RIGHT_HIP,
        }
    }

    pub fn knee(self) -> usize {
        match self {
            Side::Left => LEFT_KNEE,
            Side::Right => RIGHT_KNEE,
        }
    }

    pub fn ankle(self) -> usize {
        match self {
            Side::Left => LEFT_ANKLE,
            Side::Right => RIGHT_ANKLE,
        }
    }
}

/// Weapon hand of the fencer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    /// Shoulder that leads in en garde
    pub fn lead_side(self) -> Side {
        match self {
            Handedness::Left => Side::Left,
            Handedness::Right => Side::Right,
        }
    }
}

/// Direction the fencer faces along the image x axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// Toward increasing x
    Positive,
    /// Toward decreasing x
    Negative,
}

impl Facing {
    /// +1 or -1 multiplier turning an x value into a forward coordinate
    pub fn sign(self) -> f32 {
        match self {
            Facing::Positive => 1.0,
            Facing::Negative => -1.0,
        }
    }

    /// Facing from shoulder ordering: the lead shoulder sits ahead of the other
    pub fn from_shoulders(frame: &PoseFrame, handedness: Handedness) -> Self {
        let lead = handedness.lead_side();
        let lead_x = frame.point(lead.shoulder()).0;
        let rear_x = frame.point(lead.opposite().shoulder()).0;
        if lead_x >= rear_x {
            Facing::Positive
        } else {
            Facing::Negative
        }
    }

    /// Coordinate along the facing direction (larger = further forward)
    pub fn forward(self, point: (f32, f32)) -> f32 {
        point.0 * self.sign()
    }
}

/// Facing plus which leg and arm are in front
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stance {
    pub facing: Facing,
    pub front_leg: Side,
    pub front_arm: Side,
}

impl Stance {
    /// Resolve facing and front limbs for one frame
    ///
    /// Front leg is the ankle further along the facing direction; front arm
    /// is the wrist further along it. Ties go to the lead side.
    pub fn detect(frame: &PoseFrame, handedness: Handedness) -> Self {
        let facing = Facing::from_shoulders(frame, handedness);
        let lead = handedness.lead_side();
        let front_leg = Self::further_forward(frame, facing, lead, Side::ankle);
        let front_arm = Self::further_forward(frame, facing, lead, Side::wrist);
        Self {
            facing,
            front_leg,
            front_arm,
        }
    }

    pub fn back_leg(&self) -> Side {
        self.front_leg.opposite()
    }

    fn further_forward(
        frame: &PoseFrame,
        facing: Facing,
        lead: Side,
        joint: fn(Side) -> usize,
    ) -> Side {
        let lead_fwd = facing.forward(frame.point(joint(lead)));
        let other_fwd = facing.forward(frame.point(joint(lead.opposite())));
        if other_fwd > lead_fwd {
            lead.opposite()
        } else {
            lead
        }
    }
}

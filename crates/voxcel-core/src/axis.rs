use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component of an integer vector along this axis.
    pub fn of(self, v: IVec3) -> i32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Component of a float vector along this axis.
    pub fn of_f32(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Unit vector pointing along +axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// The two axes perpendicular to this one, in X, Y, Z order.
    pub fn complement(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    /// Axis along which `v` has the largest magnitude. X wins only when it is
    /// strictly larger than both others, Y likewise; everything else is Z.
    pub fn dominant(v: Vec3) -> Axis {
        let a = v.abs();
        if a.x > a.y && a.x > a.z {
            Axis::X
        } else if a.y > a.x && a.y > a.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Parse the single-letter form used by occlusion metadata ("X", "y", ...).
    pub fn from_letter(s: &str) -> Option<Axis> {
        match s.trim() {
            "X" | "x" => Some(Axis::X),
            "Y" | "y" => Some(Axis::Y),
            "Z" | "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

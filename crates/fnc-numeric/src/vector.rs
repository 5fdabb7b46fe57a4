use fnc_dtype::{NumericCandidate, VectorCandidate};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vector2<T> {
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T> Vector3<T> {
    #[must_use]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: fmt::Display> fmt::Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<T: fmt::Display> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl<T: NumericCandidate> VectorCandidate for Vector2<T> {
    type Scalar = T;

    const KIND: &'static str = "vector2";
    const COMPONENTS: usize = 2;
    const COMPONENT_NAMES: &'static [&'static str] = &["x", "y"];

    fn from_components(components: &[T]) -> Option<Self> {
        match components {
            [x, y] => Some(Self::new(*x, *y)),
            _ => None,
        }
    }

    fn components(&self) -> Vec<T> {
        vec![self.x, self.y]
    }
}

impl<T: NumericCandidate> VectorCandidate for Vector3<T> {
    type Scalar = T;

    const KIND: &'static str = "vector3";
    const COMPONENTS: usize = 3;
    const COMPONENT_NAMES: &'static [&'static str] = &["x", "y", "z"];

    fn from_components(components: &[T]) -> Option<Self> {
        match components {
            [x, y, z] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    fn components(&self) -> Vec<T> {
        vec![self.x, self.y, self.z]
    }
}

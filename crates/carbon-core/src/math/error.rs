// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the error type for fallible conversions in the math module.

use std::fmt;

/// An error produced when a raw integer does not name a valid geometric label.
///
/// Numeric precondition violations (singular matrices, zero normals) are not
/// reported through this type; they propagate as NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// The value is not a cube face index in `0..=5`.
    InvalidCubeFace(u8),
    /// The value is not a volume plane index in `0..=5`.
    InvalidVolumePlane(u8),
    /// The value is not a volume corner index in `0..=7`.
    InvalidVolumeCorner(u8),
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::InvalidCubeFace(value) => {
                write!(f, "Invalid cube face index {value}, expected 0..=5")
            }
            MathError::InvalidVolumePlane(value) => {
                write!(f, "Invalid volume plane index {value}, expected 0..=5")
            }
            MathError::InvalidVolumeCorner(value) => {
                write!(f, "Invalid volume corner index {value}, expected 0..=7")
            }
        }
    }
}

impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_value() {
        let msg = MathError::InvalidCubeFace(9).to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("cube face"));
        assert_eq!(
            MathError::InvalidVolumeCorner(8).to_string(),
            "Invalid volume corner index 8, expected 0..=7"
        );
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(MathError::InvalidVolumePlane(6));
        assert!(err.source().is_none());
    }
}

//! Ready-to-use sample types.
//!
//! [`PointSample`] is the 3-D point read from a cloud, [`Measurement`] the 2-D
//! pair a user enters (or a 2-D cloud is read into).

use std::str::FromStr;
use serde::{ Deserialize, Serialize };
use super::Sample;
use crate::errors::MeasurementError;

/// One point of a cloud: three coordinates in file units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSample {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate; ignored by screen projection.
    pub z: f32,
}

impl PointSample {
    /// Creates a new point.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        PointSample { x, y, z }
    }
}

impl Sample for PointSample {
    const DIMENSIONS: &'static [&'static str] = &["x", "y", "z"];

    fn from_coordinates(c: &[f64]) -> Self {
        PointSample::new(c[0] as f32, c[1] as f32, c[2] as f32)
    }

    fn planar(&self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }
}

/// A 2-D measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Measurement {
    /// Creates a new measurement.
    pub fn new(x: f64, y: f64) -> Self {
        Measurement { x, y }
    }
}

impl Sample for Measurement {
    const DIMENSIONS: &'static [&'static str] = &["x", "y"];

    fn from_coordinates(c: &[f64]) -> Self {
        Measurement::new(c[0], c[1])
    }

    fn planar(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Parses the `x,y` text a user types in, e.g. `"10,20"` or `" -1.5 , 3e2 "`.
impl FromStr for Measurement {
    type Err = MeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(MeasurementError::WrongArity { found: parts.len() });
        }
        let coordinate = |p: &str| -> Result<f64, MeasurementError> {
            let p = p.trim();
            match p.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(MeasurementError::InvalidCoordinate(p.to_string())),
            }
        };
        Ok(Measurement::new(coordinate(parts[0])?, coordinate(parts[1])?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_from_str_ok() {
        assert_eq!("10,20".parse::<Measurement>(), Ok(Measurement::new(10.0, 20.0)));
        assert_eq!(" -1.5 , 3e2 ".parse::<Measurement>(), Ok(Measurement::new(-1.5, 300.0)));
    }

    #[test]
    fn measurement_from_str_wrong_arity() {
        assert_eq!("10".parse::<Measurement>(), Err(MeasurementError::WrongArity { found: 1 }));
        assert_eq!("1,2,3".parse::<Measurement>(), Err(MeasurementError::WrongArity { found: 3 }));
    }

    #[test]
    fn measurement_from_str_rejects_non_numbers() {
        assert_eq!(
            "ten,20".parse::<Measurement>(),
            Err(MeasurementError::InvalidCoordinate("ten".to_string()))
        );
        assert_eq!(
            "1,inf".parse::<Measurement>(),
            Err(MeasurementError::InvalidCoordinate("inf".to_string()))
        );
        assert!(",".parse::<Measurement>().is_err());
    }

    #[test]
    fn samples_project_on_x_and_y() {
        assert_eq!(PointSample::new(1.0, 2.0, 3.0).planar(), (1.0, 2.0));
        assert_eq!(Measurement::new(4.0, 5.0).planar(), (4.0, 5.0));
        assert_eq!(PointSample::from_coordinates(&[1.0, 2.0, 3.0]), PointSample::new(1.0, 2.0, 3.0));
    }
}

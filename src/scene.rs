//! State shared between decoding and drawing.
//!
//! [`Scene`] is an append-only collection of user measurements. [`CloudSlot`] holds
//! the point cloud currently on display and swaps it as a whole once a reload has
//! fully succeeded. Both hand out a revision number that changes with every update;
//! a UI redraws when it sees a new one.

use std::io::Read;
use std::sync::{ Arc, PoisonError, RwLock };

use tracing::{ info, warn };

use crate::errors::{ DecodeResult, MeasurementError };
use crate::parser::Parser;
use crate::ply::{ Measurement, PointCloud, PointSample, Sample };
use crate::projection::{ CanvasSize, ProjectionTransform };
use crate::render::{ Canvas, RenderPass };

/// A named set of 2-D measurements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Name the scene is listed under.
    pub name: String,
    /// Title shown above the scene.
    pub title: String,
    measurements: Vec<Measurement>,
    revision: u64,
}

impl Scene {
    /// Creates an empty scene whose title is its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Scene { title: name.clone(), name, measurements: Vec::new(), revision: 0 }
    }

    /// Measurements in insertion order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Appends a measurement and returns the new revision.
    pub fn add_measurement(&mut self, measurement: Measurement) -> u64 {
        self.measurements.push(measurement);
        self.revision += 1;
        self.revision
    }

    /// Parses `x,y` text and appends it. Invalid text leaves the scene unchanged.
    pub fn add_measurement_str(&mut self, text: &str) -> Result<u64, MeasurementError> {
        let measurement = text.parse::<Measurement>()?;
        Ok(self.add_measurement(measurement))
    }

    /// Changes whenever a measurement is added.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Draws the measurements onto `canvas`.
    pub fn render<C: Canvas + ?Sized>(&self, pass: &RenderPass, canvas: &mut C, size: CanvasSize) -> Option<ProjectionTransform> {
        pass.render(canvas, size, &self.measurements)
    }
}

#[derive(Debug)]
struct Snapshot<S> {
    cloud: Arc<PointCloud<S>>,
    revision: u64,
}

/// Thread-safe holder of the point set on display.
///
/// Decoding happens outside the lock; readers only ever see the previous or the new
/// cloud in full, never a cloud being built.
#[derive(Debug)]
pub struct CloudSlot<S = PointSample> {
    current: RwLock<Snapshot<S>>,
}

impl<S> Default for CloudSlot<S> {
    fn default() -> Self {
        CloudSlot {
            current: RwLock::new(Snapshot { cloud: Arc::new(PointCloud::default()), revision: 0 }),
        }
    }
}

impl<S: Sample> CloudSlot<S> {
    /// Creates a slot holding an empty cloud at revision `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cloud currently on display.
    pub fn current(&self) -> Arc<PointCloud<S>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).cloud.clone()
    }

    /// Revision of the cloud currently on display.
    pub fn revision(&self) -> u64 {
        self.current.read().unwrap_or_else(PoisonError::into_inner).revision
    }

    /// Installs `cloud`, discarding the previous one, and returns the new revision.
    pub fn replace(&self, cloud: PointCloud<S>) -> u64 {
        let cloud = Arc::new(cloud);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.cloud = cloud;
        current.revision += 1;
        current.revision
    }

    /// Decodes `source` and installs the result.
    ///
    /// `source` is consumed and closed before this returns. On failure the cloud on
    /// display and its revision are left untouched.
    pub fn reload<R: Read>(&self, source: R) -> DecodeResult<u64> {
        match Parser::<S>::new().read_ply(source) {
            Ok(cloud) => {
                let vertices = cloud.len();
                let revision = self.replace(cloud);
                info!(vertices, revision, "point cloud replaced");
                Ok(revision)
            }
            Err(e) => {
                warn!(kind = %e.kind(), "keeping previous point cloud: {}", e);
                Err(e)
            }
        }
    }

    /// Draws the current cloud onto `canvas`.
    pub fn render<C: Canvas + ?Sized>(&self, pass: &RenderPass, canvas: &mut C, size: CanvasSize) -> Option<ProjectionTransform> {
        let cloud = self.current();
        pass.render(canvas, size, &cloud.samples)
    }
}

use crate::handoff::SnapshotHandoff;

/// Tracked position and orientation of the physical cube.
///
/// `rotation_vector` is an axis-angle vector in the vision library's
/// convention: its direction is the axis and its length the angle in radians.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: [f32; 3],
    pub rotation_vector: [f64; 3],
}

impl Pose {
    pub fn new(position: [f32; 3], rotation_vector: [f64; 3]) -> Self {
        Self {
            position,
            rotation_vector,
        }
    }
}

/// Vision/estimation subsystem as seen by the renderer.
pub trait PoseSource {
    /// Pose projected to `timestamp_millis`, or `None` while tracking is lost.
    fn current_pose(&self, timestamp_millis: i64) -> Option<Pose>;
}

/// Pose source that returns whatever the estimator published last.
#[derive(Clone, Default)]
pub struct LatestPose {
    handoff: SnapshotHandoff<Option<Pose>>,
}

impl LatestPose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side; hand the returned clone to the estimation thread.
    pub fn publisher(&self) -> Self {
        self.clone()
    }

    pub fn publish(&self, pose: Option<Pose>) {
        self.handoff.publish(pose);
    }
}

impl PoseSource for LatestPose {
    fn current_pose(&self, _timestamp_millis: i64) -> Option<Pose> {
        *self.handoff.latest()
    }
}

impl<F> PoseSource for F
where
    F: Fn(i64) -> Option<Pose>,
{
    fn current_pose(&self, timestamp_millis: i64) -> Option<Pose> {
        self(timestamp_millis)
    }
}

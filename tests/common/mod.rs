//! Shared test doubles for the host capabilities.
#![allow(dead_code)]

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use parking_lot::Mutex;

use ember::{
    AnimationUpdate, BoneRig, EngineContext, EngineSettings, EntityId, FrameRenderer,
    JointTransform, ManualClock, Pose, PoseEvaluator, SchedulerMode, TargetId, ViewId,
};

pub const EPSILON: f32 = 1e-5;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A context driven by a manual clock starting at zero.
pub fn manual_context(mode: SchedulerMode) -> (EngineContext, ManualClock) {
    let clock = ManualClock::new(0.0);
    let mut settings = EngineSettings::default();
    settings.scheduler.mode = mode;
    let context = EngineContext::with_clock(settings, Arc::new(clock.clone()));
    (context, clock)
}

// ============================================================================
// Call journal
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Task(&'static str),
    Update(&'static str),
    Begin(TargetId),
    Rejected(TargetId),
    Render(ViewId),
    End,
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

// ============================================================================
// Renderer
// ============================================================================

/// Records every call; targets listed in `blocked` refuse `begin_frame`.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    pub journal: Journal,
    pub blocked: Arc<Mutex<Vec<TargetId>>>,
}

impl RecordingRenderer {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            blocked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn block(&self, target: TargetId) {
        self.blocked.lock().push(target);
    }

    pub fn unblock_all(&self) {
        self.blocked.lock().clear();
    }
}

impl FrameRenderer for RecordingRenderer {
    fn begin_frame(&mut self, target: TargetId, _now: f64) -> bool {
        if self.blocked.lock().contains(&target) {
            self.journal.lock().push(Event::Rejected(target));
            return false;
        }
        self.journal.lock().push(Event::Begin(target));
        true
    }

    fn render(&mut self, view: ViewId) {
        self.journal.lock().push(Event::Render(view));
    }

    fn end_frame(&mut self) {
        self.journal.lock().push(Event::End);
    }
}

/// An animation manager that only records its updates.
pub struct RecordingManager {
    pub label: &'static str,
    pub journal: Journal,
}

impl AnimationUpdate for RecordingManager {
    fn name(&self) -> &'static str {
        self.label
    }

    fn update(&mut self, _now: f64) {
        self.journal.lock().push(Event::Update(self.label));
    }
}

// ============================================================================
// Pose evaluator
// ============================================================================

/// The pose a [`MockEvaluator`] produces: one joint whose x translation is
/// `clip * 100 + time` and whose rotation is `time` radians about Y.
pub fn clip_pose(clip: usize, time: f32) -> Pose {
    Pose::new(vec![JointTransform::new(
        Vec3::new(clip as f32 * 100.0 + time, 0.0, 0.0),
        Quat::from_rotation_y(time),
        Vec3::ONE,
    )])
}

#[derive(Debug, Default)]
pub struct EvaluatorLog {
    pub samples: Vec<(usize, f32)>,
    pub applied: Vec<Pose>,
    pub commits: usize,
}

pub struct MockEvaluator {
    durations: Vec<f32>,
    log: Arc<Mutex<EvaluatorLog>>,
}

impl MockEvaluator {
    pub fn new(durations: Vec<f32>) -> (Self, Arc<Mutex<EvaluatorLog>>) {
        let log = Arc::new(Mutex::new(EvaluatorLog::default()));
        (
            Self {
                durations,
                log: log.clone(),
            },
            log,
        )
    }
}

impl PoseEvaluator for MockEvaluator {
    fn clip_count(&self) -> usize {
        self.durations.len()
    }

    fn clip_duration(&self, clip: usize) -> Option<f32> {
        self.durations.get(clip).copied()
    }

    fn sample_clip(&mut self, clip: usize, time: f32, out: &mut Pose) {
        self.log.lock().samples.push((clip, time));
        *out = clip_pose(clip, time);
    }

    fn apply_pose(&mut self, pose: &Pose) {
        self.log.lock().applied.push(pose.clone());
    }

    fn commit_pose(&mut self) {
        self.log.lock().commits += 1;
    }
}

// ============================================================================
// Bone rig
// ============================================================================

/// A joint translated along X; bone clip frames and rest poses are built
/// from these so assertions only need to look at `translation.x`.
pub fn joint_at(x: f32) -> JointTransform {
    JointTransform::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE)
}

#[derive(Debug, Default)]
pub struct RigLog {
    /// Current local transform per skin, per joint.
    pub joints: Vec<Vec<JointTransform>>,
    pub bone_matrices: Vec<(usize, usize, Mat4)>,
    pub matrix_updates: usize,
}

impl RigLog {
    pub fn x(&self, skin: usize, joint: usize) -> f32 {
        self.joints[skin][joint].translation.x
    }
}

/// Joints start at the identity. Joint `j` of skin `s` rests at
/// `x = 100 * s + j`.
pub struct MockRig {
    log: Arc<Mutex<RigLog>>,
}

impl MockRig {
    pub fn new(joint_counts: &[usize]) -> (Self, Arc<Mutex<RigLog>>) {
        let log = Arc::new(Mutex::new(RigLog {
            joints: joint_counts
                .iter()
                .map(|&count| vec![JointTransform::IDENTITY; count])
                .collect(),
            ..RigLog::default()
        }));
        (Self { log: log.clone() }, log)
    }
}

impl BoneRig for MockRig {
    fn skin_count(&self) -> usize {
        self.log.lock().joints.len()
    }

    fn joint_count(&self, skin: usize) -> usize {
        self.log.lock().joints[skin].len()
    }

    fn joint_transform(&self, skin: usize, joint: usize) -> JointTransform {
        self.log.lock().joints[skin][joint]
    }

    fn set_joint_transform(&mut self, skin: usize, joint: usize, transform: JointTransform) {
        self.log.lock().joints[skin][joint] = transform;
    }

    fn rest_transform(&self, skin: usize, joint: usize) -> JointTransform {
        joint_at((100 * skin + joint) as f32)
    }

    fn set_bone_matrix(&mut self, skin: usize, bone: usize, matrix: Mat4) {
        self.log.lock().bone_matrices.push((skin, bone, matrix));
    }

    fn update_bone_matrices(&mut self) {
        self.log.lock().matrix_updates += 1;
    }
}

// ============================================================================
// Morph weight sink
// ============================================================================

pub type WeightLog = Arc<Mutex<Vec<(EntityId, usize, f32)>>>;

pub fn weight_sink() -> (impl FnMut(EntityId, usize, f32) + Send + 'static, WeightLog) {
    let log: WeightLog = Arc::new(Mutex::new(Vec::new()));
    let writer = log.clone();
    (
        move |entity: EntityId, slot: usize, value: f32| writer.lock().push((entity, slot, value)),
        log,
    )
}

//! Ember Animation
//!
//! Per-tick animation managers advanced by the frame dispatcher:
//!
//! - [`skeletal`]: clip playback with crossfades on rigged instances
//! - [`bones`]: frame-buffer driven joint transforms with fades
//! - [`morph`]: frame-buffer driven morph weights on bare renderables
//! - [`system`]: a facade owning all three managers
//!
//! Scene and GPU state stay with the host; the managers only drive the
//! [`capability`] traits.

pub mod bones;
pub mod capability;
pub mod manager;
pub mod morph;
pub mod pose;
pub mod skeletal;
pub mod system;
pub mod target;
pub mod values;

pub use bones::{BoneAnimationComponent, BoneAnimationManager, BoneClip, BonePlay};
pub use capability::{BoneRig, MorphWeightSink, PoseEvaluator};
pub use manager::AnimationUpdate;
pub use morph::{
    MorphAnimationComponent, MorphAnimationManager, MorphClip, MorphIndexMap, MorphPlay,
    MorphPlayHandle,
};
pub use pose::{JointTransform, Pose};
pub use skeletal::{
    ClipPlay, ClipPlayOptions, Crossfade, SkeletalAnimationComponent, SkeletalAnimationManager,
};
pub use system::AnimationSystem;
pub use target::{AnimationTarget, BoneTarget, SkeletalTarget, TargetKey};
pub use values::{Interpolatable, blend};

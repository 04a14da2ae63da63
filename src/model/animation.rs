//! Keyframe animation: clips and the frame-blending animator

use super::mesh::Mesh;
use crate::error::{RenderError, RenderResult};
use crate::rasterizer::{Color, Polygon, Vertex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Named frame range. Frames run from `start_frame` up to but not including
/// `end_frame`, looping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub start_frame: usize,
    pub end_frame: usize,
    pub fps: f32,
}

impl AnimationClip {
    pub fn new(name: &str, start_frame: usize, end_frame: usize, fps: f32) -> Self {
        Self {
            name: name.to_string(),
            start_frame,
            end_frame,
            fps,
        }
    }

    /// Check the clip fits inside a mesh with `num_frames` keyframes
    pub fn validate(&self, num_frames: usize) -> RenderResult<()> {
        if self.start_frame >= self.end_frame {
            return Err(RenderError::invalid_clip(format!(
                "{}: start frame {} is not before end frame {}",
                self.name, self.start_frame, self.end_frame
            )));
        }
        if self.end_frame > num_frames {
            return Err(RenderError::invalid_clip(format!(
                "{}: ends at frame {} but the mesh has {} frames",
                self.name, self.end_frame, num_frames
            )));
        }
        if !(self.fps > 0.0) {
            return Err(RenderError::invalid_clip(format!(
                "{}: fps must be positive, got {}",
                self.name, self.fps
            )));
        }
        Ok(())
    }

    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps
    }

    /// Next frame after `frame`, wrapping back to the start
    fn following(&self, frame: usize) -> usize {
        let next = frame + 1;
        if next >= self.end_frame {
            self.start_frame
        } else {
            next
        }
    }

    fn contains(&self, frame: usize) -> bool {
        frame >= self.start_frame && frame < self.end_frame
    }
}

/// The clip table shared by the classic 198-frame character models
pub fn standard_clips() -> Vec<AnimationClip> {
    const TABLE: [(&str, usize, usize, f32); 20] = [
        ("stand", 0, 40, 9.0),
        ("run", 40, 46, 10.0),
        ("attack", 46, 54, 10.0),
        ("pain_a", 54, 58, 7.0),
        ("pain_b", 58, 62, 7.0),
        ("pain_c", 62, 66, 7.0),
        ("jump", 66, 72, 7.0),
        ("flip", 72, 84, 7.0),
        ("salute", 84, 95, 7.0),
        ("taunt", 95, 112, 10.0),
        ("wave", 112, 123, 7.0),
        ("point", 123, 135, 6.0),
        ("crouch_stand", 135, 154, 10.0),
        ("crouch_walk", 154, 160, 7.0),
        ("crouch_attack", 160, 169, 10.0),
        ("crouch_pain", 169, 173, 7.0),
        ("crouch_death", 173, 178, 5.0),
        ("death_fall_back", 178, 184, 7.0),
        ("death_fall_forward", 184, 190, 7.0),
        ("death_fall_back_slow", 190, 198, 7.0),
    ];

    TABLE
        .iter()
        .map(|&(name, start, end, fps)| AnimationClip::new(name, start, end, fps))
        .collect()
}

/// Look up a clip by name in the standard table
pub fn find_standard_clip(name: &str) -> Option<AnimationClip> {
    standard_clips().into_iter().find(|c| c.name == name)
}

/// Blend two keyframes into `out` for every vertex referenced by `faces`.
///
/// `t == 0` copies `from` directly. Otherwise position and normal are lerped
/// (normals are not renormalized here); `t` outside [0, 1] extrapolates.
/// Each written vertex takes the face's texcoord index and a white color.
pub fn blend_keyframes(
    from: &[Vertex],
    to: &[Vertex],
    t: f32,
    faces: &[Polygon],
    out: &mut [Vertex],
) {
    for face in faces {
        for k in 0..3 {
            let idx = face.indices[k];
            let mut vert = if t == 0.0 {
                from[idx]
            } else {
                let a = &from[idx];
                let b = &to[idx];
                Vertex {
                    position: a.position.lerp(b.position, t),
                    normal: a.normal.lerp(b.normal, t),
                    ..*a
                }
            };
            vert.uv_index = face.uv_indices[k];
            vert.color = Color::WHITE;
            out[idx] = vert;
        }
    }
}

/// Per-mesh playback state: current/next frame and time since the last
/// frame advance
#[derive(Debug, Clone)]
pub struct Animator {
    clip: AnimationClip,
    current_frame: usize,
    next_frame: usize,
    since_advance: f32,
    interpolation: f32,
}

impl Animator {
    pub fn new(clip: AnimationClip) -> Self {
        let mut animator = Self {
            current_frame: clip.start_frame,
            next_frame: clip.following(clip.start_frame),
            clip,
            since_advance: 0.0,
            interpolation: 0.0,
        };
        animator.snap_to_clip();
        animator
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Switch clips. Playback continues from the current frame if the new
    /// clip contains it, otherwise it restarts at the clip's first frame.
    pub fn set_clip(&mut self, clip: AnimationClip) {
        info!(clip = %clip.name, start = clip.start_frame, end = clip.end_frame, "animation clip selected");
        self.clip = clip;
        self.snap_to_clip();
        self.next_frame = self.clip.following(self.current_frame);
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn next_frame(&self) -> usize {
        self.next_frame
    }

    /// Blend factor between current and next frame; may exceed 1
    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    fn snap_to_clip(&mut self) {
        if !self.clip.contains(self.current_frame) {
            self.current_frame = self.clip.start_frame;
            self.next_frame = self.clip.following(self.current_frame);
            self.since_advance = 0.0;
        }
    }

    /// Accumulate `dt` seconds. Advances at most one frame per call; the
    /// leftover time is kept, so a large `dt` yields an interpolation above 1.
    pub fn advance(&mut self, dt: f32) {
        self.snap_to_clip();

        self.since_advance += dt;
        let frame_time = self.clip.frame_time();
        if self.since_advance > frame_time {
            self.since_advance -= frame_time;
            self.current_frame += 1;
            if self.current_frame >= self.clip.end_frame {
                self.current_frame = self.clip.start_frame;
            }
            self.next_frame = self.clip.following(self.current_frame);
        }

        self.interpolation = self.clip.fps * self.since_advance;
        debug!(
            current = self.current_frame,
            next = self.next_frame,
            interpolation = self.interpolation,
            "animation advanced"
        );
    }

    /// Advance by `dt` and write the blended pose into `out`
    pub fn animate(&mut self, mesh: &Mesh, dt: f32, out: &mut [Vertex]) {
        self.advance(dt);
        self.pose(mesh, out);
    }

    /// Write the pose for the current state without advancing time
    pub fn pose(&self, mesh: &Mesh, out: &mut [Vertex]) {
        let (Some(from), Some(to)) = (mesh.keyframe(self.current_frame), mesh.keyframe(self.next_frame))
        else {
            return;
        };
        blend_keyframes(from, to, self.interpolation, mesh.faces(), out);
    }
}

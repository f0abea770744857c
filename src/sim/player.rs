//! Player avatar
//!
//! The player is a fixed 40x40 rectangle. Physics state (vertical velocity,
//! grounded flag) is owned by the SimContext because collision resolution
//! happens there; this module only carries position and the render-facing
//! animation state machine.

use super::{Aabb, Bounds, PLAYER_SIZE};

/// Animation pose derived from the input flags each frame. Physics never
/// consults this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerPose {
    #[default]
    Standing,
    MovingLeft,
    MovingRight,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub pose: PlayerPose,
    /// Current sprite frame within the pose's cycle.
    pub anim_frame: u32,
    frame_counter: u32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            pose: PlayerPose::Standing,
            anim_frame: 0,
            frame_counter: 0,
        }
    }

    /// Change pose; a transition restarts the animation cycle.
    pub fn set_pose(&mut self, pose: PlayerPose) {
        if self.pose != pose {
            self.pose = pose;
            self.anim_frame = 0;
            self.frame_counter = 0;
        }
    }

    /// Advance the animation by one frame. Moving poses cycle 4 frames every
    /// 10 ticks, standing cycles 2 frames every 30 ticks.
    pub fn tick_animation(&mut self) {
        let moving = matches!(self.pose, PlayerPose::MovingLeft | PlayerPose::MovingRight);
        let num_frames = if moving { 4 } else { 2 };
        let frame_delay = if moving { 10 } else { 30 };
        self.frame_counter += 1;
        if self.frame_counter >= frame_delay {
            self.frame_counter = 0;
            self.anim_frame = (self.anim_frame + 1) % num_frames;
        }
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_transition_resets_animation() {
        let mut p = Player::new(0.0, 0.0);
        for _ in 0..35 {
            p.tick_animation();
        }
        assert_eq!(p.anim_frame, 1);

        p.set_pose(PlayerPose::MovingRight);
        assert_eq!(p.anim_frame, 0);
        assert_eq!(p.frame_counter, 0);
    }

    #[test]
    fn test_same_pose_does_not_reset() {
        let mut p = Player::new(0.0, 0.0);
        p.set_pose(PlayerPose::MovingLeft);
        for _ in 0..10 {
            p.tick_animation();
        }
        assert_eq!(p.anim_frame, 1);
        p.set_pose(PlayerPose::MovingLeft);
        assert_eq!(p.anim_frame, 1);
    }

    #[test]
    fn test_moving_pose_cycles_four_frames() {
        let mut p = Player::new(0.0, 0.0);
        p.set_pose(PlayerPose::MovingRight);
        for _ in 0..40 {
            p.tick_animation();
        }
        // 40 ticks at delay 10 = 4 advances, wrapping back to frame 0
        assert_eq!(p.anim_frame, 0);
    }
}

// src/camera.rs
//! Arc-rotate camera state. The core adjusts it; `setup::apply_orbit_camera`
//! copies it onto the Bevy camera transform every frame.

use bevy::prelude::*;

use crate::config::CameraConfig;

/// Keeps the eye strictly above the ground plane and off the pole.
const PITCH_MIN: f32 = 0.01;
const PITCH_MAX: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Rotation around +Y (radians).
    pub yaw: f32,
    /// Polar angle measured from +Y (radians).
    pub pitch: f32,
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub yaw_limit: f32,
    home: (f32, f32, f32),
}

impl OrbitCamera {
    pub fn from_config(cfg: &CameraConfig) -> Self {
        let mut cam = Self {
            target: Vec3::ZERO,
            yaw: cfg.yaw,
            pitch: cfg.pitch,
            radius: cfg.radius,
            min_radius: cfg.min_radius,
            max_radius: cfg.max_radius,
            yaw_limit: cfg.yaw_limit.abs(),
            home: (cfg.radius, cfg.yaw, cfg.pitch),
        };
        cam.clamp();
        cam
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + self.radius * Vec3::new(cy * sp, cp, sy * sp)
    }

    /// Orbit by a screen-space pointer delta.
    pub fn pan(&mut self, delta: Vec2, pan_speed: f32) {
        self.yaw -= delta.x * pan_speed;
        self.pitch += delta.y * pan_speed;
        self.clamp();
    }

    /// Wheel zoom: positive delta moves away.
    pub fn zoom_by(&mut self, delta: f32) {
        self.radius += delta;
        self.clamp();
    }

    /// Pinch zoom: fingers spreading (`ratio > 1`) moves closer.
    pub fn pinch(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.radius /= ratio;
            self.clamp();
        }
    }

    /// Ground-plane (forward, right) unit vectors as seen from the eye.
    pub fn ground_axes(&self) -> (Vec2, Vec2) {
        let (sy, cy) = self.yaw.sin_cos();
        let forward = Vec2::new(-cy, -sy);
        let right = Vec2::new(sy, -cy);
        (forward, right)
    }

    /// Slide the orbit target on the ground plane.
    pub fn translate_target(&mut self, delta_xz: Vec2) {
        self.target.x += delta_xz.x;
        self.target.z += delta_xz.y;
    }

    pub fn reset(&mut self) {
        let (radius, yaw, pitch) = self.home;
        self.target = Vec3::ZERO;
        self.radius = radius;
        self.yaw = yaw;
        self.pitch = pitch;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.radius = self.radius.clamp(self.min_radius, self.max_radius);
        self.yaw = self.yaw.clamp(-self.yaw_limit, self.yaw_limit);
        self.pitch = self.pitch.clamp(PITCH_MIN, PITCH_MAX);
    }
}

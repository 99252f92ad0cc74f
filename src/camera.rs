// SPDX-License-Identifier: MPL-2.0

//! The orbit camera that observes the plot box in 3D mode.

use std::cell::Cell;

use crate::{Point, Transform};

/// The half-extent of the orthographic viewing volume.
const ORTHOGRAPHIC_EXTENT: f32 = 2.;

/// How camera space is flattened onto clip space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Projection {
    Orthographic,
    Perspective,
}

/// A camera orbiting a target point.
///
/// The camera direction is given by two angles: the [azimuth](Self::azimuth), a rotation about
/// the vertical axis, and the [elevation](Self::elevation), a rotation about the horizontal
/// axis. The projection and view transforms are rebuilt lazily the next time they are requested
/// after a mutator touches their inputs.
#[derive(Debug)]
pub struct OrbitCamera {
    /// The vertical field of view in degrees.
    field_of_view: f32,
    near: f32,
    far: f32,
    projection: Projection,
    /// Degrees in `[-180, 180)`.
    azimuth: f32,
    /// Degrees in `[-90, 90]`.
    elevation: f32,
    distance: f32,
    scale: Point,
    /// The point orbited by the camera.
    target: Point,
    /// Whether vertices outside the plot box should be rendered invisible.
    check_boundary: bool,
    rotation: Transform,
    cached_transforms: CachedCameraTransforms,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(45., 0.1, 100.)
    }
}

impl Clone for OrbitCamera {
    fn clone(&self) -> Self {
        Self {
            field_of_view: self.field_of_view,
            near: self.near,
            far: self.far,
            projection: self.projection,
            azimuth: self.azimuth,
            elevation: self.elevation,
            distance: self.distance,
            scale: self.scale,
            target: self.target,
            check_boundary: self.check_boundary,
            rotation: self.rotation,
            cached_transforms: Default::default(),
        }
    }
}

impl OrbitCamera {
    /// Creates an orthographic camera looking down the negative Z axis from a distance of 5.
    pub fn new(field_of_view: f32, near: f32, far: f32) -> Self {
        Self {
            field_of_view,
            near,
            far,
            projection: Projection::Orthographic,
            azimuth: 0.,
            elevation: 0.,
            distance: 5.,
            scale: Point::new(1., 1., 1.),
            target: Point::ORIGIN,
            check_boundary: false,
            rotation: Transform::IDENTITY,
            cached_transforms: Default::default(),
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Sets the azimuth in degrees, wrapping it into `[-180, 180)`.
    pub fn set_azimuth(&mut self, azimuth: f32) {
        self.azimuth = wrap_degrees(azimuth);
        self.compute_rotation();
    }

    pub fn change_azimuth(&mut self, delta: f32) {
        self.set_azimuth(self.azimuth + delta);
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    /// Sets the elevation in degrees, clamping it to `[-90, 90]`.
    pub fn set_elevation(&mut self, elevation: f32) {
        self.elevation = elevation.clamp(-90., 90.);
        self.compute_rotation();
    }

    pub fn change_elevation(&mut self, delta: f32) {
        self.set_elevation(self.elevation + delta);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
        self.cached_transforms.invalidate_view();
    }

    pub fn scale_factors(&self) -> Point {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Point) {
        self.scale = scale;
        self.cached_transforms.invalidate_view();
    }

    /// Multiplies the current scale factors in place.
    pub fn scale(&mut self, fx: f32, fy: f32, fz: f32) {
        self.set_scale(Point::new(self.scale.x * fx, self.scale.y * fy, self.scale.z * fz));
    }

    pub fn position(&self) -> Point {
        self.target
    }

    /// Moves the orbited point.
    pub fn set_position(&mut self, target: Point) {
        self.target = target;
        self.cached_transforms.invalidate_view();
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.field_of_view = degrees;
        self.cached_transforms.invalidate_projection();
    }

    pub fn near_clipping_plane(&self) -> f32 {
        self.near
    }

    pub fn set_near_clipping_plane(&mut self, near: f32) {
        self.near = near;
        self.cached_transforms.invalidate_projection();
    }

    pub fn far_clipping_plane(&self) -> f32 {
        self.far
    }

    pub fn set_far_clipping_plane(&mut self, far: f32) {
        self.far = far;
        self.cached_transforms.invalidate_projection();
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn is_orthographic(&self) -> bool {
        self.projection == Projection::Orthographic
    }

    pub fn use_orthographic_projection(&mut self) {
        self.set_projection(Projection::Orthographic);
    }

    pub fn use_perspective_projection(&mut self) {
        self.set_projection(Projection::Perspective);
    }

    fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.cached_transforms.invalidate_projection();
    }

    pub fn check_boundary(&self) -> bool {
        self.check_boundary
    }

    pub fn set_check_boundary(&mut self, check_boundary: bool) {
        self.check_boundary = check_boundary;
    }

    /// The rotation derived from the current elevation and azimuth.
    pub fn rotation(&self) -> Transform {
        self.rotation
    }

    // Elevation is combined first, so the azimuth rotation is the one applied to points first.
    fn compute_rotation(&mut self) {
        let mut rotation = Transform::IDENTITY;
        rotation
            .rotate(self.elevation, Point::UNIT_X)
            .rotate(self.azimuth, Point::UNIT_Y);
        self.rotation = rotation;
        self.cached_transforms.invalidate_view();
    }
}

impl OrbitCamera {
    /// The projection transform.
    ///
    /// This will return a cached copy if one is available.
    pub fn transform(&self) -> Transform {
        cached(&self.cached_transforms.projection, || {
            tracing::trace!("Rebuilding {:?} projection...", self.projection);

            match self.projection {
                Projection::Orthographic => Transform::ortho(
                    -ORTHOGRAPHIC_EXTENT,
                    ORTHOGRAPHIC_EXTENT,
                    -ORTHOGRAPHIC_EXTENT,
                    ORTHOGRAPHIC_EXTENT,
                    self.near,
                    self.far,
                ),
                Projection::Perspective => Transform::perspective(
                    self.field_of_view.to_radians(),
                    1.,
                    self.near,
                    self.far,
                ),
            }
        })
    }

    /// The view transform: `translate(0, 0, -distance) ∘ rotation ∘ scale`, orbiting the target.
    ///
    /// This will return a cached copy if one is available.
    pub fn view_transform(&self) -> Transform {
        cached(&self.cached_transforms.view, || {
            tracing::trace!(
                "Rebuilding view at azimuth {} and elevation {}...",
                self.azimuth,
                self.elevation,
            );

            let Point { x: sx, y: sy, z: sz } = self.scale;
            let Point { x: tx, y: ty, z: tz } = self.target;
            let mut view = Transform::IDENTITY;
            view.translate(0., 0., -self.distance)
                .combine(&self.rotation)
                .scale(sx, sy, sz)
                .translate(-tx, -ty, -tz);

            view
        })
    }

    /// The projection and view transforms combined.
    pub fn view_projection(&self) -> Transform {
        self.transform() * self.view_transform()
    }
}

fn cached(cell: &Cell<Option<Transform>>, create: impl FnOnce() -> Transform) -> Transform {
    if let Some(transform) = cell.get() {
        return transform;
    }

    let transform = create();
    cell.set(Some(transform));

    transform
}

/// Wraps `degrees` into `[-180, 180)`.
fn wrap_degrees(degrees: f32) -> f32 {
    (degrees + 180.).rem_euclid(360.) - 180.
}

impl Default for CachedCameraTransforms {
    fn default() -> Self {
        Self {
            projection: Cell::new(None),
            view: Cell::new(None),
        }
    }
}

#[derive(Debug)]
struct CachedCameraTransforms {
    projection: Cell<Option<Transform>>,
    view: Cell<Option<Transform>>,
}

impl CachedCameraTransforms {
    fn invalidate_projection(&self) {
        self.projection.set(None);
    }

    fn invalidate_view(&self) {
        self.view.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn elevation_is_clamped() {
        let mut camera = OrbitCamera::default();

        camera.set_elevation(150.);
        assert_eq!(camera.elevation(), 90.);
        camera.set_elevation(-150.);
        assert_eq!(camera.elevation(), -90.);
        camera.change_elevation(-10.);
        assert_eq!(camera.elevation(), -90.);
    }

    #[test]
    fn azimuth_wraps() {
        let mut camera = OrbitCamera::default();

        camera.set_azimuth(180.);
        assert_eq!(camera.azimuth(), -180.);
        camera.set_azimuth(190.);
        assert_eq!(camera.azimuth(), -170.);
        camera.set_azimuth(-190.);
        assert_eq!(camera.azimuth(), 170.);
        camera.change_azimuth(20.);
        assert_eq!(camera.azimuth(), -170.);
        camera.set_azimuth(-37.5);
        assert_eq!(camera.azimuth(), -37.5);
    }

    #[test]
    fn default_view_looks_down_negative_z() {
        let camera = OrbitCamera::default();

        assert!(camera.is_orthographic());
        assert_close(
            camera.view_transform().transform_point(Point::ORIGIN),
            Point::new(0., 0., -5.),
        );
    }

    #[test]
    fn rotation_applies_azimuth_before_elevation() {
        let mut camera = OrbitCamera::default();
        camera.set_azimuth(90.);
        camera.set_elevation(90.);

        // Azimuth swings +X onto -Z, then elevation tips -Z onto +Y.
        assert_close(camera.rotation().transform_point(Point::UNIT_X), Point::UNIT_Y);

        // The opposite order would have left +X alone under elevation and sent it to -Z.
        let mut swapped = Transform::IDENTITY;
        swapped.rotate(90., Point::UNIT_Y).rotate(90., Point::UNIT_X);
        assert_close(swapped.transform_point(Point::UNIT_X), Point::new(0., 0., -1.));
    }

    #[test]
    fn view_is_rebuilt_after_mutation() {
        let mut camera = OrbitCamera::default();
        let before = camera.view_transform();

        camera.set_distance(10.);
        let after = camera.view_transform();
        assert_ne!(before, after);
        assert_close(after.transform_point(Point::ORIGIN), Point::new(0., 0., -10.));

        camera.scale(2., 2., 1.);
        camera.scale(2., 1., 1.);
        assert_eq!(camera.scale_factors(), Point::new(4., 2., 1.));
        assert_close(
            camera.view_transform().transform_point(Point::UNIT_X),
            Point::new(4., 0., -10.),
        );
    }

    #[test]
    fn projection_toggle_only_touches_projection() {
        let mut camera = OrbitCamera::default();
        let view = camera.view_transform();
        let orthographic = camera.transform();

        camera.use_perspective_projection();
        assert!(!camera.is_orthographic());
        assert_ne!(camera.transform(), orthographic);
        assert_eq!(camera.view_transform(), view);

        camera.use_orthographic_projection();
        assert_eq!(camera.transform(), orthographic);
    }

    #[test]
    fn orthographic_volume_is_fixed() {
        let camera = OrbitCamera::default();
        let clip = camera.transform().transform_point(Point::new(2., -2., -0.1));

        assert_close(clip, Point::new(1., -1., -1.));
    }

    #[test]
    fn clipping_planes_invalidate_projection() {
        let mut camera = OrbitCamera::default();
        camera.use_perspective_projection();
        let before = camera.transform();

        camera.set_field_of_view(60.);
        assert_ne!(camera.transform(), before);
        camera.set_field_of_view(45.);
        assert_eq!(camera.transform(), before);

        camera.set_far_clipping_plane(50.);
        assert_ne!(camera.transform(), before);
    }
}

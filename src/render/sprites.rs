use crate::constants::{GLOW_SCALE, INDICATOR_COLOR, OUTER_GLOW_FACTOR};
use crate::core::{FrameOutput, HelixGeometry, InstanceTable};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SpriteInstance {
    pub(crate) center_radius: [f32; 4],
    pub(crate) color: [f32; 4],
    pub(crate) style: [f32; 4],
}

impl SpriteInstance {
    fn disc(center: Vec3, radius: f32, rgb: [f32; 3], opacity: f32) -> Self {
        Self {
            center_radius: [center.x, center.y, center.z, radius],
            color: [rgb[0].min(1.0), rgb[1].min(1.0), rgb[2].min(1.0), opacity],
            style: [0.0; 4],
        }
    }

    fn glow(center: Vec3, radius: f32, rgb: [f32; 3], opacity: f32) -> Self {
        Self {
            style: [1.0, 0.0, 0.0, 0.0],
            ..Self::disc(center, radius, rgb, opacity)
        }
    }
}

pub(crate) const SPRITE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4, 2 => Float32x4];

/// Upper bound on sprites per frame: particles, two halos per marker, indicator.
pub(crate) fn sprite_capacity(geometry: &HelixGeometry) -> usize {
    geometry.point_count() + geometry.markers.len() * 2 + 1
}

/// Pack this frame's sprites, farthest first so alpha blending composes.
pub(crate) fn pack_sprites(
    out: &mut Vec<SpriteInstance>,
    geometry: &HelixGeometry,
    instances: &InstanceTable,
    frame: &FrameOutput,
) {
    out.clear();
    for (i, style) in instances.currents().iter().enumerate() {
        let Some(point) = geometry.point_at_instance(i) else {
            continue;
        };
        let opacity = if instances.section(i).is_some() {
            1.0
        } else {
            point.opacity
        };
        out.push(SpriteInstance::disc(
            geometry.world_position(point),
            style.scale,
            style.color,
            opacity,
        ));
    }
    for halo in &frame.halos {
        out.push(SpriteInstance::glow(
            halo.position,
            GLOW_SCALE * OUTER_GLOW_FACTOR * halo.style.outer_scale,
            halo.color,
            halo.style.outer_opacity,
        ));
        out.push(SpriteInstance::glow(
            halo.position,
            GLOW_SCALE * halo.style.inner_scale,
            halo.color,
            halo.style.inner_opacity,
        ));
    }
    out.push(SpriteInstance::glow(
        frame.indicator,
        frame.indicator_scale,
        INDICATOR_COLOR,
        0.9,
    ));

    let to_view = frame.camera.view_matrix() * frame.model;
    let depth = |s: &SpriteInstance| {
        let c = s.center_radius;
        to_view.transform_point3(Vec3::new(c[0], c[1], c[2])).z
    };
    // View space looks down -Z: more negative is farther.
    out.sort_by(|a, b| depth(a).total_cmp(&depth(b)));
}

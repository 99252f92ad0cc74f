// SPDX-License-Identifier: MPL-2.0

use std::num::NonZeroU32;

use crate::Color;

use super::Targets;

impl<'a> Job<'a> {
    pub(super) fn new(
        targets: &'a Targets,
        device: &wgpu::Device,
        queue: &'a wgpu::Queue,
    ) -> Self {
        Job {
            targets,
            color_view: Self::create_color_view(&targets.color),
            depth_view: Self::create_depth_view(&targets.depth),
            encoder: Self::create_command_encoder(device),
            queue,
        }
    }

    fn create_color_view(color: &wgpu::Texture) -> wgpu::TextureView {
        Self::create_texture_view(
            color,
            "Chart color view",
            wgpu::TextureAspect::All,
        )
    }

    fn create_depth_view(depth: &wgpu::Texture) -> wgpu::TextureView {
        Self::create_texture_view(
            depth,
            "Chart depth view",
            wgpu::TextureAspect::DepthOnly,
        )
    }

    fn create_texture_view(
        texture: &wgpu::Texture,
        label: &str,
        aspect: wgpu::TextureAspect,
    ) -> wgpu::TextureView {
        texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            format: None,
            dimension: None,
            aspect,
            base_mip_level: 0,
            mip_level_count: None,
            base_array_layer: 0,
            array_layer_count: None,
        })
    }

    fn create_command_encoder(device: &wgpu::Device) -> wgpu::CommandEncoder {
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Chart command encoder")
        })
    }
}

/// One frame's worth of GPU commands.
pub(super) struct Job<'a> {
    targets: &'a Targets,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
    queue: &'a wgpu::Queue,
}

impl Job<'_> {
    /// Begins the single render pass of the frame, wiping both attachments.
    pub(super) fn add_pass(&mut self, clear_color: Color) -> Pass<'_> {
        let [r, g, b, a] = clear_color.to_f64_array();

        Pass(self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Chart render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: true,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    // In clip space, 1.0 is the maximum depth.
                    load: wgpu::LoadOp::Clear(1.0),
                    store: true,
                }),
                stencil_ops: None,
            }),
        }))
    }

    /// Copies the color attachment into the readback buffer, row by padded row.
    pub(super) fn copy_to_readback(&mut self) {
        let targets = self.targets;

        self.encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &targets.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &targets.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: NonZeroU32::new(targets.padded_bytes_per_row),
                    rows_per_image: NonZeroU32::new(targets.height),
                },
            },
            targets.extent(),
        );
    }

    pub(super) fn submit(self) {
        self.queue.submit(Some(self.encoder.finish()));
    }
}

pub(super) struct Pass<'a>(wgpu::RenderPass<'a>);

impl<'a> Pass<'a> {
    pub(super) fn draw(
        &mut self,
        pipeline: &'a wgpu::RenderPipeline,
        uniforms: &'a wgpu::BindGroup,
        vertex_buffer: wgpu::BufferSlice<'a>,
        vertex_count: u32,
    ) {
        tracing::trace!("Drawing {} vertices...", vertex_count);

        self.0.set_pipeline(pipeline);
        self.0.set_bind_group(0, uniforms, &[]);
        self.0.set_vertex_buffer(0, vertex_buffer);
        self.0.draw(0..vertex_count, 0..1);
    }
}

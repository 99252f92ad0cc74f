// SPDX-License-Identifier: MPL-2.0

//! Offscreen GPU rendering of recorded frames.

mod render;

use std::collections::HashMap;

use wgpu::{*, util::DeviceExt as _};

use crate::{DrawCommand, Error, Frame, PrimitiveType, RenderTarget as _, Result, Transform, Vertex};
use render::Job;

const COLOR_FORMAT: TextureFormat = TextureFormat::Bgra8Unorm;
const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const BYTES_PER_PIXEL: u32 = 4;

/// The half-extent past which boundary checking hides geometry.
///
/// Slightly larger than the plot box so samples on the range edge survive f32 rounding.
const PLOT_BOX_BOUND: f32 = 1. + 1e-5;

/// Maps OpenGL's `[-1, 1]` clip-space depth onto wgpu's `[0, 1]`.
#[rustfmt::skip]
const OPENGL_TO_WGPU: Transform = Transform::new(
    1., 0., 0.,  0.,
    0., 1., 0.,  0.,
    0., 0., 0.5, 0.5,
    0., 0., 0.,  1.,
);

/// Replays [`Frame`]s on the GPU into an offscreen texture and reads the pixels back.
#[derive(Debug)]
pub struct Renderer {
    bind_group_layout: BindGroupLayout,
    device: Device,
    queue: Queue,
    /// One pipeline per primitive type and depth-test state.
    pipelines: HashMap<(PrimitiveType, bool), RenderPipeline>,
    targets: Targets,
    /// The last frame as tightly packed BGRA rows, top to bottom.
    pixels: Vec<u8>,
}

impl Renderer {
    /// Creates a new `Renderer` with a `width`×`height` target.
    pub async fn new(width: u32, height: u32, backends: Backends) -> Result<Self> {
        let adapter = Self::create_adapter(backends).await?;
        let (device, queue) = Self::create_device_and_queue(&adapter).await?;
        let bind_group_layout = Self::create_bind_group_layout(&device);
        let pipelines = Self::create_pipelines(&device, &bind_group_layout);
        let targets = Targets::new(&device, width, height);

        Ok(Self {
            bind_group_layout,
            device,
            queue,
            pipelines,
            targets,
            pixels: Vec::new(),
        })
    }

    /// Creates a handle to the graphics backend.
    async fn create_adapter(backends: Backends) -> Result<Adapter> {
        let instance = Instance::new(backends);

        instance.request_adapter(&RequestAdapterOptions {
            compatible_surface: None,
            ..Default::default()
        })
        .await
        .ok_or(Error::NoCompatibleAdapterFound)
    }

    /// Creates handles to the logical graphics device as well as the command buffer queue.
    async fn create_device_and_queue(adapter: &Adapter) -> Result<(Device, Queue)> {
        adapter.request_device(
            &DeviceDescriptor {
                label: Some("Chart device"),
                limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                features: Features::empty(),
            },
            None,
        )
        .await
        .map_err(|_| Error::NoCompatibleDeviceFound)
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Chart uniforms layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }
}

macro_rules! create_shader_module {
    ($device:expr, $path:literal $(,)?) => {
        $device.create_shader_module(include_wgsl!($path))
    };
}

impl Renderer {
    fn create_pipelines(
        device: &Device,
        bind_group_layout: &BindGroupLayout,
    ) -> HashMap<(PrimitiveType, bool), RenderPipeline> {
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Chart pipeline layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });
        let vertex_module = create_shader_module!(device, "shaders/vertex.wgsl");
        let fragment_module = create_shader_module!(device, "shaders/fragment.wgsl");

        let mut pipelines = HashMap::new();
        for primitive in PrimitiveType::ALL {
            for depth_test in [false, true] {
                let pipeline = Self::create_pipeline(
                    device,
                    &layout,
                    &vertex_module,
                    &fragment_module,
                    primitive,
                    depth_test,
                );
                pipelines.insert((primitive, depth_test), pipeline);
            }
        }

        pipelines
    }

    fn create_pipeline(
        device: &Device,
        layout: &PipelineLayout,
        vertex_module: &ShaderModule,
        fragment_module: &ShaderModule,
        primitive: PrimitiveType,
        depth_test: bool,
    ) -> RenderPipeline {
        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Chart pipeline"),
            layout: Some(layout),
            vertex: VertexState {
                module: vertex_module,
                entry_point: "main",
                buffers: &[VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
                    step_mode: VertexStepMode::Vertex,
                    attributes: &vertex_attr_array![0 => Float32x3, 1 => Unorm8x4],
                }],
            },
            fragment: Some(FragmentState {
                module: fragment_module,
                entry_point: "main",
                targets: &[Some(ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: topology(primitive),
                ..Default::default()
            },
            // Without depth testing, later draws always win, as in painter's order.
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_test,
                depth_compare: if depth_test {
                    CompareFunction::LessEqual
                } else {
                    CompareFunction::Always
                },
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
        })
    }
}

fn topology(primitive: PrimitiveType) -> PrimitiveTopology {
    match primitive {
        PrimitiveType::Points => PrimitiveTopology::PointList,
        PrimitiveType::Lines => PrimitiveTopology::LineList,
        PrimitiveType::LineStrip => PrimitiveTopology::LineStrip,
        PrimitiveType::Triangles => PrimitiveTopology::TriangleList,
    }
}

impl Renderer {
    pub fn size(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }

    /// Recreates the offscreen target at the new size; existing contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.targets = Targets::new(&self.device, width, height);
        self.pixels.clear();
    }

    /// Renders `frame` and returns its pixels as BGRA rows, top to bottom.
    ///
    /// The target is recreated first if `frame` is of a different size.
    pub fn render(&mut self, frame: &Frame) -> Result<&[u8]> {
        let (width, height) = frame.size();
        if (width.max(1), height.max(1)) != self.size() {
            self.resize(width, height);
        }

        tracing::debug!("Rendering {} draw command(s)...", frame.commands().len());

        let resources: Vec<CommandResources> = frame
            .commands()
            .iter()
            .map(|command| self.create_command_resources(command))
            .collect();

        let mut job = Job::new(&self.targets, &self.device, &self.queue);
        {
            let mut pass = job.add_pass(frame.clear_color().unwrap_or(crate::Color::TRANSPARENT));
            for (command, resources) in frame.commands().iter().zip(&resources) {
                let Some(pipeline) = self.pipelines.get(&(command.primitive, command.depth_test)) else {
                    continue;
                };
                pass.draw(
                    pipeline,
                    &resources.bind_group,
                    resources.vertex_buffer.slice(..),
                    command.vertices.len() as u32,
                );
            }
        }
        job.copy_to_readback();
        job.submit();

        self.read_back()?;

        Ok(&self.pixels)
    }

    /// The pixels of the last rendered frame, or nothing if none has been rendered at this size.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn read_back(&mut self) -> Result<()> {
        let targets = &self.targets;
        let slice = targets.readback.slice(..);

        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(Maintain::Wait);

        match receiver.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!("Failed to map readback buffer: {}", e);
                return Err(Error::Readback);
            }
            Err(_) => {
                tracing::warn!("Readback buffer was dropped before mapping");
                return Err(Error::Readback);
            }
        }

        let row_len = (targets.width * BYTES_PER_PIXEL) as usize;
        self.pixels.clear();
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(targets.padded_bytes_per_row as usize).take(targets.height as usize) {
                self.pixels.extend_from_slice(&row[..row_len]);
            }
        }
        targets.readback.unmap();

        Ok(())
    }

    fn create_command_resources(&self, command: &DrawCommand) -> CommandResources {
        CommandResources {
            bind_group: self.create_uniforms_bind_group(command),
            vertex_buffer: self.create_buffer(&command.vertices, BufferUsages::VERTEX),
        }
    }

    fn create_uniforms_bind_group(&self, command: &DrawCommand) -> BindGroup {
        self.device.create_bind_group(&BindGroupDescriptor {
            label: None,
            layout: &self.bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer({
                    self.device.create_buffer_init(&util::BufferInitDescriptor {
                        label: None,
                        contents: bytemuck::bytes_of(&DrawUniforms::new(command)),
                        usage: BufferUsages::UNIFORM,
                    })
                    .as_entire_buffer_binding()
                }),
            }],
        })
    }

    fn create_buffer<T>(&self, slice: &[T], usage: BufferUsages) -> Buffer
    where
        T: bytemuck::Pod + bytemuck::Zeroable,
    {
        self.device.create_buffer_init(&util::BufferInitDescriptor {
            label: None,
            contents: bytemuck::cast_slice(slice),
            usage,
        })
    }
}

struct CommandResources {
    bind_group: BindGroup,
    vertex_buffer: Buffer,
}

/// Mirrors `Uniforms` in the vertex shader.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
struct DrawUniforms {
    view_projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    check_boundary: u32,
    boundary: f32,
    _padding: [u32; 2],
}

unsafe impl bytemuck::Pod for DrawUniforms {}
unsafe impl bytemuck::Zeroable for DrawUniforms {}

impl DrawUniforms {
    fn new(command: &DrawCommand) -> Self {
        Self {
            view_projection: (OPENGL_TO_WGPU * command.view.view_projection()).to_cols_array_2d(),
            model: command.model.to_cols_array_2d(),
            check_boundary: u32::from(command.view.check_boundary),
            boundary: PLOT_BOX_BOUND,
            _padding: [0; 2],
        }
    }
}

/// The offscreen attachments and the buffer frames are read back through.
#[derive(Debug)]
pub(crate) struct Targets {
    width: u32,
    height: u32,
    color: Texture,
    depth: Texture,
    readback: Buffer,
    /// Rows in the readback buffer are padded to wgpu's copy alignment.
    padded_bytes_per_row: u32,
}

impl Targets {
    fn new(device: &Device, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        tracing::debug!("Creating {}x{} render target...", width, height);

        let unpadded = width * BYTES_PER_PIXEL;
        let padded_bytes_per_row = ((unpadded + COPY_BYTES_PER_ROW_ALIGNMENT - 1)
            / COPY_BYTES_PER_ROW_ALIGNMENT)
            * COPY_BYTES_PER_ROW_ALIGNMENT;
        let extent = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        Self {
            width,
            height,
            color: Self::create_texture(
                device,
                "Chart color texture",
                extent,
                COLOR_FORMAT,
                TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            ),
            depth: Self::create_texture(
                device,
                "Chart depth texture",
                extent,
                DEPTH_FORMAT,
                TextureUsages::RENDER_ATTACHMENT,
            ),
            readback: device.create_buffer(&BufferDescriptor {
                label: Some("Chart readback buffer"),
                size: BufferAddress::from(padded_bytes_per_row * height),
                usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
                mapped_at_creation: false,
            }),
            padded_bytes_per_row,
        }
    }

    fn create_texture(
        device: &Device,
        label: &str,
        size: Extent3d,
        format: TextureFormat,
        usage: TextureUsages,
    ) -> Texture {
        device.create_texture(&TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage,
        })
    }

    fn extent(&self) -> Extent3d {
        Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Point, RenderStates, RenderTarget, ScatterChart, ShapeKind, VertexArray};

    #[test]
    fn uniforms_match_shader_layout() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 144);
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
    }

    #[test]
    fn range_edges_stay_inside_the_boundary() {
        let mut chart = ScatterChart::new(ShapeKind::Plain);
        chart.resize(400, 400);
        chart.set_three_d(true);
        chart.set_x_axis_min(-7.3);
        chart.set_x_axis_max(2.9);

        let model = chart.transform();
        for x in [-7.3, 2.9] {
            let p = model.transform_point(Point::new(x, 0.5, 0.5));
            assert!((p.x.abs() - 1.).abs() < 1e-5, "{x} mapped to {p:?}");
            assert!(p.x.abs() <= PLOT_BOX_BOUND, "{x} mapped to {p:?}");
        }

        let mut edge = VertexArray::new(PrimitiveType::Points);
        edge.push(Vertex::new(Point::new(-7.3, 0.5, 0.5), Color::RED));
        let mut frame = Frame::new(400, 400);
        frame.draw(&edge, &RenderStates::new(model));
        assert_eq!(DrawUniforms::new(&frame.commands()[0]).boundary, PLOT_BOX_BOUND);
    }

    #[test]
    fn depth_is_remapped_to_unit_range() {
        let near = OPENGL_TO_WGPU.transform_point(Point::new(0., 0., -1.));
        let far = OPENGL_TO_WGPU.transform_point(Point::new(0., 0., 1.));
        assert_eq!((near.z, far.z), (0., 1.));
    }

    #[test]
    #[ignore = "needs a GPU adapter"]
    fn renders_background_and_a_triangle() {
        let mut renderer = pollster::block_on(Renderer::new(8, 8, Backends::all())).unwrap();
        let mut frame = Frame::new(8, 8);
        frame.clear(Color::BLUE);

        let mut triangle = VertexArray::new(PrimitiveType::Triangles);
        for (x, y) in [(0., 0.), (8., 0.), (0., 8.)] {
            triangle.push(Vertex::new(Point::new(x, y, 0.), Color::RED));
        }
        frame.draw(&triangle, &RenderStates::default());

        let pixels = renderer.render(&frame).unwrap().to_vec();
        assert_eq!(pixels.len(), 8 * 8 * 4);
        // The top-right corner is outside the triangle; BGRA byte order.
        assert_eq!(&pixels[(7 * 4)..(8 * 4)], [255, 0, 0, 255]);
        // The bottom-left corner is inside it.
        let bottom_left = 7 * 8 * 4;
        assert_eq!(&pixels[bottom_left..(bottom_left + 4)], [0, 0, 255, 255]);
    }
}

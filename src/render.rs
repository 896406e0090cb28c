use crate::constants::{LATTICE_COLOR_HEX, LATTICE_OPACITY};
use crate::core::section::rgb_from_hex;
use crate::core::{FrameOutput, HelixGeometry, InstanceTable};
use web_sys as web;

mod helpers;
mod sprites;
use sprites::{pack_sprites, sprite_capacity, SpriteInstance, SPRITE_ATTRIBUTES};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    lattice_color: [f32; 4],
    params: [f32; 4],
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    sprite_pipeline: wgpu::RenderPipeline,
    lattice_pipeline: wgpu::RenderPipeline,

    sprite_buffer: wgpu::Buffer,
    sprites: Vec<SpriteInstance>,
    lattice_buffer: wgpu::Buffer,
    lattice_vertices: u32,

    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, geometry: &HelixGeometry) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // The page shows through the canvas.
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("helix_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::HELIX_WGSL.into()),
        });
        let bgl = helpers::uniform_layout(&device, "helix_bgl");
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("helix_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let uniform_buffer = helpers::create_buffer(
            &device,
            "helix_uniforms",
            std::mem::size_of::<SceneUniforms>() as u64,
            wgpu::BufferUsages::UNIFORM,
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("helix_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sprite_pipeline = helpers::make_scene_pipeline(
            &device,
            "sprite_pipeline",
            &pl,
            &shader,
            "vs_sprite",
            "fs_sprite",
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SpriteInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &SPRITE_ATTRIBUTES,
            }],
            wgpu::PrimitiveTopology::TriangleList,
            format,
        );
        let lattice_pipeline = helpers::make_scene_pipeline(
            &device,
            "lattice_pipeline",
            &pl,
            &shader,
            "vs_lattice",
            "fs_lattice",
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3],
            }],
            wgpu::PrimitiveTopology::LineList,
            format,
        );

        let capacity = sprite_capacity(geometry);
        let sprite_buffer = helpers::create_buffer(
            &device,
            "sprite_instances",
            (capacity * std::mem::size_of::<SpriteInstance>()) as u64,
            wgpu::BufferUsages::VERTEX,
        );
        let lattice: Vec<[f32; 3]> = geometry
            .lattice_vertices()
            .into_iter()
            .map(|v| v.to_array())
            .collect();
        let lattice_buffer = helpers::create_buffer(
            &device,
            "lattice_vertices",
            std::mem::size_of_val(lattice.as_slice()) as u64,
            wgpu::BufferUsages::VERTEX,
        );
        queue.write_buffer(&lattice_buffer, 0, bytemuck::cast_slice(&lattice));

        log::info!("[gpu] ready {}x{} {:?} {:?}", width, height, format, alpha_mode);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            uniform_buffer,
            bind_group,
            sprite_pipeline,
            lattice_pipeline,
            sprite_buffer,
            sprites: Vec::with_capacity(capacity),
            lattice_buffer,
            lattice_vertices: lattice.len() as u32,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        frame: &FrameOutput,
        geometry: &HelixGeometry,
        instances: &InstanceTable,
    ) -> Result<(), wgpu::SurfaceError> {
        let lattice_rgb = rgb_from_hex(LATTICE_COLOR_HEX);
        let uniforms = SceneUniforms {
            view: frame.camera.view_matrix().to_cols_array_2d(),
            proj: frame.camera.projection_matrix().to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            lattice_color: [lattice_rgb[0], lattice_rgb[1], lattice_rgb[2], LATTICE_OPACITY],
            params: [frame.group_scale as f32, frame.time_sec as f32, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        pack_sprites(&mut self.sprites, geometry, instances, frame);
        self.queue
            .write_buffer(&self.sprite_buffer, 0, bytemuck::cast_slice(&self.sprites));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("helix_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            rpass.set_pipeline(&self.lattice_pipeline);
            rpass.set_vertex_buffer(0, self.lattice_buffer.slice(..));
            rpass.draw(0..self.lattice_vertices, 0..1);

            rpass.set_pipeline(&self.sprite_pipeline);
            rpass.set_vertex_buffer(0, self.sprite_buffer.slice(..));
            rpass.draw(0..6, 0..self.sprites.len() as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

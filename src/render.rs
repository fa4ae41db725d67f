use crate::constants::{CLEAR_COLOR, MAX_KEY_LIGHTS};
use clickzoom_core::{Light, Material, MeshId, PerspectiveCamera, Scene, SceneIndex};
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use web_sys as web;

mod helpers;

use helpers::{GpuMesh, Vertex};

static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    key_dir: [[f32; 4]; MAX_KEY_LIGHTS],
    key_color: [[f32; 4]; MAX_KEY_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    // x = metalness, y = roughness
    params: [f32; 4],
}

impl ObjectUniforms {
    fn new(model: Mat4, material: &Material) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        let [r, g, b] = material.color;
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: [r, g, b, 1.0],
            params: [material.metalness, material.roughness, 0.0, 0.0],
        }
    }
}

struct Draw {
    mesh: MeshId,
    uniforms: ObjectUniforms,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    view_format: wgpu::TextureFormat,

    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    // One dynamic-offset slot per draw
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_capacity: usize,
    object_staging: Vec<u8>,

    #[allow(dead_code)]
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    meshes: FnvHashMap<MeshId, GpuMesh>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
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
        // Browsers usually only offer non-sRGB canvas formats; render through an sRGB view.
        let view_format = format.add_srgb_suffix();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: if view_format != format {
                vec![view_format]
            } else {
                vec![]
            },
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {:?} (view {:?}) {}x{}", format, view_format, width, height);

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let globals_size = std::mem::size_of::<GlobalUniforms>() as u64;
        let object_size = std::mem::size_of::<ObjectUniforms>() as u64;
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[helpers::uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                false,
                globals_size,
            )],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bgl"),
            entries: &[helpers::uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                true,
                object_size,
            )],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: globals_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let object_stride = helpers::align_to(
            object_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let object_capacity = 16;
        let (object_buffer, object_bind_group) =
            create_object_slots(&device, &object_layout, object_stride, object_capacity);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // glTF assets are not consistently wound; shade both faces
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: helpers::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: view_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let [r, g, b, a] = CLEAR_COLOR;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            view_format,
            pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_capacity,
            object_staging: Vec::new(),
            depth_tex,
            depth_view,
            meshes: FnvHashMap::default(),
            width,
            height,
            clear_color: wgpu::Color { r, g, b, a },
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
            (self.depth_tex, self.depth_view) =
                helpers::create_depth_texture(&self.device, width, height);
        }
    }

    fn ensure_object_capacity(&mut self, count: usize) {
        if count <= self.object_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        (self.object_buffer, self.object_bind_group) =
            create_object_slots(&self.device, &self.object_layout, self.object_stride, capacity);
        self.object_capacity = capacity;
        log::debug!("[gpu] object slots grown to {}", capacity);
    }

    /// Draw every mesh in `scene` from `camera`. `index` must describe the
    /// scene's current revision.
    pub fn render(
        &mut self,
        scene: &Scene,
        index: &SceneIndex,
        camera: &PerspectiveCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        let mut globals = GlobalUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            hemi_sky: [0.0; 4],
            hemi_ground: [0.0; 4],
            key_dir: [[0.0, 1.0, 0.0, 0.0]; MAX_KEY_LIGHTS],
            key_color: [[0.0; 4]; MAX_KEY_LIGHTS],
        };
        let mut key_lights = 0;
        let mut draws: Vec<Draw> = Vec::new();

        for entry in index.entries() {
            let Ok(node) = scene.node(&entry.path) else {
                continue;
            };
            if let Some(mesh) = &node.mesh {
                if mesh.indices.is_empty() {
                    continue;
                }
                let device = &self.device;
                self.meshes
                    .entry(mesh.id)
                    .or_insert_with(|| helpers::upload_mesh(device, mesh));
                draws.push(Draw {
                    mesh: mesh.id,
                    uniforms: ObjectUniforms::new(entry.world, &mesh.material),
                });
            }
            match node.light {
                Some(Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                }) => {
                    globals.hemi_sky = scaled_rgb(sky, intensity);
                    globals.hemi_ground = scaled_rgb(ground, intensity);
                }
                Some(Light::Directional { color, intensity }) if key_lights < MAX_KEY_LIGHTS => {
                    // Directional lights shine from their position toward the origin
                    let dir = entry
                        .world
                        .transform_point3(Vec3::ZERO)
                        .try_normalize()
                        .unwrap_or(Vec3::Y);
                    globals.key_dir[key_lights] = dir.extend(0.0).to_array();
                    globals.key_color[key_lights] = scaled_rgb(color, intensity);
                    key_lights += 1;
                }
                _ => {}
            }
        }

        self.ensure_object_capacity(draws.len());
        let stride = self.object_stride as usize;
        self.object_staging.clear();
        self.object_staging.resize(draws.len() * stride, 0);
        for (i, d) in draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&d.uniforms);
            self.object_staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if !self.object_staging.is_empty() {
            self.queue
                .write_buffer(&self.object_buffer, 0, &self.object_staging);
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (i, d) in draws.iter().enumerate() {
                let Some(gm) = self.meshes.get(&d.mesh) else {
                    continue;
                };
                let offset = (i as u64 * self.object_stride) as u32;
                rpass.set_bind_group(1, &self.object_bind_group, &[offset]);
                rpass.set_vertex_buffer(0, gm.vertex_buffer.slice(..));
                rpass.set_index_buffer(gm.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..gm.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn scaled_rgb(rgb: [f32; 3], intensity: f32) -> [f32; 4] {
    [rgb[0] * intensity, rgb[1] * intensity, rgb[2] * intensity, 1.0]
}

fn create_object_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("object_slots"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("object_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

use crate::constants::{AMBIENT_LIGHT, CLEAR_COLOR, LIGHT_INTENSITY, LIGHT_POSITION};
use crate::core::{CubeMap, MeshData, Scene, Showcase, Vertex};
use glam::{Mat4, Vec3};
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
mod skybox;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalsUniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    color: [f32; 4],
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    // Indexed by `MeshId`; `None` for meshes with nothing to draw.
    meshes: Vec<Option<GpuMesh>>,
    // One per drawn instance, grown on demand.
    objects: Vec<ObjectSlot>,

    // Drawn behind the scene once loaded; until then the clear color shows.
    background: Option<skybox::Skybox>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

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
                    // Default limits; older WebGPU implementations reject unknown fields
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
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let globals_layout = helpers::uniform_layout(&device, "globals_bgl");
        let object_layout = helpers::uniform_layout(&device, "object_bgl");
        let (globals_buffer, globals_bind_group) = helpers::uniform_slot(
            &device,
            &globals_layout,
            "globals",
            std::mem::size_of::<GlobalsUniforms>() as u64,
        );
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRS,
        };
        let pipeline =
            helpers::make_scene_pipeline(&device, &pipeline_layout, &shader, vertex_layout, format);

        let [r, g, b, a] = CLEAR_COLOR;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            depth_tex,
            depth_view,
            meshes: Vec::new(),
            objects: Vec::new(),
            background: None,
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

    pub fn set_background(&mut self, cube: &CubeMap) {
        self.background = Some(skybox::Skybox::new(
            &self.device,
            &self.queue,
            self.config.format,
            cube,
        ));
        log::info!("[gpu] background cube map {}x{}", cube.size, cube.size);
    }

    /// Upload meshes added to the scene since the last call. Scene meshes
    /// are append-only, so anything past our length is new.
    pub fn sync_meshes(&mut self, scene: &Scene) {
        let fresh = scene.meshes().len().saturating_sub(self.meshes.len());
        if fresh == 0 {
            return;
        }
        for mesh in &scene.meshes()[self.meshes.len()..] {
            let uploaded = self.upload(mesh);
            self.meshes.push(uploaded);
        }
        log::debug!("[gpu] uploaded {} meshes", fresh);
    }

    fn upload(&self, mesh: &MeshData) -> Option<GpuMesh> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return None;
        }
        let vertices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertices"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let indices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_indices"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Some(GpuMesh {
            vertices,
            indices,
            index_count: mesh.indices.len() as u32,
            color: mesh.color,
        })
    }

    fn ensure_object_slots(&mut self, count: usize) {
        while self.objects.len() < count {
            let (buffer, bind_group) = helpers::uniform_slot(
                &self.device,
                &self.object_layout,
                "object",
                std::mem::size_of::<ObjectUniforms>() as u64,
            );
            self.objects.push(ObjectSlot { buffer, bind_group });
        }
    }

    pub fn render(&mut self, showcase: &Showcase) -> Result<(), wgpu::SurfaceError> {
        let globals = GlobalsUniforms {
            view_proj: showcase.camera.view_projection().to_cols_array_2d(),
            light_dir: light_direction(),
            ambient: [AMBIENT_LIGHT, AMBIENT_LIGHT, AMBIENT_LIGHT, 1.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if let Some(sky) = &self.background {
            sky.update(&self.queue, &showcase.camera);
        }

        let draws: Vec<(usize, Mat4)> = showcase
            .scene
            .mesh_instances()
            .filter(|(_, mesh, _)| matches!(self.meshes.get(mesh.index()), Some(Some(_))))
            .map(|(_, mesh, world)| (mesh.index(), world))
            .collect();
        self.ensure_object_slots(draws.len());
        for (slot, (mesh, world)) in self.objects.iter().zip(&draws) {
            let color = self.meshes[*mesh].as_ref().map_or([1.0; 4], |m| m.color);
            let object = ObjectUniforms {
                model: world.to_cols_array_2d(),
                color,
            };
            self.queue
                .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&object));
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
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
            if let Some(sky) = &self.background {
                sky.draw(&mut rpass);
            }
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (slot, (mesh, _)) in self.objects.iter().zip(&draws) {
                let Some(gpu_mesh) = &self.meshes[*mesh] else {
                    continue;
                };
                rpass.set_bind_group(1, &slot.bind_group, &[]);
                rpass.set_vertex_buffer(0, gpu_mesh.vertices.slice(..));
                rpass.set_index_buffer(gpu_mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Direction the light travels: from `LIGHT_POSITION` toward the origin.
fn light_direction() -> [f32; 4] {
    let dir = (-Vec3::from_array(LIGHT_POSITION)).normalize_or_zero();
    [dir.x, dir.y, dir.z, LIGHT_INTENSITY]
}

use std::{borrow::Cow, path::Path};

use crate::{
    data_structures::{
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    frame::{CullFace, DepthTest, DrawSettings, Uniforms},
    resources::texture::diffuse_normal_layout,
};

/// Std140 image of the uniform block at set 0, binding 0.
///
/// The GLSL block reads
///
/// ```glsl
/// layout(set = 0, binding = 0) uniform Uniforms {
///     mat4 projectionMatrix;
///     mat4 modelMatrix;
///     mat4 viewMatrix;
///     mat4 modelViewMatrix;
///     mat4 modelViewProjectionMatrix;
///     mat3 normalMatrix;
///     vec3 lightPositionViewSpace;
///     vec3 cameraPositionWorldSpace;
/// };
/// ```
///
/// A std140 `mat3` is three `vec4` columns and every `vec3` is padded to 16
/// bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformsRaw {
    pub projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub model_view_projection: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub light_position: [f32; 3],
    _padding: u32,
    pub camera_position: [f32; 3],
    _padding2: u32,
}

impl<H> From<&Uniforms<'_, H>> for UniformsRaw {
    fn from(uniforms: &Uniforms<'_, H>) -> Self {
        let normal: [[f32; 3]; 3] = uniforms.normal.into();
        Self {
            projection: uniforms.projection.into(),
            model: uniforms.model.into(),
            view: uniforms.view.into(),
            model_view: uniforms.model_view.into(),
            model_view_projection: uniforms.model_view_projection.into(),
            normal: normal.map(|[x, y, z]| [x, y, z, 0.0]),
            light_position: uniforms.light_position_view_space.into(),
            _padding: 0,
            camera_position: uniforms.camera_position_world_space.into(),
            _padding2: 0,
        }
    }
}

pub fn uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size_of::<UniformsRaw>() as u64),
            },
            count: None,
        }],
        label: Some("uniform_bind_group_layout"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderLanguage {
    Glsl,
    Wgsl,
}

impl ShaderLanguage {
    /// `.wgsl` files are WGSL, anything else is treated as GLSL.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("wgsl") => ShaderLanguage::Wgsl,
            _ => ShaderLanguage::Glsl,
        }
    }
}

/// Source text of one pipeline stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub label: String,
    pub code: String,
    pub language: ShaderLanguage,
    pub stage: ShaderStage,
}

impl ShaderSource {
    pub fn new(path: &Path, code: String, stage: ShaderStage) -> Self {
        Self {
            label: path.display().to_string(),
            code,
            language: ShaderLanguage::from_path(path),
            stage,
        }
    }

    /// GLSL shaders use `main` for both stages, WGSL shaders `vs_main` and
    /// `fs_main`.
    pub fn entry_point(&self) -> &'static str {
        match (self.language, self.stage) {
            (ShaderLanguage::Glsl, _) => "main",
            (ShaderLanguage::Wgsl, ShaderStage::Vertex) => "vs_main",
            (ShaderLanguage::Wgsl, ShaderStage::Fragment) => "fs_main",
        }
    }

    fn descriptor(&self) -> wgpu::ShaderModuleDescriptor<'_> {
        let source = match self.language {
            ShaderLanguage::Wgsl => wgpu::ShaderSource::Wgsl(Cow::Borrowed(&self.code)),
            ShaderLanguage::Glsl => wgpu::ShaderSource::Glsl {
                shader: Cow::Borrowed(&self.code),
                stage: match self.stage {
                    ShaderStage::Vertex => wgpu::naga::ShaderStage::Vertex,
                    ShaderStage::Fragment => wgpu::naga::ShaderStage::Fragment,
                },
                defines: Default::default(),
            },
        };
        wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source,
        }
    }
}

fn cull_mode(cull_face: CullFace) -> Option<wgpu::Face> {
    match cull_face {
        CullFace::Front => Some(wgpu::Face::Front),
        CullFace::Back => Some(wgpu::Face::Back),
        CullFace::None => None,
    }
}

fn depth_state(depth_test: DepthTest) -> wgpu::DepthStencilState {
    let (depth_write_enabled, depth_compare) = match depth_test {
        DepthTest::Less => (true, wgpu::CompareFunction::Less),
        DepthTest::Disabled => (false, wgpu::CompareFunction::Always),
    };
    wgpu::DepthStencilState {
        format: Texture::DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Builds the preview pipeline from a vertex and a fragment shader.
///
/// Bind group 0 holds the uniform block, bind group 1 the diffuse and normal
/// textures. Vertices are laid out as [`ModelVertex`].
pub fn mk_preview_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    uniform_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
    settings: DrawSettings,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Preview Pipeline Layout"),
        bind_group_layouts: &[uniform_layout, texture_layout],
        push_constant_ranges: &[],
    });
    let vertex_module = device.create_shader_module(vertex.descriptor());
    let fragment_module = device.create_shader_module(fragment.descriptor());

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Preview Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some(vertex.entry_point()),
            buffers: &[ModelVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some(fragment.entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: cull_mode(settings.cull_face),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(depth_state(settings.depth_test)),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// Same as [`mk_preview_pipeline`] but creates the layouts itself.
pub fn mk_default_preview_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
) -> wgpu::RenderPipeline {
    mk_preview_pipeline(
        device,
        color_format,
        &uniform_layout(device),
        &diffuse_normal_layout(device),
        vertex,
        fragment,
        DrawSettings::default(),
    )
}

use crate::data_structures::texture::{ColorSpace, Texture};

/// Layout of bind group 1: diffuse texture and sampler at bindings 0 and 1,
/// normal map and sampler at bindings 2 and 3.
pub fn diffuse_normal_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            texture_entry(2),
            sampler_entry(3),
        ],
        label: Some("diffuse_normal_bind_group_layout"),
    })
}

pub fn diffuse_normal_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    diffuse: &Texture,
    normal: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&normal.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&normal.sampler),
            },
        ],
        label: Some(label),
    })
}

/// Normal maps are stored linearly, everything else as sRGB colour. Uses the
/// same "norm" name rule that picks the initial normal map.
pub fn color_space_for(name: &str) -> ColorSpace {
    if name.to_lowercase().contains("norm") {
        ColorSpace::Linear
    } else {
        ColorSpace::Srgb
    }
}

/// Turns fetched bytes into a GPU texture. Errors are flattened to a
/// message because that is all the asset store keeps of a failure.
pub fn decode_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    name: &str,
    bytes: &[u8],
) -> Result<Texture, String> {
    Texture::from_bytes(device, queue, bytes, name, color_space_for(name))
        .map_err(|e| format!("{e:#}"))
}

/*!
wgpu surface behind the overlay's content view.

Each decoration is two passes over the same dynamic-offset uniform slot:
a cut pass that clears the window's rectangle, then an instanced quad per
lamp. Draw order is the plan's back-to-front order, so a window in front
erases the lamps of windows it covers.
*/

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use bytemuck::{Pod, Zeroable};
use raw_window_handle::{AppKitDisplayHandle, AppKitWindowHandle, RawDisplayHandle, RawWindowHandle};
use std::num::NonZeroU64;
use std::ops::Range;

use super::overlay::Overlay;
use crate::platform::DecorationSurface;
use crate::render::{FramePlan, Lamp};
use crate::types::{FestoonError, FestoonResult};

/// Uniform slots must start on this alignment for dynamic offsets.
const UNIFORM_STRIDE: u64 = 256;
const INITIAL_DECORATIONS: u64 = 32;
const INITIAL_LAMPS: u64 = 1024;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Globals {
  screen: [f32; 2],
  _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct DecorationUniforms {
  position: [f32; 2],
  size: [f32; 2],
  time: f32,
  bulb_scale: f32,
  _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct LampInstance {
  center_x: f32,
  angle: f32,
  lit: f32,
}

impl From<&Lamp> for LampInstance {
  fn from(lamp: &Lamp) -> Self {
    Self {
      center_x: lamp.center_x,
      angle: lamp.angle,
      lit: if lamp.lit { 1.0 } else { 0.0 },
    }
  }
}

fn gpu_error(e: impl std::fmt::Display) -> FestoonError {
  FestoonError::Gpu(e.to_string())
}

pub(super) struct GpuSurface {
  surface: wgpu::Surface<'static>,
  device: wgpu::Device,
  queue: wgpu::Queue,
  config: wgpu::SurfaceConfiguration,
  cut_pipeline: wgpu::RenderPipeline,
  lamp_pipeline: wgpu::RenderPipeline,
  layout: wgpu::BindGroupLayout,
  globals: wgpu::Buffer,
  decorations: wgpu::Buffer,
  decoration_capacity: u64,
  lamps: wgpu::Buffer,
  lamp_capacity: u64,
  bind_group: wgpu::BindGroup,
}

impl GpuSurface {
  pub(super) async fn new(overlay: &Overlay) -> FestoonResult<Self> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
      backends: wgpu::Backends::METAL,
      ..Default::default()
    });

    let target = wgpu::SurfaceTargetUnsafe::RawHandle {
      raw_display_handle: RawDisplayHandle::AppKit(AppKitDisplayHandle::new()),
      raw_window_handle: RawWindowHandle::AppKit(AppKitWindowHandle::new(overlay.view_ptr())),
    };
    // SAFETY: the overlay's content view outlives this surface; the session
    // drops the surface first.
    let surface = unsafe { instance.create_surface_unsafe(target) }.map_err(gpu_error)?;

    let adapter = instance
      .request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
      })
      .await
      .ok_or_else(|| FestoonError::Gpu("no Metal adapter".into()))?;

    let (device, queue) = adapter
      .request_device(
        &wgpu::DeviceDescriptor {
          label: Some("festoon device"),
          required_features: wgpu::Features::empty(),
          required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
          memory_hints: wgpu::MemoryHints::Performance,
        },
        None,
      )
      .await
      .map_err(gpu_error)?;

    let caps = surface.get_capabilities(&adapter);
    let format = caps
      .formats
      .iter()
      .copied()
      .find(|f| !f.is_srgb())
      .or_else(|| caps.formats.first().copied())
      .ok_or_else(|| FestoonError::Gpu("surface reports no formats".into()))?;
    let alpha_mode = caps
      .alpha_modes
      .iter()
      .copied()
      .find(|m| *m != wgpu::CompositeAlphaMode::Opaque)
      .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let (width, height) = overlay.pixel_size();
    let config = wgpu::SurfaceConfiguration {
      usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
      format,
      width,
      height,
      present_mode: wgpu::PresentMode::AutoVsync,
      alpha_mode,
      view_formats: vec![],
      desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    let layout = create_layout(&device);
    let (cut_pipeline, lamp_pipeline) = create_pipelines(&device, &layout, format);

    let frame = crate::platform::OverlayHost::frame(overlay);
    let globals = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some("festoon globals"),
      size: std::mem::size_of::<Globals>() as u64,
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });
    queue.write_buffer(
      &globals,
      0,
      bytemuck::bytes_of(&Globals {
        screen: [frame.w as f32, frame.h as f32],
        _pad: [0.0; 2],
      }),
    );

    let decorations = decoration_buffer(&device, INITIAL_DECORATIONS);
    let lamps = lamp_buffer(&device, INITIAL_LAMPS);
    let bind_group = create_bind_group(&device, &layout, &globals, &decorations);

    log::info!("GPU surface ready: {width}x{height} px, {format:?}, {alpha_mode:?}");

    Ok(Self {
      surface,
      device,
      queue,
      config,
      cut_pipeline,
      lamp_pipeline,
      layout,
      globals,
      decorations,
      decoration_capacity: INITIAL_DECORATIONS,
      lamps,
      lamp_capacity: INITIAL_LAMPS,
      bind_group,
    })
  }

  fn reserve(&mut self, decorations: u64, lamps: u64) {
    if decorations > self.decoration_capacity {
      self.decoration_capacity = decorations.next_power_of_two();
      self.decorations = decoration_buffer(&self.device, self.decoration_capacity);
      self.bind_group = create_bind_group(&self.device, &self.layout, &self.globals, &self.decorations);
    }
    if lamps > self.lamp_capacity {
      self.lamp_capacity = lamps.next_power_of_two();
      self.lamps = lamp_buffer(&self.device, self.lamp_capacity);
    }
  }

  /// Pack uniforms into 256-byte slots and flatten lamps into one
  /// instance buffer. Returns each decoration's instance range.
  fn upload(&mut self, plan: &FramePlan) -> Vec<Range<u32>> {
    let mut slots = vec![0_u8; plan.draws.len() * UNIFORM_STRIDE as usize];
    let mut instances: Vec<LampInstance> = Vec::new();
    let mut ranges = Vec::with_capacity(plan.draws.len());

    for (slot, draw) in slots.chunks_exact_mut(UNIFORM_STRIDE as usize).zip(&plan.draws) {
      let uniforms = DecorationUniforms {
        position: [draw.position.x, draw.position.y],
        size: [draw.size.x, draw.size.y],
        time: draw.time,
        bulb_scale: plan.bulb_scale,
        _pad: [0.0; 2],
      };
      let bytes = bytemuck::bytes_of(&uniforms);
      if let Some(head) = slot.get_mut(..bytes.len()) {
        head.copy_from_slice(bytes);
      }

      let start = instances.len() as u32;
      instances.extend(draw.lamps.iter().map(LampInstance::from));
      ranges.push(start..instances.len() as u32);
    }

    self.reserve(plan.draws.len() as u64, instances.len() as u64);
    if !slots.is_empty() {
      self.queue.write_buffer(&self.decorations, 0, &slots);
    }
    if !instances.is_empty() {
      self.queue.write_buffer(&self.lamps, 0, bytemuck::cast_slice(&instances));
    }
    ranges
  }

  fn render(&mut self, plan: &FramePlan) -> Result<(), wgpu::SurfaceError> {
    let ranges = self.upload(plan);

    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
        self.surface.configure(&self.device, &self.config);
        return Ok(());
      }
      Err(e) => return Err(e),
    };
    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
      label: Some("festoon frame"),
    });

    {
      let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("festoon decorations"),
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
      pass.set_vertex_buffer(0, self.lamps.slice(..));

      for (slot, lamps) in ranges.into_iter().enumerate() {
        let offset = (slot as u64 * UNIFORM_STRIDE) as u32;
        pass.set_bind_group(0, &self.bind_group, &[offset]);
        pass.set_pipeline(&self.cut_pipeline);
        pass.draw(0..6, 0..1);
        if !lamps.is_empty() {
          pass.set_pipeline(&self.lamp_pipeline);
          pass.draw(0..6, lamps);
        }
      }
    }

    self.queue.submit(Some(encoder.finish()));
    frame.present();
    Ok(())
  }
}

impl DecorationSurface for GpuSurface {
  fn draw(&mut self, plan: &FramePlan) {
    if let Err(e) = self.render(plan) {
      log::debug!("Dropped frame: {e}");
    }
  }
}

fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
  device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
    label: Some("festoon bind group layout"),
    entries: &[
      wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
          ty: wgpu::BufferBindingType::Uniform,
          has_dynamic_offset: false,
          min_binding_size: None,
        },
        count: None,
      },
      wgpu::BindGroupLayoutEntry {
        binding: 1,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
          ty: wgpu::BufferBindingType::Uniform,
          has_dynamic_offset: true,
          min_binding_size: NonZeroU64::new(std::mem::size_of::<DecorationUniforms>() as u64),
        },
        count: None,
      },
    ],
  })
}

fn create_bind_group(
  device: &wgpu::Device,
  layout: &wgpu::BindGroupLayout,
  globals: &wgpu::Buffer,
  decorations: &wgpu::Buffer,
) -> wgpu::BindGroup {
  device.create_bind_group(&wgpu::BindGroupDescriptor {
    label: Some("festoon bind group"),
    layout,
    entries: &[
      wgpu::BindGroupEntry {
        binding: 0,
        resource: globals.as_entire_binding(),
      },
      wgpu::BindGroupEntry {
        binding: 1,
        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
          buffer: decorations,
          offset: 0,
          size: NonZeroU64::new(std::mem::size_of::<DecorationUniforms>() as u64),
        }),
      },
    ],
  })
}

fn decoration_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
  device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("festoon decorations"),
    size: capacity * UNIFORM_STRIDE,
    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  })
}

fn lamp_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
  device.create_buffer(&wgpu::BufferDescriptor {
    label: Some("festoon lamps"),
    size: capacity * std::mem::size_of::<LampInstance>() as u64,
    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    mapped_at_creation: false,
  })
}

fn create_pipelines(
  device: &wgpu::Device,
  layout: &wgpu::BindGroupLayout,
  format: wgpu::TextureFormat,
) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
  let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
    label: Some("festoon shader"),
    source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
  });
  let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
    label: Some("festoon pipeline layout"),
    bind_group_layouts: &[layout],
    push_constant_ranges: &[],
  });

  let lamp_attributes = wgpu::vertex_attr_array![0 => Float32, 1 => Float32, 2 => Float32];
  let lamp_buffers = [wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<LampInstance>() as u64,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &lamp_attributes,
  }];

  let cut = pipeline(
    device,
    &pipeline_layout,
    &shader,
    ("vs_cut", "fs_cut", &[]),
    format,
    wgpu::BlendState::REPLACE,
  );
  let lamps = pipeline(
    device,
    &pipeline_layout,
    &shader,
    ("vs_lamp", "fs_lamp", &lamp_buffers),
    format,
    wgpu::BlendState::ALPHA_BLENDING,
  );
  (cut, lamps)
}

fn pipeline(
  device: &wgpu::Device,
  layout: &wgpu::PipelineLayout,
  shader: &wgpu::ShaderModule,
  (vertex, fragment, buffers): (&str, &str, &[wgpu::VertexBufferLayout<'_>]),
  format: wgpu::TextureFormat,
  blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
  device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
    label: Some(vertex),
    layout: Some(layout),
    vertex: wgpu::VertexState {
      module: shader,
      entry_point: Some(vertex),
      buffers,
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    },
    fragment: Some(wgpu::FragmentState {
      module: shader,
      entry_point: Some(fragment),
      targets: &[Some(wgpu::ColorTargetState {
        format,
        blend: Some(blend),
        write_mask: wgpu::ColorWrites::ALL,
      })],
      compilation_options: wgpu::PipelineCompilationOptions::default(),
    }),
    primitive: wgpu::PrimitiveState {
      topology: wgpu::PrimitiveTopology::TriangleList,
      cull_mode: None,
      ..Default::default()
    },
    depth_stencil: None,
    multisample: wgpu::MultisampleState::default(),
    multiview: None,
    cache: None,
  })
}

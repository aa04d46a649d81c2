//! GPU-resident flux turbulence (requires the `gpu` feature).
//!
//! [`GpuTurbulence`] runs [`flux_compute_shader`] over the particle buffer and
//! reads the samples back, so it can stand in for
//! [`CpuTurbulence`](crate::particles::flux::CpuTurbulence) anywhere a
//! [`DisplacementField`] is accepted. A failed readback falls back to the CPU
//! loop for that tick and logs a warning.

use std::sync::mpsc;

use tracing::{info, warn};
use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::particles::flux::{
    CpuTurbulence, DisplacementField, FluxParticle, FluxSample, FluxUniforms,
};
use crate::shader::{flux_compute_shader, WORKGROUP_SIZE};

/// Storage layout of one particle; `vec3` members are 16-byte aligned.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuFluxParticle {
    rest: [f32; 3],
    _pad0: f32,
    randoms: [f32; 3],
    _pad1: f32,
}

impl From<&FluxParticle> for GpuFluxParticle {
    fn from(p: &FluxParticle) -> Self {
        Self {
            rest: p.rest.to_array(),
            _pad0: 0.0,
            randoms: [p.attributes.phase, p.attributes.speed, p.attributes.scale],
            _pad1: 0.0,
        }
    }
}

/// Buffers sized for a particular particle count.
struct Buffers {
    capacity: usize,
    particles: wgpu::Buffer,
    samples: wgpu::Buffer,
    staging: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Flux displacement evaluated by a compute shader.
pub struct GpuTurbulence {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
    uniforms: wgpu::Buffer,
    buffers: Option<Buffers>,
    upload: Vec<GpuFluxParticle>,
    fallback: CpuTurbulence,
}

impl GpuTurbulence {
    /// Acquire a headless device and build the pipeline.
    pub fn new() -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Flux Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        info!(adapter = %adapter.get_info().name, "flux GPU backend ready");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Flux Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(flux_compute_shader().into()),
        });

        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Flux Bind Group Layout"),
            entries: &[
                storage(0, true),
                storage(1, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flux Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Flux Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Flux Uniforms"),
            contents: bytemuck::bytes_of(&FluxUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            layout,
            uniforms,
            buffers: None,
            upload: Vec::new(),
            fallback: CpuTurbulence,
        })
    }

    fn ensure_buffers(&mut self, count: usize) {
        let stale = self.buffers.as_ref().map_or(true, |b| b.capacity < count);
        if stale {
            let particle_size =
                (count * std::mem::size_of::<GpuFluxParticle>()) as wgpu::BufferAddress;
            let sample_size = (count * std::mem::size_of::<FluxSample>()) as wgpu::BufferAddress;

            let particles = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Flux Particles"),
                size: particle_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let samples = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Flux Samples"),
                size: sample_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            });
            let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Flux Staging"),
                size: sample_size,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Flux Bind Group"),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: particles.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: samples.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: self.uniforms.as_entire_binding(),
                    },
                ],
            });

            self.buffers = Some(Buffers {
                capacity: count,
                particles,
                samples,
                staging,
                bind_group,
            });
        }
    }

    fn dispatch(
        &mut self,
        particles: &[FluxParticle],
        uniforms: FluxUniforms,
        out: &mut Vec<FluxSample>,
    ) -> Result<(), GpuError> {
        let count = particles.len();
        self.upload.clear();
        self.upload.extend(particles.iter().map(GpuFluxParticle::from));
        self.ensure_buffers(count);

        let Some(buffers) = self.buffers.as_ref() else {
            return Err(GpuError::BufferMapping("flux buffers missing".into()));
        };
        self.queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
        self.queue
            .write_buffer(&buffers.particles, 0, bytemuck::cast_slice(&self.upload));

        let sample_bytes = (count * std::mem::size_of::<FluxSample>()) as wgpu::BufferAddress;
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Flux Encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Flux Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &buffers.bind_group, &[]);
            pass.dispatch_workgroups((count as u32).div_ceil(WORKGROUP_SIZE), 1, 1);
        }
        encoder.copy_buffer_to_buffer(&buffers.samples, 0, &buffers.staging, 0, sample_bytes);
        self.queue.submit(Some(encoder.finish()));

        let slice = buffers.staging.slice(..sample_bytes);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(GpuError::BufferMapping(e.to_string())),
            Err(e) => return Err(GpuError::BufferMapping(e.to_string())),
        }

        {
            let data = slice.get_mapped_range();
            out.clear();
            out.extend_from_slice(bytemuck::cast_slice(&data));
        }
        buffers.staging.unmap();

        Ok(())
    }
}

impl DisplacementField for GpuTurbulence {
    fn evaluate(
        &mut self,
        particles: &[FluxParticle],
        uniforms: FluxUniforms,
        out: &mut Vec<FluxSample>,
    ) {
        if particles.is_empty() {
            out.clear();
            return;
        }
        if let Err(e) = self.dispatch(particles, uniforms, out) {
            warn!(error = %e, "flux GPU dispatch failed, using CPU for this tick");
            self.fallback.evaluate(particles, uniforms, out);
        }
    }

    fn name(&self) -> &'static str {
        "gpu"
    }
}

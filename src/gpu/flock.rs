use std::sync::mpsc;

use wgpu::util::DeviceExt;

use super::GpuContext;
use crate::error::{DispatchError, GpuError};
use crate::flock::shader::{compute_shader, workgroup_count};
use crate::flock::{Boid, SimParams};
use crate::layout::{from_gpu_slice, to_gpu_vec};
use crate::GpuLayout;

/// A flock simulated on the GPU.
///
/// Slot `p` of `bind_groups` reads `boids[p]` and writes `boids[1 - p]`, so
/// a dispatch never binds the same buffer for reading and writing. The
/// parity of `tick` selects which one runs.
pub struct GpuFlock {
    context: GpuContext,
    pipeline: wgpu::ComputePipeline,
    params_buffer: wgpu::Buffer,
    boids: [wgpu::Buffer; 2],
    bind_groups: [wgpu::BindGroup; 2],
    staging_buffer: wgpu::Buffer,
    count: u32,
    tick: u64,
}

impl GpuFlock {
    pub fn new(context: GpuContext, boids: &[Boid], params: &SimParams) -> Result<Self, GpuError> {
        if boids.is_empty() {
            return Err(GpuError::EmptyFlock);
        }
        let count = u32::try_from(boids.len()).map_err(|_| GpuError::TooManyBoids(boids.len()))?;
        let device = &context.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Flock Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(compute_shader().into()),
        });

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sim Params Buffer"),
            contents: bytemuck::bytes_of(&params.to_gpu()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let initial = to_gpu_vec(boids);
        let make_boid_buffer = |label: &str| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&initial),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
            })
        };
        let boid_buffers = [make_boid_buffer("Boid Buffer 0"), make_boid_buffer("Boid Buffer 1")];

        let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(Boid::SIZE as u64),
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Flock Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(SimParams::SIZE as u64),
                    },
                    count: None,
                },
                storage_entry(1, true),
                storage_entry(2, false),
            ],
        });

        let make_bind_group = |read: usize, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: boid_buffers[read].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: boid_buffers[1 - read].as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [
            make_bind_group(0, "Flock Bind Group (0 -> 1)"),
            make_bind_group(1, "Flock Bind Group (1 -> 0)"),
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flock Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Flock Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Boid Staging Buffer"),
            size: count as u64 * Boid::SIZE as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!("Created GPU flock with {} boids", count);

        Ok(Self {
            context,
            pipeline,
            params_buffer,
            boids: boid_buffers,
            bind_groups,
            staging_buffer,
            count,
            tick: 0,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    fn parity(&self) -> usize {
        (self.tick & 1) as usize
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.context.adapter_info
    }

    pub fn set_params(&self, params: &SimParams) {
        self.context
            .queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params.to_gpu()));
    }

    /// Overwrite the "now" buffer.
    pub fn write_boids(&self, boids: &[Boid]) -> Result<(), GpuError> {
        if boids.len() != self.len() {
            return Err(DispatchError::LengthMismatch {
                now: boids.len(),
                next: self.len(),
            }
            .into());
        }
        let data = to_gpu_vec(boids);
        self.context
            .queue
            .write_buffer(&self.boids[self.parity()], 0, bytemuck::cast_slice(&data));
        Ok(())
    }

    /// Submit `ticks` dispatches, swapping buffer roles after each.
    pub fn step(&mut self, ticks: u32) {
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Flock Step Encoder"),
            });

        for _ in 0..ticks {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Flock Compute Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_groups[self.parity()], &[]);
            pass.dispatch_workgroups(workgroup_count(self.count), 1, 1);
            drop(pass);
            self.tick += 1;
        }

        self.context.queue.submit(Some(encoder.finish()));
    }

    /// Copy the "now" buffer back to the host, waiting for the queue.
    pub fn read_boids(&self) -> Result<Vec<Boid>, GpuError> {
        let size = self.count as u64 * Boid::SIZE as u64;
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Boid Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(&self.boids[self.parity()], 0, &self.staging_buffer, 0, size);
        self.context.queue.submit(Some(encoder.finish()));

        let buffer_slice = self.staging_buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.context.device.poll(wgpu::Maintain::Wait);

        receiver
            .recv()
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?;

        let gpu_boids = {
            let data = buffer_slice.get_mapped_range();
            bytemuck::pod_collect_to_vec::<u8, <Boid as GpuLayout>::Gpu>(&data)
        };
        self.staging_buffer.unmap();

        Ok(from_gpu_slice::<Boid>(&gpu_boids))
    }
}

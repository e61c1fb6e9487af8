use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

use crate::coords::Rect;
use crate::device::{Gpu, GpuFrame};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Coverage falloff margin (px) around distance-field shapes.
const AA_PAD: f32 = 1.0;

/// Shape selector understood by `shape.wgsl`. Values must match the shader constants.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeKind {
    Rect = 0,
    Circle = 1,
    Line = 2,
    Ellipse = 3,
}

/// Per-instance data for one draw command (64 bytes).
///
///  offset  0  bounds_origin [f32; 2]   loc 0  quad placement
///  offset  8  bounds_size   [f32; 2]   loc 1
///  offset 16  a             [f32; 2]   loc 2  center, or line start
///  offset 24  b             [f32; 2]   loc 3  line end
///  offset 32  params        [f32; 2]   loc 4  radius | half width | (rx, ry)
///  offset 40  color         [f32; 4]   loc 5  premultiplied
///  offset 56  kind          u32        loc 6
///  offset 60  _pad          u32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub bounds_origin: [f32; 2],
    pub bounds_size: [f32; 2],
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub params: [f32; 2],
    pub color: [f32; 4],
    pub kind: u32,
    pub _pad: u32,
}

impl ShapeInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        0 => Float32x2, // bounds_origin
        1 => Float32x2, // bounds_size
        2 => Float32x2, // a
        3 => Float32x2, // b
        4 => Float32x2, // params
        5 => Float32x4, // color
        6 => Uint32     // kind
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    /// Converts a draw command into GPU instance data.
    ///
    /// Returns `None` for degenerate or non-finite geometry, which is skipped.
    pub fn from_cmd(cmd: &DrawCmd) -> Option<Self> {
        let color = cmd.color();
        if !color.is_finite() {
            return None;
        }

        let (kind, bounds, a, b, params) = match cmd {
            DrawCmd::Rect(c) => {
                let r = c.rect.normalized();
                if r.is_empty() || !r.is_finite() {
                    return None;
                }
                (ShapeKind::Rect, r, [0.0; 2], [0.0; 2], [0.0; 2])
            }
            DrawCmd::Circle(c) => {
                if c.radius <= 0.0 || !c.radius.is_finite() || !c.center.is_finite() {
                    return None;
                }
                let d = c.radius * 2.0;
                let bounds =
                    Rect::new(c.center.x - c.radius, c.center.y - c.radius, d, d).expanded(AA_PAD);
                (ShapeKind::Circle, bounds, [c.center.x, c.center.y], [0.0; 2], [c.radius, 0.0])
            }
            DrawCmd::Line(c) => {
                let half = c.width / 2.0;
                if half <= 0.0 || !half.is_finite() || !c.start.is_finite() || !c.end.is_finite() {
                    return None;
                }
                if c.length() <= 0.0 {
                    return None;
                }
                let bounds = Rect::from_corners(c.start, c.end).expanded(half + AA_PAD);
                (
                    ShapeKind::Line,
                    bounds,
                    [c.start.x, c.start.y],
                    [c.end.x, c.end.y],
                    [half, 0.0],
                )
            }
            DrawCmd::Ellipse(c) => {
                let radii = c.radii();
                if radii.x <= 0.0 || radii.y <= 0.0 || !c.bounds.is_finite() {
                    return None;
                }
                let center = c.center();
                let bounds = c.bounds.normalized().expanded(AA_PAD);
                (ShapeKind::Ellipse, bounds, [center.x, center.y], [0.0; 2], [radii.x, radii.y])
            }
        };

        Some(Self {
            bounds_origin: [bounds.origin.x, bounds.origin.y],
            bounds_size: [bounds.size.x, bounds.size.y],
            a,
            b,
            params,
            color: color.to_array(),
            kind: kind as u32,
            _pad: 0,
        })
    }
}

/// Surface size in pixels, as read by `shape.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct SurfaceUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

impl SurfaceUniform {
    /// `None` for a zero-area surface (minimized window).
    fn for_size(size: PhysicalSize<u32>) -> Option<Self> {
        (size.width > 0 && size.height > 0).then(|| Self {
            size: [size.width as f32, size.height as f32],
            _pad: [0.0; 2],
        })
    }
}

/// Pipeline and bindings built for one surface format.
struct ShapePipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    surface_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShapePipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("easel shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });

        let uniform_size = std::mem::size_of::<SurfaceUniform>() as u64;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("easel shape bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            }],
        });

        let surface_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel shape surface ubo"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel shape bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: surface_ubo.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel shape pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("easel shape pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[ShapeInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            format,
            pipeline,
            surface_ubo,
            bind_group,
        }
    }
}

/// Renderer for every `DrawCmd` kind.
///
/// Instances are uploaded in draw-list order and drawn with a single instanced call,
/// so later commands cover earlier ones regardless of shape kind.
/// Colors are expected to be premultiplied (`paint::Color`).
#[derive(Default)]
pub struct ShapeRenderer {
    pipeline: Option<ShapePipeline>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    /// Reused per frame.
    instances: Vec<ShapeInstance>,
    warned_degenerate: bool,
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `frame` to `clear`, then draws `draw_list` over it, in one render pass.
    pub fn render(&mut self, gpu: &Gpu<'_>, frame: &mut GpuFrame, clear: Color, draw_list: &DrawList) {
        self.collect(draw_list);

        let uniform =
            SurfaceUniform::for_size(gpu.size()).filter(|_| !self.instances.is_empty());
        if let Some(uniform) = uniform {
            self.upload(gpu, uniform);
        }

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("easel shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if uniform.is_none() {
            return;
        }
        let (Some(pipeline), Some(instance_vbo)) = (self.pipeline.as_ref(), self.instance_vbo.as_ref())
        else {
            return;
        };

        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_bind_group(0, &pipeline.bind_group, &[]);
        rpass.set_vertex_buffer(0, instance_vbo.slice(..));
        rpass.draw(0..4, 0..self.instances.len() as u32);
    }

    fn collect(&mut self, draw_list: &DrawList) {
        self.instances.clear();
        for cmd in draw_list.iter() {
            match ShapeInstance::from_cmd(cmd) {
                Some(inst) => self.instances.push(inst),
                None if !self.warned_degenerate => {
                    log::debug!("ShapeRenderer: skipping degenerate {} command", cmd.kind_name());
                    self.warned_degenerate = true;
                }
                None => {}
            }
        }
    }

    /// Rebuilds the pipeline on a format change, grows the instance buffer, writes both buffers.
    fn upload(&mut self, gpu: &Gpu<'_>, uniform: SurfaceUniform) {
        let (device, queue) = (gpu.device(), gpu.queue());

        let format = gpu.surface_format();
        let pipeline = match self.pipeline.take() {
            Some(p) if p.format == format => p,
            _ => ShapePipeline::new(device, format),
        };
        queue.write_buffer(&pipeline.surface_ubo, 0, bytemuck::bytes_of(&uniform));
        self.pipeline = Some(pipeline);

        let required = self.instances.len();
        let instance_vbo = match self.instance_vbo.take() {
            Some(vbo) if required <= self.instance_capacity => vbo,
            _ => {
                let capacity = required.next_power_of_two().max(16);
                self.instance_capacity = capacity;
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("easel shape instance vbo"),
                    size: (capacity * std::mem::size_of::<ShapeInstance>()) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            }
        };
        queue.write_buffer(&instance_vbo, 0, bytemuck::cast_slice(&self.instances));
        self.instance_vbo = Some(instance_vbo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::scene::{CircleCmd, EllipseCmd, LineCmd, RectCmd};

    fn red() -> Color { Color::rgb8(255, 0, 0) }

    #[test]
    fn instance_is_64_bytes() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 64);
    }

    #[test]
    fn surface_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<SurfaceUniform>(), 16);
    }

    #[test]
    fn surface_uniform_skips_zero_area() {
        assert_eq!(SurfaceUniform::for_size(PhysicalSize::new(0, 600)), None);
        assert_eq!(SurfaceUniform::for_size(PhysicalSize::new(800, 0)), None);
        assert_eq!(
            SurfaceUniform::for_size(PhysicalSize::new(800, 600)).map(|u| u.size),
            Some([800.0, 600.0])
        );
    }

    #[test]
    fn rect_uses_its_own_bounds() {
        let cmd = DrawCmd::Rect(RectCmd::new(Rect::new(50.0, 50.0, 200.0, 100.0), red()));
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.kind, ShapeKind::Rect as u32);
        assert_eq!(inst.bounds_origin, [50.0, 50.0]);
        assert_eq!(inst.bounds_size, [200.0, 100.0]);
        assert_eq!(inst.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rect_with_negative_size_is_normalized() {
        let cmd = DrawCmd::Rect(RectCmd::new(Rect::new(10.0, 10.0, -5.0, 5.0), red()));
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.bounds_origin, [5.0, 10.0]);
        assert_eq!(inst.bounds_size, [5.0, 5.0]);
    }

    #[test]
    fn circle_bounds_cover_radius_plus_aa() {
        let cmd = DrawCmd::Circle(CircleCmd::new(Vec2::new(400.0, 300.0), 50.0, red()));
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.kind, ShapeKind::Circle as u32);
        assert_eq!(inst.bounds_origin, [349.0, 249.0]);
        assert_eq!(inst.bounds_size, [102.0, 102.0]);
        assert_eq!(inst.a, [400.0, 300.0]);
        assert_eq!(inst.params[0], 50.0);
    }

    #[test]
    fn line_bounds_include_half_width() {
        let cmd = DrawCmd::Line(LineCmd::new(
            Vec2::new(600.0, 100.0),
            Vec2::new(700.0, 500.0),
            5.0,
            red(),
        ));
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.kind, ShapeKind::Line as u32);
        assert_eq!(inst.bounds_origin, [596.5, 96.5]);
        assert_eq!(inst.bounds_size, [107.0, 407.0]);
        assert_eq!(inst.a, [600.0, 100.0]);
        assert_eq!(inst.b, [700.0, 500.0]);
        assert_eq!(inst.params[0], 2.5);
    }

    #[test]
    fn ellipse_passes_center_and_radii() {
        let cmd = DrawCmd::Ellipse(EllipseCmd::new(Rect::new(300.0, 400.0, 150.0, 80.0), red()));
        let inst = ShapeInstance::from_cmd(&cmd).unwrap();
        assert_eq!(inst.kind, ShapeKind::Ellipse as u32);
        assert_eq!(inst.a, [375.0, 440.0]);
        assert_eq!(inst.params, [75.0, 40.0]);
        assert_eq!(inst.bounds_origin, [299.0, 399.0]);
        assert_eq!(inst.bounds_size, [152.0, 82.0]);
    }

    #[test]
    fn degenerate_shapes_are_skipped() {
        let cmds = [
            DrawCmd::Rect(RectCmd::new(Rect::new(0.0, 0.0, 0.0, 10.0), red())),
            DrawCmd::Circle(CircleCmd::new(Vec2::zero(), 0.0, red())),
            DrawCmd::Circle(CircleCmd::new(Vec2::zero(), f32::NAN, red())),
            DrawCmd::Line(LineCmd::new(Vec2::zero(), Vec2::new(10.0, 0.0), 0.0, red())),
            DrawCmd::Line(LineCmd::new(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0), 2.0, red())),
            DrawCmd::Ellipse(EllipseCmd::new(Rect::new(0.0, 0.0, 10.0, 0.0), red())),
        ];
        for cmd in &cmds {
            assert!(ShapeInstance::from_cmd(cmd).is_none(), "{cmd:?} should be skipped");
        }
    }
}

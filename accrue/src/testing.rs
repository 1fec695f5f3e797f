//! Backend recording everything the engine asks it to do.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Once;

use accrue_gpu::{Kernel, KernelParam, ParamBlock};
use glam::UVec2;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{
    AccelerationStructure, Backend, BufferUsage, Color, Error,
    InstanceCullingPolicy, InstanceInfo, RenderPassInvocation, Resource,
    Result, TextureDescriptor,
};

pub struct MockHandle {
    pub id: usize,
    pub label: String,
    released: Rc<Cell<usize>>,
}

impl fmt::Debug for MockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.label, self.id)
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MockDispatch {
    pub label: &'static str,
    pub kernel: Kernel,
    pub size: UVec2,
    pub params: ParamBlock,
    pub resources: Vec<(KernelParam, String)>,
}

impl MockDispatch {
    pub fn resource(&self, param: KernelParam) -> Option<&str> {
        self.resources
            .iter()
            .find(|(p, _)| *p == param)
            .map(|(_, resource)| resource.as_str())
    }
}

#[derive(Debug)]
pub struct MockBackend {
    pub ray_tracing: bool,
    pub missing_kernels: Vec<Kernel>,
    pub textures: Vec<TextureDescriptor>,
    pub buffers: Vec<(String, usize, BufferUsage)>,
    pub writes: Vec<usize>,
    pub dispatches: Vec<MockDispatch>,
    pub clears: Vec<Color>,
    next_id: usize,
    released: Rc<Cell<usize>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            ray_tracing: true,
            missing_kernels: Default::default(),
            textures: Default::default(),
            buffers: Default::default(),
            writes: Default::default(),
            dispatches: Default::default(),
            clears: Default::default(),
            next_id: 0,
            released: Default::default(),
        }
    }

    /// Returns how many handles created by this backend got dropped.
    pub fn released(&self) -> usize {
        self.released.get()
    }

    pub fn kernels(&self) -> Vec<Kernel> {
        self.dispatches.iter().map(|d| d.kernel).collect()
    }

    /// Forgets everything recorded so far, keeping the counters of created
    /// and released resources.
    pub fn take_frame(&mut self) -> (Vec<Kernel>, Vec<Color>) {
        let kernels = self.kernels();

        self.dispatches.clear();

        (kernels, std::mem::take(&mut self.clears))
    }

    fn handle(&mut self, label: &str) -> MockHandle {
        self.next_id += 1;

        MockHandle {
            id: self.next_id,
            label: label.to_string(),
            released: self.released.clone(),
        }
    }
}

impl Backend for MockBackend {
    type Texture = MockHandle;
    type Buffer = MockHandle;
    type Environment = &'static str;
    type Target = &'static str;
    type AccelerationStructure = MockAccelerationStructure;

    fn supports_ray_tracing(&self) -> bool {
        self.ray_tracing
    }

    fn create_texture(
        &mut self,
        label: &str,
        desc: &TextureDescriptor,
    ) -> Self::Texture {
        self.textures.push(*desc);
        self.handle(label)
    }

    fn create_buffer(
        &mut self,
        label: &str,
        size: usize,
        usage: BufferUsage,
    ) -> Self::Buffer {
        self.buffers.push((label.to_string(), size, usage));
        self.handle(label)
    }

    fn write_buffer(&mut self, buffer: &Self::Buffer, data: &[u8]) {
        assert!(!data.is_empty());

        self.writes.push(buffer.id);
    }

    fn dispatch(
        &mut self,
        invocation: &RenderPassInvocation<'_, Self>,
    ) -> Result<()> {
        if self.missing_kernels.contains(&invocation.kernel) {
            return Err(Error::missing(invocation.kernel.label()));
        }

        let resources = invocation
            .resources
            .iter()
            .map(|(param, resource)| {
                let resource = match resource {
                    Resource::Texture(tex) => format!("{tex:?}"),
                    Resource::Buffer(buf) => format!("{buf:?}"),
                    Resource::Environment(env) => format!("env:{env}"),
                    Resource::AccelerationStructure(_) => "as".into(),
                    Resource::Target(target) => format!("target:{target}"),
                };

                (*param, resource)
            })
            .collect();

        self.dispatches.push(MockDispatch {
            label: invocation.label,
            kernel: invocation.kernel,
            size: invocation.size,
            params: invocation.params,
            resources,
        });

        Ok(())
    }

    fn clear(&mut self, _: &Self::Target, color: Color) {
        self.clears.push(color);
    }
}

#[derive(Debug, Default)]
pub struct MockAccelerationStructure {
    pub instances: Vec<InstanceInfo>,
    pub registered: Vec<InstanceInfo>,
    pub builds: usize,
    pub fail_next_build: bool,
}

impl MockAccelerationStructure {
    pub fn new(instances: Vec<InstanceInfo>) -> Self {
        Self {
            instances,
            ..Default::default()
        }
    }
}

impl AccelerationStructure for MockAccelerationStructure {
    fn clear_instances(&mut self) {
        self.registered.clear();
    }

    fn cull_instances(&mut self, policy: &InstanceCullingPolicy) -> usize {
        self.registered.extend(
            self.instances
                .iter()
                .filter(|instance| policy.accepts(instance)),
        );

        self.registered.len()
    }

    fn build(&mut self) -> Result<(), String> {
        if std::mem::take(&mut self.fail_next_build) {
            return Err("out of memory".into());
        }

        self.builds += 1;

        Ok(())
    }
}

thread_local! {
    static WARNINGS: Cell<usize> = const { Cell::new(0) };
}

/// Logger counting warnings (and errors) per thread, so that tests running
/// in parallel don't see each other's records.
struct WarningCounter;

impl Log for WarningCounter {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            WARNINGS.with(|warnings| warnings.set(warnings.get() + 1));
        }
    }

    fn flush(&self) {}
}

/// Runs given closure, returning how many warnings it logged.
pub fn count_warnings(f: impl FnOnce()) -> usize {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        if log::set_logger(&WarningCounter).is_ok() {
            log::set_max_level(LevelFilter::Warn);
        }
    });

    let before = WARNINGS.with(Cell::get);

    f();

    WARNINGS.with(Cell::get) - before
}

use orrery_engine::{
    CameraUniform, FrameData, ProtocolLayout, RenderError, Renderer, ViewConfig,
};

/// Render target that packs each frame into a flat `f32` buffer the host
/// page reads through exported pointers. The host does the actual drawing.
pub struct SharedBufferTarget {
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    camera: [f32; CameraUniform::FLOATS],
    /// Point-cloud generation currently packed in `buffer`.
    uploaded_generation: Option<u32>,
    width: u32,
    height: u32,
    lost: bool,
}

impl SharedBufferTarget {
    pub fn new(layout: ProtocolLayout) -> Self {
        let buffer = vec![0.0; layout.buffer_total_floats];
        Self {
            layout,
            buffer,
            camera: [0.0; CameraUniform::FLOATS],
            uploaded_generation: None,
            width: 0,
            height: 0,
            lost: false,
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(ProtocolLayout::from_config(config))
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    pub fn camera(&self) -> &[f32] {
        &self.camera
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.buffer.len() as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.camera.as_ptr()
    }
}

impl Renderer for SharedBufferTarget {
    fn backend(&self) -> &'static str {
        "shared-buffer"
    }

    fn draw(&mut self, frame: &FrameData) -> Result<(), RenderError> {
        if self.lost {
            return Err(RenderError::ContextLost);
        }
        let generation = self
            .layout
            .write_frame(&mut self.buffer, frame, self.uploaded_generation)?;
        self.uploaded_generation = Some(generation);
        self.camera.copy_from_slice(frame.camera.as_floats());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn invalidate(&mut self) {
        self.lost = true;
        self.uploaded_generation = None;
    }
}

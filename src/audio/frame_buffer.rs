/// Rolling window holding the most recent `len` mono samples, oldest first.
pub struct MonoFrameBuffer {
    samples: Vec<f32>,
}

impl MonoFrameBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    /// Shift out as many old samples as `block` brings in and append `block`.
    /// A block longer than the window keeps only its tail.
    pub fn push_block(&mut self, block: &[f32]) {
        let len = self.samples.len();
        if block.len() >= len {
            self.samples.copy_from_slice(&block[block.len() - len..]);
            return;
        }

        self.samples.copy_within(block.len().., 0);
        self.samples[len - block.len()..].copy_from_slice(block);
    }

    pub fn frame(&self) -> &[f32] {
        &self.samples
    }

    pub fn resize(&mut self, len: usize) {
        self.samples.clear();
        self.samples.resize(len, 0.0);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

use std::collections::VecDeque;

use log::warn;

use crate::analysis::AnalysisSample;
use crate::consts;

/// Most recent analysis samples, oldest evicted first.
pub struct SpectrumHistory {
    samples: VecDeque<AnalysisSample>,
    capacity: usize,
}

impl Default for SpectrumHistory {
    fn default() -> Self {
        Self::new(consts::HISTORY_CAPACITY)
    }
}

impl SpectrumHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: AnalysisSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisSample> {
        self.samples.iter()
    }

    /// Bin-wise mean of every sample shaped like the newest one.
    pub fn average(&self) -> Option<Vec<f32>> {
        let len = self.samples.back()?.len();
        let mut sum = vec![0.0f32; len];
        let mut count = 0usize;

        for sample in self.samples.iter().filter(|s| s.len() == len) {
            for (acc, &value) in sum.iter_mut().zip(sample.values()) {
                *acc += value;
            }
            count += 1;
        }

        let skipped = self.samples.len() - count;
        if skipped > 0 {
            warn!("Ignored {skipped} history sample(s) of a different length");
        }

        sum.iter_mut().for_each(|v| *v /= count as f32);
        Some(sum)
    }

    /// Average and empty the history in one go.
    pub fn take_average(&mut self) -> Option<Vec<f32>> {
        let average = self.average();
        self.clear();
        average
    }
}

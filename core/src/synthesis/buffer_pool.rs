use crate::prelude::AlertError;

/// Scoped pool of sample buffers that bounds how many renders can be alive.
pub struct BufferPool {
    free: Vec<Vec<f32>>,
    outstanding: usize,
    max_capacity: usize,
}

impl BufferPool {
    pub fn with_capacity(max_capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_capacity),
            outstanding: 0,
            max_capacity,
        }
    }

    /// Hands out a zeroed buffer, reusing a released one when possible.
    pub fn checkout(&mut self, length: usize) -> Result<Vec<f32>, AlertError> {
        if self.outstanding >= self.max_capacity {
            return Err(AlertError::BufferExhaustion(format!(
                "{} sample buffers already in use",
                self.outstanding
            )));
        }
        let mut buffer = self.free.pop().unwrap_or_default();
        buffer.clear();
        buffer.resize(length, 0.0);
        self.outstanding += 1;
        Ok(buffer)
    }

    /// Returns a buffer to the pool for reuse.
    pub fn release(&mut self, mut buffer: Vec<f32>) {
        buffer.clear();
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.free.len() < self.max_capacity {
            self.free.push(buffer);
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_refuses_checkout_beyond_capacity() {
        let mut pool = BufferPool::with_capacity(2);
        let first = pool.checkout(4).unwrap();
        let _second = pool.checkout(4).unwrap();
        assert!(matches!(
            pool.checkout(4),
            Err(AlertError::BufferExhaustion(_))
        ));
        pool.release(first);
        let reused = pool.checkout(8).unwrap();
        assert_eq!(reused, vec![0.0; 8]);
        assert_eq!(pool.outstanding(), 2);
    }
}

//! Fractal parameters shared between the input mapper and the shader uniforms.
//!
//! [`FractalState`] holds the Julia constant `mu` and the per-pixel iteration
//! bound. The constant is fixed for the lifetime of a session; only the
//! iteration bound changes, and it never drops below [`MIN_ITERATIONS`].

/// Lowest iteration bound the state will ever hold.
pub const MIN_ITERATIONS: u32 = 1;

/// Iteration bound a new session starts with.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// The two parameters that pick and refine a member of the Julia family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalState {
    mu: [f32; 2],
    iteration_count: u32,
}

impl FractalState {
    /// Creates a state for the constant `mu = x + iy` with [`DEFAULT_ITERATIONS`].
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            mu: [x, y],
            iteration_count: DEFAULT_ITERATIONS,
        }
    }

    /// Same as [`FractalState::new`] with an explicit starting bound,
    /// raised to [`MIN_ITERATIONS`] if lower.
    #[cfg(test)]
    pub fn with_iterations(x: f32, y: f32, iteration_count: u32) -> Self {
        Self {
            mu: [x, y],
            iteration_count: iteration_count.max(MIN_ITERATIONS),
        }
    }

    /// The Julia constant as `[re, im]`.
    pub fn mu(&self) -> [f32; 2] {
        self.mu
    }

    /// Current iteration bound.
    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    /// Raises the iteration bound by one. There is no upper limit short of `u32::MAX`.
    pub fn increment_iterations(&mut self) {
        self.iteration_count = self.iteration_count.saturating_add(1);
    }

    /// Lowers the iteration bound by one unless it is already at [`MIN_ITERATIONS`].
    ///
    /// Returns whether the bound changed.
    pub fn decrement_iterations(&mut self) -> bool {
        if self.iteration_count > MIN_ITERATIONS {
            self.iteration_count -= 1;
            true
        } else {
            false
        }
    }
}

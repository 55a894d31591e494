//! Edge detection blocks.
//!
//! - [`RTrig`] - rising edge (FALSE→TRUE)
//! - [`FTrig`] - falling edge (TRUE→FALSE)
//!
//! Each returns TRUE for exactly one iteration per edge.

use serde::{Deserialize, Serialize};

/// Rising edge trigger (R_TRIG).
///
/// ```
/// use robosim_stdlib::triggers::RTrig;
///
/// let mut rtrig = RTrig::new();
/// assert!(!rtrig.call(false));
/// assert!(rtrig.call(true));
/// assert!(!rtrig.call(true));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RTrig {
    prev_clk: bool,
}

impl RTrig {
    /// Create a new R_TRIG instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one iteration; TRUE on a FALSE→TRUE transition of `clk`.
    pub fn call(&mut self, clk: bool) -> bool {
        let q = clk && !self.prev_clk;
        self.prev_clk = clk;
        q
    }

    /// Reset the trigger to initial state.
    pub fn reset(&mut self) {
        self.prev_clk = false;
    }
}

/// Falling edge trigger (F_TRIG).
///
/// ```
/// use robosim_stdlib::triggers::FTrig;
///
/// let mut ftrig = FTrig::new();
/// assert!(!ftrig.call(true));
/// assert!(ftrig.call(false));
/// assert!(!ftrig.call(false));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FTrig {
    prev_clk: bool,
}

impl FTrig {
    /// Create a new F_TRIG instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one iteration; TRUE on a TRUE→FALSE transition of `clk`.
    pub fn call(&mut self, clk: bool) -> bool {
        let q = !clk && self.prev_clk;
        self.prev_clk = clk;
        q
    }

    /// Reset the trigger to initial state.
    pub fn reset(&mut self) {
        self.prev_clk = false;
    }
}

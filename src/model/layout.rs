/// Index bookkeeping for one area's state vector.
///
/// The state layout is fixed by the number of governor-turbine units `m`:
/// index 0 holds the frequency deviation, index 1 the tie-line power
/// accumulator (integral of net inter-area flow), indices `2..2+m` the
/// turbine power deviations, and indices `2+m..2+2m` the governor valve
/// deviations. The continuous builder, the discretizer, and the engine all
/// address the state through this one type so the offsets cannot drift
/// apart.
///
/// # Examples
///
/// ```
/// use lfc_sim::model::layout::StateLayout;
///
/// let layout = StateLayout::new(3);
/// assert_eq!(layout.dim(), 8);
/// assert_eq!(layout.turbine(0), 2);
/// assert_eq!(layout.governor(0), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    /// Number of governor-turbine units in the area (>= 1).
    pub units: usize,
}

impl StateLayout {
    /// State index of the frequency deviation.
    pub const FREQ: usize = 0;
    /// State index of the tie-line power accumulator.
    pub const TIE: usize = 1;

    /// Creates a layout for an area with `units` governor-turbine chains.
    pub fn new(units: usize) -> Self {
        Self { units }
    }

    /// Total state dimension, `2 + 2*units`.
    pub fn dim(&self) -> usize {
        2 + 2 * self.units
    }

    /// State index of turbine power deviation `j`.
    pub fn turbine(&self, j: usize) -> usize {
        debug_assert!(j < self.units);
        2 + j
    }

    /// State index of governor valve deviation `j`.
    pub fn governor(&self, j: usize) -> usize {
        debug_assert!(j < self.units);
        2 + self.units + j
    }
}

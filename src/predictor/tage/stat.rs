
/// Container for [TagePredictor](super::TagePredictor) runtime stats.
#[derive(Clone, Debug)]
pub struct TageStats {
    /// Successful allocations
    pub alcs: usize,

    /// Failed allocations
    pub failed_alcs: usize,

    /// Correct predictions from the base component
    pub base_hits: usize,

    /// Misses in the base component
    pub base_miss: usize,

    /// Correct predictions from each tagged component
    pub comp_hits: Vec<usize>,

    /// Misses in the tagged components
    pub comp_miss: Vec<usize>,

    /// Number of 'useful' counter resets
    pub resets: usize,

    /// Number of updates
    pub clk: usize,
}
impl TageStats {
    pub fn new(num_comp: usize) -> Self {
        Self {
            alcs: 0,
            failed_alcs: 0,
            base_hits: 0,
            base_miss: 0,
            comp_hits: vec![0; num_comp],
            comp_miss: vec![0; num_comp],
            resets: 0,
            clk: 0,
        }
    }
}

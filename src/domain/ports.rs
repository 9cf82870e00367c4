use crate::core::balancer::ScoreWeights;
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Settings the splitter needs, whichever source they came from.
pub trait ConfigProvider {
    fn team_labels(&self) -> &[String];
    fn four_team_threshold(&self) -> usize;
    fn max_iterations(&self) -> usize;
    fn score_weights(&self) -> ScoreWeights;
}

//! Default value functions for serde deserialization.

pub fn max_valid_distance() -> f64 {
    10_000.0
}

pub fn config_path() -> &'static str {
    "configs/disha.yaml"
}

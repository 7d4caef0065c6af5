// Keyness statistics — frequency counting and SigEff significance testing.

pub mod counter;
pub mod filters;
pub mod frequency;
pub mod keywords;
pub mod sigeff;

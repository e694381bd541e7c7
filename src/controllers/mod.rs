pub mod estimate_controller;
pub mod reference_controller;

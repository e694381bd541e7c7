pub mod assessment;
pub mod reference_data;
pub mod resolver;
pub mod roi_estimator;

mod config_test;
mod expression_test;
mod json_test;
mod scenario_test;

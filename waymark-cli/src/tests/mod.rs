//! Shared test harness modules for the Waymark CLI.

use super::*;
use crate::plan::{
    DefaultPlanPlannerBuilder, PlanConfig, PlanPlannerBuilder, config_from_layers_for_test,
    load_plan_input, run_plan_with,
};

mod helpers;

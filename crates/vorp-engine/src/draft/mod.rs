// Draft-time logic: the caller's draft state, round strategy guidance, and
// pick recommendations.

pub mod recommend;
pub mod state;
pub mod strategy;

mod helpers;

mod completion_flow_test;
mod enrollment_flow_test;
mod payout_flow_test;
